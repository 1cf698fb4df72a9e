//! Comprehensions.
//!
//! All four forms run eagerly in a hidden child scope, so their targets do
//! not leak. The first iterable is evaluated in the enclosing scope, the
//! rest inside the comprehension. Generator expressions produce lists.

use draconic_ir::{Comprehension, Expr};
use draconic_value::errors::structural;
use draconic_value::{Dict, DraconicError, EvalResult, Scope, ScopeKind, Set, Value};

use crate::interpreter::Interpreter;

/// What a comprehension builds, and from which expressions.
enum Collector<'e> {
    List { elt: &'e Expr, items: Vec<Value> },
    Set { elt: &'e Expr, items: Set },
    Dict {
        key: &'e Expr,
        value: &'e Expr,
        items: Dict,
    },
}

impl Collector<'_> {
    fn len(&self) -> usize {
        match self {
            Collector::List { items, .. } => items.len(),
            Collector::Set { items, .. } => items.len(),
            Collector::Dict { items, .. } => items.len(),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Collector::List { items, .. } => Value::list(items),
            Collector::Set { items, .. } => Value::set(items),
            Collector::Dict { items, .. } => Value::dict(items),
        }
    }
}

impl Interpreter<'_> {
    pub(crate) fn eval_list_comp(&mut self, elt: &Expr, generators: &[Comprehension]) -> EvalResult {
        self.comprehend(
            Collector::List {
                elt,
                items: Vec::new(),
            },
            generators,
        )
    }

    pub(crate) fn eval_set_comp(&mut self, elt: &Expr, generators: &[Comprehension]) -> EvalResult {
        self.comprehend(
            Collector::Set {
                elt,
                items: Set::new(),
            },
            generators,
        )
    }

    pub(crate) fn eval_dict_comp(
        &mut self,
        key: &Expr,
        value: &Expr,
        generators: &[Comprehension],
    ) -> EvalResult {
        self.comprehend(
            Collector::Dict {
                key,
                value,
                items: Dict::new(),
            },
            generators,
        )
    }

    fn comprehend(&mut self, mut out: Collector<'_>, generators: &[Comprehension]) -> EvalResult {
        let Some((first, rest)) = generators.split_first() else {
            return Err(structural("comprehension without a 'for' clause"));
        };
        let iterable = self.eval_expr(&first.iter)?;
        let scope = Scope::child(self.env.current().clone(), ScopeKind::Comprehension);
        self.with_scope(scope, |scoped| {
            scoped.run_generator(first, &iterable, rest, &mut out)
        })?;
        Ok(out.into_value())
    }

    fn run_generator(
        &mut self,
        generator: &Comprehension,
        iterable: &Value,
        rest: &[Comprehension],
        out: &mut Collector<'_>,
    ) -> Result<(), DraconicError> {
        let items = iterable
            .iterate()
            .map_err(|err| err.at(generator.iter.span))?;
        'items: for item in items {
            self.guard.tick_loop()?;
            self.assign(&generator.target, item)?;
            for condition in &generator.ifs {
                if !self.eval_expr(condition)?.is_truthy() {
                    continue 'items;
                }
            }
            match rest.split_first() {
                Some((next, tail)) => {
                    let iterable = self.eval_expr(&next.iter)?;
                    self.run_generator(next, &iterable, tail, out)?;
                }
                None => {
                    self.collect(out)?;
                    self.guard.check_container_len(out.len())?;
                }
            }
        }
        Ok(())
    }

    fn collect(&mut self, out: &mut Collector<'_>) -> Result<(), DraconicError> {
        match out {
            Collector::List { elt, items } => items.push(self.eval_expr(elt)?),
            Collector::Set { elt, items } => {
                items.insert(self.eval_expr(elt)?)?;
            }
            Collector::Dict { key, value, items } => {
                let key = self.eval_expr(key)?;
                let value = self.eval_expr(value)?;
                items.insert(key, value)?;
            }
        }
        Ok(())
    }
}
