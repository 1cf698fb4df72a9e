//! `match` statements.
//!
//! Cases are tried in order. A pattern collects its bindings while it
//! matches; they are written to the current scope only once the whole
//! pattern has matched, before the guard runs.
//!
//! The alternatives of an or-pattern need not bind the same names. The
//! first alternative that matches contributes its bindings and the others
//! contribute nothing.

use draconic_ir::{Constant, Expr, MatchCase, Name, Pattern};
use draconic_value::errors::structural;
use draconic_value::{Dict, DraconicError, ExecResult, Flow, Value};
use smallvec::SmallVec;

use crate::interpreter::Interpreter;

type Bindings = SmallVec<[(Name, Value); 4]>;

impl Interpreter<'_> {
    pub(crate) fn exec_match(&mut self, subject: &Expr, cases: &[MatchCase]) -> ExecResult {
        let subject = self.eval_expr(subject)?;
        for case in cases {
            let mut bindings = Bindings::new();
            if !self.match_pattern(&case.pattern, &subject, &mut bindings)? {
                continue;
            }
            for (name, value) in bindings {
                self.define(name, value);
            }
            if let Some(guard) = &case.guard {
                if !self.eval_expr(guard)?.is_truthy() {
                    continue;
                }
            }
            return self.exec_block(&case.body);
        }
        Ok(Flow::Normal)
    }

    fn match_pattern(
        &mut self,
        pattern: &Pattern,
        subject: &Value,
        bindings: &mut Bindings,
    ) -> Result<bool, DraconicError> {
        match pattern {
            Pattern::Value(expr) => {
                let value = self.eval_expr(expr)?;
                subject.try_eq(&value)
            }
            Pattern::Singleton(constant) => Ok(match (constant, subject) {
                (Constant::None, Value::None) => true,
                (Constant::Bool(expected), Value::Bool(actual)) => expected == actual,
                _ => false,
            }),
            Pattern::Sequence(patterns) => self.match_sequence(patterns, subject, bindings),
            Pattern::Mapping {
                keys,
                patterns,
                rest,
            } => self.match_mapping(keys, patterns, rest.as_ref(), subject, bindings),
            Pattern::Star(_) => Err(structural("star pattern outside a sequence pattern")),
            Pattern::As { pattern, name } => {
                if let Some(pattern) = pattern {
                    if !self.match_pattern(pattern, subject, bindings)? {
                        return Ok(false);
                    }
                }
                if let Some(name) = name {
                    bind(bindings, name, subject.clone())?;
                }
                Ok(true)
            }
            Pattern::Or(alternatives) => {
                for alternative in alternatives {
                    let mark = bindings.len();
                    if self.match_pattern(alternative, subject, bindings)? {
                        return Ok(true);
                    }
                    bindings.truncate(mark);
                }
                Ok(false)
            }
        }
    }

    /// `[a, b, *rest]`: matches lists and tuples, never strings.
    fn match_sequence(
        &mut self,
        patterns: &[Pattern],
        subject: &Value,
        bindings: &mut Bindings,
    ) -> Result<bool, DraconicError> {
        let items: Vec<Value> = match subject {
            Value::List(items) => items.borrow().clone(),
            Value::Tuple(items) => items.to_vec(),
            _ => return Ok(false),
        };

        let mut stars = patterns
            .iter()
            .enumerate()
            .filter(|(_, pattern)| matches!(pattern, Pattern::Star(_)))
            .map(|(i, _)| i);
        let star = stars.next();
        if stars.next().is_some() {
            return Err(structural("multiple starred names in sequence pattern"));
        }

        let Some(star) = star else {
            if items.len() != patterns.len() {
                return Ok(false);
            }
            for (pattern, item) in patterns.iter().zip(&items) {
                if !self.match_pattern(pattern, item, bindings)? {
                    return Ok(false);
                }
            }
            return Ok(true);
        };

        if items.len() < patterns.len() - 1 {
            return Ok(false);
        }
        let after = patterns.len() - star - 1;
        let tail_start = items.len() - after;
        for (pattern, item) in patterns[..star].iter().zip(&items[..star]) {
            if !self.match_pattern(pattern, item, bindings)? {
                return Ok(false);
            }
        }
        for (pattern, item) in patterns[star + 1..].iter().zip(&items[tail_start..]) {
            if !self.match_pattern(pattern, item, bindings)? {
                return Ok(false);
            }
        }
        if let Pattern::Star(Some(name)) = &patterns[star] {
            let middle = items[star..tail_start].to_vec();
            bind(bindings, name, Value::list(middle))?;
        }
        Ok(true)
    }

    /// `{key: pattern, **rest}`: matches dicts with at least the given keys.
    fn match_mapping(
        &mut self,
        keys: &[Expr],
        patterns: &[Pattern],
        rest: Option<&Name>,
        subject: &Value,
        bindings: &mut Bindings,
    ) -> Result<bool, DraconicError> {
        let Value::Dict(dict) = subject else {
            return Ok(false);
        };
        let mut matched_keys = Vec::with_capacity(keys.len());
        for (key, pattern) in keys.iter().zip(patterns) {
            let key = self.eval_expr(key)?;
            let Some(value) = dict.borrow().get(&key)? else {
                return Ok(false);
            };
            if !self.match_pattern(pattern, &value, bindings)? {
                return Ok(false);
            }
            matched_keys.push(key);
        }
        if let Some(rest) = rest {
            let mut remaining = Dict::new();
            for (key, value) in dict.borrow().iter() {
                if !matched_keys.contains(key) {
                    remaining.insert(key.clone(), value.clone())?;
                }
            }
            bind(bindings, rest, Value::dict(remaining))?;
        }
        Ok(true)
    }
}

fn bind(bindings: &mut Bindings, name: &Name, value: Value) -> Result<(), DraconicError> {
    if bindings.iter().any(|(bound, _)| bound == name) {
        return Err(structural(format!(
            "multiple assignments to name '{name}' in pattern"
        )));
    }
    bindings.push((name.clone(), value));
    Ok(())
}
