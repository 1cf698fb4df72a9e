//! Tree-walking interpreter for Draconic.
//!
//! One `Interpreter` serves one run. It owns everything mutable the run
//! touches (scope chain, guard counters, the run's copies of host values)
//! and borrows the host's `Bindings` immutably. Nothing survives the run:
//! dropping the interpreter tears its scopes down.
//!
//! # Architecture
//!
//! Evaluation entry points live in `crate::exec`:
//!
//! - `exec::stmt` - statement dispatch and blocks
//! - `exec::expr` - expression dispatch
//! - `exec::assign` - assignment targets, unpacking, augmented assignment
//! - `exec::control` - loops, `try`, `raise`
//! - `exec::pattern` - `match` patterns
//! - `exec::comprehension` - comprehensions and generator expressions
//!
//! This module holds name resolution and the run-level bookkeeping;
//! `function_call` binds arguments and invokes callables, `format` renders
//! f-string replacement fields.

mod builder;
pub(crate) mod format;
mod function_call;
mod scope_guard;

pub use builder::InterpreterBuilder;
pub use scope_guard::ScopedInterpreter;

use draconic_ir::{Module, Name, StmtKind};
use draconic_value::errors::{name_not_found, structural};
use draconic_value::{DraconicError, EvalResult, Flow, SizeLimits, Value};
use rustc_hash::FxHashMap;

use crate::binder::{Binding, Bindings};
use crate::environment::Environment;
use crate::guard::ResourceGuard;
use crate::limits::{AttributePolicy, Limits};

/// Evaluator state for a single run.
pub struct Interpreter<'a> {
    pub(crate) env: Environment,
    pub(crate) guard: ResourceGuard,
    bindings: &'a Bindings,
    /// Host values materialised for this run, so repeated reads of a
    /// registered container see the same (mutable) object.
    materialised: FxHashMap<Name, Value>,
    /// Exceptions whose handlers are running, innermost last. A bare
    /// `raise` re-raises the last one.
    pub(crate) handling: Vec<DraconicError>,
}

impl<'a> Interpreter<'a> {
    pub fn new(bindings: &'a Bindings, limits: Limits) -> Self {
        Interpreter {
            env: Environment::new(),
            guard: ResourceGuard::new(limits),
            bindings,
            materialised: FxHashMap::default(),
            handling: Vec::new(),
        }
    }

    /// Execute a whole script.
    ///
    /// Returns the value of the last top-level expression statement, or
    /// `None` when there was none.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = module.body.len()))]
    pub fn eval_module(&mut self, module: &Module) -> EvalResult {
        let mut last = Value::None;
        for stmt in &module.body {
            if let StmtKind::Expr(expr) = &stmt.kind {
                self.guard.tick().map_err(|e| e.at(stmt.span))?;
                last = self.eval_expr(expr).map_err(|e| e.at(stmt.span))?;
                continue;
            }
            match self.exec_stmt(stmt)? {
                Flow::Normal => {}
                Flow::Return(_) => {
                    return Err(structural("'return' outside function").at(stmt.span));
                }
                Flow::Break | Flow::Continue => {
                    return Err(structural("loop control outside loop").at(stmt.span));
                }
            }
        }
        tracing::debug!(
            steps = self.guard.steps(),
            loop_iterations = self.guard.loop_iterations(),
            "run finished"
        );
        Ok(last)
    }

    /// Resolve a name: script scopes first, then the host bindings.
    pub fn lookup(&mut self, name: &str) -> EvalResult {
        if let Some(value) = self.env.lookup(name) {
            return Ok(value);
        }
        self.lookup_binding(name)
            .ok_or_else(|| name_not_found(name))?
    }

    /// Resolve `name` among the host bindings only.
    fn lookup_binding(&mut self, name: &str) -> Option<EvalResult> {
        if let Some(value) = self.materialised.get(name) {
            return Some(Ok(value.clone()));
        }
        let value = match self.bindings.resolve_external(name)? {
            Binding::Function(native) => Value::Native(native.clone()),
            Binding::Value(host) => match host.to_value() {
                Ok(value) => {
                    self.materialised.insert(Name::new(name), value.clone());
                    value
                }
                Err(err) => return Some(Err(err)),
            },
        };
        Some(Ok(value))
    }

    /// Bind `name` in the current scope.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value) {
        self.env.define(name, value);
    }

    pub fn limits(&self) -> &Limits {
        self.guard.limits()
    }

    pub fn size_limits(&self) -> SizeLimits {
        *self.guard.size_limits()
    }

    pub(crate) fn attribute_policy(&self) -> &AttributePolicy {
        &self.guard.limits().attribute_policy
    }

    /// Evaluation steps consumed so far.
    pub fn steps(&self) -> usize {
        self.guard.steps()
    }
}

impl Drop for Interpreter<'_> {
    fn drop(&mut self) {
        self.env.teardown();
    }
}
