//! Loops, exception handling and `raise`.
//!
//! # Exception handling
//!
//! Only catchable errors (`UserRaised` and script faults) reach `except`
//! handlers. Fatal errors unwind straight to the host without running
//! `finally` blocks: the run is over, and script code must not get a chance
//! to keep executing past a resource breach.

use draconic_ir::{ExceptHandler, Expr, Stmt};
use draconic_value::errors::{script_fault, structural, type_mismatch, user_raised};
use draconic_value::{DraconicError, ExecResult, Flow, Value};

use crate::interpreter::Interpreter;

impl Interpreter<'_> {
    pub(crate) fn exec_for(
        &mut self,
        target: &Expr,
        iter: &Expr,
        body: &[Stmt],
        orelse: &[Stmt],
    ) -> ExecResult {
        let iterable = self.eval_expr(iter)?;
        for item in iterable.iterate().map_err(|err| err.at(iter.span))? {
            self.guard.tick_loop()?;
            self.assign(target, item)?;
            match self.exec_block(body)? {
                Flow::Break => return Ok(Flow::Normal),
                Flow::Normal | Flow::Continue => {}
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }
        self.exec_block(orelse)
    }

    pub(crate) fn exec_while(&mut self, test: &Expr, body: &[Stmt], orelse: &[Stmt]) -> ExecResult {
        while self.eval_expr(test)?.is_truthy() {
            self.guard.tick_loop()?;
            match self.exec_block(body)? {
                Flow::Break => return Ok(Flow::Normal),
                Flow::Normal | Flow::Continue => {}
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }
        self.exec_block(orelse)
    }

    pub(crate) fn exec_try(
        &mut self,
        body: &[Stmt],
        handlers: &[ExceptHandler],
        orelse: &[Stmt],
        finalbody: &[Stmt],
    ) -> ExecResult {
        let outcome = match self.exec_block(body) {
            Ok(Flow::Normal) => self.exec_block(orelse),
            Ok(flow) => Ok(flow),
            Err(err) if err.is_catchable() => self.exec_handlers(err, handlers),
            Err(err) => Err(err),
        };
        match &outcome {
            Err(err) if !err.is_catchable() => return outcome,
            _ if finalbody.is_empty() => return outcome,
            _ => {}
        }
        // A signal or error from `finally` replaces the pending outcome.
        match self.exec_block(finalbody)? {
            Flow::Normal => outcome,
            flow => Ok(flow),
        }
    }

    fn exec_handlers(&mut self, err: DraconicError, handlers: &[ExceptHandler]) -> ExecResult {
        for handler in handlers {
            if handler.name.is_some() {
                return Err(structural("'except ... as' is not supported").at(handler.span));
            }
            let matched = match &handler.types {
                None => true,
                Some(types) => {
                    let types = self.eval_expr(types)?;
                    handler_matches(&types, err.exception_name().unwrap_or_default())
                        .map_err(|e| e.at(handler.span))?
                }
            };
            if matched {
                tracing::debug!(
                    exception = err.exception_name().unwrap_or_default(),
                    "exception caught by script handler"
                );
                self.handling.push(err);
                let result = self.exec_block(&handler.body);
                self.handling.pop();
                return result;
            }
        }
        Err(err)
    }

    /// The error a `raise` statement produces.
    ///
    /// A bare `raise` re-raises the exception currently being handled.
    pub(crate) fn raise(&mut self, value: Option<&Expr>) -> DraconicError {
        match value {
            Some(expr) => match self.eval_expr(expr) {
                Ok(value) => user_raised(value),
                Err(err) => err,
            },
            None => match self.handling.last() {
                Some(err) => err.clone(),
                None => script_fault("RuntimeError", "No active exception to reraise"),
            },
        }
    }
}

/// Whether a handler's type expression (a name or a tuple of names) covers
/// `exception`.
fn handler_matches(types: &Value, exception: &str) -> Result<bool, DraconicError> {
    match types {
        Value::Str(name) => Ok(&**name == exception),
        Value::Tuple(names) => {
            for name in names.iter() {
                if handler_matches(name, exception)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        other => Err(type_mismatch(format!(
            "exception handler types must be strings, not '{}'",
            other.type_name()
        ))),
    }
}
