//! Statement dispatch.

use std::rc::Rc;

use draconic_ir::{Stmt, StmtKind};
use draconic_value::{ExecResult, Flow, FunctionValue, Value};

use crate::interpreter::Interpreter;
use crate::stack::ensure_sufficient_stack;

impl Interpreter<'_> {
    /// Execute statements in order until one produces a signal.
    pub fn exec_block(&mut self, body: &[Stmt]) -> ExecResult {
        for stmt in body {
            let flow = self.exec_stmt(stmt)?;
            if !flow.is_normal() {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    pub fn exec_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        self.guard.tick().map_err(|err| err.at(stmt.span))?;
        ensure_sufficient_stack(|| self.exec_stmt_inner(stmt)).map_err(|err| err.at(stmt.span))
    }

    fn exec_stmt_inner(&mut self, stmt: &Stmt) -> ExecResult {
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                self.eval_expr(expr)?;
                Ok(Flow::Normal)
            }
            StmtKind::Assign { targets, value } => {
                let value = self.eval_expr(value)?;
                for target in targets {
                    self.assign(target, value.clone())?;
                }
                Ok(Flow::Normal)
            }
            StmtKind::AugAssign { target, op, value } => {
                self.aug_assign(target, *op, value)?;
                Ok(Flow::Normal)
            }
            StmtKind::FunctionDef(def) => {
                let closure = self.env.current().clone();
                let function = FunctionValue::from_def(def, closure);
                self.define(def.name.clone(), Value::Function(Rc::new(function)));
                Ok(Flow::Normal)
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::None,
                };
                Ok(Flow::Return(value))
            }
            StmtKind::If { test, body, orelse } => {
                if self.eval_expr(test)?.is_truthy() {
                    self.exec_block(body)
                } else {
                    self.exec_block(orelse)
                }
            }
            StmtKind::For {
                target,
                iter,
                body,
                orelse,
            } => self.exec_for(target, iter, body, orelse),
            StmtKind::While { test, body, orelse } => self.exec_while(test, body, orelse),
            StmtKind::Break => Ok(Flow::Break),
            StmtKind::Continue => Ok(Flow::Continue),
            StmtKind::Pass => Ok(Flow::Normal),
            StmtKind::Try {
                body,
                handlers,
                orelse,
                finalbody,
            } => self.exec_try(body, handlers, orelse, finalbody),
            StmtKind::Raise(value) => Err(self.raise(value.as_ref())),
            StmtKind::Match { subject, cases } => self.exec_match(subject, cases),
        }
    }
}
