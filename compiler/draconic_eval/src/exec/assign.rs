//! Assignment targets.
//!
//! Plain assignment binds in the current scope. Augmented assignment is
//! unfurled into `target = target op value` through the same binary operator
//! table as `op` itself: there is no in-place path, so `d |= other` builds a
//! new dict and aliases of the old one are unaffected. For a name target
//! the result is written back into the scope the name was read from.

use draconic_ir::{BinaryOp, Expr, ExprKind};
use draconic_value::errors::{attribute_rejected, structural, value_error};
use draconic_value::{DraconicError, Value};

use crate::interpreter::Interpreter;
use crate::operators::apply_binary;
use crate::subscript::{get_item, get_slice, set_item, set_slice};

impl Interpreter<'_> {
    /// Bind `value` to an assignment target.
    pub(crate) fn assign(&mut self, target: &Expr, value: Value) -> Result<(), DraconicError> {
        self.assign_inner(target, value)
            .map_err(|err| err.at(target.span))
    }

    fn assign_inner(&mut self, target: &Expr, value: Value) -> Result<(), DraconicError> {
        match &target.kind {
            ExprKind::Name(name) => {
                self.define(name.clone(), value);
                Ok(())
            }
            ExprKind::Tuple(elts) | ExprKind::List(elts) => self.unpack(elts, &value),
            ExprKind::Subscript {
                value: container,
                slice,
            } => {
                let container = self.eval_expr(container)?;
                let limits = self.size_limits();
                match &slice.kind {
                    ExprKind::Slice { lower, upper, step } => {
                        let bounds = self.eval_slice_bounds(lower, upper, step)?;
                        set_slice(&container, bounds, &value, &limits)
                    }
                    _ => {
                        let index = self.eval_expr(slice)?;
                        set_item(&container, &index, value, &limits)
                    }
                }
            }
            ExprKind::Attribute { attr, .. } => Err(attribute_rejected(attr.as_str())),
            ExprKind::Starred(_) => Err(structural(
                "starred assignment target must be in a list or tuple",
            )),
            _ => Err(structural("cannot assign to expression")),
        }
    }

    /// `a, *rest, b = iterable`
    fn unpack(&mut self, targets: &[Expr], value: &Value) -> Result<(), DraconicError> {
        let mut starred = targets
            .iter()
            .enumerate()
            .filter(|(_, target)| matches!(target.kind, ExprKind::Starred(_)))
            .map(|(i, _)| i);
        let star = starred.next();
        if starred.next().is_some() {
            return Err(structural("multiple starred expressions in assignment"));
        }

        let mut items = Vec::new();
        for item in value.iterate()? {
            self.guard.tick_loop()?;
            items.push(item);
        }

        let Some(star) = star else {
            if items.len() < targets.len() {
                return Err(value_error(format!(
                    "not enough values to unpack (expected {}, got {})",
                    targets.len(),
                    items.len()
                )));
            }
            if items.len() > targets.len() {
                return Err(value_error(format!(
                    "too many values to unpack (expected {})",
                    targets.len()
                )));
            }
            for (target, item) in targets.iter().zip(items) {
                self.assign(target, item)?;
            }
            return Ok(());
        };

        let required = targets.len() - 1;
        if items.len() < required {
            return Err(value_error(format!(
                "not enough values to unpack (expected at least {required}, got {})",
                items.len()
            )));
        }
        let after = targets.len() - star - 1;
        let tail = items.split_off(items.len() - after);
        let middle = items.split_off(star);

        for (target, item) in targets[..star].iter().zip(items) {
            self.assign(target, item)?;
        }
        if let ExprKind::Starred(inner) = &targets[star].kind {
            self.assign(inner, Value::list(middle))?;
        }
        for (target, item) in targets[star + 1..].iter().zip(tail) {
            self.assign(target, item)?;
        }
        Ok(())
    }

    /// `target op= value`
    pub(crate) fn aug_assign(
        &mut self,
        target: &Expr,
        op: BinaryOp,
        value: &Expr,
    ) -> Result<(), DraconicError> {
        match &target.kind {
            ExprKind::Name(name) => {
                let owner = self.env.find_owner(name.as_str());
                let current = match owner
                    .as_ref()
                    .and_then(|scope| scope.borrow().lookup_local(name.as_str()))
                {
                    Some(current) => current,
                    None => self.lookup(name.as_str()).map_err(|err| err.at(target.span))?,
                };
                let rhs = self.eval_expr(value)?;
                let result = apply_binary(op, &current, &rhs, &self.size_limits())?;
                match owner {
                    Some(scope) => scope.borrow_mut().define(name.clone(), result),
                    None => self.define(name.clone(), result),
                }
                Ok(())
            }
            // The container and the index are evaluated once.
            ExprKind::Subscript {
                value: container,
                slice,
            } => {
                let container = self.eval_expr(container)?;
                let limits = self.size_limits();
                match &slice.kind {
                    ExprKind::Slice { lower, upper, step } => {
                        let bounds = self.eval_slice_bounds(lower, upper, step)?;
                        let current = get_slice(&container, bounds)?;
                        let rhs = self.eval_expr(value)?;
                        let result = apply_binary(op, &current, &rhs, &limits)?;
                        set_slice(&container, bounds, &result, &limits)
                    }
                    _ => {
                        let index = self.eval_expr(slice)?;
                        let current = get_item(&container, &index)?;
                        let rhs = self.eval_expr(value)?;
                        let result = apply_binary(op, &current, &rhs, &limits)?;
                        set_item(&container, &index, result, &limits)
                    }
                }
                .map_err(|err| err.at(target.span))
            }
            ExprKind::Attribute { attr, .. } => {
                Err(attribute_rejected(attr.as_str()).at(target.span))
            }
            _ => Err(structural("illegal expression for augmented assignment").at(target.span)),
        }
    }
}
