//! Expression evaluation.

use std::rc::Rc;

use draconic_ir::{BoolOp, Constant, Expr, ExprKind, Keyword, Name};
use draconic_value::errors::{structural, type_mismatch};
use draconic_value::{Dict, DraconicError, EvalResult, FunctionValue, Set, Value};

use crate::binder::get_attribute;
use crate::compare::apply_compare;
use crate::interpreter::format::{ascii_escape, format_value};
use crate::interpreter::Interpreter;
use crate::operators::apply_binary;
use crate::stack::ensure_sufficient_stack;
use crate::subscript::{get_item, get_slice, SliceBounds};
use crate::unary_operators::apply_unary;

fn constant_value(constant: &Constant) -> Value {
    match constant {
        Constant::None => Value::None,
        Constant::Bool(b) => Value::Bool(*b),
        Constant::Int(i) => Value::Int(*i),
        Constant::Float(f) => Value::Float(*f),
        Constant::Str(s) => Value::str(s),
    }
}

impl Interpreter<'_> {
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult {
        self.guard.tick().map_err(|err| err.at(expr.span))?;
        ensure_sufficient_stack(|| self.eval_expr_inner(expr)).map_err(|err| err.at(expr.span))
    }

    fn eval_expr_inner(&mut self, expr: &Expr) -> EvalResult {
        match &expr.kind {
            ExprKind::Constant(constant) => Ok(constant_value(constant)),
            ExprKind::Name(name) => self.lookup(name.as_str()),

            ExprKind::BinOp { left, op, right } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                apply_binary(*op, &left, &right, &self.size_limits())
            }
            ExprKind::UnaryOp { op, operand } => {
                let operand = self.eval_expr(operand)?;
                apply_unary(*op, &operand)
            }
            ExprKind::BoolOp { op, values } => self.eval_bool_op(*op, values),
            ExprKind::Compare {
                left,
                ops,
                comparators,
            } => {
                let mut left = self.eval_expr(left)?;
                for (op, comparator) in ops.iter().zip(comparators) {
                    let right = self.eval_expr(comparator)?;
                    if !apply_compare(*op, &left, &right)? {
                        return Ok(Value::Bool(false));
                    }
                    left = right;
                }
                Ok(Value::Bool(true))
            }
            ExprKind::IfExp { test, body, orelse } => {
                if self.eval_expr(test)?.is_truthy() {
                    self.eval_expr(body)
                } else {
                    self.eval_expr(orelse)
                }
            }

            ExprKind::Call {
                func,
                args,
                keywords,
            } => {
                let callee = self.eval_expr(func)?;
                let args = self.eval_elements(args)?;
                let kwargs = self.eval_keywords(keywords)?;
                self.call_value(&callee, args, kwargs, expr.span)
            }
            ExprKind::Attribute { value, attr } => {
                let receiver = self.eval_expr(value)?;
                get_attribute(&receiver, attr.as_str(), self.attribute_policy())
            }
            ExprKind::Subscript { value, slice } => {
                let container = self.eval_expr(value)?;
                match &slice.kind {
                    ExprKind::Slice { lower, upper, step } => {
                        let bounds = self.eval_slice_bounds(lower, upper, step)?;
                        get_slice(&container, bounds)
                    }
                    _ => {
                        let index = self.eval_expr(slice)?;
                        get_item(&container, &index)
                    }
                }
            }
            ExprKind::Slice { .. } => Err(structural("slice outside a subscript")),

            ExprKind::List(elts) => {
                let items = self.eval_elements(elts)?;
                Ok(Value::list(items))
            }
            ExprKind::Tuple(elts) => {
                let items = self.eval_elements(elts)?;
                Ok(Value::tuple(items))
            }
            ExprKind::Set(elts) => {
                let items = self.eval_elements(elts)?;
                Ok(Value::set(Set::from_values(items)?))
            }
            ExprKind::Dict { keys, values } => self.eval_dict_display(keys, values),
            ExprKind::Starred(_) => Err(structural("can't use starred expression here")),

            ExprKind::ListComp { elt, generators } | ExprKind::GeneratorExp { elt, generators } => {
                self.eval_list_comp(elt, generators)
            }
            ExprKind::SetComp { elt, generators } => self.eval_set_comp(elt, generators),
            ExprKind::DictComp {
                key,
                value,
                generators,
            } => self.eval_dict_comp(key, value, generators),

            ExprKind::Lambda(lambda) => {
                let closure = self.env.current().clone();
                Ok(Value::Function(Rc::new(FunctionValue::from_lambda(
                    lambda, closure,
                ))))
            }
            ExprKind::NamedExpr { target, value } => {
                let value = self.eval_expr(value)?;
                // `:=` inside a comprehension binds in the enclosing frame.
                self.env
                    .current()
                    .enclosing_frame()
                    .borrow_mut()
                    .define(target.clone(), value.clone());
                Ok(value)
            }

            ExprKind::JoinedStr(parts) => {
                let mut text = String::new();
                for part in parts {
                    match self.eval_expr(part)? {
                        Value::Str(s) => text.push_str(&s),
                        other => {
                            let budget = self.size_limits().max_string_length;
                            let budget = budget.saturating_sub(text.len());
                            text.push_str(&other.try_to_str(budget)?);
                        }
                    }
                    self.guard.check_string_len(text.len())?;
                }
                Ok(Value::string(text))
            }
            ExprKind::FormattedValue {
                value,
                conversion,
                format_spec,
            } => {
                let value = self.eval_expr(value)?;
                let max_len = self.size_limits().max_string_length;
                let value = match conversion {
                    None => value,
                    Some('s') => Value::string(value.try_to_str(max_len)?),
                    Some('r') => Value::string(value.try_repr(max_len)?),
                    Some('a') => Value::string(ascii_escape(&value.try_repr(max_len)?)),
                    Some(other) => {
                        return Err(structural(format!(
                            "unknown string conversion '!{other}'"
                        )))
                    }
                };
                let spec = match format_spec {
                    Some(spec) => match self.eval_expr(spec)? {
                        Value::Str(s) => s,
                        other => {
                            return Err(type_mismatch(format!(
                                "format spec must be a string, not '{}'",
                                other.type_name()
                            )))
                        }
                    },
                    None => Rc::from(""),
                };
                let text = format_value(&value, &spec, &self.size_limits())?;
                self.guard.check_string_len(text.len())?;
                Ok(Value::string(text))
            }
        }
    }

    /// `and`/`or`: evaluates to the operand that decided the result.
    fn eval_bool_op(&mut self, op: BoolOp, values: &[Expr]) -> EvalResult {
        let Some((last, init)) = values.split_last() else {
            return Err(structural("boolean operation without operands"));
        };
        for value in init {
            let value = self.eval_expr(value)?;
            let decided = match op {
                BoolOp::And => !value.is_truthy(),
                BoolOp::Or => value.is_truthy(),
            };
            if decided {
                return Ok(value);
            }
        }
        self.eval_expr(last)
    }

    /// Evaluate display or argument elements, expanding `*iterable`.
    pub(crate) fn eval_elements(&mut self, elts: &[Expr]) -> Result<Vec<Value>, DraconicError> {
        let mut items = Vec::with_capacity(elts.len());
        for elt in elts {
            match &elt.kind {
                ExprKind::Starred(inner) => {
                    let iterable = self.eval_expr(inner)?;
                    for item in iterable.iterate().map_err(|err| err.at(elt.span))? {
                        self.guard.tick_loop()?;
                        items.push(item);
                    }
                }
                _ => items.push(self.eval_expr(elt)?),
            }
            self.guard.check_container_len(items.len())?;
        }
        Ok(items)
    }

    /// Evaluate keyword arguments, expanding `**mapping`.
    fn eval_keywords(
        &mut self,
        keywords: &[Keyword],
    ) -> Result<Vec<(Name, Value)>, DraconicError> {
        let mut kwargs: Vec<(Name, Value)> = Vec::with_capacity(keywords.len());
        for keyword in keywords {
            let value = self.eval_expr(&keyword.value)?;
            match &keyword.arg {
                Some(name) => push_keyword(&mut kwargs, name.clone(), value)?,
                None => {
                    let Value::Dict(mapping) = &value else {
                        return Err(type_mismatch(format!(
                            "argument after ** must be a mapping, not '{}'",
                            value.type_name()
                        ))
                        .at(keyword.value.span));
                    };
                    let entries: Vec<(Value, Value)> = mapping
                        .borrow()
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect();
                    for (key, value) in entries {
                        let Some(key) = key.as_str() else {
                            return Err(type_mismatch("keywords must be strings"));
                        };
                        push_keyword(&mut kwargs, Name::new(key), value)?;
                    }
                }
            }
        }
        Ok(kwargs)
    }

    fn eval_dict_display(&mut self, keys: &[Option<Expr>], values: &[Expr]) -> EvalResult {
        let mut dict = Dict::new();
        for (key, value) in keys.iter().zip(values) {
            match key {
                Some(key) => {
                    let key = self.eval_expr(key)?;
                    let value = self.eval_expr(value)?;
                    dict.insert(key, value)?;
                }
                None => {
                    let mapping = self.eval_expr(value)?;
                    let Value::Dict(mapping) = &mapping else {
                        return Err(type_mismatch(format!(
                            "'{}' object is not a mapping",
                            mapping.type_name()
                        )));
                    };
                    let entries: Vec<(Value, Value)> = mapping
                        .borrow()
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect();
                    for (key, value) in entries {
                        dict.insert(key, value)?;
                    }
                }
            }
            self.guard.check_container_len(dict.len())?;
        }
        Ok(Value::dict(dict))
    }

    pub(crate) fn eval_slice_bounds(
        &mut self,
        lower: &Option<Box<Expr>>,
        upper: &Option<Box<Expr>>,
        step: &Option<Box<Expr>>,
    ) -> Result<SliceBounds, DraconicError> {
        Ok(SliceBounds {
            lower: self.eval_slice_index(lower.as_deref())?,
            upper: self.eval_slice_index(upper.as_deref())?,
            step: self.eval_slice_index(step.as_deref())?,
        })
    }

    fn eval_slice_index(&mut self, bound: Option<&Expr>) -> Result<Option<i64>, DraconicError> {
        let Some(bound) = bound else {
            return Ok(None);
        };
        match self.eval_expr(bound)? {
            Value::None => Ok(None),
            value => value.as_int().map(Some).ok_or_else(|| {
                type_mismatch("slice indices must be integers or None").at(bound.span)
            }),
        }
    }
}

fn push_keyword(
    kwargs: &mut Vec<(Name, Value)>,
    name: Name,
    value: Value,
) -> Result<(), DraconicError> {
    if kwargs.iter().any(|(existing, _)| *existing == name) {
        return Err(type_mismatch(format!(
            "got multiple values for keyword argument '{name}'"
        )));
    }
    kwargs.push((name, value));
    Ok(())
}
