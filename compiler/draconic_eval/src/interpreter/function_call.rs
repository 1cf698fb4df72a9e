//! Calling values: script functions, native capabilities, bound builtin
//! methods and callable host objects.

use std::rc::Rc;

use draconic_ir::{Name, Param, Parameters, Span};
use draconic_value::errors::{not_callable, structural, type_mismatch};
use draconic_value::{
    Dict, DraconicError, ErrorKind, EvalResult, Flow, FunctionCode, FunctionValue, Scope,
    ScopeKind, Value,
};

use super::Interpreter;
use crate::methods;

impl Interpreter<'_> {
    /// Call `callee` with evaluated arguments. `span` is the call site.
    pub fn call_value(
        &mut self,
        callee: &Value,
        args: Vec<Value>,
        kwargs: Vec<(Name, Value)>,
        span: Span,
    ) -> EvalResult {
        match callee {
            Value::Function(function) => self.call_function(function, args, kwargs, span),
            Value::Native(native) => {
                self.guard.check_deadline()?;
                let ctx = self.guard.native_context();
                let value = native
                    .call(&ctx, args, kwargs)
                    .inspect_err(|err| report_host_failure(native.name().as_str(), err))?;
                self.guard.check_deadline()?;
                Ok(value)
            }
            Value::BoundMethod(bound) => {
                let limits = self.size_limits();
                methods::call_method(&bound.receiver, bound.method.as_str(), args, kwargs, &limits)
            }
            Value::Object(object) => {
                self.guard.check_deadline()?;
                let ctx = self.guard.native_context();
                let value = object
                    .call(&ctx, args, kwargs)
                    .inspect_err(|err| report_host_failure(object.type_name(), err))?;
                self.guard.check_deadline()?;
                Ok(value)
            }
            other => Err(not_callable(other)),
        }
    }

    /// Call a script function in a fresh child of its closure scope.
    #[tracing::instrument(level = "debug", skip_all, fields(function = %function.name))]
    fn call_function(
        &mut self,
        function: &Rc<FunctionValue>,
        args: Vec<Value>,
        kwargs: Vec<(Name, Value)>,
        span: Span,
    ) -> EvalResult {
        self.guard.enter_call()?;
        let result = {
            let scope = Scope::child(function.closure.clone(), ScopeKind::Function);
            let mut scoped = self.scoped(scope);
            scoped.run_function(function, args, kwargs)
        };
        self.guard.exit_call();
        result.map_err(|err| err.with_frame(function.name.clone(), span))
    }

    fn run_function(
        &mut self,
        function: &FunctionValue,
        args: Vec<Value>,
        kwargs: Vec<(Name, Value)>,
    ) -> EvalResult {
        self.bind_arguments(&function.name, function.code.params(), args, kwargs)?;
        match &function.code {
            FunctionCode::Def(def) => match self.exec_block(&def.body)? {
                Flow::Return(value) => Ok(value),
                Flow::Normal => Ok(Value::None),
                Flow::Break | Flow::Continue => Err(structural("loop control outside loop")),
            },
            FunctionCode::Lambda(lambda) => self.eval_expr(&lambda.body),
        }
    }

    /// Bind call arguments to parameters in the current (fresh) scope.
    ///
    /// Follows Python's rules: positionals fill positional parameters in
    /// order, extras go to `*args`; keywords match by name, unknown ones go to
    /// `**kwargs`. Missing parameters take their default, evaluated now, in
    /// the call scope.
    fn bind_arguments(
        &mut self,
        func: &Name,
        params: &Parameters,
        args: Vec<Value>,
        kwargs: Vec<(Name, Value)>,
    ) -> Result<(), DraconicError> {
        let positional: Vec<&Param> = params.positional().collect();
        let mut slots: Vec<Option<Value>> = vec![None; positional.len()];
        let mut kwonly_slots: Vec<Option<Value>> = vec![None; params.kwonly.len()];

        let given = args.len();
        let mut extra = Vec::new();
        for (i, arg) in args.into_iter().enumerate() {
            match slots.get_mut(i) {
                Some(slot) => *slot = Some(arg),
                None => extra.push(arg),
            }
        }
        if !extra.is_empty() && params.vararg.is_none() {
            return Err(too_many_positional(func, positional.len(), given));
        }

        let mut extra_kwargs = Dict::new();
        let mut posonly_as_keyword = Vec::new();
        for (key, value) in kwargs {
            let slot = positional
                .iter()
                .position(|param| param.name == key)
                .filter(|&i| i >= params.posonly.len())
                .map(|i| &mut slots[i])
                .or_else(|| {
                    params
                        .kwonly
                        .iter()
                        .position(|param| param.name == key)
                        .map(|i| &mut kwonly_slots[i])
                });
            match slot {
                Some(Some(_)) => {
                    return Err(type_mismatch(format!(
                        "{func}() got multiple values for argument '{key}'"
                    )))
                }
                Some(slot) => *slot = Some(value),
                None if params.kwarg.is_some() => {
                    extra_kwargs.insert(Value::str(key.as_str()), value)?;
                }
                None if params.posonly.iter().any(|param| param.name == key) => {
                    posonly_as_keyword.push(key);
                }
                None => {
                    return Err(type_mismatch(format!(
                        "{func}() got an unexpected keyword argument '{key}'"
                    )))
                }
            }
        }
        if !posonly_as_keyword.is_empty() {
            return Err(type_mismatch(format!(
                "{func}() got some positional-only arguments passed as keyword arguments: '{}'",
                join_names(&posonly_as_keyword)
            )));
        }

        // Supplied values first, so defaults can refer to earlier parameters.
        for (param, slot) in positional.iter().zip(&slots) {
            if let Some(value) = slot {
                self.define(param.name.clone(), value.clone());
            }
        }
        for (param, slot) in params.kwonly.iter().zip(&kwonly_slots) {
            if let Some(value) = slot {
                self.define(param.name.clone(), value.clone());
            }
        }

        let mut missing = Vec::new();
        for (param, slot) in positional.iter().zip(&slots) {
            if slot.is_none() {
                match &param.default {
                    Some(default) => {
                        let value = self.eval_expr(default)?;
                        self.define(param.name.clone(), value);
                    }
                    None => missing.push(param.name.clone()),
                }
            }
        }
        if !missing.is_empty() {
            return Err(missing_arguments(func, "positional", &missing));
        }
        for (param, slot) in params.kwonly.iter().zip(&kwonly_slots) {
            if slot.is_none() {
                match &param.default {
                    Some(default) => {
                        let value = self.eval_expr(default)?;
                        self.define(param.name.clone(), value);
                    }
                    None => missing.push(param.name.clone()),
                }
            }
        }
        if !missing.is_empty() {
            return Err(missing_arguments(func, "keyword-only", &missing));
        }

        if let Some(vararg) = &params.vararg {
            self.guard.check_container_len(extra.len())?;
            self.define(vararg.clone(), Value::tuple(extra));
        }
        if let Some(kwarg) = &params.kwarg {
            self.define(kwarg.clone(), Value::dict(extra_kwargs));
        }
        Ok(())
    }
}

fn report_host_failure(capability: &str, err: &DraconicError) {
    if let ErrorKind::HostCapabilityError { source, .. } = err.kind() {
        tracing::warn!(capability, error = %source, "native capability failed");
    }
}

fn join_names(names: &[Name]) -> String {
    names
        .iter()
        .map(Name::as_str)
        .collect::<Vec<_>>()
        .join("', '")
}

#[cold]
fn too_many_positional(func: &Name, expected: usize, given: usize) -> DraconicError {
    let plural = if expected == 1 { "" } else { "s" };
    let was = if given == 1 { "was" } else { "were" };
    type_mismatch(format!(
        "{func}() takes {expected} positional argument{plural} but {given} {was} given"
    ))
}

#[cold]
fn missing_arguments(func: &Name, kind: &str, missing: &[Name]) -> DraconicError {
    let plural = if missing.len() == 1 { "" } else { "s" };
    type_mismatch(format!(
        "{func}() missing {} required {kind} argument{plural}: '{}'",
        missing.len(),
        join_names(missing)
    ))
}
