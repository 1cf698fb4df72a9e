//! Capability binder: the host-registered namespace and the attribute gate.
//!
//! # Registration
//!
//! Hosts register native functions and values by name before a run. Names
//! must be identifiers and may not be dunder-shaped; anything else is
//! rejected with `AttributeRejected` at registration time. `Bindings` is
//! `Send + Sync`: one registry can serve many concurrent runs.
//!
//! # Attribute gate
//!
//! Every attribute read in a script goes through `get_attribute`. Dunder
//! names are always rejected; the `AttributePolicy` rejects further
//! prefixes and names. Function values expose `name` and `doc` in place of
//! the hidden `__name__` and `__doc__`.

use std::rc::Rc;

use draconic_ir::{is_dunder, is_identifier, Name};
use draconic_value::errors::{attribute_rejected, host_failure, no_attribute};
use draconic_value::{
    BoundMethod, DraconicError, EvalResult, HostError, HostValue, NativeContext, NativeFn, Value,
};
use rustc_hash::FxHashMap;

use crate::builtins;
use crate::limits::AttributePolicy;
use crate::methods;
use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// A registered capability.
#[derive(Clone, Debug)]
pub enum Binding {
    Function(NativeFn),
    Value(HostValue),
}

/// Registry of host capabilities visible to scripts.
///
/// Names are resolved here only after the script's own scopes are exhausted.
#[derive(Clone, Debug, Default)]
pub struct Bindings {
    entries: FxHashMap<Name, Binding>,
}

impl Bindings {
    /// An empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// The default preset, printing to stdout.
    pub fn with_defaults() -> Self {
        Self::with_print_handler(stdout_handler())
    }

    /// The default preset, sending `print` output to `handler`.
    pub fn with_print_handler(handler: SharedPrintHandler) -> Self {
        let mut bindings = Self::new();
        builtins::install(&mut bindings, handler);
        bindings
    }

    /// Register `binding` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &str, binding: Binding) -> Result<(), DraconicError> {
        check_binding_name(name)?;
        tracing::trace!(name, "registered binding");
        self.entries.insert(Name::new(name), binding);
        Ok(())
    }

    /// Register a native function.
    pub fn register_function<F>(&mut self, name: &str, func: F) -> Result<(), DraconicError>
    where
        F: Fn(&NativeContext, Vec<Value>, Vec<(Name, Value)>) -> Result<Value, DraconicError>
            + Send
            + Sync
            + 'static,
    {
        self.register(name, Binding::Function(NativeFn::new(name, func)))
    }

    /// Register a native function whose failures surface to the host as
    /// `HostCapabilityError`.
    pub fn register_host_function<F>(&mut self, name: &str, func: F) -> Result<(), DraconicError>
    where
        F: Fn(&NativeContext, Vec<Value>, Vec<(Name, Value)>) -> Result<Value, HostError>
            + Send
            + Sync
            + 'static,
    {
        let capability = Name::new(name);
        self.register_function(name, move |ctx, args, kwargs| {
            func(ctx, args, kwargs).map_err(|err| host_failure(&capability, err))
        })
    }

    /// Register a value. Each run sees its own copy of any containers.
    pub fn register_value(
        &mut self,
        name: &str,
        value: impl Into<HostValue>,
    ) -> Result<(), DraconicError> {
        self.register(name, Binding::Value(value.into()))
    }

    /// Install a builtin whose name is known to be valid.
    pub(crate) fn define_builtin<F>(&mut self, name: &'static str, func: F)
    where
        F: Fn(&NativeContext, Vec<Value>, Vec<(Name, Value)>) -> Result<Value, DraconicError>
            + Send
            + Sync
            + 'static,
    {
        self.entries
            .insert(Name::new(name), Binding::Function(NativeFn::new(name, func)));
    }

    /// Remove a binding, e.g. to drop one builtin from the default preset.
    pub fn remove(&mut self, name: &str) -> Option<Binding> {
        self.entries.remove(name)
    }

    pub fn resolve_external(&self, name: &str) -> Option<&Binding> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.entries.keys()
    }
}

fn check_binding_name(name: &str) -> Result<(), DraconicError> {
    if is_dunder(name) || !is_identifier(name) {
        tracing::debug!(name, "rejected binding name");
        return Err(attribute_rejected(name));
    }
    Ok(())
}

/// Read `receiver.attr` through the attribute gate.
pub fn get_attribute(receiver: &Value, attr: &str, policy: &AttributePolicy) -> EvalResult {
    if let Value::Function(function) = receiver {
        match attr {
            "name" => return Ok(Value::str(function.name.as_str())),
            "doc" => {
                return Ok(function
                    .doc
                    .as_ref()
                    .map_or(Value::None, |doc| Value::Str(Rc::clone(doc))))
            }
            _ => {}
        }
    }
    if !policy.allows(attr) {
        tracing::debug!(attr, type_name = receiver.type_name(), "attribute rejected");
        return Err(attribute_rejected(attr));
    }
    match receiver {
        Value::Object(object) => object
            .get_attr(attr)
            .ok_or_else(|| no_attribute(receiver, attr)),
        _ if methods::has_method(receiver, attr) => Ok(Value::BoundMethod(Rc::new(BoundMethod {
            receiver: receiver.clone(),
            method: Name::new(attr),
        }))),
        _ => Err(no_attribute(receiver, attr)),
    }
}
