//! Callable values.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use draconic_ir::{FunctionDef, LambdaDef, Name, Parameters};

use super::Value;
use crate::errors::DraconicError;
use crate::native::NativeContext;
use crate::scope::Scope;
use crate::shared::Shared;

/// The code of a script function: shared with the tree, never copied.
#[derive(Clone, Debug)]
pub enum FunctionCode {
    Def(Arc<FunctionDef>),
    Lambda(Arc<LambdaDef>),
}

impl FunctionCode {
    pub fn params(&self) -> &Parameters {
        match self {
            FunctionCode::Def(def) => &def.params,
            FunctionCode::Lambda(lambda) => &lambda.params,
        }
    }
}

/// A script-defined function (closure).
///
/// Calls run in a fresh child of `closure`, the scope the function was
/// defined in, never of the caller's scope.
pub struct FunctionValue {
    pub name: Name,
    pub doc: Option<Rc<str>>,
    pub code: FunctionCode,
    pub closure: Shared<Scope>,
}

impl FunctionValue {
    pub fn from_def(def: &Arc<FunctionDef>, closure: Shared<Scope>) -> Self {
        FunctionValue {
            name: def.name.clone(),
            doc: def.docstring().map(Rc::from),
            code: FunctionCode::Def(Arc::clone(def)),
            closure,
        }
    }

    pub fn from_lambda(lambda: &Arc<LambdaDef>, closure: Shared<Scope>) -> Self {
        FunctionValue {
            name: Name::new("<lambda>"),
            doc: None,
            code: FunctionCode::Lambda(Arc::clone(lambda)),
            closure,
        }
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("name", &self.name)
            .field("doc", &self.doc)
            .finish_non_exhaustive()
    }
}

/// Signature of a native capability.
///
/// Receives the positional arguments and the keyword arguments in call
/// order. Failures the host wants surfaced as `HostCapabilityError` are
/// built with `errors::host_failure` (or `HostError` + `?` inside
/// `Bindings::register_host_function`).
pub type NativeFnImpl =
    dyn Fn(&NativeContext, Vec<Value>, Vec<(Name, Value)>) -> Result<Value, DraconicError>
        + Send
        + Sync;

/// A host-registered native function.
#[derive(Clone)]
pub struct NativeFn {
    name: Name,
    func: Arc<NativeFnImpl>,
}

impl NativeFn {
    pub fn new<F>(name: impl Into<Name>, func: F) -> Self
    where
        F: Fn(&NativeContext, Vec<Value>, Vec<(Name, Value)>) -> Result<Value, DraconicError>
            + Send
            + Sync
            + 'static,
    {
        NativeFn {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn call(
        &self,
        ctx: &NativeContext,
        args: Vec<Value>,
        kwargs: Vec<(Name, Value)>,
    ) -> Result<Value, DraconicError> {
        (self.func)(ctx, args, kwargs)
    }

    pub fn ptr_eq(&self, other: &NativeFn) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.func).cast::<()>(),
            Arc::as_ptr(&other.func).cast::<()>(),
        )
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFn({})", self.name)
    }
}

/// A built-in method bound to its receiver (`xs.append`).
#[derive(Debug)]
pub struct BoundMethod {
    pub receiver: Value,
    pub method: Name,
}
