//! Draconic Value - runtime values and errors for the Draconic interpreter.
//!
//! - `Value`: the tagged union the evaluator manipulates
//! - `Scope`: lexical environments with parent links
//! - `DraconicError`: the error taxonomy returned to hosts
//! - `Flow`: return/break/continue signals
//! - `HostObject`, `HostValue`, `NativeFn`: the host side of the sandbox

pub mod errors;
mod flow;
mod native;
mod scope;
mod shared;
mod value;

pub use errors::{
    DraconicError, ErrorKind, EvalResult, HostError, LimitKind, ScriptTrace, TraceFrame,
};
pub use flow::{ExecResult, Flow};
pub use native::{NativeContext, SizeLimits, DEADLINE_CHECK_INTERVAL};
pub use scope::{Scope, ScopeKind};
pub use shared::{Shared, WeakShared};
pub use value::{
    format_float, BoundMethod, Dict, FunctionCode, FunctionValue, HashKey, HostObject, HostValue,
    NativeFn, NativeFnImpl, Number, RangeIter, RangeValue, Set, Value, ValueIter,
    MAX_COMPARE_DEPTH,
};
