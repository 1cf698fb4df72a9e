//! Draconic Eval - sandboxed tree-walking evaluator for Draconic scripts.
//!
//! Draconic is a Python-like scripting language for running untrusted
//! scripts inside a host application. A host registers the capabilities a
//! script may use, sets resource limits, and calls [`run`].
//!
//! # Architecture
//!
//! - `Bindings`: the host-registered namespace and the attribute gate
//! - `ResourceGuard`: step, depth, iteration, size and time quotas
//! - `apply_binary` / `apply_unary` / `apply_compare`: operator dispatch
//! - `methods`: built-in methods of `list`, `dict`, `set` and `str`
//! - `Interpreter`: the evaluator, one per run
//!
//! # Example
//!
//! ```text
//! let mut bindings = Bindings::with_defaults();
//! bindings.register_value("threshold", 10)?;
//! let result = draconic_eval::run(&tree, &bindings, Limits::default())?;
//! ```
//!
//! Each run owns all of its mutable state. `Bindings` is `Send + Sync` and
//! can be shared between runs on different threads; values produced by a run
//! stay on the thread that ran it.

mod args;
mod binder;
mod builtins;
mod compare;
mod environment;
mod exec;
mod guard;
pub mod interpreter;
mod limits;
pub mod methods;
mod operators;
mod print_handler;
mod stack;
mod subscript;
mod unary_operators;

use draconic_ir::Module;

pub use binder::{get_attribute, Binding, Bindings};
pub use compare::{apply_compare, compare_order, contains};
pub use environment::Environment;
pub use guard::ResourceGuard;
pub use interpreter::{Interpreter, InterpreterBuilder, ScopedInterpreter};
pub use limits::{
    AttributePolicy, Limits, DEFAULT_MAX_CALL_DEPTH, DEFAULT_MAX_CONTAINER_SIZE,
    DEFAULT_MAX_LOOP_ITERATIONS, DEFAULT_MAX_POWER, DEFAULT_MAX_POWER_BASE, DEFAULT_MAX_STEPS,
    DEFAULT_MAX_STRING_LENGTH, DEFAULT_TIMEOUT,
};
pub use operators::apply_binary;
pub use print_handler::{buffer_handler, stdout_handler, PrintHandler, SharedPrintHandler};
pub use stack::ensure_sufficient_stack;
pub use subscript::{get_item, get_slice, set_item, set_slice, SliceBounds};
pub use unary_operators::apply_unary;

// Re-export the value model for hosts
pub use draconic_value::{
    errors, DraconicError, ErrorKind, EvalResult, HostError, HostObject, HostValue, LimitKind,
    NativeContext, NativeFn, ScriptTrace, SizeLimits, TraceFrame, Value,
};

/// Execute `tree` against `bindings` under `limits`.
///
/// Returns the value of the last top-level expression statement (`None` if
/// there was none), or the error that ended the run. All state the run
/// created is torn down before this returns.
#[tracing::instrument(level = "debug", skip_all, fields(max_steps = limits.max_steps))]
pub fn run(tree: &Module, bindings: &Bindings, limits: Limits) -> Result<Value, DraconicError> {
    let mut interpreter = InterpreterBuilder::new(bindings).limits(limits).build();
    let result = interpreter.eval_module(tree);
    if let Err(err) = &result {
        tracing::debug!(error = %err, "run failed");
    }
    result
}

#[cfg(test)]
mod tests;
