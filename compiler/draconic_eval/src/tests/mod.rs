//! Test modules relocated from implementation files, plus end-to-end runs
//! of hand-built syntax trees.

mod control_tests;
mod operators_tests;
mod pattern_tests;
mod scope_tests;
mod unary_operators_tests;

use draconic_ir::build::module;
use draconic_ir::Stmt;

use crate::{run, Bindings, DraconicError, Limits, Value};

/// Install a test subscriber once; `RUST_LOG` picks what is shown.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Run `body` with the default preset and limits.
pub(crate) fn eval(body: Vec<Stmt>) -> Result<Value, DraconicError> {
    eval_with(body, &Bindings::with_print_handler(crate::buffer_handler()), Limits::default())
}

pub(crate) fn eval_with(
    body: Vec<Stmt>,
    bindings: &Bindings,
    limits: Limits,
) -> Result<Value, DraconicError> {
    init_tracing();
    let tree = module(body);
    run(&tree, bindings, limits)
}
