//! `InterpreterBuilder` for creating `Interpreter` instances.

use super::Interpreter;
use crate::binder::Bindings;
use crate::limits::Limits;

/// Builder for an `Interpreter`.
///
/// The bindings are required; limits default to `Limits::default()`.
pub struct InterpreterBuilder<'a> {
    bindings: &'a Bindings,
    limits: Limits,
}

impl<'a> InterpreterBuilder<'a> {
    pub fn new(bindings: &'a Bindings) -> Self {
        InterpreterBuilder {
            bindings,
            limits: Limits::default(),
        }
    }

    /// Set the resource limits for the run.
    #[must_use]
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Build the interpreter. The wall clock starts here.
    pub fn build(self) -> Interpreter<'a> {
        Interpreter::new(self.bindings, self.limits)
    }
}
