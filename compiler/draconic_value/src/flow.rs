//! Statement-level control signals.
//!
//! `return`, `break` and `continue` are not errors: they travel on the `Ok`
//! side of statement execution until a function boundary or loop consumes
//! them. Raised exceptions travel on the error channel instead.

use crate::errors::DraconicError;
use crate::value::Value;

/// Outcome of executing a statement or block.
#[derive(Clone, Debug, PartialEq)]
pub enum Flow {
    /// Fall through to the next statement.
    Normal,
    /// Unwind to the enclosing function call.
    Return(Value),
    /// Leave the innermost loop.
    Break,
    /// Start the next iteration of the innermost loop.
    Continue,
}

impl Flow {
    #[inline]
    pub fn is_normal(&self) -> bool {
        matches!(self, Flow::Normal)
    }
}

/// Result of executing a statement.
pub type ExecResult = Result<Flow, DraconicError>;
