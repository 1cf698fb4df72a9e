//! Error taxonomy for script evaluation.
//!
//! `ErrorKind` carries the structured category; `DraconicError` wraps it with
//! the span of the innermost node being evaluated and the script function
//! frames it unwound through.
//!
//! Factory functions (e.g. `name_not_found()`) are the construction API.
//!
//! # Catchability
//!
//! Only `UserRaised` and `ScriptFault` model program state and may be
//! intercepted by a script's `try` handlers. Every other kind is fatal for
//! the run and unwinds to the host.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use draconic_ir::{Name, Span};

use crate::value::Value;

/// Result of evaluating an expression.
pub type EvalResult = Result<Value, DraconicError>;

/// The quota that a `LimitExceeded` error breached.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LimitKind {
    Steps,
    CallDepth,
    LoopIterations,
    StringLength,
    ContainerSize,
    Timeout,
    PowerBase,
    Power,
}

impl LimitKind {
    /// The configuration field that sets this limit.
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::Steps => "max_steps",
            Self::CallDepth => "max_call_depth",
            Self::LoopIterations => "max_loop_iterations",
            Self::StringLength => "max_string_length",
            Self::ContainerSize => "max_container_size",
            Self::Timeout => "timeout",
            Self::PowerBase => "max_power_base",
            Self::Power => "max_power",
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Steps => "evaluation step limit",
            Self::CallDepth => "maximum recursion depth",
            Self::LoopIterations => "loop iteration limit",
            Self::StringLength => "maximum string length",
            Self::ContainerSize => "maximum container size",
            Self::Timeout => "execution timeout",
            Self::PowerBase => "maximum power base",
            Self::Power => "maximum exponent",
        };
        f.write_str(text)
    }
}

/// Opaque failure reported by a host capability.
#[derive(Clone, Debug)]
pub struct HostError {
    message: String,
    source: Option<Arc<dyn Error + Send + Sync>>,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        HostError {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an arbitrary host error, keeping it reachable via `source()`.
    pub fn from_error(error: impl Error + Send + Sync + 'static) -> Self {
        HostError {
            message: error.to_string(),
            source: Some(Arc::new(error)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for HostError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn Error + 'static))
    }
}

/// Structured error category.
#[derive(Clone, Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Identifier unresolved in the scope chain and the bindings.
    #[error("name '{name}' is not defined")]
    NameNotFound { name: Name },

    /// Dunder-shaped or otherwise disallowed attribute access.
    #[error("access to attribute '{attr}' is not allowed")]
    AttributeRejected { attr: String },

    /// Operation applied to values of incompatible types.
    #[error("{message}")]
    TypeMismatch { message: String },

    /// A resource guard quota was breached. Never catchable.
    #[error("{limit} exceeded (limit: {max})")]
    LimitExceeded { limit: LimitKind, max: u64 },

    /// The script raised a value with `raise`.
    #[error("{value}")]
    UserRaised { value: Value },

    /// Runtime failure modelling program state (`ZeroDivisionError`,
    /// `KeyError`, ...). Catchable like `UserRaised`.
    #[error("{name}: {message}")]
    ScriptFault { name: &'static str, message: String },

    /// A native binding failed.
    #[error("host capability '{capability}' failed: {source}")]
    HostCapabilityError {
        capability: Name,
        #[source]
        source: HostError,
    },

    /// Misplaced control flow or an unsupported construct.
    #[error("{message}")]
    Structural { message: String },
}

/// A single script function frame in a trace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceFrame {
    /// Function name (`<lambda>` for lambdas).
    pub name: Name,
    /// Location of the call site.
    pub span: Span,
}

/// Script function frames an error unwound through, innermost first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptTrace {
    frames: Vec<TraceFrame>,
}

impl ScriptTrace {
    pub fn frames(&self) -> &[TraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for ScriptTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "script traceback:")?;
        for (i, frame) in self.frames.iter().enumerate() {
            write!(f, "  {i}: {}", frame.name)?;
            if !frame.span.is_dummy() {
                write!(f, " called at {}", frame.span)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Evaluation error.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{kind}")]
pub struct DraconicError {
    kind: Box<ErrorKind>,
    span: Option<Span>,
    trace: ScriptTrace,
}

impl DraconicError {
    pub fn new(kind: ErrorKind) -> Self {
        DraconicError {
            kind: Box::new(kind),
            span: None,
            trace: ScriptTrace::default(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.kind
    }

    /// Location of the innermost node that was being evaluated.
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// Script function frames the error unwound through, innermost first.
    pub fn trace(&self) -> &ScriptTrace {
        &self.trace
    }

    /// Attach a location unless a more specific one is already present.
    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        if self.span.is_none() && !span.is_dummy() {
            self.span = Some(span);
        }
        self
    }

    /// Record a script function frame the error is unwinding through.
    #[must_use]
    pub fn with_frame(mut self, name: Name, span: Span) -> Self {
        self.trace.frames.push(TraceFrame { name, span });
        self
    }

    /// True for the kinds a script `try` statement may intercept.
    pub fn is_catchable(&self) -> bool {
        matches!(
            *self.kind,
            ErrorKind::UserRaised { .. } | ErrorKind::ScriptFault { .. }
        )
    }

    /// Name matched against `except "Name":` handlers.
    ///
    /// A raised host object is named by its type; any other raised value is
    /// a plain `Exception`.
    pub fn exception_name(&self) -> Option<&str> {
        match &*self.kind {
            ErrorKind::UserRaised {
                value: Value::Object(object),
            } => Some(object.type_name()),
            ErrorKind::UserRaised { .. } => Some("Exception"),
            ErrorKind::ScriptFault { name, .. } => Some(*name),
            _ => None,
        }
    }

    /// The breached quota, for `LimitExceeded` errors.
    pub fn limit(&self) -> Option<LimitKind> {
        match &*self.kind {
            ErrorKind::LimitExceeded { limit, .. } => Some(*limit),
            _ => None,
        }
    }
}

impl From<ErrorKind> for DraconicError {
    fn from(kind: ErrorKind) -> Self {
        DraconicError::new(kind)
    }
}

// Name and attribute errors

#[cold]
pub fn name_not_found(name: &str) -> DraconicError {
    ErrorKind::NameNotFound {
        name: Name::new(name),
    }
    .into()
}

#[cold]
pub fn attribute_rejected(attr: &str) -> DraconicError {
    ErrorKind::AttributeRejected {
        attr: attr.to_string(),
    }
    .into()
}

/// An allowed attribute that the receiver does not have.
#[cold]
pub fn no_attribute(value: &Value, attr: &str) -> DraconicError {
    script_fault(
        "AttributeError",
        format!("'{}' object has no attribute '{attr}'", value.type_name()),
    )
}

// Type errors

#[cold]
pub fn type_mismatch(message: impl Into<String>) -> DraconicError {
    ErrorKind::TypeMismatch {
        message: message.into(),
    }
    .into()
}

#[cold]
pub fn unsupported_operands(symbol: &str, left: &Value, right: &Value) -> DraconicError {
    type_mismatch(format!(
        "unsupported operand type(s) for {symbol}: '{}' and '{}'",
        left.type_name(),
        right.type_name()
    ))
}

#[cold]
pub fn bad_operand(symbol: &str, operand: &Value) -> DraconicError {
    type_mismatch(format!(
        "bad operand type for unary {symbol}: '{}'",
        operand.type_name()
    ))
}

#[cold]
pub fn not_callable(value: &Value) -> DraconicError {
    type_mismatch(format!("'{}' object is not callable", value.type_name()))
}

#[cold]
pub fn not_iterable(value: &Value) -> DraconicError {
    type_mismatch(format!("'{}' object is not iterable", value.type_name()))
}

#[cold]
pub fn unhashable(value: &Value) -> DraconicError {
    type_mismatch(format!("unhashable type: '{}'", value.type_name()))
}

// Limits

#[cold]
pub fn limit_exceeded(limit: LimitKind, max: u64) -> DraconicError {
    ErrorKind::LimitExceeded { limit, max }.into()
}

// Raised and faulted

#[cold]
pub fn user_raised(value: Value) -> DraconicError {
    ErrorKind::UserRaised { value }.into()
}

#[cold]
pub fn script_fault(name: &'static str, message: impl Into<String>) -> DraconicError {
    ErrorKind::ScriptFault {
        name,
        message: message.into(),
    }
    .into()
}

#[cold]
pub fn zero_division(message: &str) -> DraconicError {
    script_fault("ZeroDivisionError", message)
}

#[cold]
pub fn key_error(key: &Value) -> DraconicError {
    script_fault("KeyError", key.repr())
}

#[cold]
pub fn index_error(message: impl Into<String>) -> DraconicError {
    script_fault("IndexError", message)
}

#[cold]
pub fn value_error(message: impl Into<String>) -> DraconicError {
    script_fault("ValueError", message)
}

#[cold]
pub fn overflow(operation: &str) -> DraconicError {
    script_fault("OverflowError", format!("integer overflow in {operation}"))
}

// Host and structure

#[cold]
pub fn host_failure(capability: &Name, source: HostError) -> DraconicError {
    ErrorKind::HostCapabilityError {
        capability: capability.clone(),
        source,
    }
    .into()
}

#[cold]
pub fn structural(message: impl Into<String>) -> DraconicError {
    ErrorKind::Structural {
        message: message.into(),
    }
    .into()
}
