//! Statement nodes.

use std::sync::Arc;

use super::expr::{Constant, Expr, ExprKind};
use super::operators::BinaryOp;
use super::patterns::Pattern;
use crate::{Name, Span};

/// A whole script.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Module {
    pub body: Vec<Stmt>,
}

/// A statement with its source location.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stmt {
    pub kind: StmtKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

/// Statement kinds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StmtKind {
    Expr(Expr),
    /// `a = b = value`; targets may be names, subscripts, or (nested)
    /// tuple/list patterns with at most one starred element each.
    Assign {
        targets: Vec<Expr>,
        value: Expr,
    },
    /// `target op= value`
    AugAssign {
        target: Expr,
        op: BinaryOp,
        value: Expr,
    },
    /// Shared with every function value created from it.
    FunctionDef(Arc<FunctionDef>),
    Return(Option<Expr>),
    If {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    For {
        target: Expr,
        iter: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    While {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    Break,
    Continue,
    Pass,
    Try {
        body: Vec<Stmt>,
        handlers: Vec<ExceptHandler>,
        orelse: Vec<Stmt>,
        finalbody: Vec<Stmt>,
    },
    /// `raise value`, or a bare `raise` inside a handler.
    Raise(Option<Expr>),
    Match {
        subject: Expr,
        cases: Vec<MatchCase>,
    },
}

/// `def name(params): body`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionDef {
    pub name: Name,
    pub params: Parameters,
    pub body: Vec<Stmt>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub span: Span,
}

impl FunctionDef {
    /// The docstring: a string constant as the first body statement.
    pub fn docstring(&self) -> Option<&str> {
        match self.body.first().map(|stmt| &stmt.kind) {
            Some(StmtKind::Expr(Expr {
                kind: ExprKind::Constant(Constant::Str(doc)),
                ..
            })) => Some(&**doc),
            _ => None,
        }
    }
}

/// A parameter and its default expression.
///
/// Defaults are expressions, not values: they are evaluated at call time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    pub name: Name,
    #[cfg_attr(feature = "serde", serde(default))]
    pub default: Option<Expr>,
}

/// Full parameter specification: `(a, /, b, *args, c, **kwargs)`.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Parameters {
    pub posonly: Vec<Param>,
    pub args: Vec<Param>,
    pub vararg: Option<Name>,
    pub kwonly: Vec<Param>,
    pub kwarg: Option<Name>,
}

impl Parameters {
    /// Parameters that accept positional arguments, in order.
    pub fn positional(&self) -> impl Iterator<Item = &Param> {
        self.posonly.iter().chain(self.args.iter())
    }

    /// Number of parameters that accept positional arguments.
    pub fn positional_count(&self) -> usize {
        self.posonly.len() + self.args.len()
    }
}

/// `except types: body`
///
/// `types` is `None` for a bare `except:`; otherwise an expression
/// evaluating to an exception name or a tuple of names.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExceptHandler {
    #[cfg_attr(feature = "serde", serde(default))]
    pub types: Option<Expr>,
    /// `except ... as name`; present in the grammar, rejected at runtime.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<Name>,
    pub body: Vec<Stmt>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub span: Span,
}

/// `case pattern if guard: body`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchCase {
    pub pattern: Pattern,
    #[cfg_attr(feature = "serde", serde(default))]
    pub guard: Option<Expr>,
    pub body: Vec<Stmt>,
}
