//! Structural patterns for `match` statements.

use super::expr::{Constant, Expr};
use crate::Name;

/// A `case` pattern.
///
/// The alternatives of an `Or` pattern are not required to bind the same
/// names; only the names of the alternative that matched are bound.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pattern {
    /// Literal or dotted-name value compared with `==`.
    Value(Expr),
    /// `None`, `True` or `False`, compared by identity.
    Singleton(Constant),
    /// `[p1, p2, *rest]` or `(p1, p2)`; at most one `Star`.
    Sequence(Vec<Pattern>),
    /// `{k1: p1, k2: p2, **rest}`
    Mapping {
        keys: Vec<Expr>,
        patterns: Vec<Pattern>,
        rest: Option<Name>,
    },
    /// `*name` or `*_` inside a sequence pattern.
    Star(Option<Name>),
    /// `pattern as name`, a bare capture (`pattern: None`), or the wildcard
    /// `_` (both `None`).
    As {
        pattern: Option<Box<Pattern>>,
        name: Option<Name>,
    },
    /// `p1 | p2 | ...`, tried left to right.
    Or(Vec<Pattern>),
}
