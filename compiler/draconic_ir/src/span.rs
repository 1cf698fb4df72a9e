//! Source location spans.
//!
//! Trees come from an external parser that reports line/column pairs, so a
//! span is the position where a node starts rather than a byte range.

use std::fmt;

/// Source location of a node.
///
/// Lines are 1-based, columns 0-based (the convention of the host grammar's
/// parser). `Span::DUMMY` marks nodes built without position information.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub line: u32,
    pub col: u32,
}

impl Span {
    /// Span for generated or hand-built nodes.
    pub const DUMMY: Span = Span { line: 0, col: 0 };

    #[inline]
    pub const fn new(line: u32, col: u32) -> Self {
        Span { line, col }
    }

    /// Check if this is the dummy span.
    #[inline]
    pub const fn is_dummy(self) -> bool {
        self.line == 0 && self.col == 0
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.col)
    }
}
