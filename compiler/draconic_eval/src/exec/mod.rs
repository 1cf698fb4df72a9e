//! Tree-walking evaluation, organised by node category:
//!
//! - `stmt`: statement dispatch and blocks
//! - `expr`: expression dispatch, calls, displays, f-strings
//! - `assign`: assignment targets, unpacking, augmented assignment
//! - `control`: loops, `try`, `raise`
//! - `pattern`: `match` statements
//! - `comprehension`: list/set/dict comprehensions and generator expressions
//!
//! Every module adds methods to `Interpreter`. Each statement and expression
//! visit costs one step; errors are annotated with the span of the innermost
//! node being evaluated.

mod assign;
mod comprehension;
mod control;
mod expr;
mod pattern;
mod stmt;
