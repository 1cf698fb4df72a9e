//! RAII scope guard for the interpreter's scope chain.
//!
//! [`ScopedInterpreter`] makes a new scope current and restores the previous
//! one when dropped, on every exit path including `?` and unwinding.
//!
//! The guard holds `&mut Interpreter` and implements `Deref`/`DerefMut`, so
//! everything callable on the interpreter is callable on the guard.
//!
//! ```text
//! let mut scoped = interpreter.scoped(Scope::child(closure, ScopeKind::Function));
//! scoped.define(param, arg);
//! scoped.exec_block(body)?;
//! // previous scope restored here
//! ```

use std::ops::{Deref, DerefMut};

use draconic_value::{Scope, Shared};

use super::Interpreter;

/// Guard that restores the previous scope on drop.
pub struct ScopedInterpreter<'guard, 'interp> {
    interpreter: &'guard mut Interpreter<'interp>,
    previous: Option<Shared<Scope>>,
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.interpreter.env.restore(previous);
        }
    }
}

impl<'interp> Deref for ScopedInterpreter<'_, 'interp> {
    type Target = Interpreter<'interp>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'a> Interpreter<'a> {
    /// Make `scope` current until the returned guard is dropped.
    pub fn scoped(&mut self, scope: Scope) -> ScopedInterpreter<'_, 'a> {
        let previous = self.env.enter(scope);
        ScopedInterpreter {
            interpreter: self,
            previous: Some(previous),
        }
    }

    /// Run `f` with `scope` current.
    pub fn with_scope<T, F>(&mut self, scope: Scope, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_, 'a>) -> T,
    {
        let mut scoped = self.scoped(scope);
        f(&mut scoped)
    }
}
