//! Environment: the scope chain of one run.
//!
//! Holds the module scope, the scope currently executing, and weak handles
//! to every scope the run created so they can be torn down at the end.
//!
//! # Writes
//!
//! - Plain assignment always binds in the current scope.
//! - Augmented assignment writes back into the scope that owns the name
//!   (`find_owner`), so a nested function can update an enclosing variable
//!   with `+=` without a `nonlocal` declaration.

use draconic_ir::Name;
use draconic_value::{Scope, Shared, Value, WeakShared};

/// Created scopes are pruned of dead handles once this many accumulate.
const PRUNE_THRESHOLD: usize = 1024;

/// Scope chain for one run.
pub struct Environment {
    global: Shared<Scope>,
    current: Shared<Scope>,
    created: Vec<WeakShared<Scope>>,
    prune_at: usize,
}

impl Environment {
    pub fn new() -> Self {
        let global = Shared::new(Scope::module());
        Environment {
            current: global.clone(),
            global,
            created: Vec::new(),
            prune_at: PRUNE_THRESHOLD,
        }
    }

    /// The module scope.
    pub fn global(&self) -> &Shared<Scope> {
        &self.global
    }

    /// The scope statements currently execute in.
    pub fn current(&self) -> &Shared<Scope> {
        &self.current
    }

    /// Make `scope` current. Returns the previous scope for `restore`.
    pub fn enter(&mut self, scope: Scope) -> Shared<Scope> {
        let scope = Shared::new(scope);
        self.track(&scope);
        std::mem::replace(&mut self.current, scope)
    }

    pub fn restore(&mut self, previous: Shared<Scope>) {
        self.current = previous;
    }

    fn track(&mut self, scope: &Shared<Scope>) {
        if self.created.len() >= self.prune_at {
            self.created.retain(|weak| weak.upgrade().is_some());
            self.prune_at = (self.created.len() * 2).max(PRUNE_THRESHOLD);
        }
        self.created.push(scope.downgrade());
    }

    /// Bind `name` in the current scope.
    #[inline]
    pub fn define(&self, name: Name, value: Value) {
        self.current.borrow_mut().define(name, value);
    }

    /// Look `name` up through the scope chain (not the bindings).
    #[inline]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.current.resolve(name)
    }

    /// The innermost scope that binds `name`.
    pub fn find_owner(&self, name: &str) -> Option<Shared<Scope>> {
        self.current.find_owner(name)
    }

    /// Drop every binding of every scope created during the run.
    ///
    /// Functions hold their defining scope and scopes hold functions, so
    /// without this a run would leak every closure it created. Function
    /// values that escape the run keep their code but lose their closure.
    pub fn teardown(&mut self) {
        for weak in self.created.drain(..) {
            if let Some(scope) = weak.upgrade() {
                scope.borrow_mut().clear();
            }
        }
        self.global.borrow_mut().clear();
        self.current = self.global.clone();
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
