//! Lexical scopes.
//!
//! A scope maps names to values and links to the scope it was created in.
//! Lookups walk outward through parent links. Function calls and
//! comprehensions create scopes; blocks (`if`, `for`, `while`, `try`) do not.
//!
//! Scopes are shared (`Shared<Scope>`) because a function value keeps the
//! scope it was defined in alive as its closure.

use draconic_ir::Name;
use rustc_hash::FxHashMap;

use crate::shared::Shared;
use crate::value::Value;

/// What created a scope.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    /// The root scope of a run.
    Module,
    /// A function call frame.
    Function,
    /// The hidden scope of a comprehension; `:=` writes past it.
    Comprehension,
}

/// A single lexical scope.
#[derive(Debug)]
pub struct Scope {
    kind: ScopeKind,
    bindings: FxHashMap<Name, Value>,
    parent: Option<Shared<Scope>>,
}

impl Scope {
    /// Create the root scope of a run.
    pub fn module() -> Self {
        Scope {
            kind: ScopeKind::Module,
            bindings: FxHashMap::default(),
            parent: None,
        }
    }

    /// Create a scope nested in `parent`.
    pub fn child(parent: Shared<Scope>, kind: ScopeKind) -> Self {
        Scope {
            kind,
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<&Shared<Scope>> {
        self.parent.as_ref()
    }

    /// Bind `name` in this scope, shadowing any outer binding.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value) {
        self.bindings.insert(name, value);
    }

    #[inline]
    pub fn lookup_local(&self, name: &str) -> Option<Value> {
        self.bindings.get(name).cloned()
    }

    pub fn contains_local(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Drop every binding and the parent link.
    ///
    /// Used at the end of a run to break reference cycles between scopes
    /// and the functions defined in them.
    pub fn clear(&mut self) {
        self.bindings.clear();
        self.parent = None;
    }
}

impl Shared<Scope> {
    /// Look `name` up here and then in each enclosing scope.
    pub fn resolve(&self, name: &str) -> Option<Value> {
        let mut current = self.clone();
        loop {
            let parent = {
                let scope = current.borrow();
                if let Some(value) = scope.bindings.get(name) {
                    return Some(value.clone());
                }
                scope.parent.clone()
            };
            current = parent?;
        }
    }

    /// The innermost scope in the chain that binds `name`.
    pub fn find_owner(&self, name: &str) -> Option<Shared<Scope>> {
        let mut current = self.clone();
        loop {
            let parent = {
                let scope = current.borrow();
                if scope.bindings.contains_key(name) {
                    None
                } else {
                    Some(scope.parent.clone())
                }
            };
            match parent {
                None => return Some(current),
                Some(parent) => current = parent?,
            }
        }
    }

    /// The nearest enclosing scope that is not a comprehension scope.
    pub fn enclosing_frame(&self) -> Shared<Scope> {
        let mut current = self.clone();
        loop {
            let parent = {
                let scope = current.borrow();
                match (scope.kind, &scope.parent) {
                    (ScopeKind::Comprehension, Some(parent)) => parent.clone(),
                    _ => break,
                }
            };
            current = parent;
        }
        current
    }
}
