//! Shared mutable cells.
//!
//! Mutable containers and scopes have identity: two references to the same
//! list observe each other's mutations, and `is` compares addresses. A run
//! is single-threaded, so `Rc<RefCell<T>>` is enough.
//!
//! Callers must not hold a `borrow()` across an operation that may borrow
//! the same cell mutably (e.g. `xs.extend(xs)`): snapshot first, then
//! mutate.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

/// Reference-counted mutable cell with identity.
#[repr(transparent)]
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Shared(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// True if both handles point at the same cell.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the cell, used for identity comparisons.
    #[inline]
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<()>() as usize
    }

    pub fn downgrade(&self) -> WeakShared<T> {
        WeakShared(Rc::downgrade(&self.0))
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Shared(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(inner) => inner.fmt(f),
            Err(_) => f.write_str("<borrowed>"),
        }
    }
}

/// Non-owning handle to a `Shared` cell.
pub struct WeakShared<T>(Weak<RefCell<T>>);

impl<T> WeakShared<T> {
    pub fn upgrade(&self) -> Option<Shared<T>> {
        self.0.upgrade().map(Shared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_identity_and_state() {
        let a = Shared::new(vec![1]);
        let b = a.clone();
        b.borrow_mut().push(2);
        assert_eq!(*a.borrow(), vec![1, 2]);
        assert!(a.ptr_eq(&b));
        assert_eq!(a.addr(), b.addr());
    }

    #[test]
    fn distinct_cells_are_not_identical() {
        let a = Shared::new(1);
        let b = Shared::new(1);
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn weak_handle_expires_with_last_owner() {
        let a = Shared::new(String::from("x"));
        let weak = a.downgrade();
        assert!(weak.upgrade().is_some());
        drop(a);
        assert!(weak.upgrade().is_none());
    }
}
