//! Single-threaded shared state.
//!
//! Everything in the engine runs on the document's thread, so sharing is
//! `Rc<RefCell<T>>` rather than a lock.

use std::{
    cell::RefCell,
    ops::{Deref, DerefMut},
    rc::{Rc, Weak},
};

/// An `Rc<RefCell<T>>`. Clones point at the same value.
#[derive(Default)]
pub struct Shared<T> {
    inner: Rc<RefCell<T>>,
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(value)),
        }
    }

    /// Borrow the value.
    ///
    /// Panics while a `get_mut` borrow is alive.
    pub fn get(&self) -> impl Deref<Target = T> {
        self.inner.borrow()
    }

    /// Borrow the value mutably.
    ///
    /// Panics while any other borrow is alive.
    pub fn get_mut(&self) -> impl DerefMut<Target = T> {
        self.inner.borrow_mut()
    }

    /// Whether `self` and `other` are clones of the same value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// A handle that does not keep the value alive.
    pub fn downgrade(&self) -> WeakShared<T> {
        WeakShared {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

/// A non-owning handle to a [`Shared`] value.
pub struct WeakShared<T> {
    inner: Weak<RefCell<T>>,
}

impl<T> Clone for WeakShared<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> WeakShared<T> {
    /// Returns the shared value, if it is still alive.
    pub fn upgrade(&self) -> Option<Shared<T>> {
        self.inner.upgrade().map(|inner| Shared { inner })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn clones_share() {
        let a = Shared::new(1);
        let b = a.clone();
        *b.get_mut() += 1;
        assert_eq!(*a.get(), 2);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&Shared::new(2)));
    }

    #[test]
    fn weak_does_not_keep_alive() {
        let a = Shared::new("hello".to_string());
        let weak = a.downgrade();
        assert_eq!(weak.upgrade().map(|s| s.get().clone()).as_deref(), Some("hello"));
        drop(a);
        assert!(weak.upgrade().is_none());
    }
}
