//! Shared storage behind the reference parts of a value.
//!
//! Slices, maps and pointers do not own their contents: cloning one of them
//! yields a second handle onto the same storage, and a write through either
//! handle is visible through both. [`Shared`] is that storage. Channels and
//! functions only need an identity, which [`Handle`] provides.

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared mutable storage with address identity.
pub struct Shared<T>(Arc<RwLock<T>>);

impl<T> Shared<T> {
    pub(crate) fn new(value: T) -> Self {
        Shared(Arc::new(RwLock::new(value)))
    }

    /// Lock for reading.
    ///
    /// Recursive so that comparing a value against itself, which reads the
    /// same storage twice, cannot deadlock.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read_recursive()
    }

    /// Lock for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write()
    }

    /// Whether both handles refer to the same storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the storage, stable for its lifetime.
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Shared(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shared({:#x})", self.addr())
    }
}

/// Identity of a channel or function value.
///
/// Two handles are the same channel (or function) iff they share an address.
#[derive(Clone)]
pub struct Handle(Arc<str>);

impl Handle {
    pub fn new(label: &str) -> Self {
        Handle(Arc::from(label))
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<u8>() as usize
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}, {:#x})", self.label(), self.addr())
    }
}
