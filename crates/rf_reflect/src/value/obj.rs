use core::any::Any;
use core::fmt;

use alloc::sync::Arc;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::Value;

/// A shared object with reference semantics.
///
/// Store `Obj<T>` in fields that hold "reference type" members: children,
/// collections, anything that path writes must reach in place.
///
/// Lock poisoning is ignored; a panic while an object is borrowed leaves it
/// usable.
pub struct Obj<T>(Arc<RwLock<T>>);

impl<T: Any + Send + Sync> Obj<T> {
    /// Creates a new object.
    #[inline]
    pub fn new(value: T) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    #[inline]
    pub(crate) fn from_inner(inner: Arc<RwLock<T>>) -> Self {
        Self(inner)
    }

    /// Takes a read lock on the object.
    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the object.
    #[inline]
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Converts the handle into a [`Value`] sharing the same object.
    #[inline]
    pub fn into_value(self) -> Value {
        Value::from_object(self.0)
    }

    /// Returns a [`Value`] sharing the same object.
    #[inline]
    pub fn to_value(&self) -> Value {
        Value::from_object(Arc::clone(&self.0))
    }

    /// Check if both handles share the same object.
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.0, &other.0)
    }
}

impl<T> Clone for Obj<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

/// Handles are equal when they share the same object.
impl<T> PartialEq for Obj<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Eq for Obj<T> {}

impl<T: Default + Any + Send + Sync> Default for Obj<T> {
    #[inline]
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Obj<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_read() {
            Ok(guard) => f.debug_tuple("Obj").field(&*guard).finish(),
            Err(_) => f.write_str("Obj(<locked>)"),
        }
    }
}
