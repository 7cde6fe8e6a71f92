//! Type-erased values.
//!
//! A [`Value`] is a shared, type-erased handle. It either holds a plain
//! value (copied around, never mutated in place) or an object created by
//! [`Obj`], which has reference semantics: every clone of the handle sees
//! the same instance and writes through one handle are visible through all.
//!
//! Null is not a `Value`; absent values are `Option<Value>::None`.

mod obj;
mod traits;

pub use obj::Obj;
pub use traits::{FromValue, IntoValue};

pub(crate) use traits::is_assignable;

use core::any::Any;
use core::fmt;

use alloc::sync::Arc;
use std::sync::{PoisonError, RwLock};

use crate::info::Type;

/// A shared, type-erased value.
#[derive(Clone)]
pub struct Value {
    ty: Type,
    object: bool,
    data: Arc<dyn Any + Send + Sync>,
}

impl Value {
    /// Wraps a plain value.
    ///
    /// To share an object with reference semantics use [`Obj::into_value`].
    #[inline]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            ty: Type::of::<T>(),
            object: false,
            data: Arc::new(value),
        }
    }

    #[inline]
    pub(crate) fn from_object<T: Any + Send + Sync>(inner: Arc<RwLock<T>>) -> Self {
        Self {
            ty: Type::of::<T>(),
            object: true,
            data: inner,
        }
    }

    /// Returns the runtime type of the held value.
    ///
    /// Objects report their payload type, not the lock that shares them.
    #[inline(always)]
    pub fn ty(&self) -> Type {
        self.ty
    }

    /// Check if the held value is a `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty.is::<T>()
    }

    /// Returns a reference to a plain value of type `T`.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }

    /// Returns the object of type `T`, if this handle shares one.
    #[inline]
    pub fn object<T: Any + Send + Sync>(&self) -> Option<Obj<T>> {
        Arc::clone(&self.data)
            .downcast::<RwLock<T>>()
            .ok()
            .map(Obj::from_inner)
    }

    /// Check if the held value is an object.
    #[inline]
    pub fn is_object<T: Any>(&self) -> bool {
        self.data.is::<RwLock<T>>()
    }

    /// Check if the handle shares an object, whatever its type.
    #[inline(always)]
    pub fn holds_object(&self) -> bool {
        self.object
    }

    /// Calls `func` with a shared borrow of the held `T`, plain or object.
    pub fn with_ref<T: Any, R>(&self, func: impl FnOnce(&T) -> R) -> Option<R> {
        if let Some(lock) = self.data.downcast_ref::<RwLock<T>>() {
            let guard = lock.read().unwrap_or_else(PoisonError::into_inner);
            return Some(func(&*guard));
        }
        self.data.downcast_ref::<T>().map(func)
    }

    /// Calls `func` with an exclusive borrow of the held `T`.
    ///
    /// Only objects can be mutated in place; plain values return `None`.
    pub fn with_mut<T: Any, R>(&self, func: impl FnOnce(&mut T) -> R) -> Option<R> {
        let lock = self.data.downcast_ref::<RwLock<T>>()?;
        let mut guard = lock.write().unwrap_or_else(PoisonError::into_inner);
        Some(func(&mut *guard))
    }

    /// Check if both handles share the same allocation.
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.data, &other.data)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value(`{}`)", self.ty)
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Value::new(value)
                }
            }
        )*
    };
}

impl_from_for_value!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    alloc::string::String,
);

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::new(alloc::string::String::from(value))
    }
}

impl<T: Any + Send + Sync> From<Obj<T>> for Value {
    #[inline]
    fn from(value: Obj<T>) -> Self {
        value.into_value()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn plain_values() {
        let value = Value::from(7_i32);
        assert!(value.is::<i32>());
        assert_eq!(value.downcast_ref::<i32>(), Some(&7));
        assert!(!value.is_object::<i32>());
        assert_eq!(value.with_ref(|v: &i32| *v + 1), Some(8));
        assert_eq!(value.with_mut(|v: &mut i32| *v = 0), None);

        let text = Value::from("abc");
        assert!(text.is::<String>());
    }

    #[test]
    fn objects_share_state() {
        let list = Obj::new(vec![1_u8, 2]);
        let value = list.to_value();
        assert!(value.is::<Vec<u8>>());
        assert!(value.is_object::<Vec<u8>>());
        assert!(value.downcast_ref::<Vec<u8>>().is_none());

        value.with_mut(|v: &mut Vec<u8>| v.push(3));
        assert_eq!(list.read().len(), 3);

        let again = value.object::<Vec<u8>>().unwrap();
        assert!(Obj::ptr_eq(&list, &again));
        assert!(Value::ptr_eq(&value, &again.into_value()));
    }
}
