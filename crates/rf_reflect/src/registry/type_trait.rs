use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

/// A capability attached to a [`TypeMeta`](crate::registry::TypeMeta).
///
/// Type traits are looked up by their own type, e.g. the access engine asks
/// a container's meta for [`TypeTraitList`](crate::registry::TypeTraitList)
/// to decide how `[index]` segments are resolved.
///
/// Every `Clone + Send + Sync + 'static` type is a `TypeTrait`.
pub trait TypeTrait: Any + Send + Sync {
    /// Clones the trait object.
    fn clone_type_trait(&self) -> Box<dyn TypeTrait>;
}

impl<T: Clone + Any + Send + Sync> TypeTrait for T {
    #[inline]
    fn clone_type_trait(&self) -> Box<dyn TypeTrait> {
        Box::new(self.clone())
    }
}

impl dyn TypeTrait {
    /// Check if the underlying type is `T`.
    #[inline]
    pub fn is<T: TypeTrait>(&self) -> bool {
        let any: &dyn Any = self;
        any.is::<T>()
    }

    /// Returns a reference to the underlying `T`.
    #[inline]
    pub fn downcast_ref<T: TypeTrait>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }

    /// Returns a mutable reference to the underlying `T`.
    #[inline]
    pub fn downcast_mut<T: TypeTrait>(&mut self) -> Option<&mut T> {
        let any: &mut dyn Any = self;
        any.downcast_mut::<T>()
    }
}

impl fmt::Debug for dyn TypeTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TypeTrait")
    }
}
