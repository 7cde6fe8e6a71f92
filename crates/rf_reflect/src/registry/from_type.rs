use crate::info::Typed;

/// Creates a [`TypeTrait`] for a type.
///
/// The built-in collection impls use this to attach
/// [`TypeTraitList`], [`TypeTraitKeyed`] and [`TypeTraitSequence`] to their
/// [`TypeMeta`](crate::registry::TypeMeta).
///
/// # Example
///
/// ```
/// use rf_reflect::registry::{FromType, TypeMeta, TypeStorage, TypeTraitList};
///
/// let mut meta = TypeMeta::of::<Vec<i32>>(TypeStorage::Object);
/// meta.insert_trait::<TypeTraitList>(FromType::<Vec<i32>>::from_type());
///
/// assert!(meta.has_trait::<TypeTraitList>());
/// ```
///
/// [`TypeTrait`]: crate::registry::TypeTrait
/// [`TypeTraitList`]: crate::registry::TypeTraitList
/// [`TypeTraitKeyed`]: crate::registry::TypeTraitKeyed
/// [`TypeTraitSequence`]: crate::registry::TypeTraitSequence
pub trait FromType<T: Typed> {
    fn from_type() -> Self;
}
