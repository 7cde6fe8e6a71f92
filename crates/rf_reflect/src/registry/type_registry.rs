use alloc::vec::Vec;
use core::any::TypeId;

use crate::hash::HashMap;
use crate::info::{Type, Typed};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeTrait};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of catalogued types.
///
/// This struct is the central store for type metadata: member tables and
/// [type traits](TypeTrait). [Registering] a type generates a new
/// [`TypeMeta`] entry using the type's [`GetTypeMeta`] implementation
/// (which is automatically implemented when using
/// [`#[derive(Reflect)]`](crate::derive::Reflect)).
///
/// The registry implements [`TypeCatalog`](crate::registry::TypeCatalog),
/// the lookup interface the access engine works against.
///
/// # Example
///
/// ```
/// use rf_reflect::info::Type;
/// use rf_reflect::registry::TypeRegistry;
///
/// let registry = TypeRegistry::new();
///
/// let meta = registry.get_with_type_name("String").unwrap();
/// assert_eq!(meta.ty(), Type::of::<String>());
/// ```
///
/// [Registering]: TypeRegistry::register
pub struct TypeRegistry {
    type_meta_table: HashMap<TypeId, TypeMeta>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_ids: HashMap<&'static str, Vec<TypeId>>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create an empty [`TypeRegistry`].
    #[inline]
    pub fn empty() -> Self {
        Self {
            type_meta_table: HashMap::default(),
            type_path_to_id: HashMap::default(),
            type_name_to_ids: HashMap::default(),
        }
    }

    /// Create a type registry with default registrations for primitive types.
    ///
    /// - `bool` `char`
    /// - `i8 - i128` `isize`
    /// - `u8 - u128` `usize`
    /// - `f32` `f64`
    /// - `String`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<u128>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<i128>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<alloc::string::String>();
        registry
    }

    // # Validity
    // The type must **not** already exist.
    fn add_new_type_indices(
        type_meta: &TypeMeta,
        type_path_to_id: &mut HashMap<&'static str, TypeId>,
        type_name_to_ids: &mut HashMap<&'static str, Vec<TypeId>>,
    ) {
        let ty = type_meta.ty();
        type_name_to_ids.entry(ty.ident()).or_default().push(ty.id());
        type_path_to_id.insert(ty.path(), ty.id());
    }

    // - If key [`TypeId`] has already exist, the function will do nothing and return `false`.
    // - If the key [`TypeId`] does not exist, the function will insert value and return `true`.
    fn register_internal(
        &mut self,
        type_id: TypeId,
        get_type_meta: impl FnOnce() -> TypeMeta,
    ) -> bool {
        if self.type_meta_table.contains_key(&type_id) {
            return false;
        }
        let meta = get_type_meta();
        debug_assert_eq!(meta.type_id(), type_id, "`TypeMeta` registered under a foreign type");
        Self::add_new_type_indices(&meta, &mut self.type_path_to_id, &mut self.type_name_to_ids);
        log::trace!("registered type `{}`", meta.ty());
        self.type_meta_table.insert(type_id, meta);
        true
    }

    /// Try add or do nothing.
    ///
    /// - If the type has already been registered, the function will do nothing and return `false`.
    /// - Otherwise the meta is inserted and the function returns `true`.
    ///
    /// This method will _not_ register type dependencies.
    /// Use [`register`](Self::register) to register a type with its dependencies.
    #[inline]
    pub fn try_insert_type_meta(&mut self, type_meta: TypeMeta) -> bool {
        self.register_internal(type_meta.type_id(), || type_meta)
    }

    /// Insert or **Overwrite** a [`TypeMeta`].
    ///
    /// - If the type has already been registered, the value will be overwritten.
    ///   But the path and name tables will not be modified.
    /// - Otherwise the value will be inserted and indexed.
    ///
    /// This method will _not_ register type dependencies.
    pub fn insert_type_meta(&mut self, type_meta: TypeMeta) {
        if !self.type_meta_table.contains_key(&type_meta.type_id()) {
            Self::add_new_type_indices(
                &type_meta,
                &mut self.type_path_to_id,
                &mut self.type_name_to_ids,
            );
        }
        self.type_meta_table.insert(type_meta.type_id(), type_meta);
    }

    /// Attempts to register the type `T` if it has not yet been registered already.
    ///
    /// This will also recursively register any type dependencies as specified by
    /// [`GetTypeMeta::register_dependencies`]. When deriving `Reflect`, this will
    /// generally be the types of all reflected fields.
    ///
    /// Wrappers register their payload: `Option<T>` and `Obj<T>` both
    /// register `T`.
    ///
    /// # Example
    ///
    /// ```
    /// use core::any::TypeId;
    /// use rf_reflect::{Obj, derive::Reflect, registry::TypeRegistry};
    ///
    /// #[derive(Reflect)]
    /// struct Foo {
    ///     name: Option<String>,
    ///     items: Obj<Vec<i32>>,
    /// }
    ///
    /// let mut type_registry = TypeRegistry::empty();
    /// type_registry.register::<Foo>();
    ///
    /// assert!(type_registry.contains(TypeId::of::<Foo>()));
    /// assert!(type_registry.contains(TypeId::of::<String>()));
    /// assert!(type_registry.contains(TypeId::of::<Vec<i32>>()));
    /// ```
    pub fn register<T: GetTypeMeta>(&mut self) {
        if self.register_internal(T::static_type().id(), T::get_type_meta) {
            T::register_dependencies(self);
        }
    }

    /// Automatically registers all non-generic types annotated with
    /// `#[reflect(auto_register)]`.
    ///
    /// This method is equivalent to calling [`register`](Self::register) for each
    /// qualifying type. Repeated calls are cheap and will not insert duplicates.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if automatic registration is available on the current
    /// platform; otherwise, `false`.
    ///
    /// ## Feature Dependency
    ///
    /// This method requires the `auto_register` feature. When disabled, it
    /// does nothing and returns `false`.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            crate::__macro_exports::auto_register::register_types(self)
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    /// Registers the type trait `D` for type `T`.
    ///
    /// Returns `false` if `T` has not been registered.
    pub fn register_type_trait<T: Typed, D: TypeTrait + FromType<T>>(&mut self) -> bool {
        match self.type_meta_table.get_mut(&T::static_type().id()) {
            Some(type_meta) => {
                type_meta.insert_trait(D::from_type());
                true
            }
            None => {
                log::warn!(
                    "type trait `{}` ignored: type `{}` is not registered",
                    core::any::type_name::<D>(),
                    T::static_type(),
                );
                false
            }
        }
    }

    /// Whether the type with given [`TypeId`] has been registered in this registry.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains_key(&type_id)
    }

    /// Returns a reference to the [`TypeMeta`] of the type with the given [`TypeId`].
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.type_meta_table.get(&type_id)
    }

    /// Returns a mutable reference to the [`TypeMeta`] of the type with the given [`TypeId`].
    #[inline]
    pub fn get_mut(&mut self, type_id: TypeId) -> Option<&mut TypeMeta> {
        self.type_meta_table.get_mut(&type_id)
    }

    /// Returns the [`TypeMeta`] with the given full type path.
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeMeta> {
        match self.type_path_to_id.get(type_path) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns the [`TypeMeta`] with the given simple name.
    ///
    /// Returns `None` if the name is unknown or [ambiguous](Self::is_ambiguous).
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&TypeMeta> {
        match self.type_name_to_ids.get(type_name).map(Vec::as_slice) {
            Some([id]) => self.get(*id),
            _ => None,
        }
    }

    /// Returns `true` if several registered types share the simple name.
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.type_name_to_ids
            .get(type_name)
            .is_some_and(|ids| ids.len() > 1)
    }

    /// Returns every registered type with the given simple name, in
    /// registration order.
    pub fn types_with_name(&self, type_name: &str) -> Vec<Type> {
        let Some(ids) = self.type_name_to_ids.get(type_name) else {
            return Vec::new();
        };
        ids.iter()
            .filter_map(|id| self.get(*id))
            .map(TypeMeta::ty)
            .collect()
    }

    /// Returns a reference to the [`TypeTrait`] of type `T` associated with the given [`TypeId`].
    #[inline]
    pub fn get_type_trait<T: TypeTrait>(&self, type_id: TypeId) -> Option<&T> {
        self.get(type_id).and_then(TypeMeta::get_trait)
    }

    /// Returns an iterator over the [`TypeMeta`]s of the registered types.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }

    /// Returns the number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.type_meta_table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.type_meta_table.is_empty()
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

use alloc::sync::Arc;
use std::sync::PoisonError;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A shared, lockable [`TypeRegistry`].
#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    /// The wrapped [`TypeRegistry`].
    pub internal: Arc<RwLock<TypeRegistry>>,
}

impl TypeRegistryArc {
    /// Takes a read lock on the underlying [`TypeRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`TypeRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Debug for TypeRegistryArc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.read().type_path_to_id.keys().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use core::any::TypeId;

    use super::*;
    use crate::registry::TypeStorage;

    mod first {
        pub struct Item;
    }

    mod second {
        pub struct Item;
    }

    #[test]
    fn primitives_are_preloaded() {
        let registry = TypeRegistry::new();
        assert!(registry.contains(TypeId::of::<i32>()));
        assert!(registry.contains(TypeId::of::<String>()));
        assert!(registry.get_with_type_path("alloc::string::String").is_some());
        assert!(TypeRegistry::empty().is_empty());
    }

    #[test]
    fn ambiguous_names() {
        let mut registry = TypeRegistry::new();
        let first = Type::of::<first::Item>();
        let second = Type::of::<second::Item>();

        assert!(registry.try_insert_type_meta(TypeMeta::new(first, TypeStorage::Value)));
        assert!(!registry.try_insert_type_meta(TypeMeta::new(first, TypeStorage::Value)));
        assert!(!registry.is_ambiguous("Item"));
        assert!(registry.get_with_type_name("Item").is_some());

        assert!(registry.try_insert_type_meta(TypeMeta::new(second, TypeStorage::Object)));
        assert!(registry.is_ambiguous("Item"));
        assert!(registry.get_with_type_name("Item").is_none());
        assert_eq!(registry.types_with_name("Item"), [first, second]);
        assert!(registry.types_with_name("Nothing").is_empty());
    }

    #[test]
    fn attaching_type_traits() {
        use alloc::collections::LinkedList;

        use crate::registry::TypeTraitSequence;

        let mut registry = TypeRegistry::new();
        let list = Type::of::<LinkedList<i32>>();
        assert!(!registry.register_type_trait::<LinkedList<i32>, TypeTraitSequence>());
        assert!(!registry.contains(list.id()));

        assert!(registry.try_insert_type_meta(TypeMeta::new(list, TypeStorage::Object)));
        assert!(!registry.get(list.id()).unwrap().has_trait::<TypeTraitSequence>());
        assert!(registry.register_type_trait::<LinkedList<i32>, TypeTraitSequence>());
        let meta = registry.get(list.id()).unwrap();
        assert_eq!(meta.get_trait::<TypeTraitSequence>().unwrap().item_type(), Type::of::<i32>());
    }

    #[test]
    fn registry_arc() {
        let arc = TypeRegistryArc::default();
        arc.write().register::<u8>();
        assert!(arc.read().contains(TypeId::of::<u8>()));
    }
}
