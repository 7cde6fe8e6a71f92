use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::ops::{Deref, DerefMut};

use crate::hash::HashMap;
use crate::info::{BindingFlags, MemberInfo, MemberTypes, Type, Typed};
use crate::registry::{TypeRegistry, TypeTrait};

// -----------------------------------------------------------------------------
// TypeStorage

/// How instances of a type are held in a [`Value`](crate::Value).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeStorage {
    /// Plain values, copied in and out.
    Value,
    /// Shared objects created with [`Obj`](crate::Obj).
    Object,
}

// -----------------------------------------------------------------------------
// TypeMeta

/// Runtime metadata of a type, registered into the [`TypeRegistry`].
///
/// This includes the member table, in declaration order, and a
/// [`TypeTrait`] table.
///
/// A `TypeMeta` is usually produced by [`TypeBuilder`](crate::registry::TypeBuilder)
/// or [`#[derive(Reflect)]`](crate::derive::Reflect), which generates an
/// implementation of [`GetTypeMeta`].
pub struct TypeMeta {
    ty: Type,
    storage: TypeStorage,
    members: Vec<Arc<MemberInfo>>,
    trait_table: HashMap<TypeId, Box<dyn TypeTrait>>,
}

impl TypeMeta {
    /// Creates an empty [`TypeMeta`].
    #[inline]
    pub fn new(ty: Type, storage: TypeStorage) -> Self {
        Self {
            ty,
            storage,
            members: Vec::new(),
            trait_table: HashMap::default(),
        }
    }

    /// Creates an empty [`TypeMeta`] for `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rf_reflect::registry::{TypeMeta, TypeStorage};
    /// let meta = TypeMeta::of::<String>(TypeStorage::Value);
    /// assert_eq!(meta.ty().ident(), "String");
    /// ```
    #[inline]
    pub fn of<T: Typed>(storage: TypeStorage) -> Self {
        Self::new(T::static_type(), storage)
    }

    /// Returns the [`Type`].
    #[inline(always)]
    pub const fn ty(&self) -> Type {
        self.ty
    }

    #[inline(always)]
    pub const fn type_id(&self) -> TypeId {
        self.ty.id()
    }

    #[inline(always)]
    pub const fn storage(&self) -> TypeStorage {
        self.storage
    }

    /// Returns every member in declaration order.
    #[inline(always)]
    pub fn members(&self) -> &[Arc<MemberInfo>] {
        &self.members
    }

    /// Appends a member.
    ///
    /// Members may share a name; overloads are distinguished by their
    /// parameter lists.
    #[inline]
    pub fn push_member(&mut self, member: impl Into<Arc<MemberInfo>>) {
        self.members.push(member.into());
    }

    /// Returns the members found by a lookup, in declaration order.
    pub fn find_members<'a>(
        &'a self,
        name: &'a str,
        kinds: MemberTypes,
        binding: BindingFlags,
    ) -> impl Iterator<Item = &'a Arc<MemberInfo>> + 'a {
        self.members
            .iter()
            .filter(move |member| member.matches(name, kinds, binding))
    }

    /// Insert a new [`TypeTrait`].
    #[inline(always)]
    pub fn insert_trait<T: TypeTrait>(&mut self, data: T) {
        self.insert_trait_by_id(TypeId::of::<T>(), Box::new(data));
    }

    #[inline(never)]
    fn insert_trait_by_id(&mut self, id: TypeId, val: Box<dyn TypeTrait>) {
        self.trait_table.insert(id, val);
    }

    /// Removes a [`TypeTrait`] from the meta.
    #[inline]
    pub fn remove_trait<T: TypeTrait>(&mut self) -> Option<Box<T>> {
        let data = self.trait_table.remove(&TypeId::of::<T>())?;
        let any: Box<dyn Any> = data;
        any.downcast::<T>().ok()
    }

    /// Get a [`TypeTrait`] reference, or return `None` if it doesn't exist.
    #[inline]
    pub fn get_trait<T: TypeTrait>(&self) -> Option<&T> {
        self.trait_table
            .get(&TypeId::of::<T>())
            .and_then(|data| <dyn TypeTrait>::downcast_ref(data.deref()))
    }

    /// Get a mutable [`TypeTrait`] reference, or return `None` if it doesn't exist.
    #[inline]
    pub fn get_trait_mut<T: TypeTrait>(&mut self) -> Option<&mut T> {
        self.trait_table
            .get_mut(&TypeId::of::<T>())
            .and_then(|data| <dyn TypeTrait>::downcast_mut(data.deref_mut()))
    }

    /// Return true if specific [`TypeTrait`] exists.
    #[inline]
    pub fn has_trait<T: TypeTrait>(&self) -> bool {
        self.trait_table.contains_key(&TypeId::of::<T>())
    }

    /// Return the number of [`TypeTrait`].
    #[inline]
    pub fn trait_len(&self) -> usize {
        self.trait_table.len()
    }
}

impl Clone for TypeMeta {
    fn clone(&self) -> Self {
        let mut trait_table = HashMap::default();
        trait_table.reserve(self.trait_len());
        for (id, type_trait) in self.trait_table.iter() {
            trait_table.insert(*id, (**type_trait).clone_type_trait());
        }

        Self {
            ty: self.ty,
            storage: self.storage,
            members: self.members.clone(),
            trait_table,
        }
    }
}

impl core::fmt::Debug for TypeMeta {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeMeta")
            .field("ty", &self.ty)
            .field("storage", &self.storage)
            .field("members", &self.members)
            .field("trait_len", &self.trait_table.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// GetTypeMeta

/// A trait which allows a type to generate its [`TypeMeta`]
/// for registration into the [`TypeRegistry`].
///
/// This trait is automatically implemented for items using
/// [`#[derive(Reflect)]`](crate::derive::Reflect).
///
/// ## Manually
///
/// ```
/// use rf_reflect::info::{Type, Typed};
/// use rf_reflect::registry::{GetTypeMeta, TypeBuilder, TypeMeta};
///
/// struct Counter {
///     hits: u32,
/// }
///
/// impl Typed for Counter {
///     fn static_type() -> Type {
///         Type::of::<Self>()
///     }
/// }
///
/// impl GetTypeMeta for Counter {
///     fn get_type_meta() -> TypeMeta {
///         TypeBuilder::<Self>::object()
///             .field("Hits", |c| c.hits, |c, v| c.hits = v)
///             .build()
///     }
/// }
///
/// let meta = Counter::get_type_meta();
/// assert_eq!(meta.members().len(), 1);
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `GetTypeMeta` so cannot provide type registration information",
    note = "consider annotating `{Self}` with `#[derive(Reflect)]`"
)]
pub trait GetTypeMeta: Typed {
    /// Returns the **default** [`TypeMeta`] for this type.
    fn get_type_meta() -> TypeMeta;

    /// Registers other types needed by this type.
    /// **Allow** not to register oneself.
    fn register_dependencies(_registry: &mut TypeRegistry) {}
}
