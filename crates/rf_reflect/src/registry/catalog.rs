use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::info::{BindingFlags, MemberInfo, MemberTypes, Type};
use crate::registry::{TypeMeta, TypeRegistry};

/// The metadata source the access engine resolves paths against.
///
/// [`TypeRegistry`] is the standard implementation. Implement this trait
/// to resolve against another store, e.g. one that synthesizes members on
/// demand.
pub trait TypeCatalog {
    /// Returns the metadata of a type, if catalogued.
    fn type_meta(&self, ty: Type) -> Option<&TypeMeta>;

    /// Returns the members of `ty` found by a lookup of `name`, in
    /// declaration order.
    ///
    /// `name` is matched exactly unless `binding` contains
    /// [`BindingFlags::IGNORE_CASE`].
    fn find_members(
        &self,
        ty: Type,
        name: &str,
        kinds: MemberTypes,
        binding: BindingFlags,
    ) -> Vec<Arc<MemberInfo>> {
        match self.type_meta(ty) {
            Some(meta) => meta.find_members(name, kinds, binding).cloned().collect(),
            None => Vec::new(),
        }
    }

    /// Returns every catalogued type whose simple name is `name`.
    fn types_named(&self, name: &str) -> Vec<Type>;
}

impl TypeCatalog for TypeRegistry {
    #[inline]
    fn type_meta(&self, ty: Type) -> Option<&TypeMeta> {
        self.get(ty.id())
    }

    #[inline]
    fn types_named(&self, name: &str) -> Vec<Type> {
        self.types_with_name(name)
    }
}
