use core::any::Any;

use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry, TypeStorage};
use crate::{Obj, Value};

impl<T: GetTypeMeta> GetTypeMeta for Option<T> {
    #[inline]
    fn get_type_meta() -> TypeMeta {
        T::get_type_meta()
    }

    #[inline]
    fn register_dependencies(registry: &mut TypeRegistry) {
        T::register_dependencies(registry);
    }
}

impl<T: GetTypeMeta + Any + Send + Sync> GetTypeMeta for Obj<T> {
    #[inline]
    fn get_type_meta() -> TypeMeta {
        T::get_type_meta()
    }

    #[inline]
    fn register_dependencies(registry: &mut TypeRegistry) {
        T::register_dependencies(registry);
    }
}

impl GetTypeMeta for Value {
    #[inline]
    fn get_type_meta() -> TypeMeta {
        TypeMeta::of::<Self>(TypeStorage::Value)
    }
}
