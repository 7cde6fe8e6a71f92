//! Items referenced by code that `#[derive(Reflect)]` generates.
//!
//! Not public API.

#[cfg(feature = "auto_register")]
pub mod auto_register {
    use core::any::TypeId;

    pub use inventory;

    use crate::info::{Type, Typed};
    use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry, TypeStorage};

    /// A registration submitted by `#[reflect(auto_register)]`.
    pub struct AutoRegistration {
        func: fn(&mut TypeRegistry),
    }

    impl AutoRegistration {
        #[inline]
        pub const fn of<T: GetTypeMeta>() -> Self {
            Self {
                func: TypeRegistry::register::<T>,
            }
        }
    }

    inventory::collect!(AutoRegistration);

    /// Registered alongside user types. Its presence after a pass tells
    /// whether the platform runs `inventory` constructors.
    struct AvailFlag;

    impl Typed for AvailFlag {
        #[inline]
        fn static_type() -> Type {
            Type::of::<Self>()
        }
    }

    impl GetTypeMeta for AvailFlag {
        fn get_type_meta() -> TypeMeta {
            TypeMeta::of::<Self>(TypeStorage::Value)
        }
    }

    inventory::submit! { AutoRegistration::of::<AvailFlag>() }

    pub(crate) fn register_types(registry: &mut TypeRegistry) -> bool {
        if registry.contains(TypeId::of::<AvailFlag>()) {
            return true;
        }
        let before = registry.len();
        for registration in inventory::iter::<AutoRegistration> {
            (registration.func)(registry);
        }
        log::debug!("auto registration added {} types", registry.len() - before);
        registry.contains(TypeId::of::<AvailFlag>())
    }
}
