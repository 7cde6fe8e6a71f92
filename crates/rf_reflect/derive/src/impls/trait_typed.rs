use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectMeta;

/// Generates `Typed`.
///
/// ```ignore
/// impl Typed for Foo {
///     fn static_type() -> Type {
///         Type::of::<Self>()
///     }
/// }
/// ```
pub(crate) fn impl_trait_typed(meta: &ReflectMeta, where_clause: &TokenStream) -> TokenStream {
    let rf_reflect_path = meta.rf_reflect_path();
    let typed_ = crate::path::typed_(rf_reflect_path);
    let type_ = crate::path::type_(rf_reflect_path);

    let ident = meta.ident();
    let (impl_generics, ty_generics, _) = meta.generics().split_for_impl();

    quote! {
        impl #impl_generics #typed_ for #ident #ty_generics #where_clause {
            #[inline]
            fn static_type() -> #type_ {
                #type_::of::<Self>()
            }
        }
    }
}

/// Generates `IntoValue` and `FromValue` for plain value types.
///
/// Values are cloned out of a `Value`, so the type must be `Clone`.
pub(crate) fn impl_value_conversions(meta: &ReflectMeta, where_clause: &TokenStream) -> TokenStream {
    let rf_reflect_path = meta.rf_reflect_path();
    let value_ = crate::path::value_(rf_reflect_path);
    let into_value_ = crate::path::into_value_(rf_reflect_path);
    let from_value_ = crate::path::from_value_(rf_reflect_path);

    let ident = meta.ident();
    let (impl_generics, ty_generics, _) = meta.generics().split_for_impl();

    quote! {
        impl #impl_generics #into_value_ for #ident #ty_generics #where_clause {
            #[inline]
            fn into_value(self) -> ::core::option::Option<#value_> {
                ::core::option::Option::Some(#value_::new(self))
            }
        }

        impl #impl_generics #from_value_ for #ident #ty_generics #where_clause {
            #[inline]
            fn from_value(value: &#value_) -> ::core::option::Option<Self> {
                value.downcast_ref::<Self>().cloned()
            }
        }
    }
}
