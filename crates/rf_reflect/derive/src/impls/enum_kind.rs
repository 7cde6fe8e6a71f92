use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectEnum;

/// Implements reflection for fieldless enums.
///
/// The variant table lives in a static next to the impls:
///
/// ```ignore
/// static VARIANTS: [EnumVariant; 2] = [
///     EnumVariant::new("Idle", Status::Idle as i64),
///     EnumVariant::new("Active", Status::Active as i64),
/// ];
/// ```
pub(crate) fn impl_enum(info: &ReflectEnum) -> TokenStream {
    let meta = &info.meta;
    let rf_reflect_path = meta.rf_reflect_path();
    let value_ = crate::path::value_(rf_reflect_path);
    let get_type_meta_ = crate::path::get_type_meta_(rf_reflect_path);
    let type_meta_ = crate::path::type_meta_(rf_reflect_path);
    let type_builder_ = crate::path::type_builder_(rf_reflect_path);
    let enum_variant_ = crate::path::enum_variant_(rf_reflect_path);
    let type_trait_enum_ = crate::path::type_trait_enum_(rf_reflect_path);

    let where_clause = meta.where_clause_with(&[], TokenStream::new());
    let typed_impl = super::impl_trait_typed(meta, &where_clause);
    let value_impls = super::impl_value_conversions(meta, &where_clause);
    let auto_register = super::get_auto_register_impl(meta);

    let ident = meta.ident();
    let count = info.variants.len();
    let variants = &info.variants;
    let names = variants.iter().map(|v| v.to_string());

    let constructor = if let Some(span) = meta.attrs().default {
        quote::quote_spanned! { span =>
            .constructor(|(): ()| <#ident as ::core::default::Default>::default())
        }
    } else {
        TokenStream::new()
    };

    quote! {
        static __VARIANTS: [#enum_variant_; #count] = [
            #(#enum_variant_::new(#names, #ident::#variants as i64),)*
        ];

        #typed_impl

        #value_impls

        impl #get_type_meta_ for #ident {
            fn get_type_meta() -> #type_meta_ {
                fn construct(discriminant: i64) -> ::core::option::Option<#value_> {
                    #(
                        if discriminant == #ident::#variants as i64 {
                            return ::core::option::Option::Some(#value_::new(#ident::#variants));
                        }
                    )*
                    ::core::option::Option::None
                }

                fn discriminant_of(value: &#value_) -> ::core::option::Option<i64> {
                    value.downcast_ref::<#ident>().map(|this| match this {
                        #(#ident::#variants => #ident::#variants as i64,)*
                    })
                }

                #type_builder_::<Self>::value()
                    .with_trait(#type_trait_enum_::new(&__VARIANTS, construct, discriminant_of))
                    #constructor
                    .build()
            }
        }

        #auto_register
    }
}
