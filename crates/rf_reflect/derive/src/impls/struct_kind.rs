use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectStruct;

/// Implements reflection for structs with named fields.
pub(crate) fn impl_struct(info: &ReflectStruct) -> TokenStream {
    let meta = &info.meta;
    let rf_reflect_path = meta.rf_reflect_path();
    let into_value_ = crate::path::into_value_(rf_reflect_path);
    let from_value_ = crate::path::from_value_(rf_reflect_path);
    let get_type_meta_ = crate::path::get_type_meta_(rf_reflect_path);
    let type_meta_ = crate::path::type_meta_(rf_reflect_path);
    let type_builder_ = crate::path::type_builder_(rf_reflect_path);
    let type_registry_ = crate::path::type_registry_(rf_reflect_path);

    let active_types = info.active_types();
    let where_clause = meta.where_clause_with(
        &active_types,
        quote!(#into_value_ + #from_value_ + #get_type_meta_ + ::core::clone::Clone),
    );

    let typed_impl = super::impl_trait_typed(meta, &where_clause);
    let value_impls = match meta.attrs().value {
        Some(_) => super::impl_value_conversions(meta, &where_clause),
        None => TokenStream::new(),
    };
    let auto_register = super::get_auto_register_impl(meta);

    let storage = match meta.attrs().value {
        Some(_) => quote!(value),
        None => quote!(object),
    };

    let members = info.fields.iter().map(|field| {
        let name = field.member_name();
        let ident = field.ident;
        let ty = field.ty;
        if field.attrs.readonly.is_some() {
            quote! {
                .readonly_field(#name, |this: &Self| ::core::clone::Clone::clone(&this.#ident))
            }
        } else {
            quote! {
                .field(
                    #name,
                    |this: &Self| ::core::clone::Clone::clone(&this.#ident),
                    |this: &mut Self, value: #ty| this.#ident = value,
                )
            }
        }
    });

    let constructor = meta.attrs().default.map(|_| {
        quote! {
            .constructor(|(): ()| <Self as ::core::default::Default>::default())
        }
    });

    let ident = meta.ident();
    let (impl_generics, ty_generics, _) = meta.generics().split_for_impl();

    quote! {
        #typed_impl

        #value_impls

        impl #impl_generics #get_type_meta_ for #ident #ty_generics #where_clause {
            fn get_type_meta() -> #type_meta_ {
                #type_builder_::<Self>::#storage()
                    #(#members)*
                    #constructor
                    .build()
            }

            fn register_dependencies(_registry: &mut #type_registry_) {
                #(_registry.register::<#active_types>();)*
            }
        }

        #auto_register
    }
}
