//! Paths into `rf_reflect` used by generated code.
//!
//! Kept in one place so a change of layout in `rf_reflect` is a change
//! here only.

use proc_macro2::TokenStream;
use quote::quote;

/// The path of the reflection crate.
///
/// `rf_reflect` names itself with `extern crate self as rf_reflect`, so
/// the same path works inside the crate.
#[inline]
pub(crate) fn rf_reflect() -> syn::Path {
    syn::parse_quote!(::rf_reflect)
}

#[inline(always)]
pub(crate) fn type_(rf_reflect: &syn::Path) -> TokenStream {
    quote! {
        #rf_reflect::info::Type
    }
}

#[inline(always)]
pub(crate) fn typed_(rf_reflect: &syn::Path) -> TokenStream {
    quote! {
        #rf_reflect::info::Typed
    }
}

#[inline(always)]
pub(crate) fn value_(rf_reflect: &syn::Path) -> TokenStream {
    quote! {
        #rf_reflect::Value
    }
}

#[inline(always)]
pub(crate) fn into_value_(rf_reflect: &syn::Path) -> TokenStream {
    quote! {
        #rf_reflect::IntoValue
    }
}

#[inline(always)]
pub(crate) fn from_value_(rf_reflect: &syn::Path) -> TokenStream {
    quote! {
        #rf_reflect::FromValue
    }
}

#[inline(always)]
pub(crate) fn get_type_meta_(rf_reflect: &syn::Path) -> TokenStream {
    quote! {
        #rf_reflect::registry::GetTypeMeta
    }
}

#[inline(always)]
pub(crate) fn type_meta_(rf_reflect: &syn::Path) -> TokenStream {
    quote! {
        #rf_reflect::registry::TypeMeta
    }
}

#[inline(always)]
pub(crate) fn type_builder_(rf_reflect: &syn::Path) -> TokenStream {
    quote! {
        #rf_reflect::registry::TypeBuilder
    }
}

#[inline(always)]
pub(crate) fn type_registry_(rf_reflect: &syn::Path) -> TokenStream {
    quote! {
        #rf_reflect::registry::TypeRegistry
    }
}

#[inline(always)]
pub(crate) fn enum_variant_(rf_reflect: &syn::Path) -> TokenStream {
    quote! {
        #rf_reflect::registry::EnumVariant
    }
}

#[inline(always)]
pub(crate) fn type_trait_enum_(rf_reflect: &syn::Path) -> TokenStream {
    quote! {
        #rf_reflect::registry::TypeTraitEnum
    }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(rf_reflect: &syn::Path) -> TokenStream {
    quote! {
        #rf_reflect::__macro_exports::auto_register
    }
}
