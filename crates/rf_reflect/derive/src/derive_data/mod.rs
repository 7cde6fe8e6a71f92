//! Parsed input of `#[derive(Reflect)]`.

// -----------------------------------------------------------------------------
// Modules

mod attributes;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{FieldAttributes, TypeAttributes};

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Generics, Ident, Path, Type};

// -----------------------------------------------------------------------------
// ReflectMeta

/// Type level information shared by every kind of derive.
pub(crate) struct ReflectMeta<'a> {
    rf_reflect_path: Path,
    attrs: TypeAttributes,
    ident: &'a Ident,
    generics: &'a Generics,
}

impl<'a> ReflectMeta<'a> {
    #[inline]
    pub fn new(attrs: TypeAttributes, ident: &'a Ident, generics: &'a Generics) -> Self {
        Self {
            rf_reflect_path: crate::path::rf_reflect(),
            attrs,
            ident,
            generics,
        }
    }

    #[inline]
    pub fn rf_reflect_path(&self) -> &Path {
        &self.rf_reflect_path
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn ident(&self) -> &'a Ident {
        self.ident
    }

    #[inline]
    pub fn generics(&self) -> &'a Generics {
        self.generics
    }

    /// Whether the type has type or const parameters.
    pub fn impl_with_generic(&self) -> bool {
        self.generics
            .params
            .iter()
            .any(|p| !matches!(p, syn::GenericParam::Lifetime(_)))
    }

    /// The where clause of generated impls.
    ///
    /// Type parameters must be `Send + Sync + 'static`, and every type in
    /// `active_types` must satisfy `bounds`.
    pub fn where_clause_with(&self, active_types: &[&Type], bounds: TokenStream) -> TokenStream {
        let existing = self
            .generics
            .where_clause
            .as_ref()
            .map(|w| {
                let predicates = w.predicates.iter();
                quote!(#(#predicates,)*)
            });
        if !self.impl_with_generic() {
            return match existing {
                Some(predicates) => quote!(where #predicates),
                None => TokenStream::new(),
            };
        }
        let params = self.generics.type_params().map(|p| {
            let ident = &p.ident;
            quote!(#ident: ::core::marker::Send + ::core::marker::Sync + 'static,)
        });
        let fields = active_types.iter().map(|ty| quote!(#ty: #bounds,));
        quote! {
            where #existing #(#params)* #(#fields)*
        }
    }
}

// -----------------------------------------------------------------------------
// ReflectStruct

/// A reflected field.
pub(crate) struct StructField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub attrs: FieldAttributes,
}

impl StructField<'_> {
    /// The member name: the `rename` attribute or the field name.
    pub fn member_name(&self) -> String {
        match &self.attrs.rename {
            Some(name) => name.value(),
            None => self.ident.to_string(),
        }
    }
}

pub(crate) struct ReflectStruct<'a> {
    pub meta: ReflectMeta<'a>,
    /// Fields not marked `skip`, in declaration order.
    pub fields: Vec<StructField<'a>>,
}

impl ReflectStruct<'_> {
    pub fn active_types(&self) -> Vec<&Type> {
        self.fields.iter().map(|f| f.ty).collect()
    }
}

// -----------------------------------------------------------------------------
// ReflectEnum

pub(crate) struct ReflectEnum<'a> {
    pub meta: ReflectMeta<'a>,
    pub variants: Vec<&'a Ident>,
}

// -----------------------------------------------------------------------------
// ReflectDerive

pub(crate) enum ReflectDerive<'a> {
    Struct(ReflectStruct<'a>),
    Enum(ReflectEnum<'a>),
}

impl<'a> ReflectDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;
        let meta = ReflectMeta::new(attrs, &input.ident, &input.generics);

        match &input.data {
            Data::Struct(data) => {
                let Fields::Named(named) = &data.fields else {
                    return Err(syn::Error::new_spanned(
                        &input.ident,
                        "`Reflect` supports structs with named fields and fieldless enums",
                    ));
                };
                let mut fields = Vec::with_capacity(named.named.len());
                for field in &named.named {
                    let attrs = FieldAttributes::parse_attrs(&field.attrs)?;
                    if attrs.skip.is_some() {
                        continue;
                    }
                    let Some(ident) = &field.ident else {
                        continue;
                    };
                    fields.push(StructField {
                        ident,
                        ty: &field.ty,
                        attrs,
                    });
                }
                Ok(Self::Struct(ReflectStruct { meta, fields }))
            }
            Data::Enum(data) => {
                if let Some(span) = meta.attrs().value {
                    return Err(syn::Error::new(span, "enums are always plain value types"));
                }
                if meta.impl_with_generic() {
                    return Err(syn::Error::new_spanned(
                        &input.generics,
                        "generic enums are not supported",
                    ));
                }
                if data.variants.is_empty() {
                    return Err(syn::Error::new_spanned(
                        &input.ident,
                        "`Reflect` cannot be derived for enums without variants",
                    ));
                }
                let mut variants = Vec::with_capacity(data.variants.len());
                for variant in &data.variants {
                    attributes::reject_variant_attrs(&variant.attrs)?;
                    if !matches!(variant.fields, Fields::Unit) {
                        return Err(syn::Error::new_spanned(
                            variant,
                            "`Reflect` supports fieldless enums only",
                        ));
                    }
                    variants.push(&variant.ident);
                }
                Ok(Self::Enum(ReflectEnum { meta, variants }))
            }
            Data::Union(_) => Err(syn::Error::new_spanned(
                &input.ident,
                "`Reflect` cannot be derived for unions",
            )),
        }
    }
}
