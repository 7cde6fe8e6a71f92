//! Parsing of `#[reflect(...)]` attributes.

use proc_macro2::Span;
use syn::{Attribute, LitStr, meta::ParseNestedMeta};

use crate::REFLECT_ATTRIBUTE_NAME;

fn is_reflect(attr: &Attribute) -> bool {
    attr.path().is_ident(REFLECT_ATTRIBUTE_NAME)
}

/// Sets a flag, rejecting duplicates.
fn set_flag(flag: &mut Option<Span>, meta: &ParseNestedMeta<'_>, name: &str) -> syn::Result<()> {
    if flag.is_some() {
        return Err(meta.error(format_args!("duplicate `{name}` attribute")));
    }
    *flag = Some(meta.path.get_ident().map_or_else(Span::call_site, |i| i.span()));
    Ok(())
}

// -----------------------------------------------------------------------------
// TypeAttributes

/// Type level attributes.
///
/// Each flag holds the span of its attribute, for diagnostics.
#[derive(Default, Debug)]
pub(crate) struct TypeAttributes {
    /// `#[reflect(value)]`: a plain value type.
    pub value: Option<Span>,
    /// `#[reflect(default)]`: a parameterless constructor through `Default`.
    pub default: Option<Span>,
    /// `#[reflect(auto_register)]`.
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs.iter().filter(|a| is_reflect(a)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("value") {
                    set_flag(&mut this.value, &meta, "value")
                } else if meta.path.is_ident("default") {
                    set_flag(&mut this.default, &meta, "default")
                } else if meta.path.is_ident("auto_register") {
                    set_flag(&mut this.auto_register, &meta, "auto_register")
                } else {
                    Err(meta.error("unknown type attribute, expected `value`, `default` or `auto_register`"))
                }
            })?;
        }
        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// Field level attributes.
#[derive(Default, Debug)]
pub(crate) struct FieldAttributes {
    /// `#[reflect(rename = "...")]`.
    pub rename: Option<LitStr>,
    /// `#[reflect(skip)]`.
    pub skip: Option<Span>,
    /// `#[reflect(readonly)]`.
    pub readonly: Option<Span>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs.iter().filter(|a| is_reflect(a)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    if this.rename.is_some() {
                        return Err(meta.error("duplicate `rename` attribute"));
                    }
                    let name: LitStr = meta.value()?.parse()?;
                    if name.value().is_empty() {
                        return Err(syn::Error::new(name.span(), "member names cannot be empty"));
                    }
                    this.rename = Some(name);
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    set_flag(&mut this.skip, &meta, "skip")
                } else if meta.path.is_ident("readonly") {
                    set_flag(&mut this.readonly, &meta, "readonly")
                } else {
                    Err(meta.error("unknown field attribute, expected `rename`, `skip` or `readonly`"))
                }
            })?;
        }
        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// Variants

/// Rejects `#[reflect(...)]` on enum variants, which take no attributes.
pub(crate) fn reject_variant_attrs(attrs: &[Attribute]) -> syn::Result<()> {
    match attrs.iter().find(|a| is_reflect(a)) {
        Some(attr) => Err(syn::Error::new_spanned(attr, "enum variants take no `reflect` attributes")),
        None => Ok(()),
    }
}
