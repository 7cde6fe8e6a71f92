//! See following macros:
//!
//! - [`Reflect`]
//! - [`member_path!`]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod member_path;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Reflection Derivation
///
/// `#[derive(Reflect)]` registers a type with the catalog. It implements:
///
/// - `Typed`
/// - `GetTypeMeta`
/// - `IntoValue` and `FromValue` (plain value types only)
///
/// Structs with named fields and fieldless enums are supported.
///
/// ## Structs
///
/// Every field becomes a readable and writable field member named after
/// the field. The getter clones the field, so field types must implement
/// `Clone`; store nested objects and collections as `Obj<T>` so paths
/// reach the shared instance.
///
/// By default the struct is an object type: instances live in `Obj<Self>`
/// and are written in place.
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// struct Player {
///     #[reflect(rename = "Name")]
///     name: String,
///     #[reflect(readonly)]
///     id: u64,
///     #[reflect(skip)]
///     cache: Vec<u8>,
///     inventory: Obj<Vec<Item>>,
/// }
/// ```
///
/// Field attributes:
///
/// - `rename = "..."`: the member name used by paths.
/// - `readonly`: the field cannot be written through reflection.
/// - `skip`: the field is not reflected. Required for fields whose type
///   does not implement `GetTypeMeta`.
///
/// Type attributes:
///
/// - `value`: a plain value type, copied in and out of a `Value`. Requires
///   `Clone`. Plain values cannot be written in place.
/// - `default`: registers a parameterless constructor using `Default`.
/// - `auto_register`: see below.
///
/// ## Enums
///
/// Fieldless enums become plain value types with a `TypeTraitEnum`, so
/// values can be coerced from variant names (ignoring case) and from
/// discriminants. The enum must implement `Clone`.
///
/// ```rust, ignore
/// #[derive(Reflect, Clone, Copy, PartialEq)]
/// enum Status {
///     Idle,
///     Active = 4,
/// }
/// ```
///
/// ## Auto Registration
///
/// `#[reflect(auto_register)]` submits the type to `TypeRegistry::auto_register`.
///
/// This attribute has no effect on generic types, and is a no-op when the
/// `auto_register` feature is disabled.
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    impls::match_reflect_impls(ast)
}

/// Extracts a member path from a member-access closure.
///
/// The closure body is read, never compiled, so the result is a string
/// literal usable wherever a path is expected.
///
/// - Field accesses become segments: `|x| x.a.b` gives `"a.b"`.
/// - Literal indexes become keys: `|x| x.items[2]` gives `"items[2]"`,
///   `|x| x.map["k"]` gives `"map[k]"`.
/// - A final call contributes its name: `|x| x.value.negate()` gives
///   `"value.negate"`.
///
/// ```rust, ignore
/// assert_eq!(member_path!(|x| x.child.items[1]), "child.items[1]");
/// assert_eq!(member_path!(|x: &Root| x.child.reset()), "child.reset");
/// ```
#[proc_macro]
pub fn member_path(input: TokenStream) -> TokenStream {
    let closure = parse_macro_input!(input as syn::ExprClosure);

    match member_path::extract(&closure) {
        Ok(path) => quote::quote!(#path).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
