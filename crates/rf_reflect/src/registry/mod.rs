//! Type catalog: per-type member tables and capabilities.
//!
//! ## Menu
//!
//! - [`TypeCatalog`]: The lookup interface path operations resolve against.
//! - [`TypeRegistry`]: The standard catalog, a container of [`TypeMeta`]s.
//! - [`TypeMeta`]: A member table plus a [`TypeTrait`] table for one type.
//! - [`GetTypeMeta`]: A trait provide a function to create a `TypeMeta` from a type.
//! - [`TypeBuilder`]: Builds a `TypeMeta` from plain Rust closures.
//! - [`TypeTrait`]: A capability supported by a type.
//! - [`FromType`]: A trait provide a function to create a `TypeTrait` from a type.
//! - TypeTraits:
//!     - [`TypeTraitList`]: positional access, used by `[n]` segments on lists.
//!     - [`TypeTraitKeyed`]: keyed access, used by `[key]` segments on maps and indexers.
//!     - [`TypeTraitSequence`]: iteration-order access for other collections.
//!     - [`TypeTraitConvert`]: conversion from other types, used by coercing writes.
//!     - [`TypeTraitEnum`]: variant names and discriminants of fieldless enums.
//!
//! ## auto_register
//!
//! See [`TypeRegistry::auto_register`] .
//!
//! We use [`inventory`] crate to implement static registration,
//! not all platforms support it (although major platforms do).
//!
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod catalog;
mod from_type;
mod traits;
mod type_meta;
mod type_registry;
mod type_trait;

// -----------------------------------------------------------------------------
// Exports

pub use builder::{Args, TypeBuilder};
pub use catalog::TypeCatalog;
pub use from_type::FromType;
pub use traits::{EnumVariant, TypeTraitConvert, TypeTraitEnum};
pub use traits::{FromIndexKey, KeyedGetFn, KeyedSetFn, TypeTraitKeyed};
pub use traits::{TypeTraitList, TypeTraitSequence};
pub use type_meta::{GetTypeMeta, TypeMeta, TypeStorage};
pub use type_registry::{TypeRegistry, TypeRegistryArc};
pub use type_trait::TypeTrait;
