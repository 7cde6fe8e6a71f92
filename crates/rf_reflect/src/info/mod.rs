//! Runtime type identity and member descriptors.
//!
//! ## Menu
//!
//! - [`Type`]: a copyable runtime identity of a Rust type.
//! - [`Typed`]: the static [`Type`] of a value-carrying Rust type.
//! - [`MemberInfo`]: a field, property, method or constructor of a catalogued type,
//!   together with the primitives that read, write or invoke it.
//! - [`MemberKind`], [`MemberTypes`]: member categories and category masks.
//! - [`BindingFlags`]: static/instance and visibility rules for member lookup.

// -----------------------------------------------------------------------------
// Modules

mod flags;
mod member_info;
mod type_path;

// -----------------------------------------------------------------------------
// Exports

pub use flags::{BindingFlags, MemberTypes};
pub use member_info::{CONSTRUCTOR_NAME, MemberInfo, MemberKind, ParameterInfo};
pub use member_info::{InvokeFn, ReadFn, WriteFn};
pub use type_path::{Type, Typed};
