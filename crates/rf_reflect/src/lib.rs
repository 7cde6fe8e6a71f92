#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// The derive macros always emit `::rf_reflect::...` paths, so the crate
// must be able to name itself when it uses its own derives in tests.
extern crate self as rf_reflect;

// -----------------------------------------------------------------------------
// Alloc

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod hash;
mod value;

pub mod access;
pub mod compiled;
pub mod convert;
pub mod impls;
pub mod info;
pub mod registry;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use error::{ArgumentError, ReflectError, TargetError};
pub use value::{FromValue, IntoValue, Obj, Value};
pub use rf_reflect_derive as derive;
