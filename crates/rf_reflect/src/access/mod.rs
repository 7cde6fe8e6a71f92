//! Member path resolution.
//!
//! This module walks paths such as `"Child.Items[2].Name"` against a live
//! object graph, or against a type when there is no instance yet. The
//! entry point is [`Reflector`], which offers:
//!
//! - [`get`](Reflector::get): read a field, property or element;
//! - [`set`](Reflector::set) and [`set_coerced`](Reflector::set_coerced): write one;
//! - [`invoke`](Reflector::invoke): call a method or a constructor;
//! - [`get_info`](Reflector::get_info): describe the members a path names;
//! - [`create_getter`](Reflector::create_getter) and
//!   [`create_setter`](Reflector::create_setter): prebuilt accessors, see
//!   [`compiled`](crate::compiled);
//! - [`get_types`](Reflector::get_types): find types by simple name.
//!
//! # Syntax
//!
//! - Member: `Name`, resolved against the current container's type.
//! - Element: `Name[key]`, the element of the member's value at `key`.
//!   Integer keys address list positions; map keys are matched by value.
//! - Self element: `[key]`, an element of the current container itself.
//! - Constructor: a final `ctor` segment (any case).
//!
//! Segments are separated by `.`; dots inside brackets belong to the key.
//! Only one key per segment is supported.

// -----------------------------------------------------------------------------
// Modules

mod element;
mod path;
mod reflector;

// -----------------------------------------------------------------------------
// Exports

pub use element::CollectionKind;
pub use path::{IndexKey, ParseError, PathSegments, Segment, parse_path};
pub use reflector::{Lookup, MembersInfo, Reflector};

pub(crate) use reflector::check_value;
