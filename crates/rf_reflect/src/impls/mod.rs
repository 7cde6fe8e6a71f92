//! [`GetTypeMeta`](crate::registry::GetTypeMeta) implementations for
//! standard types.
//!
//! - primitives and `String`: plain values with a
//!   [`TypeTraitConvert`](crate::registry::TypeTraitConvert).
//! - `Vec`, `VecDeque`, `Box<[T]>`: lists.
//! - `HashMap`, `BTreeMap`: keyed collections.
//! - `HashSet`, `BTreeSet`, `LinkedList`: sequences.
//! - `Option<T>` and `Obj<T>` forward to `T`.
//!
//! Collections are shared objects; store them as `Obj<Vec<T>>` so writes
//! through paths reach them in place.

mod collections;
mod primitives;
mod wrappers;

pub use collections::{Element, Key};
