// -----------------------------------------------------------------------------
// Modules

mod convert;
mod enumeration;
mod keyed;
mod list;
mod sequence;

// -----------------------------------------------------------------------------
// Exports

pub use convert::TypeTraitConvert;
pub use enumeration::{EnumVariant, TypeTraitEnum};
pub use keyed::{FromIndexKey, KeyedGetFn, KeyedSetFn, TypeTraitKeyed};
pub use list::TypeTraitList;
pub use sequence::TypeTraitSequence;
