use alloc::boxed::Box;
use alloc::string::String;

use thiserror::Error;

use crate::info::Type;

/// An error raised by target code: a getter, setter, method, constructor
/// or indexer registered in a catalog.
pub type TargetError = Box<dyn core::error::Error + Send + Sync>;

struct Nullable<'a>(&'a Option<Type>);

impl core::fmt::Display for Nullable<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0 {
            Some(ty) => write!(f, "`{ty}`"),
            None => f.write_str("null"),
        }
    }
}

/// Values handed to a member primitive do not fit its signature.
///
/// Raised by the glue generated by [`TypeBuilder`](crate::registry::TypeBuilder)
/// and the built-in collection traits when a primitive is called directly
/// with mismatched values. The access engine validates before calling, so
/// it only sees these wrapped in [`ReflectError::Target`].
#[derive(Debug, Error)]
pub enum ArgumentError {
    #[error("expected {expected} argument(s), {actual} given")]
    Count { expected: usize, actual: usize },
    #[error("argument {index} expects `{expected}`, found {}", Nullable(.actual))]
    Type {
        index: usize,
        expected: Type,
        actual: Option<Type>,
    },
    #[error("expected an instance of `{expected}`, found {}", Nullable(.actual))]
    Receiver {
        expected: Type,
        actual: Option<Type>,
    },
    #[error("instances of `{0}` are plain values and cannot be mutated in place")]
    Immutable(Type),
}

/// Runtime faults surfaced by path operations.
///
/// "Not found" conditions never produce a `ReflectError`; they are reported
/// through the designated failure value of each operation.
#[derive(Debug, Error)]
pub enum ReflectError {
    /// The target member itself failed.
    #[error("`{ty}::{member}` raised an error: {source}")]
    Target {
        ty: Type,
        member: String,
        #[source]
        source: TargetError,
    },
    /// A value could not be coerced into the requested type.
    #[error("cannot convert a value of type `{from}` into `{to}`")]
    Conversion {
        from: Type,
        to: Type,
        #[source]
        source: Option<TargetError>,
    },
    /// Invocation with the wrong number of arguments.
    #[error("`{member}` expects {expected} argument(s), {actual} given")]
    ArgumentCount {
        member: String,
        expected: usize,
        actual: usize,
    },
    /// Invocation with an argument of the wrong type.
    #[error("argument {index} of `{member}` expects `{expected}`, found {}", Nullable(.actual))]
    ArgumentType {
        member: String,
        index: usize,
        expected: Type,
        actual: Option<Type>,
    },
    /// Assignment of a value of the wrong type (or null into a non-nullable member).
    #[error("`{member}` expects a value of type `{expected}`, found {}", Nullable(.actual))]
    ValueType {
        member: String,
        expected: Type,
        actual: Option<Type>,
    },
    /// A compiled accessor met a null intermediate value.
    #[error("null reference while accessing `{member}`")]
    NullReference { member: String },
    /// A primitive was requested from a member that does not provide it,
    /// e.g. reading a set-only property.
    #[error("`{ty}::{member}` does not support {operation}")]
    Unsupported {
        ty: Type,
        member: String,
        operation: &'static str,
    },
}

impl ReflectError {
    /// Wraps an error raised by target code.
    pub(crate) fn target(ty: Type, member: &str, source: TargetError) -> Self {
        Self::Target {
            ty,
            member: member.into(),
            source,
        }
    }
}
