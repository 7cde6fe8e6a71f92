//! Value coercion, used by coercing writes and compiled accessors.
//!
//! A value is coerced into a target type by, in order:
//!
//! 1. passing it through unchanged if it already has the target type
//!    (or the target is [`Value`], which accepts anything);
//! 2. parsing an enum variant name (ignoring case) or taking a discriminant,
//!    if the target has a [`TypeTraitEnum`];
//! 3. naming the variant, if the source is an enum and the target is `String`;
//! 4. calling the target's [`TypeTraitConvert`].
//!
//! Null stays null. Anything else is a [`ReflectError::Conversion`].

use alloc::string::String;

use thiserror::Error;

use crate::info::Type;
use crate::registry::{TypeCatalog, TypeTraitConvert, TypeTraitEnum};
use crate::{ReflectError, Value};

// -----------------------------------------------------------------------------
// ConvertError

/// Why a recognized source value could not be converted.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("value is out of range for `{0}`")]
    OutOfRange(Type),
    #[error("`{text}` is not a valid `{target}`")]
    Unrecognized { text: String, target: Type },
}

// -----------------------------------------------------------------------------
// Number

/// A primitive number, widened.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Number {
    Int(i128),
    Uint(u128),
    Float(f64),
}

impl Number {
    /// Reads a plain primitive number.
    pub(crate) fn of(value: &Value) -> Option<Self> {
        macro_rules! number_of {
            ($variant:ident as $wide:ty: $($ty:ty),*) => {
                $(
                    if let Some(n) = value.downcast_ref::<$ty>() {
                        return Some(Number::$variant(*n as $wide));
                    }
                )*
            };
        }

        number_of!(Int as i128: i8, i16, i32, i64, i128, isize);
        number_of!(Uint as u128: u8, u16, u32, u64, u128, usize);
        number_of!(Float as f64: f32, f64);
        None
    }

    /// Converts to an integer; floats must be integral.
    pub(crate) fn to_i128(self) -> Option<i128> {
        match self {
            Number::Int(n) => Some(n),
            Number::Uint(n) => i128::try_from(n).ok(),
            Number::Float(f) => {
                // `as` saturates, so a round trip only holds for integral, in-range values.
                let n = f as i128;
                (n as f64 == f).then_some(n)
            }
        }
    }

    pub(crate) fn to_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Uint(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    pub(crate) fn is_zero(self) -> bool {
        match self {
            Number::Int(n) => n == 0,
            Number::Uint(n) => n == 0,
            Number::Float(f) => f == 0.0,
        }
    }
}

// -----------------------------------------------------------------------------
// Coercion

/// A prepared conversion into one target type.
///
/// Captures the target's conversion traits once, so it can be applied
/// repeatedly without consulting a catalog.
#[derive(Clone, Debug)]
pub struct Coercion {
    target: Type,
    convert: Option<TypeTraitConvert>,
    target_enum: Option<TypeTraitEnum>,
}

impl Coercion {
    pub fn new<C: TypeCatalog + ?Sized>(catalog: &C, target: Type) -> Self {
        let meta = catalog.type_meta(target);
        Self {
            target,
            convert: meta.and_then(|m| m.get_trait::<TypeTraitConvert>()).copied(),
            target_enum: meta.and_then(|m| m.get_trait::<TypeTraitEnum>()).copied(),
        }
    }

    #[inline(always)]
    pub fn target(&self) -> Type {
        self.target
    }

    /// Check if values of type `source` pass through unchanged.
    #[inline]
    pub fn is_identity(&self, source: Type) -> bool {
        source == self.target || self.target.is::<Value>()
    }

    /// Coerces `value`.
    ///
    /// `source_enum` is the enum trait of the value's type, if it has one.
    pub fn apply(
        &self,
        value: Option<Value>,
        source_enum: Option<&TypeTraitEnum>,
    ) -> Result<Option<Value>, ReflectError> {
        let Some(value) = value else {
            return Ok(None);
        };
        if self.is_identity(value.ty()) {
            return Ok(Some(value));
        }
        let from = value.ty();

        if let Some(target_enum) = &self.target_enum {
            if let Some(text) = value.downcast_ref::<String>() {
                return match target_enum.parse(text) {
                    Some(parsed) => Ok(Some(parsed)),
                    None => Err(self.failed(from, ConvertError::Unrecognized {
                        text: text.clone(),
                        target: self.target,
                    })),
                };
            }
            if let Some(number) = Number::of(&value) {
                let discriminant = number.to_i128().and_then(|n| i64::try_from(n).ok());
                return match discriminant.and_then(|n| target_enum.from_discriminant(n)) {
                    Some(parsed) => Ok(Some(parsed)),
                    None => Err(self.failed(from, ConvertError::OutOfRange(self.target))),
                };
            }
        }

        // Enum sources convert through their name or their discriminant.
        let variant = source_enum.and_then(|e| e.variant_of(&value));
        let value = match variant {
            Some(variant) if self.target.is::<String>() => {
                return Ok(Some(Value::from(variant.name())));
            }
            Some(variant) => Value::from(variant.discriminant()),
            None => value,
        };

        match self.convert.as_ref().and_then(|c| c.convert(&value)) {
            Some(Ok(converted)) => Ok(Some(converted)),
            Some(Err(source)) => Err(ReflectError::Conversion {
                from,
                to: self.target,
                source: Some(source),
            }),
            None => Err(ReflectError::Conversion {
                from,
                to: self.target,
                source: None,
            }),
        }
    }

    #[cold]
    fn failed(&self, from: Type, error: ConvertError) -> ReflectError {
        ReflectError::Conversion {
            from,
            to: self.target,
            source: Some(error.into()),
        }
    }
}

/// Coerces `value` into `target` using the conversion traits in `catalog`.
///
/// # Examples
///
/// ```
/// use rf_reflect::{Value, convert::coerce, info::Type, registry::TypeRegistry};
///
/// let registry = TypeRegistry::new();
/// let value = coerce(&registry, Some(Value::from("42")), Type::of::<u8>()).unwrap();
/// assert_eq!(value.unwrap().downcast_ref::<u8>(), Some(&42));
///
/// assert!(coerce(&registry, Some(Value::from("x")), Type::of::<u8>()).is_err());
/// ```
pub fn coerce<C: TypeCatalog + ?Sized>(
    catalog: &C,
    value: Option<Value>,
    target: Type,
) -> Result<Option<Value>, ReflectError> {
    let source_enum = value
        .as_ref()
        .and_then(|v| catalog.type_meta(v.ty()))
        .and_then(|meta| meta.get_trait::<TypeTraitEnum>());
    Coercion::new(catalog, target).apply(value, source_enum)
}
