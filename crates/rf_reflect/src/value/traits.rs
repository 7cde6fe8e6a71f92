use core::any::Any;

use super::{Obj, Value};
use crate::info::{Type, Typed};

/// Converts a Rust value into a nullable [`Value`].
pub trait IntoValue: Typed {
    fn into_value(self) -> Option<Value>;
}

/// Extracts a Rust value from a [`Value`].
pub trait FromValue: Typed + Sized {
    /// Returns `None` if the value does not hold a `Self`.
    fn from_value(value: &Value) -> Option<Self>;

    /// Like [`FromValue::from_value`], but also handles null.
    ///
    /// Only nullable types accept null.
    #[inline]
    fn from_nullable(value: Option<&Value>) -> Option<Self> {
        value.and_then(Self::from_value)
    }
}

/// Implements [`Typed`], [`IntoValue`] and [`FromValue`] for plain value types.
///
/// Plain values are cloned in and out of a [`Value`]; the type must be
/// `Clone + Send + Sync + 'static`.
///
/// # Examples
///
/// ```
/// use rf_reflect::{FromValue, IntoValue, impl_value_type};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Point(i32, i32);
///
/// impl_value_type!(Point);
///
/// let value = Point(1, 2).into_value().unwrap();
/// assert_eq!(Point::from_value(&value), Some(Point(1, 2)));
/// ```
#[macro_export]
macro_rules! impl_value_type {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::info::Typed for $ty {
                #[inline]
                fn static_type() -> $crate::info::Type {
                    $crate::info::Type::of::<Self>()
                }
            }

            impl $crate::IntoValue for $ty {
                #[inline]
                fn into_value(self) -> ::core::option::Option<$crate::Value> {
                    ::core::option::Option::Some($crate::Value::new(self))
                }
            }

            impl $crate::FromValue for $ty {
                #[inline]
                fn from_value(value: &$crate::Value) -> ::core::option::Option<Self> {
                    value.downcast_ref::<Self>().cloned()
                }
            }
        )*
    };
}

impl_value_type!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    alloc::string::String,
);

// -----------------------------------------------------------------------------
// Value

impl Typed for Value {
    #[inline]
    fn static_type() -> Type {
        Type::of::<Value>()
    }
}

impl IntoValue for Value {
    #[inline]
    fn into_value(self) -> Option<Value> {
        Some(self)
    }
}

impl FromValue for Value {
    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

// -----------------------------------------------------------------------------
// Obj

impl<T: Any + Send + Sync> Typed for Obj<T> {
    const OBJECT: bool = true;

    #[inline]
    fn static_type() -> Type {
        Type::of::<T>()
    }
}

impl<T: Any + Send + Sync> IntoValue for Obj<T> {
    #[inline]
    fn into_value(self) -> Option<Value> {
        Some(Obj::into_value(self))
    }
}

impl<T: Any + Send + Sync> FromValue for Obj<T> {
    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        value.object::<T>()
    }
}

// -----------------------------------------------------------------------------
// Option

impl<T: Typed> Typed for Option<T> {
    const NULLABLE: bool = true;
    const OBJECT: bool = T::OBJECT;

    #[inline]
    fn static_type() -> Type {
        T::static_type()
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    #[inline]
    fn into_value(self) -> Option<Value> {
        self.and_then(T::into_value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        T::from_value(value).map(Some)
    }

    #[inline]
    fn from_nullable(value: Option<&Value>) -> Option<Self> {
        match value {
            None => Some(None),
            Some(value) => Self::from_value(value),
        }
    }
}

// -----------------------------------------------------------------------------
// Unit

impl Typed for () {
    #[inline]
    fn static_type() -> Type {
        Type::of::<()>()
    }
}

impl IntoValue for () {
    #[inline]
    fn into_value(self) -> Option<Value> {
        None
    }
}

/// Check if `actual` (or null) fits a declaration.
///
/// The runtime type must be the declared one, and an object declaration
/// only accepts objects (a plain value only plain values). A declared type
/// of [`Value`] accepts everything non-null.
#[inline]
pub(crate) fn is_assignable(expected: Type, nullable: bool, object: bool, actual: Option<&Value>) -> bool {
    match actual {
        None => nullable,
        Some(_) if expected.is::<Value>() => true,
        Some(actual) => actual.ty() == expected && actual.holds_object() == object,
    }
}
