use alloc::string::{String, ToString};

use crate::TargetError;
use crate::convert::{ConvertError, Number};
use crate::info::{Type, Typed};
use crate::registry::{GetTypeMeta, TypeMeta, TypeStorage, TypeTraitConvert};
use crate::value::Value;

/// Primitive numbers that can be built from any other number or from text.
trait Numeric: Sized + Typed + Send + Sync + core::str::FromStr
where
    Self::Err: core::error::Error + Send + Sync + 'static,
{
    fn from_number(number: Number) -> Option<Self>;
}

macro_rules! impl_integer {
    ($($ty:ident),*) => {
        $(
            impl Numeric for $ty {
                #[inline]
                fn from_number(number: Number) -> Option<Self> {
                    number.to_i128().and_then(|n| <$ty>::try_from(n).ok()).or_else(|| match number {
                        Number::Uint(n) => <$ty>::try_from(n).ok(),
                        _ => None,
                    })
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Numeric for f32 {
    #[inline]
    fn from_number(number: Number) -> Option<Self> {
        Some(number.to_f64() as f32)
    }
}

impl Numeric for f64 {
    #[inline]
    fn from_number(number: Number) -> Option<Self> {
        Some(number.to_f64())
    }
}

fn convert_numeric<T>(value: &Value) -> Option<Result<Value, TargetError>>
where
    T: Numeric + 'static,
    T::Err: core::error::Error + Send + Sync + 'static,
{
    if let Some(text) = value.downcast_ref::<String>() {
        return Some(
            text.trim()
                .parse::<T>()
                .map(Value::new)
                .map_err(TargetError::from),
        );
    }
    let number = Number::of(value)?;
    Some(
        T::from_number(number)
            .map(Value::new)
            .ok_or_else(|| ConvertError::OutOfRange(T::static_type()).into()),
    )
}

fn convert_bool(value: &Value) -> Option<Result<Value, TargetError>> {
    if let Some(text) = value.downcast_ref::<String>() {
        let text = text.trim();
        return Some(if text.eq_ignore_ascii_case("true") {
            Ok(Value::new(true))
        } else if text.eq_ignore_ascii_case("false") {
            Ok(Value::new(false))
        } else {
            Err(unrecognized::<bool>(text))
        });
    }
    Number::of(value).map(|n| Ok(Value::new(!n.is_zero())))
}

fn convert_char(value: &Value) -> Option<Result<Value, TargetError>> {
    if let Some(text) = value.downcast_ref::<String>() {
        let mut chars = text.chars();
        return Some(match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Value::new(c)),
            _ => Err(unrecognized::<char>(text)),
        });
    }
    let number = Number::of(value)?;
    let ch = number
        .to_i128()
        .and_then(|n| u32::try_from(n).ok())
        .and_then(char::from_u32);
    Some(ch.map(Value::new).ok_or_else(|| ConvertError::OutOfRange(Type::of::<char>()).into()))
}

fn convert_string(value: &Value) -> Option<Result<Value, TargetError>> {
    macro_rules! display {
        ($($ty:ty),*) => {
            $(
                if let Some(v) = value.downcast_ref::<$ty>() {
                    return Some(Ok(Value::new(v.to_string())));
                }
            )*
        };
    }

    display!(bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
    None
}

#[cold]
fn unrecognized<T: Typed>(text: &str) -> TargetError {
    ConvertError::Unrecognized {
        text: text.into(),
        target: T::static_type(),
    }
    .into()
}

macro_rules! impl_get_type_meta {
    ($($ty:ty => $convert:expr),* $(,)?) => {
        $(
            impl GetTypeMeta for $ty {
                fn get_type_meta() -> TypeMeta {
                    let mut meta = TypeMeta::of::<Self>(TypeStorage::Value);
                    meta.insert_trait(TypeTraitConvert::new($convert));
                    meta
                }
            }
        )*
    };
}

impl_get_type_meta!(
    i8 => convert_numeric::<i8>,
    i16 => convert_numeric::<i16>,
    i32 => convert_numeric::<i32>,
    i64 => convert_numeric::<i64>,
    i128 => convert_numeric::<i128>,
    isize => convert_numeric::<isize>,
    u8 => convert_numeric::<u8>,
    u16 => convert_numeric::<u16>,
    u32 => convert_numeric::<u32>,
    u64 => convert_numeric::<u64>,
    u128 => convert_numeric::<u128>,
    usize => convert_numeric::<usize>,
    f32 => convert_numeric::<f32>,
    f64 => convert_numeric::<f64>,
    bool => convert_bool,
    char => convert_char,
    String => convert_string,
);
