use core::fmt;

use crate::TargetError;
use crate::value::Value;

/// Converts values of other types into the registered type.
///
/// Used by coercing writes. The function returns `None` when it has no
/// rule for the source type, and `Some(Err(..))` when the source is
/// recognized but its content does not fit (overflow, unparsable text).
#[derive(Clone, Copy)]
pub struct TypeTraitConvert {
    func: fn(&Value) -> Option<Result<Value, TargetError>>,
}

impl TypeTraitConvert {
    #[inline]
    pub const fn new(func: fn(&Value) -> Option<Result<Value, TargetError>>) -> Self {
        Self { func }
    }

    #[inline]
    pub fn convert(&self, value: &Value) -> Option<Result<Value, TargetError>> {
        (self.func)(value)
    }
}

impl fmt::Debug for TypeTraitConvert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TypeTraitConvert")
    }
}
