use crate::TargetError;
use crate::info::{ParameterInfo, Type};
use crate::value::Value;

/// Positional access to a list-like object: `Vec`, `VecDeque`, boxed slices.
///
/// Lists are addressed by a non-negative integer index that must be
/// smaller than the current length.
#[derive(Clone, Copy)]
pub struct TypeTraitList {
    item: ParameterInfo,
    len: fn(&Value) -> Option<usize>,
    get: fn(&Value, usize) -> Option<Option<Value>>,
    set: fn(&Value, usize, Option<Value>) -> Result<bool, TargetError>,
}

impl TypeTraitList {
    /// Creates the trait from its primitives.
    ///
    /// - `len` returns `None` if the value is not a list of this type.
    /// - `get` returns `None` if the index is out of range; the inner
    ///   option is the (nullable) element.
    /// - `set` returns `Ok(false)` if the index is out of range.
    pub const fn new(
        item: ParameterInfo,
        len: fn(&Value) -> Option<usize>,
        get: fn(&Value, usize) -> Option<Option<Value>>,
        set: fn(&Value, usize, Option<Value>) -> Result<bool, TargetError>,
    ) -> Self {
        Self {
            item,
            len,
            get,
            set,
        }
    }

    /// The declared element type.
    #[inline]
    pub const fn item_type(&self) -> Type {
        self.item.ty()
    }

    #[inline]
    pub const fn is_item_nullable(&self) -> bool {
        self.item.is_nullable()
    }

    #[inline]
    pub const fn item(&self) -> ParameterInfo {
        self.item
    }

    #[inline]
    pub fn len(&self, list: &Value) -> Option<usize> {
        (self.len)(list)
    }

    #[inline]
    pub fn get(&self, list: &Value, index: usize) -> Option<Option<Value>> {
        (self.get)(list, index)
    }

    #[inline]
    pub fn set(&self, list: &Value, index: usize, value: Option<Value>) -> Result<bool, TargetError> {
        (self.set)(list, index, value)
    }
}

impl core::fmt::Debug for TypeTraitList {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeTraitList")
            .field("item", &self.item)
            .finish_non_exhaustive()
    }
}
