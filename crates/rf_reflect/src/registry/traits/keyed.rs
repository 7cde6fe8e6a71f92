use alloc::string::String;
use alloc::sync::Arc;

use crate::TargetError;
use crate::access::IndexKey;
use crate::info::{ParameterInfo, Type};
use crate::value::Value;

/// Looks up an element by key.
///
/// `Ok(None)` means no element matches; `Ok(Some(None))` is a null element.
pub type KeyedGetFn =
    dyn Fn(&Value, &IndexKey<'_>) -> Result<Option<Option<Value>>, TargetError> + Send + Sync;

/// Replaces the element stored under an existing key.
///
/// Returns `Ok(false)` if no element matches.
pub type KeyedSetFn =
    dyn Fn(&Value, &IndexKey<'_>, Option<Value>) -> Result<bool, TargetError> + Send + Sync;

/// Keyed access to a map-like object, or to a type with a custom indexer.
///
/// Keyed access takes precedence over [`TypeTraitList`](super::TypeTraitList)
/// and [`TypeTraitSequence`](super::TypeTraitSequence) when a type has
/// several of them.
#[derive(Clone)]
pub struct TypeTraitKeyed {
    item: ParameterInfo,
    get: Arc<KeyedGetFn>,
    set: Option<Arc<KeyedSetFn>>,
}

impl TypeTraitKeyed {
    pub fn new(item: ParameterInfo, get: Arc<KeyedGetFn>) -> Self {
        Self {
            item,
            get,
            set: None,
        }
    }

    pub fn with_set(mut self, set: Arc<KeyedSetFn>) -> Self {
        self.set = Some(set);
        self
    }

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
    pub fn can_set(&self) -> bool {
        self.set.is_some()
    }

    #[inline]
    pub fn get(&self, container: &Value, key: &IndexKey<'_>) -> Result<Option<Option<Value>>, TargetError> {
        (self.get)(container, key)
    }

    /// Replaces the element under `key`.
    ///
    /// Read-only indexers return `Ok(false)`.
    pub fn set(
        &self,
        container: &Value,
        key: &IndexKey<'_>,
        value: Option<Value>,
    ) -> Result<bool, TargetError> {
        match &self.set {
            Some(set) => set(container, key, value),
            None => Ok(false),
        }
    }
}

/// Converts a path index into the key type of a custom indexer.
pub trait FromIndexKey: Sized + 'static {
    /// Returns `None` if the key cannot be represented; the lookup then
    /// finds nothing.
    fn from_index_key(key: &IndexKey<'_>) -> Option<Self>;
}

macro_rules! impl_from_index_key {
    ($($ty:ty),*) => {
        $(
            impl FromIndexKey for $ty {
                #[inline]
                fn from_index_key(key: &IndexKey<'_>) -> Option<Self> {
                    key.as_int().and_then(|n| <$ty>::try_from(n).ok())
                }
            }
        )*
    };
}

impl_from_index_key!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl FromIndexKey for String {
    #[inline]
    fn from_index_key(key: &IndexKey<'_>) -> Option<Self> {
        Some(key.text().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_key_conversion() {
        assert_eq!(u8::from_index_key(&IndexKey::new("7")), Some(7));
        assert_eq!(u8::from_index_key(&IndexKey::new("-1")), None);
        assert_eq!(u8::from_index_key(&IndexKey::new("x")), None);
        assert_eq!(String::from_index_key(&IndexKey::new("x")).as_deref(), Some("x"));
        assert_eq!(String::from_index_key(&IndexKey::new("7")).as_deref(), Some("7"));
    }
}

impl core::fmt::Debug for TypeTraitKeyed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeTraitKeyed")
            .field("item", &self.item)
            .finish_non_exhaustive()
    }
}
