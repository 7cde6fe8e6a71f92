use alloc::string::ToString;

use crate::access::IndexKey;
use crate::info::ParameterInfo;
use crate::registry::{TypeMeta, TypeTraitKeyed, TypeTraitList, TypeTraitSequence};
use crate::{ReflectError, Value};

/// How a container answers `[key]` segments.
///
/// Derived from the type traits of the container's type, checked in
/// declaration order: a keyed lookup wins over positional access, and
/// positional access wins over iteration.
#[derive(Debug, Clone, Copy)]
pub enum CollectionKind<'m> {
    /// Maps and registered indexers: the key is matched by value.
    Keyed(&'m TypeTraitKeyed),
    /// Random access by a bounds-checked position.
    List(&'m TypeTraitList),
    /// Forward-only iteration to a position.
    Sequence(&'m TypeTraitSequence),
    NotIndexable,
}

impl<'m> CollectionKind<'m> {
    /// Classifies a container type.
    pub fn of(meta: Option<&'m TypeMeta>) -> Self {
        let Some(meta) = meta else {
            return Self::NotIndexable;
        };
        if let Some(keyed) = meta.get_trait::<TypeTraitKeyed>() {
            Self::Keyed(keyed)
        } else if let Some(list) = meta.get_trait::<TypeTraitList>() {
            Self::List(list)
        } else if let Some(sequence) = meta.get_trait::<TypeTraitSequence>() {
            Self::Sequence(sequence)
        } else {
            Self::NotIndexable
        }
    }

    #[inline]
    pub fn is_indexable(&self) -> bool {
        !matches!(self, Self::NotIndexable)
    }

    /// The declared element.
    pub fn item(&self) -> Option<ParameterInfo> {
        match self {
            Self::Keyed(keyed) => Some(keyed.item()),
            Self::List(list) => Some(list.item()),
            Self::Sequence(sequence) => Some(sequence.item()),
            Self::NotIndexable => None,
        }
    }

    /// Returns the element at `key`.
    ///
    /// The outer `None` means "no such element": out of range, missing
    /// key, a non-integer position, or a container that is not indexable.
    pub fn get_element(
        &self,
        container: &Value,
        key: &IndexKey<'_>,
    ) -> Result<Option<Option<Value>>, ReflectError> {
        match self {
            Self::Keyed(keyed) => keyed
                .get(container, key)
                .map_err(|e| ReflectError::target(container.ty(), &key.to_string(), e)),
            Self::List(list) => Ok(key.as_position().and_then(|i| list.get(container, i))),
            Self::Sequence(sequence) => Ok(key.as_position().and_then(|i| sequence.nth(container, i))),
            Self::NotIndexable => Ok(None),
        }
    }

    /// Replaces the element at `key`.
    ///
    /// Returns `false` when there is no such element or the container
    /// cannot replace elements. Map keys are never inserted.
    pub fn set_element(
        &self,
        container: &Value,
        key: &IndexKey<'_>,
        value: Option<Value>,
    ) -> Result<bool, ReflectError> {
        let result = match self {
            Self::Keyed(keyed) => keyed.set(container, key, value),
            Self::List(list) => match key.as_position() {
                Some(i) => list.set(container, i, value),
                None => Ok(false),
            },
            Self::Sequence(sequence) => match key.as_position() {
                Some(i) => sequence.set_nth(container, i, value),
                None => Ok(false),
            },
            Self::NotIndexable => Ok(false),
        };
        result.map_err(|e| ReflectError::target(container.ty(), &key.to_string(), e))
    }
}
