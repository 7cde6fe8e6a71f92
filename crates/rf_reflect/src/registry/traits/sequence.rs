use crate::TargetError;
use crate::info::{ParameterInfo, Type};
use crate::value::Value;

/// Iteration-order access to an enumerable object: sets, linked lists.
///
/// Element `n` is the n-th element produced by iteration. Writing by
/// position is only possible when the collection can hand out its
/// elements mutably.
#[derive(Clone, Copy)]
pub struct TypeTraitSequence {
    item: ParameterInfo,
    nth: fn(&Value, usize) -> Option<Option<Value>>,
    set_nth: Option<fn(&Value, usize, Option<Value>) -> Result<bool, TargetError>>,
}

impl TypeTraitSequence {
    pub const fn new(item: ParameterInfo, nth: fn(&Value, usize) -> Option<Option<Value>>) -> Self {
        Self {
            item,
            nth,
            set_nth: None,
        }
    }

    /// Adds positional mutation.
    pub const fn with_set(
        mut self,
        set_nth: fn(&Value, usize, Option<Value>) -> Result<bool, TargetError>,
    ) -> Self {
        self.set_nth = Some(set_nth);
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
    pub const fn can_set(&self) -> bool {
        self.set_nth.is_some()
    }

    /// Returns the n-th element, or `None` if iteration ends first.
    #[inline]
    pub fn nth(&self, sequence: &Value, index: usize) -> Option<Option<Value>> {
        (self.nth)(sequence, index)
    }

    /// Replaces the n-th element.
    ///
    /// Returns `Ok(false)` if iteration ends first or the sequence cannot
    /// be mutated by position.
    pub fn set_nth(
        &self,
        sequence: &Value,
        index: usize,
        value: Option<Value>,
    ) -> Result<bool, TargetError> {
        match self.set_nth {
            Some(set_nth) => set_nth(sequence, index, value),
            None => Ok(false),
        }
    }
}

impl core::fmt::Debug for TypeTraitSequence {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeTraitSequence")
            .field("item", &self.item)
            .finish_non_exhaustive()
    }
}
