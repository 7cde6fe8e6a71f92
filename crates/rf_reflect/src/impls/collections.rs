use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet, LinkedList, VecDeque};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt::Display;
use core::hash::{BuildHasher, Hash};

use std::collections::{HashMap, HashSet};

use crate::access::IndexKey;
use crate::info::{ParameterInfo, Type, Typed};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeStorage};
use crate::registry::{TypeTraitKeyed, TypeTraitList, TypeTraitSequence};
use crate::{ArgumentError, FromValue, IntoValue, TargetError, Value};

/// An element type of the built-in collections.
pub trait Element: IntoValue + FromValue + Clone + Send + Sync {}

impl<T: IntoValue + FromValue + Clone + Send + Sync> Element for T {}

/// A key type of the built-in maps.
///
/// Keys are matched against `[key]` segments by value for integer and
/// string keys, and by their [`Display`] form otherwise.
pub trait Key: Any + Display + Send + Sync {}

impl<T: Any + Display + Send + Sync> Key for T {}

#[inline]
fn item_of<T: Element>() -> ParameterInfo {
    ParameterInfo::of::<T>()
}

#[cold]
fn not_a<C: Any>(value: &Value) -> TargetError {
    ArgumentError::Receiver {
        expected: Type::of::<C>(),
        actual: Some(value.ty()),
    }
    .into()
}

fn extract<T: Element>(value: Option<Value>) -> Result<T, TargetError> {
    T::from_nullable(value.as_ref()).ok_or_else(|| {
        ArgumentError::Type {
            index: 0,
            expected: T::static_type(),
            actual: value.as_ref().map(Value::ty),
        }
        .into()
    })
}

/// Writes through `func`, reporting plain (immutable) collections.
fn mutate<C: Any, R>(container: &Value, func: impl FnOnce(&mut C) -> R) -> Result<R, TargetError> {
    if !container.is::<C>() {
        return Err(not_a::<C>(container));
    }
    container
        .with_mut(func)
        .ok_or_else(|| ArgumentError::Immutable(Type::of::<C>()).into())
}

// -----------------------------------------------------------------------------
// Lists

trait ListStorage: Any + Send + Sync {
    type Item: Element;

    fn count(&self) -> usize;
    fn at(&self, index: usize) -> Option<&Self::Item>;
    fn at_mut(&mut self, index: usize) -> Option<&mut Self::Item>;
}

impl<T: Element + 'static> ListStorage for Vec<T> {
    type Item = T;

    fn count(&self) -> usize {
        self.len()
    }

    fn at(&self, index: usize) -> Option<&T> {
        self.get(index)
    }

    fn at_mut(&mut self, index: usize) -> Option<&mut T> {
        self.get_mut(index)
    }
}

impl<T: Element + 'static> ListStorage for VecDeque<T> {
    type Item = T;

    fn count(&self) -> usize {
        self.len()
    }

    fn at(&self, index: usize) -> Option<&T> {
        self.get(index)
    }

    fn at_mut(&mut self, index: usize) -> Option<&mut T> {
        self.get_mut(index)
    }
}

impl<T: Element + 'static> ListStorage for Box<[T]> {
    type Item = T;

    fn count(&self) -> usize {
        self.len()
    }

    fn at(&self, index: usize) -> Option<&T> {
        self.get(index)
    }

    fn at_mut(&mut self, index: usize) -> Option<&mut T> {
        self.get_mut(index)
    }
}

fn list_len<L: ListStorage>(list: &Value) -> Option<usize> {
    list.with_ref(|l: &L| l.count())
}

fn list_get<L: ListStorage>(list: &Value, index: usize) -> Option<Option<Value>> {
    list.with_ref(|l: &L| l.at(index).cloned().map(IntoValue::into_value))
        .flatten()
}

fn list_set<L: ListStorage>(list: &Value, index: usize, value: Option<Value>) -> Result<bool, TargetError> {
    let item = extract::<L::Item>(value)?;
    mutate(list, |l: &mut L| match l.at_mut(index) {
        Some(slot) => {
            *slot = item;
            true
        }
        None => false,
    })
}

fn list_trait<L: ListStorage>() -> TypeTraitList {
    TypeTraitList::new(item_of::<L::Item>(), list_len::<L>, list_get::<L>, list_set::<L>)
}

macro_rules! impl_list {
    ($($list:ty),*) => {
        $(
            impl<T: Element + 'static> Typed for $list {
                #[inline]
                fn static_type() -> Type {
                    Type::of::<Self>()
                }
            }

            impl<T: Element + 'static> FromType<$list> for TypeTraitList {
                #[inline]
                fn from_type() -> Self {
                    list_trait::<$list>()
                }
            }

            impl<T: Element + GetTypeMeta> GetTypeMeta for $list {
                fn get_type_meta() -> TypeMeta {
                    let mut meta = TypeMeta::of::<Self>(TypeStorage::Object);
                    meta.insert_trait::<TypeTraitList>(FromType::<Self>::from_type());
                    meta
                }

                fn register_dependencies(registry: &mut TypeRegistry) {
                    registry.register::<T>();
                }
            }
        )*
    };
}

impl_list!(Vec<T>, VecDeque<T>, Box<[T]>);

// -----------------------------------------------------------------------------
// Maps

trait MapStorage: Any + Send + Sync {
    type Item: Element;

    fn find(&self, key: &IndexKey<'_>) -> Option<&Self::Item>;
    fn find_mut(&mut self, key: &IndexKey<'_>) -> Option<&mut Self::Item>;
}

impl<K, V, S> MapStorage for HashMap<K, V, S>
where
    K: Key,
    V: Element + 'static,
    S: BuildHasher + Send + Sync + 'static,
{
    type Item = V;

    fn find(&self, key: &IndexKey<'_>) -> Option<&V> {
        self.iter().find(|(k, _)| key.matches(*k)).map(|(_, v)| v)
    }

    fn find_mut(&mut self, key: &IndexKey<'_>) -> Option<&mut V> {
        self.iter_mut().find(|(k, _)| key.matches(*k)).map(|(_, v)| v)
    }
}

impl<K, V> MapStorage for BTreeMap<K, V>
where
    K: Key,
    V: Element + 'static,
{
    type Item = V;

    fn find(&self, key: &IndexKey<'_>) -> Option<&V> {
        self.iter().find(|(k, _)| key.matches(*k)).map(|(_, v)| v)
    }

    fn find_mut(&mut self, key: &IndexKey<'_>) -> Option<&mut V> {
        self.iter_mut().find(|(k, _)| key.matches(*k)).map(|(_, v)| v)
    }
}

fn map_get<M: MapStorage>(
    map: &Value,
    key: &IndexKey<'_>,
) -> Result<Option<Option<Value>>, TargetError> {
    map.with_ref(|m: &M| m.find(key).cloned().map(IntoValue::into_value))
        .ok_or_else(|| not_a::<M>(map))
}

fn map_set<M: MapStorage>(
    map: &Value,
    key: &IndexKey<'_>,
    value: Option<Value>,
) -> Result<bool, TargetError> {
    let item = extract::<M::Item>(value)?;
    mutate(map, |m: &mut M| match m.find_mut(key) {
        Some(slot) => {
            *slot = item;
            true
        }
        None => false,
    })
}

fn map_trait<M: MapStorage>() -> TypeTraitKeyed {
    TypeTraitKeyed::new(item_of::<M::Item>(), Arc::new(map_get::<M>)).with_set(Arc::new(map_set::<M>))
}

impl<K: Key, V: Element + 'static, S: 'static> Typed for HashMap<K, V, S> {
    #[inline]
    fn static_type() -> Type {
        Type::of::<Self>()
    }
}

impl<K: Key, V: Element + 'static> Typed for BTreeMap<K, V> {
    #[inline]
    fn static_type() -> Type {
        Type::of::<Self>()
    }
}

impl<K, V, S> FromType<HashMap<K, V, S>> for TypeTraitKeyed
where
    K: Key,
    V: Element + 'static,
    S: BuildHasher + Send + Sync + 'static,
{
    #[inline]
    fn from_type() -> Self {
        map_trait::<HashMap<K, V, S>>()
    }
}

impl<K: Key, V: Element + 'static> FromType<BTreeMap<K, V>> for TypeTraitKeyed {
    #[inline]
    fn from_type() -> Self {
        map_trait::<BTreeMap<K, V>>()
    }
}

impl<K, V, S> GetTypeMeta for HashMap<K, V, S>
where
    K: Key + GetTypeMeta + Eq + Hash,
    V: Element + GetTypeMeta,
    S: BuildHasher + Send + Sync + 'static,
{
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>(TypeStorage::Object);
        meta.insert_trait::<TypeTraitKeyed>(FromType::<Self>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<K>();
        registry.register::<V>();
    }
}

impl<K, V> GetTypeMeta for BTreeMap<K, V>
where
    K: Key + GetTypeMeta + Ord,
    V: Element + GetTypeMeta,
{
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>(TypeStorage::Object);
        meta.insert_trait::<TypeTraitKeyed>(FromType::<Self>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<K>();
        registry.register::<V>();
    }
}

// -----------------------------------------------------------------------------
// Sequences

fn sequence_nth<S, T>(sequence: &Value, index: usize) -> Option<Option<Value>>
where
    S: Any,
    T: Element + 'static,
    for<'a> &'a S: IntoIterator<Item = &'a T>,
{
    sequence
        .with_ref(|s: &S| IntoIterator::into_iter(s).nth(index).cloned().map(IntoValue::into_value))
        .flatten()
}

fn linked_list_set<T: Element + 'static>(
    list: &Value,
    index: usize,
    value: Option<Value>,
) -> Result<bool, TargetError> {
    let item = extract::<T>(value)?;
    mutate(list, |l: &mut LinkedList<T>| match l.iter_mut().nth(index) {
        Some(slot) => {
            *slot = item;
            true
        }
        None => false,
    })
}

impl<T: Element + 'static, S: 'static> Typed for HashSet<T, S> {
    #[inline]
    fn static_type() -> Type {
        Type::of::<Self>()
    }
}

impl<T: Element + 'static> Typed for BTreeSet<T> {
    #[inline]
    fn static_type() -> Type {
        Type::of::<Self>()
    }
}

impl<T: Element + 'static> Typed for LinkedList<T> {
    #[inline]
    fn static_type() -> Type {
        Type::of::<Self>()
    }
}

impl<T, S> FromType<HashSet<T, S>> for TypeTraitSequence
where
    T: Element + 'static,
    S: Send + Sync + 'static,
{
    #[inline]
    fn from_type() -> Self {
        TypeTraitSequence::new(item_of::<T>(), sequence_nth::<HashSet<T, S>, T>)
    }
}

impl<T: Element + 'static> FromType<BTreeSet<T>> for TypeTraitSequence {
    #[inline]
    fn from_type() -> Self {
        TypeTraitSequence::new(item_of::<T>(), sequence_nth::<BTreeSet<T>, T>)
    }
}

impl<T: Element + 'static> FromType<LinkedList<T>> for TypeTraitSequence {
    #[inline]
    fn from_type() -> Self {
        TypeTraitSequence::new(item_of::<T>(), sequence_nth::<LinkedList<T>, T>)
            .with_set(linked_list_set::<T>)
    }
}

impl<T, S> GetTypeMeta for HashSet<T, S>
where
    T: Element + GetTypeMeta + Eq + Hash,
    S: BuildHasher + Send + Sync + 'static,
{
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>(TypeStorage::Object);
        meta.insert_trait::<TypeTraitSequence>(FromType::<Self>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

impl<T: Element + GetTypeMeta + Ord> GetTypeMeta for BTreeSet<T> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>(TypeStorage::Object);
        meta.insert_trait::<TypeTraitSequence>(FromType::<Self>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

impl<T: Element + GetTypeMeta> GetTypeMeta for LinkedList<T> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>(TypeStorage::Object);
        meta.insert_trait::<TypeTraitSequence>(FromType::<Self>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}
