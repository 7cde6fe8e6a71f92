use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::convert::Infallible;
use core::marker::PhantomData;

use crate::access::IndexKey;
use crate::info::{InvokeFn, MemberInfo, ParameterInfo, ReadFn, Type, WriteFn};
use crate::registry::{FromIndexKey, TypeMeta, TypeStorage, TypeTrait, TypeTraitKeyed};
use crate::{ArgumentError, FromValue, IntoValue, Obj, TargetError, Value};

// -----------------------------------------------------------------------------
// Args

/// An argument list: a tuple of up to six [`FromValue`] types.
pub trait Args: Sized + 'static {
    /// Returns the declared parameters.
    fn parameters() -> Box<[ParameterInfo]>;

    /// Extracts the arguments, checking count and types.
    fn from_args(args: &[Option<Value>]) -> Result<Self, ArgumentError>;
}

fn argument<A: FromValue>(args: &[Option<Value>], index: usize) -> Result<A, ArgumentError> {
    let value = args.get(index).and_then(Option::as_ref);
    A::from_nullable(value).ok_or_else(|| ArgumentError::Type {
        index,
        expected: A::static_type(),
        actual: value.map(Value::ty),
    })
}

macro_rules! impl_args {
    ($count:literal $(, $name:ident : $index:tt)*) => {
        impl<$($name: FromValue),*> Args for ($($name,)*) {
            fn parameters() -> Box<[ParameterInfo]> {
                let parameters: [ParameterInfo; $count] =
                    [$(ParameterInfo::of::<$name>()),*];
                Box::new(parameters)
            }

            fn from_args(args: &[Option<Value>]) -> Result<Self, ArgumentError> {
                if args.len() != $count {
                    return Err(ArgumentError::Count {
                        expected: $count,
                        actual: args.len(),
                    });
                }
                Ok(($(argument::<$name>(args, $index)?,)*))
            }
        }
    };
}

impl_args!(0);
impl_args!(1, A0: 0);
impl_args!(2, A0: 0, A1: 1);
impl_args!(3, A0: 0, A1: 1, A2: 2);
impl_args!(4, A0: 0, A1: 1, A2: 2, A3: 3);
impl_args!(5, A0: 0, A1: 1, A2: 2, A3: 3, A4: 4);
impl_args!(6, A0: 0, A1: 1, A2: 2, A3: 3, A4: 4, A5: 5);

// -----------------------------------------------------------------------------
// Glue

#[cold]
fn receiver_error<T: Any>(actual: Option<Type>) -> TargetError {
    ArgumentError::Receiver {
        expected: Type::of::<T>(),
        actual,
    }
    .into()
}

#[inline]
fn raised<E: Into<TargetError>>(error: E) -> TargetError {
    error.into()
}

fn with_ref<T: Any, R>(
    container: Option<&Value>,
    func: impl FnOnce(&T) -> R,
) -> Result<R, TargetError> {
    let Some(value) = container else {
        return Err(receiver_error::<T>(None));
    };
    value
        .with_ref(func)
        .ok_or_else(|| receiver_error::<T>(Some(value.ty())))
}

fn with_mut<T: Any, R>(
    container: Option<&Value>,
    func: impl FnOnce(&mut T) -> R,
) -> Result<R, TargetError> {
    let Some(value) = container else {
        return Err(receiver_error::<T>(None));
    };
    if !value.is::<T>() {
        return Err(receiver_error::<T>(Some(value.ty())));
    }
    value
        .with_mut(func)
        .ok_or_else(|| ArgumentError::Immutable(Type::of::<T>()).into())
}

fn extract<F: FromValue>(value: Option<Value>) -> Result<F, TargetError> {
    F::from_nullable(value.as_ref()).ok_or_else(|| {
        ArgumentError::Type {
            index: 0,
            expected: F::static_type(),
            actual: value.as_ref().map(Value::ty),
        }
        .into()
    })
}

fn instance_read<T, F, E>(get: impl Fn(&T) -> Result<F, E> + Send + Sync + 'static) -> Box<ReadFn>
where
    T: Any,
    F: IntoValue,
    E: Into<TargetError>,
{
    Box::new(
        move |container: Option<&Value>| -> Result<Option<Value>, TargetError> {
            let value = with_ref(container, |this: &T| get(this))?.map_err(raised)?;
            Ok(value.into_value())
        },
    )
}

fn instance_write<T, F, E>(
    set: impl Fn(&mut T, F) -> Result<(), E> + Send + Sync + 'static,
) -> Box<WriteFn>
where
    T: Any,
    F: FromValue,
    E: Into<TargetError>,
{
    Box::new(
        move |container: Option<&Value>, value: Option<Value>| -> Result<(), TargetError> {
            let value = extract::<F>(value)?;
            with_mut(container, |this: &mut T| set(this, value))?.map_err(raised)
        },
    )
}

fn static_read<F, E>(get: impl Fn() -> Result<F, E> + Send + Sync + 'static) -> Box<ReadFn>
where
    F: IntoValue,
    E: Into<TargetError>,
{
    Box::new(
        move |_: Option<&Value>| -> Result<Option<Value>, TargetError> {
            Ok(get().map_err(raised)?.into_value())
        },
    )
}

fn static_write<F, E>(set: impl Fn(F) -> Result<(), E> + Send + Sync + 'static) -> Box<WriteFn>
where
    F: FromValue,
    E: Into<TargetError>,
{
    Box::new(
        move |_: Option<&Value>, value: Option<Value>| -> Result<(), TargetError> {
            set(extract::<F>(value)?).map_err(raised)
        },
    )
}

// -----------------------------------------------------------------------------
// TypeBuilder

/// Builds the [`TypeMeta`] of `T` from plain Rust closures.
///
/// Members are recorded in declaration order. Names may repeat: methods
/// and constructors are overloaded by parameter list.
///
/// Accessors receive `&T` (or `&mut T` for writes and `_mut` methods).
/// Only [`TypeStorage::Object`] types can be written in place; writes to
/// plain values fail with [`ArgumentError::Immutable`].
///
/// Accessors run while the instance is locked. A write accessor must not
/// reach the same instance through reflection again.
///
/// # Example
///
/// ```
/// use rf_reflect::registry::TypeBuilder;
///
/// struct Calc {
///     total: i64,
/// }
///
/// let meta = TypeBuilder::<Calc>::object()
///     .field("Total", |c| c.total, |c, v| c.total = v)
///     .method("Add", |_, (a, b): (i64, i64)| a + b)
///     .method("Add", |c, (a,): (i64,)| c.total + a)
///     .constructor(|(total,): (i64,)| Calc { total })
///     .build();
///
/// assert_eq!(meta.members().len(), 4);
/// ```
pub struct TypeBuilder<T> {
    meta: TypeMeta,
    members: Vec<MemberInfo>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> TypeBuilder<T> {
    fn new(storage: TypeStorage) -> Self {
        Self {
            meta: TypeMeta::new(Type::of::<T>(), storage),
            members: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Starts a type whose instances are shared objects ([`Obj<T>`]).
    #[inline]
    pub fn object() -> Self {
        Self::new(TypeStorage::Object)
    }

    /// Starts a type whose instances are plain values.
    #[inline]
    pub fn value() -> Self {
        Self::new(TypeStorage::Value)
    }

    /// Finishes the [`TypeMeta`].
    pub fn build(self) -> TypeMeta {
        let mut meta = self.meta;
        for member in self.members {
            meta.push_member(member);
        }
        meta
    }

    #[inline]
    fn declaring() -> Type {
        Type::of::<T>()
    }

    /// Appends a hand-made member.
    #[inline]
    pub fn member(mut self, member: MemberInfo) -> Self {
        self.members.push(member);
        self
    }

    /// Marks the last added member as non-public.
    pub fn private(mut self) -> Self {
        if let Some(last) = self.members.pop() {
            self.members.push(last.with_public(false));
        }
        self
    }

    /// Attaches a [`TypeTrait`].
    #[inline]
    pub fn with_trait<D: TypeTrait>(mut self, data: D) -> Self {
        self.meta.insert_trait(data);
        self
    }

    // -------------------------------------------------------------------------
    // Fields and properties

    fn data<F: crate::info::Typed>(
        self,
        info: MemberInfo,
        read: Option<Box<ReadFn>>,
        write: Option<Box<WriteFn>>,
    ) -> Self {
        let mut info = info.with_nullable(F::NULLABLE).with_object(F::OBJECT);
        if let Some(read) = read {
            info = info.with_read(read);
        }
        if let Some(write) = write {
            info = info.with_write(write);
        }
        self.member(info)
    }

    /// Adds a readable and writable field.
    pub fn field<F>(
        self,
        name: impl Into<Cow<'static, str>>,
        get: impl Fn(&T) -> F + Send + Sync + 'static,
        set: impl Fn(&mut T, F) + Send + Sync + 'static,
    ) -> Self
    where
        F: IntoValue + FromValue,
    {
        let info = MemberInfo::field(name, Self::declaring(), F::static_type());
        let read = instance_read(move |this: &T| Ok::<F, Infallible>(get(this)));
        let write = instance_write(move |this: &mut T, v: F| {
            set(this, v);
            Ok::<(), Infallible>(())
        });
        self.data::<F>(info, Some(read), Some(write))
    }

    /// Adds a field that cannot be written.
    pub fn readonly_field<F: IntoValue>(
        self,
        name: impl Into<Cow<'static, str>>,
        get: impl Fn(&T) -> F + Send + Sync + 'static,
    ) -> Self {
        let info = MemberInfo::field(name, Self::declaring(), F::static_type());
        let read = instance_read(move |this: &T| Ok::<F, Infallible>(get(this)));
        self.data::<F>(info, Some(read), None)
    }

    /// Adds a property with a getter and a setter.
    pub fn property<F>(
        self,
        name: impl Into<Cow<'static, str>>,
        get: impl Fn(&T) -> F + Send + Sync + 'static,
        set: impl Fn(&mut T, F) + Send + Sync + 'static,
    ) -> Self
    where
        F: IntoValue + FromValue,
    {
        let info = MemberInfo::property(name, Self::declaring(), F::static_type());
        let read = instance_read(move |this: &T| Ok::<F, Infallible>(get(this)));
        let write = instance_write(move |this: &mut T, v: F| {
            set(this, v);
            Ok::<(), Infallible>(())
        });
        self.data::<F>(info, Some(read), Some(write))
    }

    /// Adds a get-only property.
    pub fn property_get<F: IntoValue>(
        self,
        name: impl Into<Cow<'static, str>>,
        get: impl Fn(&T) -> F + Send + Sync + 'static,
    ) -> Self {
        self.try_property_get(name, move |this: &T| Ok::<F, Infallible>(get(this)))
    }

    /// Adds a get-only property whose getter may fail.
    pub fn try_property_get<F, E>(
        self,
        name: impl Into<Cow<'static, str>>,
        get: impl Fn(&T) -> Result<F, E> + Send + Sync + 'static,
    ) -> Self
    where
        F: IntoValue,
        E: Into<TargetError>,
    {
        let info = MemberInfo::property(name, Self::declaring(), F::static_type());
        self.data::<F>(info, Some(instance_read(get)), None)
    }

    /// Adds a set-only property.
    pub fn property_set<F: FromValue>(
        self,
        name: impl Into<Cow<'static, str>>,
        set: impl Fn(&mut T, F) + Send + Sync + 'static,
    ) -> Self {
        self.try_property_set(name, move |this: &mut T, v: F| {
            set(this, v);
            Ok::<(), Infallible>(())
        })
    }

    /// Adds a set-only property whose setter may fail.
    pub fn try_property_set<F, E>(
        self,
        name: impl Into<Cow<'static, str>>,
        set: impl Fn(&mut T, F) -> Result<(), E> + Send + Sync + 'static,
    ) -> Self
    where
        F: FromValue,
        E: Into<TargetError>,
    {
        let info = MemberInfo::property(name, Self::declaring(), F::static_type());
        self.data::<F>(info, None, Some(instance_write(set)))
    }

    /// Adds a property with fallible accessors.
    pub fn try_property<F, E>(
        self,
        name: impl Into<Cow<'static, str>>,
        get: impl Fn(&T) -> Result<F, E> + Send + Sync + 'static,
        set: impl Fn(&mut T, F) -> Result<(), E> + Send + Sync + 'static,
    ) -> Self
    where
        F: IntoValue + FromValue,
        E: Into<TargetError>,
    {
        let info = MemberInfo::property(name, Self::declaring(), F::static_type());
        self.data::<F>(info, Some(instance_read(get)), Some(instance_write(set)))
    }

    /// Adds a static field.
    pub fn static_field<F>(
        self,
        name: impl Into<Cow<'static, str>>,
        get: impl Fn() -> F + Send + Sync + 'static,
        set: impl Fn(F) + Send + Sync + 'static,
    ) -> Self
    where
        F: IntoValue + FromValue,
    {
        let info = MemberInfo::field(name, Self::declaring(), F::static_type()).with_static(true);
        let read = static_read(move || Ok::<F, Infallible>(get()));
        let write = static_write(move |v: F| {
            set(v);
            Ok::<(), Infallible>(())
        });
        self.data::<F>(info, Some(read), Some(write))
    }

    /// Adds a static get-only property.
    pub fn static_property_get<F: IntoValue>(
        self,
        name: impl Into<Cow<'static, str>>,
        get: impl Fn() -> F + Send + Sync + 'static,
    ) -> Self {
        let info =
            MemberInfo::property(name, Self::declaring(), F::static_type()).with_static(true);
        let read = static_read(move || Ok::<F, Infallible>(get()));
        self.data::<F>(info, Some(read), None)
    }

    /// Adds a static property with a getter and a setter.
    pub fn static_property<F>(
        self,
        name: impl Into<Cow<'static, str>>,
        get: impl Fn() -> F + Send + Sync + 'static,
        set: impl Fn(F) + Send + Sync + 'static,
    ) -> Self
    where
        F: IntoValue + FromValue,
    {
        let info =
            MemberInfo::property(name, Self::declaring(), F::static_type()).with_static(true);
        let read = static_read(move || Ok::<F, Infallible>(get()));
        let write = static_write(move |v: F| {
            set(v);
            Ok::<(), Infallible>(())
        });
        self.data::<F>(info, Some(read), Some(write))
    }

    // -------------------------------------------------------------------------
    // Methods and constructors

    fn callable(self, info: MemberInfo, invoke: Box<InvokeFn>) -> Self {
        self.member(info.with_invoke(invoke))
    }

    /// Adds a method taking `&T`.
    ///
    /// Arguments arrive as a tuple, e.g. `|this, (a, b): (i32, i32)|`.
    pub fn method<A, R>(
        self,
        name: impl Into<Cow<'static, str>>,
        func: impl Fn(&T, A) -> R + Send + Sync + 'static,
    ) -> Self
    where
        A: Args,
        R: IntoValue,
    {
        self.try_method(name, move |this: &T, args: A| Ok::<R, Infallible>(func(this, args)))
    }

    /// Adds a method taking `&T` that may fail.
    pub fn try_method<A, R, E>(
        self,
        name: impl Into<Cow<'static, str>>,
        func: impl Fn(&T, A) -> Result<R, E> + Send + Sync + 'static,
    ) -> Self
    where
        A: Args,
        R: IntoValue,
        E: Into<TargetError>,
    {
        let info = MemberInfo::method(name, Self::declaring(), R::static_type(), A::parameters());
        let invoke = Box::new(
            move |container: Option<&Value>,
                  args: &[Option<Value>]|
                  -> Result<Option<Value>, TargetError> {
                let args = A::from_args(args)?;
                let result = with_ref(container, |this: &T| func(this, args))?.map_err(raised)?;
                Ok(result.into_value())
            },
        );
        self.callable(info, invoke)
    }

    /// Adds a method taking `&mut T`.
    pub fn method_mut<A, R>(
        self,
        name: impl Into<Cow<'static, str>>,
        func: impl Fn(&mut T, A) -> R + Send + Sync + 'static,
    ) -> Self
    where
        A: Args,
        R: IntoValue,
    {
        let info = MemberInfo::method(name, Self::declaring(), R::static_type(), A::parameters());
        let invoke = Box::new(
            move |container: Option<&Value>,
                  args: &[Option<Value>]|
                  -> Result<Option<Value>, TargetError> {
                let args = A::from_args(args)?;
                let result = with_mut(container, |this: &mut T| func(this, args))?;
                Ok(result.into_value())
            },
        );
        self.callable(info, invoke)
    }

    /// Adds a static method.
    pub fn static_method<A, R>(
        self,
        name: impl Into<Cow<'static, str>>,
        func: impl Fn(A) -> R + Send + Sync + 'static,
    ) -> Self
    where
        A: Args,
        R: IntoValue,
    {
        self.try_static_method(name, move |args: A| Ok::<R, Infallible>(func(args)))
    }

    /// Adds a static method that may fail.
    pub fn try_static_method<A, R, E>(
        self,
        name: impl Into<Cow<'static, str>>,
        func: impl Fn(A) -> Result<R, E> + Send + Sync + 'static,
    ) -> Self
    where
        A: Args,
        R: IntoValue,
        E: Into<TargetError>,
    {
        let info = MemberInfo::method(name, Self::declaring(), R::static_type(), A::parameters())
            .with_static(true);
        let invoke = Box::new(
            move |_: Option<&Value>, args: &[Option<Value>]| -> Result<Option<Value>, TargetError> {
                let args = A::from_args(args)?;
                Ok(func(args).map_err(raised)?.into_value())
            },
        );
        self.callable(info, invoke)
    }

    /// Adds a constructor.
    ///
    /// Every invocation creates a new instance, wrapped according to the
    /// builder's [`TypeStorage`].
    pub fn constructor<A: Args>(self, func: impl Fn(A) -> T + Send + Sync + 'static) -> Self {
        self.try_constructor(move |args: A| Ok::<T, Infallible>(func(args)))
    }

    /// Adds a constructor that may fail.
    pub fn try_constructor<A, E>(
        self,
        func: impl Fn(A) -> Result<T, E> + Send + Sync + 'static,
    ) -> Self
    where
        A: Args,
        E: Into<TargetError>,
    {
        let storage = self.meta.storage();
        let info = MemberInfo::constructor(Self::declaring(), A::parameters());
        let invoke = Box::new(
            move |_: Option<&Value>, args: &[Option<Value>]| -> Result<Option<Value>, TargetError> {
                let args = A::from_args(args)?;
                let instance = func(args).map_err(raised)?;
                Ok(Some(match storage {
                    TypeStorage::Object => Obj::new(instance).into_value(),
                    TypeStorage::Value => Value::new(instance),
                }))
            },
        );
        self.callable(info, invoke)
    }

    // -------------------------------------------------------------------------
    // Indexers

    fn keyed<K, F>(get: impl Fn(&T, K) -> Option<F> + Send + Sync + 'static) -> TypeTraitKeyed
    where
        K: FromIndexKey,
        F: IntoValue,
    {
        TypeTraitKeyed::new(
            ParameterInfo::of::<F>(),
            Arc::new(
                move |container: &Value,
                      key: &IndexKey<'_>|
                      -> Result<Option<Option<Value>>, TargetError> {
                    let Some(key) = K::from_index_key(key) else {
                        return Ok(None);
                    };
                    let found = with_ref(Some(container), |this: &T| get(this, key))?;
                    Ok(found.map(IntoValue::into_value))
                },
            ),
        )
    }

    /// Adds a get-only indexer, used by `[key]` path segments.
    ///
    /// `get` returns `None` when no element matches the key.
    pub fn readonly_indexer<K, F>(
        self,
        get: impl Fn(&T, K) -> Option<F> + Send + Sync + 'static,
    ) -> Self
    where
        K: FromIndexKey,
        F: IntoValue,
    {
        self.with_trait(Self::keyed(get))
    }

    /// Adds an indexer, used by `[key]` path segments.
    ///
    /// `set` returns `false` when no element matches the key.
    pub fn indexer<K, F>(
        self,
        get: impl Fn(&T, K) -> Option<F> + Send + Sync + 'static,
        set: impl Fn(&mut T, K, F) -> bool + Send + Sync + 'static,
    ) -> Self
    where
        K: FromIndexKey,
        F: IntoValue + FromValue,
    {
        let keyed = Self::keyed(get).with_set(Arc::new(
            move |container: &Value,
                  key: &IndexKey<'_>,
                  value: Option<Value>|
                  -> Result<bool, TargetError> {
                let Some(key) = K::from_index_key(key) else {
                    return Ok(false);
                };
                let value = extract::<F>(value)?;
                with_mut(Some(container), |this: &mut T| set(this, key, value))
            },
        ));
        self.with_trait(keyed)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use super::*;
    use crate::info::MemberKind;

    struct Counter {
        hits: u32,
        label: Option<String>,
    }

    fn counter() -> TypeMeta {
        TypeBuilder::<Counter>::object()
            .field("Hits", |c| c.hits, |c, v| c.hits = v)
            .field("Label", |c| c.label.clone(), |c, v| c.label = v)
            .method_mut("Bump", |c, (): ()| c.hits += 1)
            .property_get("Secret", |c| c.hits * 2)
            .private()
            .constructor(|(): ()| Counter { hits: 0, label: None })
            .build()
    }

    #[test]
    fn members_in_declaration_order() {
        let meta = counter();
        let names: Vec<_> = meta.members().iter().map(|m| m.name()).collect();
        assert_eq!(names, ["Hits", "Label", "Bump", "Secret", ".ctor"]);
        assert!(!meta.members()[3].is_public());
        assert!(meta.members()[1].is_nullable());
        assert!(!meta.members()[0].is_nullable());
        assert_eq!(meta.members()[4].kind(), MemberKind::Constructor);
    }

    #[test]
    fn primitives_read_and_write_objects() {
        let meta = counter();
        let obj = Obj::new(Counter { hits: 3, label: None });
        let value = obj.to_value();

        let hits = &meta.members()[0];
        let read = hits.get_value(Some(&value)).unwrap().unwrap();
        assert_eq!(read.downcast_ref::<u32>(), Some(&3));

        hits.set_value(Some(&value), Some(Value::from(9_u32))).unwrap();
        assert_eq!(obj.read().hits, 9);

        meta.members()[2].invoke(Some(&value), &[]).unwrap();
        assert_eq!(obj.read().hits, 10);

        meta.members()[1].set_value(Some(&value), None).unwrap();
        assert_eq!(obj.read().label, None);
    }

    #[test]
    fn glue_rejects_mismatches() {
        let meta = counter();
        let value = Obj::new(Counter { hits: 0, label: None }).into_value();
        let hits = &meta.members()[0];

        assert!(hits.set_value(Some(&value), None).is_err());
        assert!(hits.set_value(Some(&value), Some(Value::from(1_i64))).is_err());
        assert!(hits.get_value(Some(&Value::from(1_u32))).is_err());
        assert!(meta.members()[2].invoke(Some(&value), &[Some(Value::from(1))]).is_err());
    }

    #[test]
    fn constructors_follow_storage() {
        let meta = counter();
        let created = meta.members()[4].invoke(None, &[]).unwrap().unwrap();
        assert!(created.is_object::<Counter>());

        let plain = TypeBuilder::<u8>::value()
            .constructor(|(v,): (u8,)| v)
            .build();
        let created = plain.members()[0]
            .invoke(None, &[Some(Value::from(4_u8))])
            .unwrap()
            .unwrap();
        assert_eq!(created.downcast_ref::<u8>(), Some(&4));
    }

    #[test]
    fn plain_values_are_immutable() {
        #[derive(Clone)]
        struct Point {
            x: i32,
        }
        let meta = TypeBuilder::<Point>::value()
            .field("X", |p| p.x, |p, v| p.x = v)
            .build();
        let value = Value::new(Point { x: 1 });
        let x = &meta.members()[0];
        assert!(x.get_value(Some(&value)).is_ok());
        assert!(x.set_value(Some(&value), Some(Value::from(2))).is_err());
    }

    #[test]
    fn indexers() {
        struct Grid {
            cells: vec::Vec<i32>,
        }
        let meta = TypeBuilder::<Grid>::object()
            .indexer(
                |g: &Grid, i: usize| g.cells.get(i).copied(),
                |g: &mut Grid, i: usize, v: i32| match g.cells.get_mut(i) {
                    Some(slot) => {
                        *slot = v;
                        true
                    }
                    None => false,
                },
            )
            .build();
        let keyed = meta.get_trait::<TypeTraitKeyed>().unwrap();
        let grid = Obj::new(Grid { cells: vec![1, 2] }).into_value();

        let found = keyed.get(&grid, &IndexKey::new("1")).unwrap();
        assert_eq!(found.flatten().and_then(|v| v.downcast_ref::<i32>().copied()), Some(2));
        assert!(keyed.get(&grid, &IndexKey::new("7")).unwrap().is_none());
        assert!(keyed.get(&grid, &IndexKey::new("x")).unwrap().is_none());

        assert!(keyed.set(&grid, &IndexKey::new("0"), Some(Value::from(5))).unwrap());
        assert!(!keyed.set(&grid, &IndexKey::new("9"), Some(Value::from(5))).unwrap());
        assert_eq!(grid.with_ref(|g: &Grid| g.cells[0]), Some(5));
    }
}
