//! Prebuilt accessors.
//!
//! A [`Getter`] or [`Setter`] resolves a dotted path of fields and
//! properties once, against static types, and keeps the chain of member
//! primitives. Calls then run the chain directly: no parsing, no lookups.
//!
//! Paths must not contain `[key]` segments or constructors. Resolution
//! follows declared member types, so a member declared as [`Value`] ends
//! the chain.
//!
//! Type mismatches between the member and the accessor's value type are
//! bridged with a [`Coercion`] prepared at build time.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use core::marker::PhantomData;

use crate::access::{ParseError, check_value, parse_path};
use crate::convert::Coercion;
use crate::info::{BindingFlags, MemberInfo, MemberTypes, Type};
use crate::registry::{TypeCatalog, TypeTraitEnum};
use crate::{FromValue, IntoValue, Obj, ReflectError, Value};

// -----------------------------------------------------------------------------
// AccessorRoot

/// A root object of a prebuilt accessor.
pub trait AccessorRoot: 'static {
    /// The static type of the root, if it has one.
    fn root_type() -> Option<Type>;

    /// Returns the root as a dynamic value.
    fn root_value(&self) -> Option<Value>;
}

impl<T: Any + Send + Sync> AccessorRoot for Obj<T> {
    #[inline]
    fn root_type() -> Option<Type> {
        Some(Type::of::<T>())
    }

    #[inline]
    fn root_value(&self) -> Option<Value> {
        Some(self.to_value())
    }
}

impl AccessorRoot for Value {
    #[inline]
    fn root_type() -> Option<Type> {
        None
    }

    #[inline]
    fn root_value(&self) -> Option<Value> {
        Some(self.clone())
    }
}

impl<R: AccessorRoot> AccessorRoot for Option<R> {
    #[inline]
    fn root_type() -> Option<Type> {
        R::root_type()
    }

    #[inline]
    fn root_value(&self) -> Option<Value> {
        self.as_ref().and_then(R::root_value)
    }
}

// -----------------------------------------------------------------------------
// Chain

#[derive(Clone, Debug)]
struct Conversion {
    coercion: Coercion,
    source_enum: Option<TypeTraitEnum>,
}

impl Conversion {
    fn between<C: TypeCatalog + ?Sized>(catalog: &C, from: Type, to: Type) -> Option<Self> {
        let coercion = Coercion::new(catalog, to);
        if coercion.is_identity(from) {
            return None;
        }
        let source_enum = catalog
            .type_meta(from)
            .and_then(|meta| meta.get_trait::<TypeTraitEnum>())
            .copied();
        Some(Self {
            coercion,
            source_enum,
        })
    }

    #[inline]
    fn apply(&self, value: Option<Value>) -> Result<Option<Value>, ReflectError> {
        self.coercion.apply(value, self.source_enum.as_ref())
    }
}

/// Resolves every segment of `path` to its first field or property.
///
/// Intermediate members must be readable; `terminal` checks the last one.
fn resolve<C: TypeCatalog + ?Sized>(
    catalog: &C,
    binding: BindingFlags,
    path: &str,
    root: Type,
    terminal: impl Fn(&MemberInfo) -> bool,
) -> Option<Vec<Arc<MemberInfo>>> {
    let segments = parse_path(path)
        .inspect_err(|e: &ParseError<'_>| log::debug!("{e}"))
        .ok()?;
    let last = segments.len() - 1;

    let mut ty = root;
    let mut members = Vec::with_capacity(segments.len());
    for (i, segment) in segments.iter().enumerate() {
        if segment.index.is_some() || segment.name.is_empty() {
            log::debug!("`{segment}` in `{path}` cannot be compiled: indexes are not supported");
            return None;
        }
        let Some(member) = catalog
            .find_members(ty, segment.name, MemberTypes::PROPERTY_OR_FIELD, binding)
            .into_iter()
            .next()
        else {
            log::debug!("`{ty}` has no field or property `{}`", segment.name);
            return None;
        };
        let usable = if i == last {
            terminal(&member)
        } else {
            member.can_read()
        };
        if !usable {
            log::debug!("`{ty}::{}` cannot be used by an accessor of `{path}`", segment.name);
            return None;
        }
        ty = member.member_type();
        members.push(member);
    }
    Some(members)
}

/// Runs a chain of reads from `root`.
fn read_chain(
    path: &str,
    root: Option<Value>,
    members: &[Arc<MemberInfo>],
) -> Result<Option<Value>, ReflectError> {
    let mut current = root;
    for (i, member) in members.iter().enumerate() {
        if !member.is_static() && current.is_none() {
            return Err(null_reference(path, members, i));
        }
        current = member.get_value(current.as_ref())?;
    }
    Ok(current)
}

#[cold]
fn null_reference(path: &str, members: &[Arc<MemberInfo>], at: usize) -> ReflectError {
    let mut member = String::new();
    for (i, m) in members.iter().take(at + 1).enumerate() {
        if i > 0 {
            member.push('.');
        }
        member.push_str(m.name());
    }
    log::debug!("null reference at `{member}` in `{path}`");
    ReflectError::NullReference { member }
}

fn resolve_root<TObject: AccessorRoot>(path: &str, container_type: Option<Type>) -> Option<Type> {
    let root = container_type.or_else(TObject::root_type);
    if root.is_none() {
        log::debug!("the root type of `{path}` is unknown; pass a container type");
    }
    root
}

// -----------------------------------------------------------------------------
// Getter

/// A prebuilt reader of a member path.
///
/// Created by [`Reflector::create_getter`](crate::access::Reflector::create_getter).
///
/// # Examples
///
/// ```
/// use rf_reflect::{Obj, access::Reflector, derive::Reflect};
/// use rf_reflect::registry::TypeRegistry;
///
/// #[derive(Reflect)]
/// struct Engine {
///     power: u32,
/// }
///
/// #[derive(Reflect)]
/// struct Car {
///     engine: Obj<Engine>,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Car>();
/// let reflector = Reflector::new(&registry);
///
/// let power = reflector.create_getter::<Obj<Car>, u64>("engine.power", None).unwrap();
/// let car = Obj::new(Car { engine: Obj::new(Engine { power: 90 }) });
/// assert_eq!(power.get(&car).unwrap(), 90);
///
/// car.read().engine.write().power = 120;
/// assert_eq!(power.get(&car).unwrap(), 120);
/// ```
pub struct Getter<TObject, TReturn> {
    path: String,
    members: Box<[Arc<MemberInfo>]>,
    conversion: Option<Conversion>,
    _marker: PhantomData<fn(&TObject) -> TReturn>,
}

impl<TObject: AccessorRoot, TReturn: FromValue> Getter<TObject, TReturn> {
    /// Builds a getter; see [`Reflector::create_getter`](crate::access::Reflector::create_getter).
    ///
    /// Returns `None` if the path is empty or malformed, contains an
    /// index, names a member that is missing or unreadable, or the root
    /// type is unknown.
    pub fn new<C: TypeCatalog + ?Sized>(
        catalog: &C,
        binding: BindingFlags,
        path: &str,
        container_type: Option<Type>,
    ) -> Option<Self> {
        let root = resolve_root::<TObject>(path, container_type)?;
        let members = resolve(catalog, binding, path, root, MemberInfo::can_read)?;
        let declared = members.last()?.member_type();
        Some(Self {
            path: path.into(),
            members: members.into_boxed_slice(),
            conversion: Conversion::between(catalog, declared, TReturn::static_type()),
            _marker: PhantomData,
        })
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Reads the member.
    ///
    /// A null before the end of the path, or a null result when `TReturn`
    /// is not nullable, is a [`ReflectError::NullReference`].
    pub fn get(&self, object: &TObject) -> Result<TReturn, ReflectError> {
        let value = read_chain(&self.path, object.root_value(), &self.members)?;
        let value = match &self.conversion {
            Some(conversion) => conversion.apply(value)?,
            None => value,
        };
        match TReturn::from_nullable(value.as_ref()) {
            Some(result) => Ok(result),
            None => Err(match value {
                None => ReflectError::NullReference {
                    member: self.path.clone(),
                },
                Some(value) => ReflectError::Conversion {
                    from: value.ty(),
                    to: TReturn::static_type(),
                    source: None,
                },
            }),
        }
    }
}

impl<TObject, TReturn> Clone for Getter<TObject, TReturn> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            members: self.members.clone(),
            conversion: self.conversion.clone(),
            _marker: PhantomData,
        }
    }
}

impl<TObject, TReturn> fmt::Debug for Getter<TObject, TReturn> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Getter")
            .field("path", &self.path)
            .field("converts", &self.conversion.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Setter

/// A prebuilt writer of a member path.
///
/// Created by [`Reflector::create_setter`](crate::access::Reflector::create_setter).
/// Intermediate members are read; the last one is written. Values of
/// another type are coerced into the member's declared type.
///
/// # Examples
///
/// ```
/// use rf_reflect::{Obj, access::Reflector, derive::Reflect};
/// use rf_reflect::registry::TypeRegistry;
///
/// #[derive(Reflect)]
/// struct Engine {
///     power: u32,
/// }
///
/// #[derive(Reflect)]
/// struct Car {
///     engine: Obj<Engine>,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Car>();
/// let reflector = Reflector::new(&registry);
///
/// let set_power = reflector.create_setter::<Obj<Car>, String>("engine.power", None).unwrap();
/// let car = Obj::new(Car { engine: Obj::new(Engine { power: 90 }) });
/// set_power.set(&car, "150".to_string()).unwrap();
/// assert_eq!(car.read().engine.read().power, 150);
///
/// assert!(set_power.set(&car, "fast".to_string()).is_err());
/// ```
pub struct Setter<TObject, TValue> {
    path: String,
    chain: Box<[Arc<MemberInfo>]>,
    target: Arc<MemberInfo>,
    conversion: Option<Conversion>,
    _marker: PhantomData<fn(&TObject, TValue)>,
}

impl<TObject: AccessorRoot, TValue: IntoValue> Setter<TObject, TValue> {
    /// Builds a setter; see [`Reflector::create_setter`](crate::access::Reflector::create_setter).
    ///
    /// Returns `None` under the same conditions as [`Getter::new`], or if
    /// the last member cannot be written.
    pub fn new<C: TypeCatalog + ?Sized>(
        catalog: &C,
        binding: BindingFlags,
        path: &str,
        container_type: Option<Type>,
    ) -> Option<Self> {
        let root = resolve_root::<TObject>(path, container_type)?;
        let mut chain = resolve(catalog, binding, path, root, MemberInfo::can_write)?;
        let target = chain.pop()?;
        Some(Self {
            path: path.into(),
            chain: chain.into_boxed_slice(),
            conversion: Conversion::between(catalog, TValue::static_type(), target.member_type()),
            target,
            _marker: PhantomData,
        })
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Writes the member.
    ///
    /// A null container of an instance member is a
    /// [`ReflectError::NullReference`].
    pub fn set(&self, object: &TObject, value: TValue) -> Result<(), ReflectError> {
        let container = read_chain(&self.path, object.root_value(), &self.chain)?;
        if !self.target.is_static() && container.is_none() {
            let mut members = self.chain.to_vec();
            members.push(Arc::clone(&self.target));
            return Err(null_reference(&self.path, &members, members.len() - 1));
        }
        let value = value.into_value();
        let value = match &self.conversion {
            Some(conversion) => conversion.apply(value)?,
            None => value,
        };
        check_value(&self.target, &value)?;
        self.target.set_value(container.as_ref(), value)
    }
}

impl<TObject, TValue> Clone for Setter<TObject, TValue> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            chain: self.chain.clone(),
            target: Arc::clone(&self.target),
            conversion: self.conversion.clone(),
            _marker: PhantomData,
        }
    }
}

impl<TObject, TValue> fmt::Debug for Setter<TObject, TValue> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setter")
            .field("path", &self.path)
            .field("converts", &self.conversion.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::access::Reflector;
    use crate::registry::{TypeBuilder, TypeMeta, TypeRegistry};

    struct Inner {
        level: i32,
        note: Option<String>,
    }

    struct Outer {
        inner: Option<Obj<Inner>>,
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        let inner: TypeMeta = TypeBuilder::<Inner>::object()
            .field("Level", |i| i.level, |i, v| i.level = v)
            .field("Note", |i| i.note.clone(), |i, v| i.note = v)
            .property_get("Double", |i| i.level * 2)
            .build();
        let outer: TypeMeta = TypeBuilder::<Outer>::object()
            .field("Inner", |o| o.inner.clone(), |o, v| o.inner = v)
            .build();
        registry.insert_type_meta(inner);
        registry.insert_type_meta(outer);
        registry
    }

    fn outer(level: i32) -> Obj<Outer> {
        Obj::new(Outer {
            inner: Some(Obj::new(Inner { level, note: None })),
        })
    }

    #[test]
    fn getter_reads_chain() {
        let registry = registry();
        let reflector = Reflector::new(&registry);
        let getter = reflector
            .create_getter::<Obj<Outer>, i32>("Inner.Level", None)
            .unwrap();
        assert_eq!(getter.path(), "Inner.Level");
        assert_eq!(getter.get(&outer(7)).unwrap(), 7);

        let widened = reflector
            .create_getter::<Obj<Outer>, i64>("Inner.Double", None)
            .unwrap();
        assert_eq!(widened.get(&outer(7)).unwrap(), 14);

        let text = reflector
            .create_getter::<Obj<Outer>, String>("Inner.Level", None)
            .unwrap();
        assert_eq!(text.get(&outer(3)).unwrap(), "3");
    }

    #[test]
    fn getter_nulls() {
        let registry = registry();
        let reflector = Reflector::new(&registry);
        let empty = Obj::new(Outer { inner: None });

        let level = reflector
            .create_getter::<Obj<Outer>, i32>("Inner.Level", None)
            .unwrap();
        match level.get(&empty) {
            Err(ReflectError::NullReference { member }) => assert_eq!(member, "Inner.Level"),
            other => panic!("unexpected result: {other:?}"),
        }

        let note = reflector
            .create_getter::<Obj<Outer>, Option<String>>("Inner.Note", None)
            .unwrap();
        assert_eq!(note.get(&outer(1)).unwrap(), None);
        let strict = reflector
            .create_getter::<Obj<Outer>, String>("Inner.Note", None)
            .unwrap();
        assert!(matches!(strict.get(&outer(1)), Err(ReflectError::NullReference { .. })));
    }

    #[test]
    fn build_failures() {
        let registry = registry();
        let reflector = Reflector::new(&registry);
        assert!(reflector.create_getter::<Obj<Outer>, i32>("", None).is_none());
        assert!(reflector.create_getter::<Obj<Outer>, i32>("Inner.Missing", None).is_none());
        assert!(reflector.create_getter::<Obj<Outer>, i32>("Inner[0]", None).is_none());
        assert!(reflector.create_getter::<Value, i32>("Inner.Level", None).is_none());
        assert!(reflector.create_setter::<Obj<Outer>, i32>("Inner.Double", None).is_none());

        let dynamic = reflector
            .create_getter::<Value, i32>("Inner.Level", Some(Type::of::<Outer>()))
            .unwrap();
        assert_eq!(dynamic.get(&outer(5).to_value()).unwrap(), 5);
    }

    #[test]
    fn setter_writes_chain() {
        let registry = registry();
        let reflector = Reflector::new(&registry);
        let root = outer(1);

        let level = reflector
            .create_setter::<Obj<Outer>, i32>("Inner.Level", None)
            .unwrap();
        level.set(&root, 4).unwrap();
        assert_eq!(root.read().inner.as_ref().map(|i| i.read().level), Some(4));

        let coerced = reflector
            .create_setter::<Obj<Outer>, String>("Inner.Level", None)
            .unwrap();
        coerced.set(&root, "12".to_string()).unwrap();
        assert_eq!(root.read().inner.as_ref().map(|i| i.read().level), Some(12));
        assert!(matches!(
            coerced.set(&root, "x".to_string()),
            Err(ReflectError::Conversion { .. })
        ));

        let note = reflector
            .create_setter::<Obj<Outer>, Option<String>>("Inner.Note", None)
            .unwrap();
        note.set(&root, Some("hi".to_string())).unwrap();
        note.set(&root, None).unwrap();

        let inner = reflector
            .create_setter::<Obj<Outer>, Option<Obj<Inner>>>("Inner", None)
            .unwrap();
        inner.set(&root, None).unwrap();
        assert!(matches!(level.set(&root, 1), Err(ReflectError::NullReference { .. })));
    }
}
