use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::access::{CollectionKind, IndexKey, ParseError, Segment, parse_path};
use crate::compiled::{AccessorRoot, Getter, Setter};
use crate::convert::coerce;
use crate::info::{BindingFlags, MemberInfo, MemberKind, MemberTypes, Type};
use crate::registry::{TypeCatalog, TypeRegistry, TypeStorage};
use crate::{FromValue, IntoValue, ReflectError, Value};

// -----------------------------------------------------------------------------
// Lookup

/// The outcome of a read or a call through a member path.
///
/// Null is a successful outcome: the path resolved and the terminal value
/// is absent. `Unresolved` covers every "not found" condition and values
/// that are not assignable to the requested type.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Value(T),
    Null,
    Unresolved,
}

impl<T> Lookup<T> {
    /// Check if the path resolved, to a value or to null.
    #[inline]
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the value, if there is one.
    #[inline]
    pub fn value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Null | Self::Unresolved => None,
        }
    }

    #[inline]
    pub fn as_ref(&self) -> Lookup<&T> {
        match self {
            Self::Value(value) => Lookup::Value(value),
            Self::Null => Lookup::Null,
            Self::Unresolved => Lookup::Unresolved,
        }
    }

    #[inline]
    pub fn map<U>(self, func: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Self::Value(value) => Lookup::Value(func(value)),
            Self::Null => Lookup::Null,
            Self::Unresolved => Lookup::Unresolved,
        }
    }
}

impl<T: FromValue> Lookup<T> {
    fn of(value: Option<Value>) -> Self {
        match value {
            None => Self::Null,
            Some(value) => match T::from_value(&value) {
                Some(value) => Self::Value(value),
                None => {
                    log::debug!("`{}` is not assignable to `{}`", value.ty(), T::static_type());
                    Self::Unresolved
                }
            },
        }
    }
}

// -----------------------------------------------------------------------------
// MembersInfo

/// The terminal members of a path, with the container they were found on.
///
/// Returned by [`Reflector::get_info`]. A failed lookup yields an empty
/// `MembersInfo`. The first member can be read, written or called
/// directly, without walking the path again.
#[derive(Clone, Default)]
pub struct MembersInfo {
    /// The type the terminal segment was resolved against.
    pub container_type: Option<Type>,
    /// The container instance; `None` for a type root or a null container.
    pub container: Option<Value>,
    /// The matching members, in declaration order.
    pub members: Vec<Arc<MemberInfo>>,
}

impl MembersInfo {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The member used by [`get`](Self::get), [`set`](Self::set) and
    /// [`invoke`](Self::invoke).
    #[inline]
    pub fn first(&self) -> Option<&Arc<MemberInfo>> {
        self.members.first()
    }

    fn reachable(&self, member: &MemberInfo) -> bool {
        member.is_static() || member.kind() == MemberKind::Constructor || self.container.is_some()
    }

    /// Reads the first member if it is a readable field or property.
    pub fn get<T: FromValue>(&self) -> Result<Lookup<T>, ReflectError> {
        match self.first() {
            Some(member)
                if member.is_any_of(MemberTypes::PROPERTY_OR_FIELD)
                    && member.can_read()
                    && self.reachable(member) =>
            {
                Ok(Lookup::of(member.get_value(self.container.as_ref())?))
            }
            _ => Ok(Lookup::Unresolved),
        }
    }

    /// Writes the first member if it is a writable field or property.
    ///
    /// The value is assigned as-is; see [`Reflector::set`].
    pub fn set(&self, value: Option<Value>) -> Result<bool, ReflectError> {
        match self.first() {
            Some(member)
                if member.is_any_of(MemberTypes::PROPERTY_OR_FIELD)
                    && member.can_write()
                    && self.reachable(member) =>
            {
                check_value(member, &value)?;
                member.set_value(self.container.as_ref(), value)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Calls the first member if it is a method or constructor.
    pub fn invoke<T: FromValue>(&self, args: &[Option<Value>]) -> Result<Lookup<T>, ReflectError> {
        match self.first() {
            Some(member)
                if member.is_any_of(MemberTypes::METHOD | MemberTypes::CONSTRUCTOR)
                    && self.reachable(member) =>
            {
                check_arguments(member, args)?;
                Ok(Lookup::of(member.invoke(self.container.as_ref(), args)?))
            }
            _ => Ok(Lookup::Unresolved),
        }
    }
}

impl fmt::Debug for MembersInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MembersInfo")
            .field("container_type", &self.container_type)
            .field("container", &self.container)
            .field("members", &self.members.iter().map(|m| m.name()).collect::<Vec<_>>())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Validation

pub(crate) fn check_value(member: &MemberInfo, value: &Option<Value>) -> Result<(), ReflectError> {
    if member.admits(value.as_ref()) {
        Ok(())
    } else {
        Err(ReflectError::ValueType {
            member: member.name().into(),
            expected: member.member_type(),
            actual: value.as_ref().map(Value::ty),
        })
    }
}

fn check_arguments(member: &MemberInfo, args: &[Option<Value>]) -> Result<(), ReflectError> {
    let parameters = member.parameters();
    if parameters.len() != args.len() {
        return Err(ReflectError::ArgumentCount {
            member: member.name().into(),
            expected: parameters.len(),
            actual: args.len(),
        });
    }
    for (index, (parameter, arg)) in parameters.iter().zip(args).enumerate() {
        if !parameter.admits(arg.as_ref()) {
            return Err(ReflectError::ArgumentType {
                member: member.name().into(),
                index,
                expected: parameter.ty(),
                actual: arg.as_ref().map(Value::ty),
            });
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Container

/// The current position of a walk.
///
/// `ty` is the runtime type of `value`, or the declared type of the member
/// that produced a null, so names can still be resolved through it.
#[derive(Debug, Clone)]
struct Container {
    value: Option<Value>,
    ty: Type,
}

impl Container {
    fn root(instance: Option<&Value>, ty: Option<Type>) -> Option<Self> {
        match (instance, ty) {
            (Some(value), _) => Some(Self {
                ty: value.ty(),
                value: Some(value.clone()),
            }),
            (None, Some(ty)) => Some(Self { value: None, ty }),
            (None, None) => None,
        }
    }

    fn with(value: Option<Value>, declared: Type) -> Self {
        Self {
            ty: value.as_ref().map_or(declared, Value::ty),
            value,
        }
    }
}

// -----------------------------------------------------------------------------
// Reflector

/// Resolves member paths against a [`TypeCatalog`].
///
/// A path is a dotted list of member names, each optionally followed by a
/// `[key]`: `"Child.Items[2].Name"`. A bare `[key]` indexes the container
/// itself, and a final `ctor` names the constructors of the container type.
///
/// Every operation starts from an instance, or from a type when there is no
/// instance (static members and constructors). Intermediate segments may
/// only name fields and properties; the first matching member is used.
///
/// "Not found" is never an error. Reads and calls report it as
/// [`Lookup::Unresolved`], writes as `false`, and [`get_info`] as an empty
/// result. Errors are reserved for faults: target code that fails,
/// arguments or values of the wrong type, and failed coercions.
///
/// # Examples
///
/// ```
/// use rf_reflect::{Obj, access::{Lookup, Reflector}, derive::Reflect};
/// use rf_reflect::registry::TypeRegistry;
///
/// #[derive(Reflect)]
/// struct Child {
///     #[reflect(rename = "Items")]
///     items: Obj<Vec<String>>,
/// }
///
/// #[derive(Reflect)]
/// struct Root {
///     #[reflect(rename = "Child")]
///     child: Obj<Child>,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Root>();
///
/// let root = Obj::new(Root {
///     child: Obj::new(Child {
///         items: Obj::new(vec!["a".into(), "b".into()]),
///     }),
/// });
///
/// let reflector = Reflector::new(&registry);
/// let root = Some(root.to_value());
/// let found = reflector.get::<String>(root.as_ref(), None, "Child.Items[1]").unwrap();
/// assert_eq!(found, Lookup::Value("b".to_string()));
///
/// assert!(!reflector.set(root.as_ref(), None, "Child.Items[5]", Some("x".into())).unwrap());
/// ```
///
/// [`get_info`]: Reflector::get_info
pub struct Reflector<'c, C: ?Sized = TypeRegistry> {
    catalog: &'c C,
    binding: BindingFlags,
}

impl<C: ?Sized> Clone for Reflector<'_, C> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ?Sized> Copy for Reflector<'_, C> {}

impl<C: ?Sized> fmt::Debug for Reflector<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reflector")
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

impl<'c, C: TypeCatalog + ?Sized> Reflector<'c, C> {
    /// Creates a reflector with [`BindingFlags::DEFAULT`].
    #[inline]
    pub fn new(catalog: &'c C) -> Self {
        Self {
            catalog,
            binding: BindingFlags::DEFAULT,
        }
    }

    /// Replaces the binding rules used for member lookups.
    #[inline]
    pub fn with_binding(mut self, binding: BindingFlags) -> Self {
        self.binding = binding;
        self
    }

    #[inline(always)]
    pub fn binding(&self) -> BindingFlags {
        self.binding
    }

    #[inline(always)]
    pub fn catalog(&self) -> &'c C {
        self.catalog
    }

    // -------------------------------------------------------------------------
    // Walker

    fn parse<'p>(&self, path: &'p str) -> Option<Vec<Segment<'p>>> {
        parse_path(path)
            .inspect_err(|e: &ParseError<'_>| log::debug!("{e}"))
            .ok()
    }

    /// Parses `path` and splits off its terminal segment.
    fn start<'p>(
        &self,
        instance: Option<&Value>,
        ty: Option<Type>,
        path: &'p str,
    ) -> Option<(Container, Vec<Segment<'p>>, Segment<'p>)> {
        let Some(root) = Container::root(instance, ty) else {
            log::debug!("no instance and no type to resolve `{path}` against");
            return None;
        };
        let mut segments = self.parse(path)?;
        let terminal = segments.pop()?;
        Some((root, segments, terminal))
    }

    /// Returns the first field or property named `name`.
    fn data_member(&self, ty: Type, name: &str) -> Option<Arc<MemberInfo>> {
        let member = self
            .catalog
            .find_members(ty, name, MemberTypes::PROPERTY_OR_FIELD, self.binding)
            .into_iter()
            .next();
        if member.is_none() {
            log::debug!("`{ty}` has no field or property `{name}`");
        }
        member
    }

    /// Reads a member into a new container.
    fn read_member(&self, container: &Container, name: &str) -> Result<Option<Container>, ReflectError> {
        let Some(member) = self.data_member(container.ty, name) else {
            return Ok(None);
        };
        if !member.can_read() {
            log::debug!("`{}::{name}` cannot be read", container.ty);
            return Ok(None);
        }
        if !member.is_static() && container.value.is_none() {
            log::debug!("instance member `{}::{name}` read through null", container.ty);
            return Ok(None);
        }
        let value = member.get_value(container.value.as_ref())?;
        Ok(Some(Container::with(value, member.member_type())))
    }

    /// Reads an element into a new container.
    ///
    /// A null element is only a valid result at the end of the path.
    fn read_element(
        &self,
        container: &Container,
        key: &IndexKey<'_>,
        terminal: bool,
    ) -> Result<Option<Container>, ReflectError> {
        let Some(collection) = &container.value else {
            log::debug!("index {key} applied to null");
            return Ok(None);
        };
        let kind = CollectionKind::of(self.catalog.type_meta(collection.ty()));
        let (Some(item), Some(element)) = (kind.item(), kind.get_element(collection, key)?) else {
            log::debug!("`{}` has no element {key}", collection.ty());
            return Ok(None);
        };
        if element.is_none() && !terminal {
            log::debug!("element {key} of `{}` is null", collection.ty());
            return Ok(None);
        }
        Ok(Some(Container::with(element, item.ty())))
    }

    /// Reads one segment: its member, then its element.
    fn read_segment(
        &self,
        container: Container,
        segment: &Segment<'_>,
        terminal: bool,
    ) -> Result<Option<Container>, ReflectError> {
        log::trace!("resolving `{segment}` on `{}`", container.ty);
        let container = if segment.name.is_empty() {
            container
        } else {
            match self.read_member(&container, segment.name)? {
                Some(next) => next,
                None => return Ok(None),
            }
        };
        match &segment.index {
            Some(key) => self.read_element(&container, key, terminal),
            None => Ok(Some(container)),
        }
    }

    /// Walks intermediate segments.
    fn walk(&self, mut container: Container, segments: &[Segment<'_>]) -> Result<Option<Container>, ReflectError> {
        for segment in segments {
            match self.read_segment(container, segment, false)? {
                Some(next) => container = next,
                None => return Ok(None),
            }
        }
        Ok(Some(container))
    }

    // -------------------------------------------------------------------------
    // Operations

    /// Returns the members the terminal segment of `path` names.
    ///
    /// Fields and properties always match. Methods and constructors match
    /// when `parameter_types` is `None`, or when their parameter types are
    /// exactly `parameter_types`.
    ///
    /// Members come back in declaration order, so the overload that
    /// [`invoke`](Self::invoke) picks is the last method in the result.
    /// The result is empty when `path` does not resolve.
    pub fn get_info(
        &self,
        instance: Option<&Value>,
        ty: Option<Type>,
        path: &str,
        parameter_types: Option<&[Type]>,
    ) -> Result<MembersInfo, ReflectError> {
        let Some((root, segments, terminal)) = self.start(instance, ty, path) else {
            return Ok(MembersInfo::default());
        };
        let Some(container) = self.walk(root, &segments)? else {
            return Ok(MembersInfo::default());
        };
        if terminal.index.is_some() {
            log::debug!("`{terminal}` does not name a member");
            return Ok(MembersInfo::default());
        }

        let members = self
            .catalog
            .find_members(container.ty, terminal.lookup_name(), MemberTypes::ALL, self.binding)
            .into_iter()
            .filter(|m| m.is_any_of(MemberTypes::PROPERTY_OR_FIELD) || m.parameters_match(parameter_types))
            .collect();

        Ok(MembersInfo {
            container_type: Some(container.ty),
            container: container.value,
            members,
        })
    }

    /// Reads the field, property or element at `path`.
    ///
    /// Returns [`Lookup::Null`] if the terminal value is null, and
    /// [`Lookup::Unresolved`] if the path does not resolve or the value is
    /// not assignable to `T`. A null met before the end of the path fails,
    /// unless the next member is static.
    pub fn get<T: FromValue>(
        &self,
        instance: Option<&Value>,
        ty: Option<Type>,
        path: &str,
    ) -> Result<Lookup<T>, ReflectError> {
        let Some((root, segments, terminal)) = self.start(instance, ty, path) else {
            return Ok(Lookup::Unresolved);
        };
        let Some(container) = self.walk(root, &segments)? else {
            return Ok(Lookup::Unresolved);
        };
        match self.read_segment(container, &terminal, true)? {
            Some(found) => Ok(Lookup::of(found.value)),
            None => Ok(Lookup::Unresolved),
        }
    }

    /// Writes `value` into the field, property or element at `path`.
    ///
    /// Returns `false` if the path does not resolve, the member is
    /// read-only, an instance member has a null container, the container
    /// is a plain value, or the element does not exist. Map keys are never
    /// inserted.
    ///
    /// The value is assigned as-is. A value of another type, or null for a
    /// non-nullable member, is a [`ReflectError::ValueType`].
    pub fn set(
        &self,
        instance: Option<&Value>,
        ty: Option<Type>,
        path: &str,
        value: Option<Value>,
    ) -> Result<bool, ReflectError> {
        self.assign(instance, ty, path, value, false)
    }

    /// Like [`set`](Self::set), but first coerces `value` into the declared
    /// type of the target (see [`coerce`]).
    ///
    /// A value that cannot be converted is a [`ReflectError::Conversion`].
    pub fn set_coerced(
        &self,
        instance: Option<&Value>,
        ty: Option<Type>,
        path: &str,
        value: Option<Value>,
    ) -> Result<bool, ReflectError> {
        self.assign(instance, ty, path, value, true)
    }

    fn prepare(&self, expected: Type, value: Option<Value>, coerced: bool) -> Result<Option<Value>, ReflectError> {
        if coerced {
            coerce(self.catalog, value, expected)
        } else {
            Ok(value)
        }
    }

    fn is_plain(&self, ty: Type) -> bool {
        self.catalog
            .type_meta(ty)
            .is_some_and(|meta| meta.storage() == TypeStorage::Value)
    }

    fn assign(
        &self,
        instance: Option<&Value>,
        ty: Option<Type>,
        path: &str,
        value: Option<Value>,
        coerced: bool,
    ) -> Result<bool, ReflectError> {
        let Some((root, segments, terminal)) = self.start(instance, ty, path) else {
            return Ok(false);
        };
        let Some(container) = self.walk(root, &segments)? else {
            return Ok(false);
        };

        let Some(key) = &terminal.index else {
            return self.assign_member(&container, terminal.name, value, coerced);
        };

        let collection = if terminal.name.is_empty() {
            container
        } else {
            match self.read_member(&container, terminal.name)? {
                Some(next) => next,
                None => return Ok(false),
            }
        };
        self.assign_element(&collection, key, value, coerced)
    }

    fn assign_member(
        &self,
        container: &Container,
        name: &str,
        value: Option<Value>,
        coerced: bool,
    ) -> Result<bool, ReflectError> {
        let Some(member) = self.data_member(container.ty, name) else {
            return Ok(false);
        };
        if !member.can_write() {
            log::debug!("`{}::{name}` is read-only", container.ty);
            return Ok(false);
        }
        if !member.is_static() {
            if container.value.is_none() {
                log::debug!("instance member `{}::{name}` written through null", container.ty);
                return Ok(false);
            }
            if self.is_plain(container.ty) {
                log::debug!("`{}` is a plain value and cannot be written in place", container.ty);
                return Ok(false);
            }
        }

        let value = self.prepare(member.member_type(), value, coerced)?;
        check_value(&member, &value)?;
        member.set_value(container.value.as_ref(), value)?;
        Ok(true)
    }

    fn assign_element(
        &self,
        container: &Container,
        key: &IndexKey<'_>,
        value: Option<Value>,
        coerced: bool,
    ) -> Result<bool, ReflectError> {
        let Some(collection) = &container.value else {
            log::debug!("index {key} applied to null");
            return Ok(false);
        };
        let kind = CollectionKind::of(self.catalog.type_meta(collection.ty()));
        let Some(item) = kind.item() else {
            log::debug!("`{}` is not indexable", collection.ty());
            return Ok(false);
        };
        if self.is_plain(collection.ty()) {
            log::debug!("`{}` is a plain value and cannot be written in place", collection.ty());
            return Ok(false);
        }

        let value = self.prepare(item.ty(), value, coerced)?;
        if !item.admits(value.as_ref()) {
            return Err(ReflectError::ValueType {
                member: alloc::format!("{key}"),
                expected: item.ty(),
                actual: value.as_ref().map(Value::ty),
            });
        }
        kind.set_element(collection, key, value)
    }

    /// Calls the method or constructor the terminal segment of `path` names.
    ///
    /// Candidates are filtered by `parameter_types` (`None` accepts any
    /// signature) and the last remaining one is called. A final `ctor`
    /// segment calls a constructor of the container type, which always
    /// creates a new instance.
    ///
    /// Arguments must match the declared parameters in count and type;
    /// a mismatch is a [`ReflectError::ArgumentCount`] or
    /// [`ReflectError::ArgumentType`].
    pub fn invoke<T: FromValue>(
        &self,
        instance: Option<&Value>,
        ty: Option<Type>,
        path: &str,
        parameter_types: Option<&[Type]>,
        args: &[Option<Value>],
    ) -> Result<Lookup<T>, ReflectError> {
        let Some((root, segments, terminal)) = self.start(instance, ty, path) else {
            return Ok(Lookup::Unresolved);
        };
        let Some(container) = self.walk(root, &segments)? else {
            return Ok(Lookup::Unresolved);
        };
        if terminal.index.is_some() {
            log::debug!("`{terminal}` does not name a method");
            return Ok(Lookup::Unresolved);
        }

        let name = terminal.lookup_name();
        let candidates = self.catalog.find_members(
            container.ty,
            name,
            MemberTypes::METHOD | MemberTypes::CONSTRUCTOR,
            self.binding,
        );
        let Some(member) = candidates
            .iter()
            .rev()
            .find(|m| m.is_invocable() && m.parameters_match(parameter_types))
        else {
            log::debug!("`{}` has no matching method `{name}`", container.ty);
            return Ok(Lookup::Unresolved);
        };

        let is_instance = !member.is_static() && member.kind() != MemberKind::Constructor;
        if is_instance && container.value.is_none() {
            log::debug!("instance method `{}::{name}` called through null", container.ty);
            return Ok(Lookup::Unresolved);
        }

        check_arguments(member, args)?;
        let result = member.invoke(container.value.as_ref(), args)?;
        Ok(Lookup::of(result))
    }

    /// Returns every catalogued type whose simple name is `name`.
    ///
    /// The simple name is the last path segment without generic
    /// arguments, e.g. `Vec` for `alloc::vec::Vec<u8>`.
    #[inline]
    pub fn get_types(&self, name: &str) -> Vec<Type> {
        self.catalog.types_named(name)
    }

    /// Builds a reusable getter for a dotted path of fields and properties.
    ///
    /// See [`Getter`]. `container_type` replaces the static type of the
    /// root, and is required when `TObject` is [`Value`].
    #[inline]
    pub fn create_getter<TObject, TReturn>(
        &self,
        path: &str,
        container_type: Option<Type>,
    ) -> Option<Getter<TObject, TReturn>>
    where
        TObject: AccessorRoot,
        TReturn: FromValue,
    {
        Getter::new(self.catalog, self.binding, path, container_type)
    }

    /// Builds a reusable setter for a dotted path of fields and properties.
    ///
    /// See [`Setter`].
    #[inline]
    pub fn create_setter<TObject, TValue>(
        &self,
        path: &str,
        container_type: Option<Type>,
    ) -> Option<Setter<TObject, TValue>>
    where
        TObject: AccessorRoot,
        TValue: IntoValue,
    {
        Setter::new(self.catalog, self.binding, path, container_type)
    }
}
