use alloc::borrow::Cow;
use alloc::boxed::Box;
use core::fmt;

use crate::error::{ReflectError, TargetError};
use crate::info::{BindingFlags, MemberTypes, Type, Typed};
use crate::value::{Value, is_assignable};

/// The reserved name of constructors.
///
/// The path segment `ctor` is normalized to this name.
pub const CONSTRUCTOR_NAME: &str = ".ctor";

/// Reads a member. The container is `None` for static members.
pub type ReadFn = dyn Fn(Option<&Value>) -> Result<Option<Value>, TargetError> + Send + Sync;

/// Writes a member. The container is `None` for static members.
pub type WriteFn = dyn Fn(Option<&Value>, Option<Value>) -> Result<(), TargetError> + Send + Sync;

/// Calls a method or constructor. The container is `None` for static
/// methods and constructors.
pub type InvokeFn =
    dyn Fn(Option<&Value>, &[Option<Value>]) -> Result<Option<Value>, TargetError> + Send + Sync;

/// The category of a member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Property,
    Method,
    Constructor,
}

/// A declared parameter of a method or constructor, or the element of a
/// collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParameterInfo {
    ty: Type,
    nullable: bool,
    object: bool,
}

impl ParameterInfo {
    /// Declares a plain value parameter.
    #[inline]
    pub const fn new(ty: Type, nullable: bool) -> Self {
        Self {
            ty,
            nullable,
            object: false,
        }
    }

    /// Declares a parameter of type `T`.
    #[inline]
    pub fn of<T: Typed>() -> Self {
        Self {
            ty: T::static_type(),
            nullable: T::NULLABLE,
            object: T::OBJECT,
        }
    }

    #[inline]
    pub const fn with_object(mut self, object: bool) -> Self {
        self.object = object;
        self
    }

    #[inline(always)]
    pub const fn ty(&self) -> Type {
        self.ty
    }

    /// Whether a null argument is admitted.
    #[inline(always)]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Whether arguments are shared objects.
    #[inline(always)]
    pub const fn is_object(&self) -> bool {
        self.object
    }

    /// Check if `value` can be passed for this parameter.
    #[inline]
    pub fn admits(&self, value: Option<&Value>) -> bool {
        is_assignable(self.ty, self.nullable, self.object, value)
    }
}

/// A member of a catalogued type.
///
/// Besides the descriptive data, a `MemberInfo` owns the primitives the
/// access engine calls: read, write and invoke. Members are usually built
/// with [`TypeBuilder`](crate::registry::TypeBuilder), which generates these
/// primitives from plain Rust closures.
pub struct MemberInfo {
    name: Cow<'static, str>,
    kind: MemberKind,
    declaring_type: Type,
    member_type: Type,
    nullable: bool,
    object: bool,
    parameters: Box<[ParameterInfo]>,
    is_static: bool,
    is_public: bool,
    read: Option<Box<ReadFn>>,
    write: Option<Box<WriteFn>>,
    invoke: Option<Box<InvokeFn>>,
}

impl MemberInfo {
    fn new(
        name: impl Into<Cow<'static, str>>,
        kind: MemberKind,
        declaring_type: Type,
        member_type: Type,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            declaring_type,
            member_type,
            nullable: false,
            object: false,
            parameters: Box::new([]),
            is_static: false,
            is_public: true,
            read: None,
            write: None,
            invoke: None,
        }
    }

    /// Creates a field without access primitives.
    pub fn field(
        name: impl Into<Cow<'static, str>>,
        declaring_type: Type,
        member_type: Type,
    ) -> Self {
        Self::new(name, MemberKind::Field, declaring_type, member_type)
    }

    /// Creates a property without access primitives.
    pub fn property(
        name: impl Into<Cow<'static, str>>,
        declaring_type: Type,
        member_type: Type,
    ) -> Self {
        Self::new(name, MemberKind::Property, declaring_type, member_type)
    }

    /// Creates a method without an invoke primitive.
    ///
    /// `return_type` is `()` for methods without a result.
    pub fn method(
        name: impl Into<Cow<'static, str>>,
        declaring_type: Type,
        return_type: Type,
        parameters: impl Into<Box<[ParameterInfo]>>,
    ) -> Self {
        let mut info = Self::new(name, MemberKind::Method, declaring_type, return_type);
        info.parameters = parameters.into();
        info
    }

    /// Creates a constructor of `declaring_type` without an invoke primitive.
    pub fn constructor(declaring_type: Type, parameters: impl Into<Box<[ParameterInfo]>>) -> Self {
        let mut info = Self::new(
            CONSTRUCTOR_NAME,
            MemberKind::Constructor,
            declaring_type,
            declaring_type,
        );
        info.parameters = parameters.into();
        info
    }

    #[inline]
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    #[inline]
    pub fn with_public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    #[inline]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    #[inline]
    pub fn with_object(mut self, object: bool) -> Self {
        self.object = object;
        self
    }

    #[inline]
    pub fn with_read(mut self, read: Box<ReadFn>) -> Self {
        self.read = Some(read);
        self
    }

    #[inline]
    pub fn with_write(mut self, write: Box<WriteFn>) -> Self {
        self.write = Some(write);
        self
    }

    #[inline]
    pub fn with_invoke(mut self, invoke: Box<InvokeFn>) -> Self {
        self.invoke = Some(invoke);
        self
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub const fn kind(&self) -> MemberKind {
        self.kind
    }

    /// The type that declares this member.
    #[inline(always)]
    pub const fn declaring_type(&self) -> Type {
        self.declaring_type
    }

    /// The declared type of a field or property, the return type of a
    /// method, or the created type of a constructor.
    #[inline(always)]
    pub const fn member_type(&self) -> Type {
        self.member_type
    }

    /// Whether the declared type admits null.
    #[inline(always)]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Whether the declared type is a shared object ([`Obj<T>`](crate::Obj)).
    #[inline(always)]
    pub const fn is_object(&self) -> bool {
        self.object
    }

    /// Check if `value` can be assigned to this field or property.
    #[inline]
    pub fn admits(&self, value: Option<&Value>) -> bool {
        is_assignable(self.member_type, self.nullable, self.object, value)
    }

    #[inline(always)]
    pub fn parameters(&self) -> &[ParameterInfo] {
        &self.parameters
    }

    /// Returns an iterator over the declared parameter types.
    #[inline]
    pub fn parameter_types(&self) -> impl ExactSizeIterator<Item = Type> + '_ {
        self.parameters.iter().map(ParameterInfo::ty)
    }

    #[inline(always)]
    pub const fn is_static(&self) -> bool {
        self.is_static
    }

    #[inline(always)]
    pub const fn is_public(&self) -> bool {
        self.is_public
    }

    #[inline(always)]
    pub const fn can_read(&self) -> bool {
        self.read.is_some()
    }

    #[inline(always)]
    pub const fn can_write(&self) -> bool {
        self.write.is_some()
    }

    #[inline(always)]
    pub const fn is_invocable(&self) -> bool {
        self.invoke.is_some()
    }

    /// Check if the member belongs to one of the categories in `kinds`.
    #[inline]
    pub fn is_any_of(&self, kinds: MemberTypes) -> bool {
        kinds.contains(self.kind.into())
    }

    /// Check if the member is found by a lookup of `name` under `binding`.
    #[inline]
    pub fn matches(&self, name: &str, kinds: MemberTypes, binding: BindingFlags) -> bool {
        self.is_any_of(kinds)
            && binding.admits(self.is_static, self.is_public)
            && binding.name_matches(&self.name, name)
    }

    /// Check a declared parameter list against a requested one.
    ///
    /// `None` matches any signature. Otherwise the arity and every type
    /// must be exactly equal.
    pub fn parameters_match(&self, requested: Option<&[Type]>) -> bool {
        match requested {
            None => true,
            Some(types) => {
                types.len() == self.parameters.len() && self.parameter_types().eq(types.iter().copied())
            }
        }
    }

    /// Reads the member. `container` is ignored for static members.
    pub fn get_value(&self, container: Option<&Value>) -> Result<Option<Value>, ReflectError> {
        let Some(read) = &self.read else {
            return Err(self.unsupported("reading"));
        };
        read(self.receiver(container)).map_err(|e| self.raised(e))
    }

    /// Writes the member. `container` is ignored for static members.
    pub fn set_value(
        &self,
        container: Option<&Value>,
        value: Option<Value>,
    ) -> Result<(), ReflectError> {
        let Some(write) = &self.write else {
            return Err(self.unsupported("writing"));
        };
        write(self.receiver(container), value).map_err(|e| self.raised(e))
    }

    /// Calls the method or constructor.
    ///
    /// `container` is ignored for static methods and constructors.
    pub fn invoke(
        &self,
        container: Option<&Value>,
        args: &[Option<Value>],
    ) -> Result<Option<Value>, ReflectError> {
        let Some(invoke) = &self.invoke else {
            return Err(self.unsupported("invocation"));
        };
        invoke(self.receiver(container), args).map_err(|e| self.raised(e))
    }

    #[inline]
    fn receiver<'a>(&self, container: Option<&'a Value>) -> Option<&'a Value> {
        if self.is_static || self.kind == MemberKind::Constructor {
            None
        } else {
            container
        }
    }

    #[cold]
    fn raised(&self, source: TargetError) -> ReflectError {
        ReflectError::target(self.declaring_type, &self.name, source)
    }

    #[cold]
    fn unsupported(&self, operation: &'static str) -> ReflectError {
        ReflectError::Unsupported {
            ty: self.declaring_type,
            member: self.name.clone().into_owned(),
            operation,
        }
    }
}

impl fmt::Debug for MemberInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberInfo")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("declaring_type", &self.declaring_type)
            .field("member_type", &self.member_type)
            .field("parameters", &self.parameters)
            .field("is_static", &self.is_static)
            .field("is_public", &self.is_public)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec;

    use super::*;

    fn sample() -> MemberInfo {
        MemberInfo::method(
            "Add",
            Type::of::<u8>(),
            Type::of::<i32>(),
            vec![
                ParameterInfo::new(Type::of::<i32>(), false),
                ParameterInfo::new(Type::of::<i32>(), false),
            ],
        )
    }

    #[test]
    fn parameter_matching() {
        let info = sample();
        let int = Type::of::<i32>();
        assert!(info.parameters_match(None));
        assert!(info.parameters_match(Some(&[int, int])));
        assert!(!info.parameters_match(Some(&[int])));
        assert!(!info.parameters_match(Some(&[int, Type::of::<i64>()])));
        assert!(!info.parameters_match(Some(&[])));
    }

    #[test]
    fn missing_primitives_are_reported() {
        let info = sample();
        assert!(!info.is_invocable());
        let err = info.invoke(None, &[]).unwrap_err();
        assert!(matches!(err, ReflectError::Unsupported { operation: "invocation", .. }));
    }

    #[test]
    fn target_errors_are_wrapped() {
        let info = MemberInfo::property("Broken", Type::of::<u8>(), Type::of::<i32>())
            .with_read(Box::new(|_| Err("boom".into())));
        let err = info.get_value(None).unwrap_err();
        match err {
            ReflectError::Target { member, source, .. } => {
                assert_eq!(member, "Broken");
                assert_eq!(alloc::format!("{source}"), "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn declared_storage() {
        let items = ParameterInfo::of::<Option<crate::Obj<i32>>>();
        assert!(items.is_nullable() && items.is_object());
        assert!(items.admits(None));
        assert!(items.admits(Some(&crate::Obj::new(1).into_value())));
        assert!(!items.admits(Some(&Value::from(1))));

        let field = MemberInfo::field("Count", Type::of::<u8>(), Type::of::<i32>());
        assert!(field.admits(Some(&Value::from(1))));
        assert!(!field.with_object(true).admits(Some(&Value::from(1))));
    }

    #[test]
    fn lookup_matching() {
        let info = sample().with_static(true).with_public(false);
        assert!(!info.matches("Add", MemberTypes::ALL, BindingFlags::DEFAULT));
        let binding = BindingFlags::STATIC | BindingFlags::NON_PUBLIC | BindingFlags::IGNORE_CASE;
        assert!(info.matches("add", MemberTypes::METHOD, binding));
        assert!(!info.matches("add", MemberTypes::PROPERTY_OR_FIELD, binding));
    }
}
