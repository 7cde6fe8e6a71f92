use core::any::{Any, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};

/// The runtime identity of a Rust type.
///
/// `Type` pairs the [`TypeId`] with the full type path reported by
/// [`core::any::type_name`]. Equality and hashing only consider the
/// `TypeId`; the path is kept for diagnostics and name lookup.
///
/// # Examples
///
/// ```
/// use rf_reflect::info::Type;
///
/// let ty = Type::of::<Vec<String>>();
/// assert_eq!(ty.ident(), "Vec");
/// assert_eq!(ty.module_path(), Some("alloc::vec"));
/// assert!(ty.is::<Vec<String>>());
/// ```
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
}

impl Type {
    /// Returns the `Type` of `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: core::any::type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`].
    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the full type path, e.g. `alloc::vec::Vec<i32>`.
    #[inline(always)]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Check if the type is `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Returns the simple name: the last path segment without generic arguments.
    ///
    /// `alloc::vec::Vec<i32>` gives `Vec`, `i32` gives `i32`.
    pub fn ident(&self) -> &'static str {
        let head = self.head();
        match head.rfind("::") {
            Some(pos) => &head[pos + 2..],
            None => head,
        }
    }

    /// Returns the module path, or `None` for primitives.
    pub fn module_path(&self) -> Option<&'static str> {
        let head = self.head();
        head.rfind("::").map(|pos| &head[..pos])
    }

    /// The path up to the generic argument list.
    fn head(&self) -> &'static str {
        match self.path.find('<') {
            Some(pos) => &self.path[..pos],
            None => self.path,
        }
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Type").field(&self.path).finish()
    }
}

impl fmt::Display for Type {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

/// A Rust type that can travel through the reflection layer.
///
/// The static type is what a member declares; the runtime type of a
/// [`Value`](crate::Value) is what it actually holds. Wrappers forward to
/// their payload: `Option<T>` and [`Obj<T>`](crate::Obj) both report `T`.
pub trait Typed: 'static {
    /// Whether the declared type admits null.
    const NULLABLE: bool = false;

    /// Whether values are shared objects ([`Obj<T>`](crate::Obj)) rather
    /// than plain values.
    const OBJECT: bool = false;

    /// Returns the declared type.
    fn static_type() -> Type;
}
