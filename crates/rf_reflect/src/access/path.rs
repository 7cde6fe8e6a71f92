//! Member path tokenizer.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt::{self, Display, Write};

use crate::info::CONSTRUCTOR_NAME;

// -----------------------------------------------------------------------------
// IndexKey

/// The content of a `[key]` suffix.
///
/// A key is kept as written. If it parses as an integer it can also
/// address list positions and integer map keys.
///
/// # Examples
///
/// ```
/// use rf_reflect::access::IndexKey;
///
/// let key = IndexKey::new("2");
/// assert_eq!(key.as_int(), Some(2));
/// assert_eq!(key.as_position(), Some(2));
///
/// let key = IndexKey::new("name");
/// assert_eq!(key.as_int(), None);
/// assert!(key.matches(&String::from("name")));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexKey<'a> {
    text: &'a str,
    int: Option<i64>,
}

impl<'a> IndexKey<'a> {
    /// Creates a key from its text.
    #[inline]
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            int: text.trim().parse::<i64>().ok(),
        }
    }

    /// Returns the key as written.
    #[inline(always)]
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Returns the key as an integer, if it is one.
    #[inline(always)]
    pub fn as_int(&self) -> Option<i64> {
        self.int
    }

    /// Returns the key as a non-negative list position.
    #[inline]
    pub fn as_position(&self) -> Option<usize> {
        self.int.and_then(|n| usize::try_from(n).ok())
    }

    /// Check if a map key is addressed by this key.
    ///
    /// Integer keys compare by value, string keys by content, and every
    /// other key by its [`Display`] form. An integer map key therefore
    /// accepts `[3]` and `[03]`, and a string map key only accepts its
    /// exact text. Integers outside the `i64` range compare by their
    /// decimal text.
    pub fn matches<K: Any + Display>(&self, key: &K) -> bool {
        let any: &dyn Any = key;
        if let Some(n) = integer_of(any)
            && self.int.is_some_and(|int| i128::from(int) == n)
        {
            return true;
        }
        if let Some(s) = any.downcast_ref::<String>() {
            return s == self.text;
        }
        if let Some(s) = any.downcast_ref::<&'static str>() {
            return *s == self.text;
        }
        display_eq(key, self.text)
    }
}

impl Display for IndexKey<'_> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.text)
    }
}

fn integer_of(any: &dyn Any) -> Option<i128> {
    macro_rules! integers {
        ($($ty:ty),*) => {
            $(
                if let Some(n) = any.downcast_ref::<$ty>() {
                    return i128::try_from(*n).ok();
                }
            )*
        };
    }

    integers!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
    None
}

/// Compares the `Display` output of `value` with `text` without allocating.
fn display_eq(value: &dyn Display, text: &str) -> bool {
    struct Comparer<'t> {
        rest: &'t str,
    }

    impl Write for Comparer<'_> {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            match self.rest.strip_prefix(s) {
                Some(rest) => {
                    self.rest = rest;
                    Ok(())
                }
                None => Err(fmt::Error),
            }
        }
    }

    let mut comparer = Comparer { rest: text };
    write!(comparer, "{value}").is_ok() && comparer.rest.is_empty()
}

// -----------------------------------------------------------------------------
// Segment

/// One dot-separated unit of a member path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// The member name. Empty for a bare `[key]` segment, which indexes
    /// the container itself.
    pub name: &'a str,
    /// The `[key]` suffix.
    pub index: Option<IndexKey<'a>>,
    /// Position of the segment in its path, used for messages.
    pub offset: usize,
}

impl<'a> Segment<'a> {
    /// Check if this segment names a constructor (`ctor`, any case).
    #[inline]
    pub fn is_constructor(&self) -> bool {
        self.index.is_none()
            && (self.name.eq_ignore_ascii_case("ctor") || self.name == CONSTRUCTOR_NAME)
    }

    /// Returns the name to look up: constructors use [`CONSTRUCTOR_NAME`].
    #[inline]
    pub fn lookup_name(&self) -> &'a str {
        if self.is_constructor() {
            CONSTRUCTOR_NAME
        } else {
            self.name
        }
    }
}

impl Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)?;
        if let Some(index) = &self.index {
            Display::fmt(index, f)?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// ParseError

/// A malformed member path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError<'a> {
    /// Position in `path`.
    pub offset: usize,
    /// The path that the error occurred in.
    pub path: &'a str,
    /// The underlying error.
    pub error: Cow<'a, str>,
}

impl Display for ParseError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Encountered an error at offset {} while parsing `{}`: {}",
            self.offset, self.path, self.error,
        )
    }
}

impl core::error::Error for ParseError<'_> {}

// -----------------------------------------------------------------------------
// PathSegments

/// Iterator over the segments of a member path.
///
/// The grammar is `segment ('.' segment)*` with
/// `segment := name ('[' key ']')? | '[' key ']'`. Dots inside brackets
/// belong to the key. Iteration stops after the first error.
///
/// # Examples
///
/// ```
/// use rf_reflect::access::PathSegments;
///
/// let names: Vec<_> = PathSegments::new("Child.Items[1].Name")
///     .map(|s| s.unwrap().to_string())
///     .collect();
/// assert_eq!(names, ["Child", "Items[1]", "Name"]);
///
/// assert!(PathSegments::new("A..B").any(|s| s.is_err()));
/// ```
#[derive(Debug, Clone)]
pub struct PathSegments<'a> {
    path: &'a str,
    cursor: usize,
    done: bool,
}

impl<'a> PathSegments<'a> {
    #[inline]
    pub fn new(path: &'a str) -> Self {
        Self {
            path,
            cursor: 0,
            done: false,
        }
    }

    #[cold]
    fn fail(&mut self, offset: usize, error: &'static str) -> Option<Result<Segment<'a>, ParseError<'a>>> {
        self.done = true;
        Some(Err(ParseError {
            offset,
            path: self.path,
            error: Cow::Borrowed(error),
        }))
    }

    fn next_segment(&mut self) -> Option<Result<Segment<'a>, ParseError<'a>>> {
        let start = self.cursor;
        let rest = &self.path[start..];

        let name_len = rest.find(['.', '[', ']']).unwrap_or(rest.len());
        let name = &rest[..name_len];
        let mut end = start + name_len;
        let mut index = None;

        match rest[name_len..].chars().next() {
            Some(']') => return self.fail(end, "unmatched `]`"),
            Some('[') => {
                let key_start = end + 1;
                let Some(close) = self.path[key_start..].find(']') else {
                    return self.fail(end, "unclosed `[`");
                };
                let key = &self.path[key_start..key_start + close];
                if key.is_empty() {
                    return self.fail(key_start, "empty index key");
                }
                if key.contains('[') {
                    return self.fail(key_start, "nested `[` in index key");
                }
                if key.contains(',') {
                    return self.fail(key_start, "multi-dimensional indexes are not supported");
                }
                index = Some(IndexKey::new(key));
                end = key_start + close + 1;
            }
            _ => {}
        }

        if name.is_empty() && index.is_none() {
            return self.fail(start, "empty segment");
        }

        match self.path[end..].chars().next() {
            None => self.done = true,
            Some('.') => {
                if end + 1 == self.path.len() {
                    return self.fail(end + 1, "empty segment");
                }
                self.cursor = end + 1;
            }
            Some(_) => return self.fail(end, "expected `.` after `]`"),
        }

        Some(Ok(Segment {
            name,
            index,
            offset: start,
        }))
    }
}

impl<'a> Iterator for PathSegments<'a> {
    type Item = Result<Segment<'a>, ParseError<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.path.is_empty() {
            return self.fail(0, "empty path");
        }
        self.next_segment()
    }
}

impl core::iter::FusedIterator for PathSegments<'_> {}

/// Parses a whole member path.
///
/// The result is never empty.
pub fn parse_path(path: &str) -> Result<Vec<Segment<'_>>, ParseError<'_>> {
    PathSegments::new(path).collect()
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    fn texts(path: &str) -> Vec<String> {
        parse_path(path)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn splits_segments() {
        assert_eq!(texts("A"), ["A"]);
        assert_eq!(texts("A.B[2].C"), ["A", "B[2]", "C"]);
        assert_eq!(texts("Items[1]"), ["Items[1]"]);
        assert_eq!(texts("[0].Name"), ["[0]", "Name"]);
        assert_eq!(texts("Map[a.b].Len"), ["Map[a.b]", "Len"]);
    }

    #[test]
    fn segment_details() {
        let segments = parse_path("Child.Items[x].ctor").unwrap();
        assert_eq!(segments[1].name, "Items");
        assert_eq!(segments[1].offset, 6);
        let key = segments[1].index.unwrap();
        assert_eq!(key.text(), "x");
        assert_eq!(key.as_int(), None);
        assert!(segments[2].is_constructor());
        assert_eq!(segments[2].lookup_name(), CONSTRUCTOR_NAME);
        assert_eq!(parse_path("CTOR").unwrap()[0].lookup_name(), CONSTRUCTOR_NAME);
        assert_eq!(segments[0].lookup_name(), "Child");
    }

    #[test]
    fn rejects_malformed_paths() {
        let cases = [
            ("", 0),
            (".A", 0),
            ("A.", 2),
            ("A..B", 2),
            ("A[1", 1),
            ("A[]", 2),
            ("A]", 1),
            ("A[1]B", 4),
            ("A[1][2]", 4),
            ("A[1,2]", 2),
        ];
        for (path, offset) in cases {
            let error = parse_path(path).unwrap_err();
            assert_eq!(error.offset, offset, "{path}");
            assert_eq!(error.path, path);
        }
        let error = parse_path("A[1").unwrap_err();
        assert!(error.to_string().contains("unclosed"));
    }

    #[test]
    fn iteration_stops_after_error() {
        let mut segments = PathSegments::new("A..B");
        assert!(segments.next().unwrap().is_ok());
        assert!(segments.next().unwrap().is_err());
        assert!(segments.next().is_none());
    }

    #[test]
    fn key_matching() {
        let three = IndexKey::new("3");
        assert!(three.matches(&3_u8));
        assert!(three.matches(&3_i64));
        assert!(IndexKey::new("03").matches(&3_u32));
        assert!(!three.matches(&4_i32));
        assert!(!three.matches(&String::from("03")));
        assert!(three.matches(&String::from("3")));
        assert!(three.matches(&"3"));
        assert!(!IndexKey::new("x").matches(&3_i32));

        assert!(IndexKey::new("c").matches(&'c'));
        assert!(IndexKey::new("true").matches(&true));
        assert!(!IndexKey::new("tru").matches(&true));
        assert!(!IndexKey::new("truer").matches(&true));
    }

    #[test]
    fn wide_integer_keys() {
        let max = IndexKey::new("18446744073709551615");
        assert_eq!(max.as_int(), None);
        assert!(max.matches(&u64::MAX));
        assert!(max.matches(&u128::from(u64::MAX)));
        assert!(!max.matches(&(u64::MAX - 1)));
        assert!(IndexKey::new("170141183460469231731687303715884105728").matches(&(i128::MAX as u128 + 1)));
        assert!(!IndexKey::new("3").matches(&u64::MAX));
    }

    #[test]
    fn positions() {
        assert_eq!(IndexKey::new(" 4 ").as_position(), Some(4));
        assert_eq!(IndexKey::new("-1").as_position(), None);
        assert_eq!(IndexKey::new("-1").as_int(), Some(-1));
        assert_eq!(IndexKey::new("k").as_position(), None);
    }
}
