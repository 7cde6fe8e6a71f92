use core::fmt;

use crate::value::Value;

/// A named enum variant and its discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnumVariant {
    name: &'static str,
    discriminant: i64,
}

impl EnumVariant {
    #[inline]
    pub const fn new(name: &'static str, discriminant: i64) -> Self {
        Self { name, discriminant }
    }

    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    pub const fn discriminant(&self) -> i64 {
        self.discriminant
    }
}

/// Name and discriminant mapping of a fieldless enum.
///
/// Generated by [`#[derive(Reflect)]`](crate::derive::Reflect) on enums.
#[derive(Clone, Copy)]
pub struct TypeTraitEnum {
    variants: &'static [EnumVariant],
    construct: fn(i64) -> Option<Value>,
    discriminant_of: fn(&Value) -> Option<i64>,
}

impl TypeTraitEnum {
    /// - `construct` creates the variant with the given discriminant.
    /// - `discriminant_of` reads the discriminant of a value of the enum.
    pub const fn new(
        variants: &'static [EnumVariant],
        construct: fn(i64) -> Option<Value>,
        discriminant_of: fn(&Value) -> Option<i64>,
    ) -> Self {
        Self {
            variants,
            construct,
            discriminant_of,
        }
    }

    #[inline(always)]
    pub const fn variants(&self) -> &'static [EnumVariant] {
        self.variants
    }

    /// Finds a variant by name, ignoring ASCII case.
    pub fn variant_named(&self, name: &str) -> Option<&'static EnumVariant> {
        self.variants
            .iter()
            .find(|variant| variant.name.eq_ignore_ascii_case(name))
    }

    /// Creates the variant with the given discriminant.
    #[inline]
    pub fn from_discriminant(&self, discriminant: i64) -> Option<Value> {
        (self.construct)(discriminant)
    }

    /// Parses a variant name (ignoring ASCII case) or a decimal discriminant.
    pub fn parse(&self, text: &str) -> Option<Value> {
        let text = text.trim();
        match self.variant_named(text) {
            Some(variant) => self.from_discriminant(variant.discriminant),
            None => text
                .parse::<i64>()
                .ok()
                .and_then(|n| self.from_discriminant(n)),
        }
    }

    /// Returns the variant held by `value`.
    pub fn variant_of(&self, value: &Value) -> Option<&'static EnumVariant> {
        let discriminant = (self.discriminant_of)(value)?;
        self.variants
            .iter()
            .find(|variant| variant.discriminant == discriminant)
    }
}

impl fmt::Debug for TypeTraitEnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeTraitEnum")
            .field("variants", &self.variants)
            .finish_non_exhaustive()
    }
}
