use bitflags::bitflags;

use super::MemberKind;

bitflags! {
    /// A mask over member categories.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MemberTypes: u8 {
        /// Stored data members.
        const FIELD       = 1 << 0;
        /// Accessor-backed members.
        const PROPERTY    = 1 << 1;
        /// Callable members.
        const METHOD      = 1 << 2;
        /// Members that create new instances.
        const CONSTRUCTOR = 1 << 3;

        /// Members that can be read as data.
        const PROPERTY_OR_FIELD = Self::FIELD.bits() | Self::PROPERTY.bits();
        /// Every category.
        const ALL = Self::PROPERTY_OR_FIELD.bits() | Self::METHOD.bits() | Self::CONSTRUCTOR.bits();
    }
}

impl From<MemberKind> for MemberTypes {
    #[inline]
    fn from(kind: MemberKind) -> Self {
        match kind {
            MemberKind::Field => MemberTypes::FIELD,
            MemberKind::Property => MemberTypes::PROPERTY,
            MemberKind::Method => MemberTypes::METHOD,
            MemberKind::Constructor => MemberTypes::CONSTRUCTOR,
        }
    }
}

bitflags! {
    /// Rules for member lookup.
    ///
    /// A member matches when its static/instance flavor and its visibility
    /// are both admitted.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct BindingFlags: u8 {
        /// Admit instance members.
        const INSTANCE    = 1 << 0;
        /// Admit static members.
        const STATIC      = 1 << 1;
        /// Admit public members.
        const PUBLIC      = 1 << 2;
        /// Admit private members.
        const NON_PUBLIC  = 1 << 3;
        /// Compare member names ignoring ASCII case.
        const IGNORE_CASE = 1 << 4;

        /// Instance or static, public only.
        const DEFAULT = Self::INSTANCE.bits() | Self::STATIC.bits() | Self::PUBLIC.bits();
    }
}

impl Default for BindingFlags {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BindingFlags {
    /// Compares a member name against a requested name.
    #[inline]
    pub fn name_matches(self, member: &str, requested: &str) -> bool {
        if self.contains(BindingFlags::IGNORE_CASE) {
            member.eq_ignore_ascii_case(requested)
        } else {
            member == requested
        }
    }

    /// Check if a member with the given flavor and visibility is admitted.
    #[inline]
    pub fn admits(self, is_static: bool, is_public: bool) -> bool {
        let flavor = if is_static {
            BindingFlags::STATIC
        } else {
            BindingFlags::INSTANCE
        };
        let visibility = if is_public {
            BindingFlags::PUBLIC
        } else {
            BindingFlags::NON_PUBLIC
        };
        self.contains(flavor | visibility)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_binding() {
        let flags = BindingFlags::default();
        assert!(flags.admits(false, true));
        assert!(flags.admits(true, true));
        assert!(!flags.admits(false, false));
        assert!(flags.name_matches("Value", "Value"));
        assert!(!flags.name_matches("Value", "value"));
    }

    #[test]
    fn ignore_case_and_non_public() {
        let flags = BindingFlags::INSTANCE | BindingFlags::NON_PUBLIC | BindingFlags::IGNORE_CASE;
        assert!(flags.admits(false, false));
        assert!(!flags.admits(false, true));
        assert!(!flags.admits(true, false));
        assert!(flags.name_matches("Value", "vALUE"));
    }

    #[test]
    fn member_masks() {
        assert!(MemberTypes::PROPERTY_OR_FIELD.contains(MemberKind::Field.into()));
        assert!(!MemberTypes::PROPERTY_OR_FIELD.contains(MemberKind::Method.into()));
        assert!(MemberTypes::ALL.contains(MemberKind::Constructor.into()));
    }
}
