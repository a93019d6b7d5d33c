use serde::{Deserialize, Serialize};

/// JVM access flags used by the resolution layer.
pub mod flags {
    pub const ACC_PUBLIC: u16 = 0x0001;
    pub const ACC_PRIVATE: u16 = 0x0002;
    pub const ACC_PROTECTED: u16 = 0x0004;
    pub const ACC_STATIC: u16 = 0x0008;
    pub const ACC_FINAL: u16 = 0x0010;
    pub const ACC_BRIDGE: u16 = 0x0040;
    pub const ACC_VARARGS: u16 = 0x0080;
    pub const ACC_INTERFACE: u16 = 0x0200;
    pub const ACC_ABSTRACT: u16 = 0x0400;
    pub const ACC_SYNTHETIC: u16 = 0x1000;
    pub const ACC_ANNOTATION: u16 = 0x2000;
    pub const ACC_ENUM: u16 = 0x4000;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessLevel {
    Public,
    Protected,
    PackagePrivate,
    Private,
}

impl AccessLevel {
    pub fn from_access_flags(access: u16) -> Self {
        if access & flags::ACC_PUBLIC != 0 {
            AccessLevel::Public
        } else if access & flags::ACC_PROTECTED != 0 {
            AccessLevel::Protected
        } else if access & flags::ACC_PRIVATE != 0 {
            AccessLevel::Private
        } else {
            AccessLevel::PackagePrivate
        }
    }

    /// Members visible to subclasses outside the declaring type.
    pub fn is_inheritable(self) -> bool {
        !matches!(self, AccessLevel::Private)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_flags_map_to_levels() {
        assert_eq!(AccessLevel::from_access_flags(0x0001), AccessLevel::Public);
        assert_eq!(AccessLevel::from_access_flags(0x0004 | 0x0008), AccessLevel::Protected);
        assert_eq!(AccessLevel::from_access_flags(0x0002), AccessLevel::Private);
        assert_eq!(AccessLevel::from_access_flags(0x0010), AccessLevel::PackagePrivate);
    }
}
