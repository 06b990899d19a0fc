//! Portable type names and the aliases synthesized for missing ones.

use serde::{Deserialize, Serialize};

/// An underlying C type an alias may point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnderlyingType {
    /// C spelling
    pub spelling: &'static str,
    /// Capability holding `sizeof` of this type, if one is detected
    pub size_capability: Option<&'static str>,
}

const fn underlying(spelling: &'static str, size: Option<&'static str>) -> UnderlyingType {
    UnderlyingType {
        spelling,
        size_capability: size,
    }
}

/// A portable type name that may need a fallback alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortableType {
    /// Portable name (uchar, int32_t, ...)
    pub name: &'static str,

    /// Presence capability saying the platform already defines it
    pub provided_by: &'static str,

    /// Required width in bytes, for fixed-width types
    pub width: Option<i64>,

    /// Candidate underlying types, preferred first
    pub candidates: &'static [UnderlyingType],
}

const SCHAR: UnderlyingType = underlying("signed char", Some("SIZEOF_CHAR"));
const UCHAR: UnderlyingType = underlying("unsigned char", Some("SIZEOF_CHAR"));
const SHORT: UnderlyingType = underlying("short", Some("SIZEOF_SHORT"));
const USHORT: UnderlyingType = underlying("unsigned short", Some("SIZEOF_SHORT"));
const INT: UnderlyingType = underlying("int", Some("SIZEOF_INT"));
const UINT: UnderlyingType = underlying("unsigned int", Some("SIZEOF_INT"));
const UNSIGNED: UnderlyingType = underlying("unsigned", Some("SIZEOF_INT"));
const LONG: UnderlyingType = underlying("long", Some("SIZEOF_LONG"));
const ULONG: UnderlyingType = underlying("unsigned long", Some("SIZEOF_LONG"));
const LLONG: UnderlyingType = underlying("long long", Some("SIZEOF_LONG_LONG"));
const ULLONG: UnderlyingType = underlying("unsigned long long", Some("SIZEOF_LONG_LONG"));

const fn portable(
    name: &'static str,
    provided_by: &'static str,
    width: Option<i64>,
    candidates: &'static [UnderlyingType],
) -> PortableType {
    PortableType {
        name,
        provided_by,
        width,
        candidates,
    }
}

/// The fixed list of portable types, in emission order.
pub const PORTABLE_TYPES: &[PortableType] = &[
    portable("uchar", "HAVE_UCHAR_TYPEDEF", None, &[UCHAR]),
    portable("ushort", "HAVE_USHORT_TYPEDEF", None, &[USHORT]),
    portable("uint", "HAVE_UINT_TYPEDEF", None, &[UINT]),
    portable("ulong", "HAVE_ULONG_TYPEDEF", None, &[ULONG]),
    portable("pid_t", "HAVE_PID_T_TYPEDEF", None, &[INT]),
    portable("size_t", "HAVE_SIZE_T_TYPEDEF", None, &[UNSIGNED]),
    portable("ssize_t", "HAVE_SSIZE_T_TYPEDEF", None, &[LONG]),
    portable("int8_t", "HAVE_INT8_T", Some(1), &[SCHAR]),
    portable("uint8_t", "HAVE_UINT8_T", Some(1), &[UCHAR]),
    portable("int16_t", "HAVE_INT16_T", Some(2), &[SHORT]),
    portable("uint16_t", "HAVE_UINT16_T", Some(2), &[USHORT]),
    portable("int32_t", "HAVE_INT32_T", Some(4), &[INT, LONG]),
    portable("uint32_t", "HAVE_UINT32_T", Some(4), &[UINT, ULONG]),
    portable("int64_t", "HAVE_INT64_T", Some(8), &[LONG, LLONG]),
    portable("uint64_t", "HAVE_UINT64_T", Some(8), &[ULONG, ULLONG]),
];

/// Find a portable type by name.
pub fn portable_type(name: &str) -> Option<&'static PortableType> {
    PORTABLE_TYPES.iter().find(|t| t.name == name)
}

/// A synthesized alias: `typedef <target> <name>;`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeAlias {
    pub name: String,
    pub target: String,
}

impl TypeAlias {
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        TypeAlias {
            name: name.into(),
            target: target.into(),
        }
    }
}

impl std::fmt::Display for TypeAlias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "typedef {} {};", self.target, self.name)
    }
}
