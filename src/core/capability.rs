//! Capability values - named build-time facts about a target.
//!
//! A capability is one of three kinds: a presence flag (`HAVE_ACCEPT`),
//! an integer (`SIZEOF_LONG`) or a string (`DCMTK_PREFIX`). A name that
//! was never detected is *unknown*, which is not the same as detected-false.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// C identifier grammar. Capability and alias names end up as macro
/// and typedef names, so they must be valid identifiers.
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Check whether a name is a valid C identifier.
pub fn is_c_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Type-size capabilities, in byte counts.
pub const SIZE_CAPABILITIES: &[&str] = &[
    "SIZEOF_CHAR",
    "SIZEOF_SHORT",
    "SIZEOF_INT",
    "SIZEOF_LONG",
    "SIZEOF_LONG_LONG",
    "SIZEOF_VOID_P",
    "SIZEOF_FLOAT",
    "SIZEOF_DOUBLE",
    "SIZEOF_OFF_T",
    "SIZEOF_FPOS_T",
    "SIZEOF_SIZE_T",
];

/// Installation path defaults. These must be strings.
pub const PATH_CAPABILITIES: &[&str] = &[
    "DCMTK_PREFIX",
    "DCM_DICT_DEFAULT_PATH",
    "DEFAULT_CONFIGURATION_DIR",
    "DEFAULT_SUPPORT_DATA_DIR",
    "ENVIRONMENT_PATH_SEPARATOR",
    "PATH_SEPARATOR",
];

/// String capabilities rendered as C character literals.
pub const CHAR_CAPABILITIES: &[&str] = &["ENVIRONMENT_PATH_SEPARATOR", "PATH_SEPARATOR"];

/// Names the compiler predefines. A capability may never shadow one.
pub const RESERVED_NAMES: &[&str] = &[
    "__cplusplus",
    "__STDC__",
    "__STDC_VERSION__",
    "__FILE__",
    "__LINE__",
    "__DATE__",
    "__TIME__",
    "__func__",
    "_WIN32",
    "_WIN64",
    "_MSC_VER",
    "__GNUC__",
    "__clang__",
    "__APPLE__",
    "__linux__",
    "__BORLANDC__",
    "__CHAR_UNSIGNED__",
];

/// Check whether a name is predefined by the compiler.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// The kind of a capability value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityKind {
    /// Header/function/feature presence flag
    Presence,
    /// Integer value (type sizes, version numbers)
    Integer,
    /// String value (paths, host type, keywords)
    String,
}

impl CapabilityKind {
    /// Get the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityKind::Presence => "presence",
            CapabilityKind::Integer => "integer",
            CapabilityKind::String => "string",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A detected capability value.
///
/// Deserializes untagged, so fact sheets can write `HAVE_ACCEPT = true`,
/// `SIZEOF_INT = 4` and `DCMTK_PREFIX = "/usr/local"` directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CapabilityValue {
    Presence(bool),
    Integer(i64),
    String(String),
}

impl CapabilityValue {
    /// Get the kind of this value.
    pub fn kind(&self) -> CapabilityKind {
        match self {
            CapabilityValue::Presence(_) => CapabilityKind::Presence,
            CapabilityValue::Integer(_) => CapabilityKind::Integer,
            CapabilityValue::String(_) => CapabilityKind::String,
        }
    }
}

impl From<bool> for CapabilityValue {
    fn from(value: bool) -> Self {
        CapabilityValue::Presence(value)
    }
}

impl From<i64> for CapabilityValue {
    fn from(value: i64) -> Self {
        CapabilityValue::Integer(value)
    }
}

impl From<&str> for CapabilityValue {
    fn from(value: &str) -> Self {
        CapabilityValue::String(value.to_string())
    }
}

impl From<String> for CapabilityValue {
    fn from(value: String) -> Self {
        CapabilityValue::String(value)
    }
}

impl fmt::Display for CapabilityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityValue::Presence(b) => write!(f, "{}", b),
            CapabilityValue::Integer(n) => write!(f, "{}", n),
            CapabilityValue::String(s) => write!(f, "{:?}", s),
        }
    }
}

/// Result of querying a capability by name.
///
/// `Unknown` means the name was never detected. Callers decide what that
/// means for them; nothing here silently turns it into `false` or `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Known(&'a CapabilityValue),
    Unknown,
}

impl<'a> Lookup<'a> {
    /// Check whether the capability was detected.
    pub fn is_known(&self) -> bool {
        matches!(self, Lookup::Known(_))
    }

    /// Check whether the capability was never detected.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Lookup::Unknown)
    }

    /// Get the raw value, if known.
    pub fn value(&self) -> Option<&'a CapabilityValue> {
        match *self {
            Lookup::Known(v) => Some(v),
            Lookup::Unknown => None,
        }
    }

    /// Interpret the value as a presence flag.
    ///
    /// Integer facts count as presence flags too (`HAVE_X = 1` is how
    /// autoconf-style checks usually report them). Strings do not.
    pub fn presence(&self) -> Option<bool> {
        match *self {
            Lookup::Known(CapabilityValue::Presence(b)) => Some(*b),
            Lookup::Known(CapabilityValue::Integer(n)) => Some(*n != 0),
            _ => None,
        }
    }

    /// True only for a detected, positive presence flag.
    pub fn is_present(&self) -> bool {
        self.presence() == Some(true)
    }

    /// Interpret the value as an integer.
    pub fn integer(&self) -> Option<i64> {
        match *self {
            Lookup::Known(CapabilityValue::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    /// Interpret the value as a string.
    pub fn string(&self) -> Option<&'a str> {
        match *self {
            Lookup::Known(CapabilityValue::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Lookup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Known(v) => write!(f, "{}", v),
            Lookup::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_validation() {
        assert!(is_c_identifier("HAVE_ACCEPT"));
        assert!(is_c_identifier("HAVE___func___MACRO"));
        assert!(is_c_identifier("_ALL_SOURCE"));
        assert!(!is_c_identifier("HAVE-ACCEPT"));
        assert!(!is_c_identifier("1HAVE"));
        assert!(!is_c_identifier(""));
    }

    #[test]
    fn test_reserved_names() {
        assert!(is_reserved("__cplusplus"));
        assert!(is_reserved("_WIN32"));
        assert!(!is_reserved("HAVE_WINDOWS_H"));
        assert!(RESERVED_NAMES.iter().all(|name| is_c_identifier(name)));
    }

    #[test]
    fn test_value_kinds_from_toml() {
        #[derive(Deserialize)]
        struct Sheet {
            facts: std::collections::BTreeMap<String, CapabilityValue>,
        }

        let sheet: Sheet = toml::from_str(
            r#"
[facts]
HAVE_ACCEPT = true
SIZEOF_INT = 4
DCMTK_PREFIX = "/usr/local"
"#,
        )
        .unwrap();

        assert_eq!(sheet.facts["HAVE_ACCEPT"].kind(), CapabilityKind::Presence);
        assert_eq!(sheet.facts["SIZEOF_INT"].kind(), CapabilityKind::Integer);
        assert_eq!(sheet.facts["DCMTK_PREFIX"].kind(), CapabilityKind::String);
    }

    #[test]
    fn test_lookup_distinguishes_unknown_from_false() {
        let absent = CapabilityValue::Presence(false);
        let known = Lookup::Known(&absent);

        assert_eq!(known.presence(), Some(false));
        assert!(known.is_known());
        assert_eq!(Lookup::Unknown.presence(), None);
        assert!(Lookup::Unknown.is_unknown());
        assert_eq!(Lookup::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_integer_presence() {
        let one = CapabilityValue::Integer(1);
        let path = CapabilityValue::from("/usr/local");

        assert!(Lookup::Known(&one).is_present());
        assert_eq!(Lookup::Known(&path).presence(), None);
        assert_eq!(Lookup::Known(&path).string(), Some("/usr/local"));
    }
}
