//! C++ language standards and the capabilities that gate on them.

use serde::{Deserialize, Serialize};

/// C++ standard version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CxxStandard {
    /// C++98
    #[serde(rename = "1998", alias = "98", alias = "c++98")]
    Cxx98,
    /// C++03
    #[serde(rename = "2003", alias = "03", alias = "c++03")]
    Cxx03,
    /// C++11
    #[serde(rename = "2011", alias = "11", alias = "c++11")]
    Cxx11,
    /// C++14
    #[serde(rename = "2014", alias = "14", alias = "c++14")]
    Cxx14,
    /// C++17
    #[serde(rename = "2017", alias = "17", alias = "c++17")]
    Cxx17,
    /// C++20
    #[serde(rename = "2020", alias = "20", alias = "c++20")]
    Cxx20,
    /// C++23
    #[serde(rename = "2023", alias = "23", alias = "c++23")]
    Cxx23,
}

impl CxxStandard {
    /// All known standards, oldest first.
    pub const ALL: [CxxStandard; 7] = [
        CxxStandard::Cxx98,
        CxxStandard::Cxx03,
        CxxStandard::Cxx11,
        CxxStandard::Cxx14,
        CxxStandard::Cxx17,
        CxxStandard::Cxx20,
        CxxStandard::Cxx23,
    ];

    /// Publication year, the numeric level used in capabilities and errors.
    pub fn year(&self) -> u32 {
        match self {
            CxxStandard::Cxx98 => 1998,
            CxxStandard::Cxx03 => 2003,
            CxxStandard::Cxx11 => 2011,
            CxxStandard::Cxx14 => 2014,
            CxxStandard::Cxx17 => 2017,
            CxxStandard::Cxx20 => 2020,
            CxxStandard::Cxx23 => 2023,
        }
    }

    /// Value of `__cplusplus` a conforming compiler reports.
    ///
    /// C++03 did not bump the macro, so it shares 199711 with C++98.
    pub fn cplusplus_value(&self) -> u32 {
        match self {
            CxxStandard::Cxx98 | CxxStandard::Cxx03 => 199711,
            CxxStandard::Cxx11 => 201103,
            CxxStandard::Cxx14 => 201402,
            CxxStandard::Cxx17 => 201703,
            CxxStandard::Cxx20 => 202002,
            CxxStandard::Cxx23 => 202302,
        }
    }

    /// Whether a compiler at this standard meets `required`.
    ///
    /// A compiler reporting `__cplusplus` 199711 resolves to C++98 but may
    /// just as well be C++03, so C++98 is accepted for a C++03 requirement.
    pub fn satisfies(self, required: CxxStandard) -> bool {
        self >= required || (self == CxxStandard::Cxx98 && required == CxxStandard::Cxx03)
    }

    /// Look up a standard from an integer capability value.
    ///
    /// Accepts a year (`2017`), the short form (`17`) or a `__cplusplus`
    /// value (`201703`).
    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            1998 | 98 | 199711 => Some(CxxStandard::Cxx98),
            2003 | 3 => Some(CxxStandard::Cxx03),
            2011 | 11 | 201103 => Some(CxxStandard::Cxx11),
            2014 | 14 | 201402 => Some(CxxStandard::Cxx14),
            2017 | 17 | 201703 => Some(CxxStandard::Cxx17),
            2020 | 20 | 202002 => Some(CxxStandard::Cxx20),
            2023 | 23 | 202302 => Some(CxxStandard::Cxx23),
            _ => None,
        }
    }
}

impl std::str::FromStr for CxxStandard {
    type Err = CxxStandardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim_start_matches("c++").trim_start_matches("C++");
        trimmed
            .parse::<i64>()
            .ok()
            .and_then(CxxStandard::from_level)
            .ok_or_else(|| CxxStandardParseError(s.to_string()))
    }
}

/// Error returned when parsing an invalid C++ standard string.
#[derive(Debug, Clone)]
pub struct CxxStandardParseError(pub String);

impl std::fmt::Display for CxxStandardParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let valid: Vec<String> = CxxStandard::ALL
            .iter()
            .map(|std| format!("{:02}", std.year() % 100))
            .collect();
        write!(
            f,
            "invalid C++ standard '{}', valid values: {}",
            self.0,
            valid.join(", ")
        )
    }
}

impl std::error::Error for CxxStandardParseError {}

impl std::fmt::Display for CxxStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "C++{:02}", self.year() % 100)
    }
}

/// Capability holding the compiler's resolved standard level.
pub const CXX_STANDARD: &str = "CXX_STANDARD";

/// Capability holding an explicitly requested standard level.
pub const CXX_STANDARD_REQUIRED: &str = "CXX_STANDARD_REQUIRED";

/// How a standard gate derives its requirement from its capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GateRequirement {
    /// A presence flag; when set, the named standard is required.
    Flag { standard: CxxStandard },
    /// An integer capability whose value is itself the required level.
    Level,
}

/// A capability that asserts a language-standard requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardGate {
    /// Gating capability name
    pub capability: String,

    /// How the requirement is read
    #[serde(flatten)]
    pub requirement: GateRequirement,
}

impl StandardGate {
    pub fn flag(capability: impl Into<String>, standard: CxxStandard) -> Self {
        StandardGate {
            capability: capability.into(),
            requirement: GateRequirement::Flag { standard },
        }
    }

    pub fn level(capability: impl Into<String>) -> Self {
        StandardGate {
            capability: capability.into(),
            requirement: GateRequirement::Level,
        }
    }
}

impl std::fmt::Display for StandardGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.requirement {
            GateRequirement::Flag { standard } => {
                write!(f, "{} requires {}", self.capability, standard)
            }
            GateRequirement::Level => write!(f, "{} requires its value", self.capability),
        }
    }
}

/// Standard gates every profile checks.
pub fn builtin_gates() -> Vec<StandardGate> {
    vec![
        StandardGate::level(CXX_STANDARD_REQUIRED),
        StandardGate::flag("HAVE_CXX11", CxxStandard::Cxx11),
        StandardGate::flag("HAVE_CXX14", CxxStandard::Cxx14),
        StandardGate::flag("HAVE_CXX17", CxxStandard::Cxx17),
        StandardGate::flag("HAVE_CXX20", CxxStandard::Cxx20),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_ordering() {
        assert!(CxxStandard::Cxx98 < CxxStandard::Cxx03);
        assert!(CxxStandard::Cxx03 < CxxStandard::Cxx11);
        assert!(CxxStandard::Cxx17 < CxxStandard::Cxx20);
        assert!(CxxStandard::Cxx20 < CxxStandard::Cxx23);
    }

    #[test]
    fn test_from_level_accepts_all_spellings() {
        assert_eq!(CxxStandard::from_level(2017), Some(CxxStandard::Cxx17));
        assert_eq!(CxxStandard::from_level(17), Some(CxxStandard::Cxx17));
        assert_eq!(CxxStandard::from_level(201703), Some(CxxStandard::Cxx17));
        assert_eq!(CxxStandard::from_level(2003), Some(CxxStandard::Cxx03));
        assert_eq!(CxxStandard::from_level(2016), None);
    }

    #[test]
    fn test_cplusplus_199711_satisfies_cxx03() {
        assert!(CxxStandard::Cxx98.satisfies(CxxStandard::Cxx03));
        assert!(CxxStandard::Cxx17.satisfies(CxxStandard::Cxx11));
        assert!(!CxxStandard::Cxx98.satisfies(CxxStandard::Cxx11));
        assert!(!CxxStandard::Cxx03.satisfies(CxxStandard::Cxx11));
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("c++11".parse::<CxxStandard>().unwrap(), CxxStandard::Cxx11);
        assert_eq!("2014".parse::<CxxStandard>().unwrap(), CxxStandard::Cxx14);
        let err = "c++16".parse::<CxxStandard>().unwrap_err();
        assert!(err.to_string().ends_with("valid values: 98, 03, 11, 14, 17, 20, 23"));
        assert_eq!(CxxStandard::Cxx03.to_string(), "C++03");
        assert_eq!(CxxStandard::Cxx20.to_string(), "C++20");
    }

    #[test]
    fn test_gate_from_toml() {
        #[derive(Deserialize)]
        struct Doc {
            standard_gate: Vec<StandardGate>,
        }

        let doc: Doc = toml::from_str(
            r#"
[[standard_gate]]
capability = "WITH_MODULES"
kind = "flag"
standard = "20"

[[standard_gate]]
capability = "MIN_CXX"
kind = "level"
"#,
        )
        .unwrap();

        assert_eq!(
            doc.standard_gate[0],
            StandardGate::flag("WITH_MODULES", CxxStandard::Cxx20)
        );
        assert_eq!(doc.standard_gate[1], StandardGate::level("MIN_CXX"));
    }
}
