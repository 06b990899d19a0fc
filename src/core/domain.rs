//! Backend domains - capability areas with mutually exclusive strategies.
//!
//! A domain declares its candidates in priority order. Resolution picks
//! exactly one of them (or the declared default) per profile.

use serde::{Deserialize, Serialize};

/// Backend identifier used for "feature compiled out".
pub const NONE_BACKEND: &str = "NONE";

/// One candidate implementation strategy for a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendCandidate {
    /// Backend identifier (ICU, ICONV, LFS64, ...)
    pub id: String,

    /// Presence capability that makes this candidate available
    pub requires: String,

    /// Emitted constant name without the namespace; `<STEM>_<ID>` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<String>,

    /// Emitted constant value; the 1-based declaration position when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
}

impl BackendCandidate {
    pub fn new(id: impl Into<String>, requires: impl Into<String>) -> Self {
        BackendCandidate {
            id: id.into(),
            requires: requires.into(),
            constant: None,
            value: None,
        }
    }

    /// Use a fixed constant name and value instead of the derived ones.
    pub fn with_constant(mut self, constant: impl Into<String>, value: u32) -> Self {
        self.constant = Some(constant.into());
        self.value = Some(value);
        self
    }
}

/// A capability area with several mutually exclusive strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendDomain {
    /// Domain name (CHARSET, LFS)
    pub name: String,

    /// Stem for emitted constants (`<NS>_<STEM>_<ID>` unless a candidate
    /// names its own, and `<NS>_ENABLE_<STEM>`); empty means the domain name
    #[serde(default)]
    pub stem: String,

    /// Candidates in priority order
    pub candidates: Vec<BackendCandidate>,

    /// Backend used when no candidate is available
    #[serde(default)]
    pub default: Option<String>,
}

impl BackendDomain {
    /// Create a new domain whose constant stem equals its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        BackendDomain {
            stem: name.clone(),
            name,
            candidates: Vec::new(),
            default: None,
        }
    }

    /// Set the constant stem.
    pub fn with_stem(mut self, stem: impl Into<String>) -> Self {
        self.stem = stem.into();
        self
    }

    /// Append a candidate (lowest priority so far).
    pub fn with_candidate(mut self, id: impl Into<String>, requires: impl Into<String>) -> Self {
        self.candidates.push(BackendCandidate::new(id, requires));
        self
    }

    /// Append a fully specified candidate.
    pub fn with_backend(mut self, candidate: BackendCandidate) -> Self {
        self.candidates.push(candidate);
        self
    }

    /// Set the default backend.
    pub fn with_default(mut self, id: impl Into<String>) -> Self {
        self.default = Some(id.into());
        self
    }

    /// Stem used for emitted constants.
    pub fn constant_stem(&self) -> &str {
        if self.stem.is_empty() {
            &self.name
        } else {
            &self.stem
        }
    }

    /// Get a candidate by identifier.
    pub fn candidate(&self, id: &str) -> Option<&BackendCandidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    /// Check whether an identifier is a candidate of this domain.
    pub fn has_candidate(&self, id: &str) -> bool {
        self.candidate(id).is_some()
    }

    /// Check whether an identifier is a legal choice for this domain.
    pub fn accepts(&self, id: &str) -> bool {
        self.has_candidate(id) || self.default.as_deref() == Some(id)
    }

    /// Emitted constant name of a candidate, without the namespace.
    ///
    /// A default outside the candidate list (such as `NONE`) has no
    /// constant: choosing it leaves the `ENABLE` selector undefined.
    pub fn constant(&self, id: &str) -> Option<String> {
        let candidate = self.candidate(id)?;
        Some(match candidate.constant {
            Some(ref constant) => constant.clone(),
            None => format!("{}_{}", self.constant_stem(), candidate.id),
        })
    }

    /// Numeric value of a candidate in the emitted constant set.
    pub fn ordinal(&self, id: &str) -> Option<u32> {
        let pos = self.candidates.iter().position(|c| c.id == id)?;
        Some(self.candidates[pos].value.unwrap_or(pos as u32 + 1))
    }

    /// Name of the selector constant, without the namespace.
    pub fn enable_constant(&self) -> String {
        format!("ENABLE_{}", self.constant_stem())
    }
}

/// Per-domain override from configuration or the fact sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainOverride {
    /// Replacement default backend
    pub default: Option<String>,
}

/// Why a backend was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceOrigin {
    /// The candidate's availability capability was true
    Available,
    /// No candidate was available; the domain default was used
    Default,
}

/// The single backend selected for a domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BackendChoice {
    pub domain: String,
    pub backend: String,
    pub origin: ChoiceOrigin,
}

impl std::fmt::Display for BackendChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.domain, self.backend)
    }
}

/// Character set conversion: ICU, then libiconv, then the C library's iconv.
pub fn charset_domain() -> BackendDomain {
    BackendDomain::new("CHARSET")
        .with_stem("CHARSET_CONVERSION")
        .with_candidate("ICU", "WITH_ICU")
        .with_candidate("ICONV", "WITH_LIBICONV")
        .with_candidate("STDLIBC_ICONV", "WITH_STDLIBC_ICONV")
        .with_default(NONE_BACKEND)
}

/// Large file support: 64-bit offsets preferred over the LFS32 interface.
///
/// Downstream code compares `DCMTK_ENABLE_LFS` against `DCMTK_LFS` (1) and
/// `DCMTK_LFS64` (2), so those names and values are fixed.
pub fn lfs_domain() -> BackendDomain {
    BackendDomain::new("LFS")
        .with_backend(
            BackendCandidate::new("LFS64", "HAVE_LFS64_SUPPORT").with_constant("LFS64", 2),
        )
        .with_backend(BackendCandidate::new("LFS32", "HAVE_LFS_SUPPORT").with_constant("LFS", 1))
}

/// Domains every profile resolves.
pub fn builtin_domains() -> Vec<BackendDomain> {
    vec![charset_domain(), lfs_domain()]
}
