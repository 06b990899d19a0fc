//! Fact sheets - the raw platform facts handed over by the detection step.
//!
//! A fact sheet is TOML or JSON, picked by file extension:
//!
//! ```toml
//! format_version = "1.0"
//!
//! [facts]
//! CANONICAL_HOST_TYPE = "ARM_64-Darwin"
//! HAVE_ACCEPT = true
//! SIZEOF_INT = 4
//!
//! [domains.LFS]
//! default = "NONE"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::capability::CapabilityValue;
use crate::core::domain::DomainOverride;
use crate::util::hash::sha256_str;

/// Fact sheet format versions this build understands.
pub const SUPPORTED_FORMAT: &str = "^1";

/// An unordered set of raw platform facts plus per-domain overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactSheet {
    /// Sheet format version (checked against `SUPPORTED_FORMAT`)
    pub format_version: Option<String>,

    /// Facts by capability name
    pub facts: BTreeMap<String, CapabilityValue>,

    /// Per-domain overrides (take precedence over configuration)
    pub domains: BTreeMap<String, DomainOverride>,
}

impl FactSheet {
    /// Create an empty fact sheet.
    pub fn new() -> Self {
        FactSheet::default()
    }

    /// Add a fact.
    pub fn with_fact(mut self, name: impl Into<String>, value: impl Into<CapabilityValue>) -> Self {
        self.facts.insert(name.into(), value.into());
        self
    }

    /// Set the default backend of a domain.
    pub fn with_domain_default(
        mut self,
        domain: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        self.domains.entry(domain.into()).or_default().default = Some(default.into());
        self
    }

    /// Parse a TOML fact sheet.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let sheet: FactSheet = toml::from_str(contents).context("invalid TOML fact sheet")?;
        sheet.check_format()?;
        Ok(sheet)
    }

    /// Parse a JSON fact sheet.
    pub fn from_json(contents: &str) -> Result<Self> {
        let sheet: FactSheet =
            serde_json::from_str(contents).context("invalid JSON fact sheet")?;
        sheet.check_format()?;
        Ok(sheet)
    }

    /// Load a fact sheet, choosing the parser by extension (`.json` or TOML).
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fact sheet: {}", path.display()))?;

        tracing::debug!(
            "Loaded fact sheet {} (sha256 {})",
            path.display(),
            &sha256_str(&contents)[..16]
        );

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let sheet = if is_json {
            Self::from_json(&contents)
        } else {
            Self::from_toml(&contents)
        };

        sheet.with_context(|| format!("failed to parse fact sheet: {}", path.display()))
    }

    /// Check the declared format version, if any.
    fn check_format(&self) -> Result<()> {
        let Some(ref declared) = self.format_version else {
            return Ok(());
        };

        let version = parse_loose_version(declared)
            .with_context(|| format!("invalid fact sheet format_version `{}`", declared))?;
        let supported = semver::VersionReq::parse(SUPPORTED_FORMAT)?;

        if !supported.matches(&version) {
            bail!(
                "unsupported fact sheet format_version `{}` (supported: {})",
                declared,
                SUPPORTED_FORMAT
            );
        }

        Ok(())
    }
}

/// Parse `1`, `1.0` or `1.0.0` as a semver version.
fn parse_loose_version(s: &str) -> Result<semver::Version> {
    let padded = match s.matches('.').count() {
        0 => format!("{}.0.0", s),
        1 => format!("{}.0", s),
        _ => s.to_string(),
    };
    Ok(semver::Version::parse(&padded)?)
}
