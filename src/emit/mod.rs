//! Profile serialization.
//!
//! A profile is rendered either as a C header of named constants or as
//! JSON. Both renderers are pure and deterministic: the same profile
//! always yields byte-identical output.

pub mod header;
pub mod json;

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};

use crate::core::capability::is_c_identifier;
use crate::core::profile::PlatformProfile;
use crate::util::config::EmitConfig;

/// Default constant namespace.
pub const DEFAULT_NAMESPACE: &str = "DCMTK";

/// Default header include guard.
pub const DEFAULT_GUARD: &str = "OSCONFIG_H";

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// C header with `#define`s
    #[default]
    Header,
    /// Pretty-printed JSON
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "header" | "h" => Ok(OutputFormat::Header),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown output format: {} (expected header or json)", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Header => write!(f, "header"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Naming options for rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Prefix of backend constants (`<NS>_<STEM>_<ID>`)
    pub namespace: String,
    /// Include guard macro
    pub guard: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            namespace: DEFAULT_NAMESPACE.to_string(),
            guard: DEFAULT_GUARD.to_string(),
        }
    }
}

impl EmitOptions {
    /// Options from configuration, falling back to the defaults.
    pub fn from_config(config: &EmitConfig) -> Self {
        let defaults = EmitOptions::default();
        EmitOptions {
            namespace: config.namespace.clone().unwrap_or(defaults.namespace),
            guard: config.guard.clone().unwrap_or(defaults.guard),
        }
    }

    /// Check that both names can be used as macro names.
    pub fn validate(&self) -> Result<()> {
        if !is_c_identifier(&self.namespace) {
            bail!("namespace `{}` is not a valid C identifier", self.namespace);
        }
        if !is_c_identifier(&self.guard) {
            bail!("include guard `{}` is not a valid C identifier", self.guard);
        }
        Ok(())
    }
}

/// Render a profile in the given format.
pub fn render(
    profile: &PlatformProfile,
    format: OutputFormat,
    options: &EmitOptions,
) -> Result<String> {
    options.validate()?;

    match format {
        OutputFormat::Header => Ok(header::render(profile, options)?),
        OutputFormat::Json => json::render(profile),
    }
}
