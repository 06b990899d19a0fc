//! Configuration file support for osconfig.
//!
//! osconfig supports two configuration file locations:
//! - Global: `~/.osconfig/config.toml` - User-wide defaults
//! - Project: `.osconfig/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Domain defaults
//! given in a fact sheet take precedence over both.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::domain::{BackendDomain, DomainOverride};
use crate::core::standard::StandardGate;
use crate::emit::OutputFormat;

/// osconfig configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub emit: EmitConfig,

    /// Default-backend overrides by domain name
    pub domains: BTreeMap<String, DomainOverride>,

    /// Extra backend domains (`[[domain]]`)
    #[serde(rename = "domain")]
    pub extra_domains: Vec<BackendDomain>,

    /// Extra standard gates (`[[standard_gate]]`)
    #[serde(rename = "standard_gate")]
    pub standard_gates: Vec<StandardGate>,
}

/// Output-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitConfig {
    /// Constant namespace (default `DCMTK`)
    pub namespace: Option<String>,

    /// Header include guard (default `OSCONFIG_H`)
    pub guard: Option<String>,

    /// Default output format (header, json)
    pub format: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.emit.namespace.is_some() {
            self.emit.namespace = other.emit.namespace;
        }
        if other.emit.guard.is_some() {
            self.emit.guard = other.emit.guard;
        }
        if other.emit.format.is_some() {
            self.emit.format = other.emit.format;
        }

        for (name, domain) in other.domains {
            if domain.default.is_some() {
                self.domains.insert(name, domain);
            }
        }

        for domain in other.extra_domains {
            self.extra_domains.retain(|d| d.name != domain.name);
            self.extra_domains.push(domain);
        }

        for gate in other.standard_gates {
            if !self.standard_gates.contains(&gate) {
                self.standard_gates.push(gate);
            }
        }
    }

    /// Parse the output format from the config string.
    pub fn format(&self) -> Option<OutputFormat> {
        self.emit.format.as_ref().and_then(|s| s.parse().ok())
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.osconfig/config.toml)
/// 2. Global config (~/.osconfig/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global osconfig config directory (~/.osconfig).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".osconfig"))
}

/// Get the global config path (~/.osconfig/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.osconfig/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".osconfig").join("config.toml")
}
