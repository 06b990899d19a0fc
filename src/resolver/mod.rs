//! Capability resolution.
//!
//! Turns raw platform facts into a validated `PlatformProfile`:
//! facts → registry → backend selection / typedef fallback → seal →
//! consistency validation. The resolver is pure and deterministic; all
//! I/O happens before resolution.

pub mod backend;
pub mod errors;
pub mod standard;
pub mod typedef;
pub mod validation;

pub use backend::BackendSelector;
pub use errors::ConfigureError;
pub use typedef::TypedefFallbackResolver;
pub use validation::ConsistencyValidator;

use std::collections::BTreeMap;

use crate::core::capability::is_c_identifier;
use crate::core::domain::{builtin_domains, BackendDomain, DomainOverride};
use crate::core::facts::FactSheet;
use crate::core::profile::PlatformProfile;
use crate::core::registry::CapabilityRegistry;
use crate::core::standard::{builtin_gates, StandardGate};
use crate::util::config::Config;

/// Backend domains and standard gates a profile is resolved against.
#[derive(Debug, Clone, PartialEq)]
pub struct Declarations {
    /// Backend domains, in declaration order
    pub domains: Vec<BackendDomain>,
    /// Standard gates, in declaration order
    pub gates: Vec<StandardGate>,
}

impl Declarations {
    /// The built-in domains and gates.
    pub fn builtin() -> Self {
        Declarations {
            domains: builtin_domains(),
            gates: builtin_gates(),
        }
    }

    /// Built-in declarations extended and overridden by configuration.
    pub fn from_config(config: &Config) -> Self {
        let mut declarations = Declarations::builtin();

        for domain in &config.extra_domains {
            declarations.declare_domain(domain.clone());
        }
        for gate in &config.standard_gates {
            if !declarations.gates.contains(gate) {
                declarations.gates.push(gate.clone());
            }
        }

        declarations.apply_overrides(&config.domains);
        declarations
    }

    /// Add a domain, replacing any domain of the same name.
    pub fn declare_domain(&mut self, domain: BackendDomain) {
        match self.domains.iter_mut().find(|d| d.name == domain.name) {
            Some(existing) => {
                tracing::warn!("Domain {} redeclared, replacing built-in", domain.name);
                *existing = domain;
            }
            None => self.domains.push(domain),
        }
    }

    /// Replace domain defaults. Overrides for undeclared domains are ignored.
    pub fn apply_overrides(&mut self, overrides: &BTreeMap<String, DomainOverride>) {
        for (name, over) in overrides {
            let Some(ref default) = over.default else {
                continue;
            };

            match self.domains.iter_mut().find(|d| &d.name == name) {
                Some(domain) => {
                    tracing::debug!("{}: default backend set to {}", name, default);
                    domain.default = Some(default.clone());
                }
                None => tracing::warn!("Ignoring default for undeclared domain {}", name),
            }
        }
    }

    /// Check that every declared name can appear in the generated header.
    ///
    /// Domain names, constant stems, candidate ids and constants, the
    /// capabilities candidates require, defaults and gate capabilities all
    /// end up as (parts of) macro names.
    pub fn validate(&self) -> Result<(), ConfigureError> {
        let mut names: Vec<&str> = Vec::new();

        for domain in &self.domains {
            names.push(&domain.name);
            names.push(domain.constant_stem());
            for candidate in &domain.candidates {
                names.push(&candidate.id);
                names.push(&candidate.requires);
                names.extend(candidate.constant.as_deref());
            }
            names.extend(domain.default.as_deref());
        }
        names.extend(self.gates.iter().map(|gate| gate.capability.as_str()));

        match names.into_iter().find(|name| !is_c_identifier(name)) {
            Some(name) => Err(ConfigureError::InvalidName {
                name: name.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Look up a declared domain.
    pub fn domain(&self, name: &str) -> Option<&BackendDomain> {
        self.domains.iter().find(|d| d.name == name)
    }
}

impl Default for Declarations {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Resolve a fact sheet into a validated profile.
///
/// Domain defaults in the fact sheet override those in `declarations`.
/// Any fatal error aborts resolution; no partial profile is returned.
pub fn resolve(
    sheet: &FactSheet,
    declarations: &Declarations,
) -> Result<PlatformProfile, ConfigureError> {
    let mut declarations = declarations.clone();
    declarations.apply_overrides(&sheet.domains);
    declarations.validate()?;

    tracing::debug!(
        "Resolving {} facts against {} domain(s)",
        sheet.facts.len(),
        declarations.domains.len()
    );

    let mut registry = CapabilityRegistry::from_facts(
        sheet
            .facts
            .iter()
            .map(|(name, value)| (name.clone(), value.clone())),
    )?;

    BackendSelector::new(&declarations.domains).resolve_all(&mut registry)?;
    TypedefFallbackResolver::new().apply(&mut registry)?;

    registry.seal()?;

    ConsistencyValidator::new(&declarations.domains, &declarations.gates).validate(&mut registry)
}
