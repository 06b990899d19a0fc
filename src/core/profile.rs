//! The resolved, immutable platform profile.
//!
//! A `PlatformProfile` can only be produced by a successful validation,
//! so holding one means holding a `Validated` profile. It has no mutators.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::Serialize;

use crate::core::capability::{CapabilityValue, Lookup};
use crate::core::domain::{BackendChoice, BackendDomain};
use crate::core::host::HostType;
use crate::core::standard::CxxStandard;
use crate::core::typedefs::TypeAlias;
use crate::util::hash::Fingerprint;

/// Schema version of the profile structure.
pub static PROFILE_SCHEMA_VERSION: LazyLock<semver::Version> =
    LazyLock::new(|| semver::Version::new(1, 0, 0));

/// Effective language-standard requirement and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandardRequirement {
    /// Capability that asserted the strictest requirement
    pub capability: String,
    /// Required standard
    pub standard: CxxStandard,
}

/// Sealed, validated aggregate of all capabilities and backend choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformProfile {
    schema_version: semver::Version,
    host: Option<HostType>,
    capabilities: BTreeMap<String, CapabilityValue>,
    domains: Vec<BackendDomain>,
    choices: BTreeMap<String, BackendChoice>,
    aliases: Vec<TypeAlias>,
    compiler_standard: Option<CxxStandard>,
    required_standard: Option<StandardRequirement>,
    fingerprint: String,
}

/// Everything a validator has established about a sealed registry.
pub(crate) struct ProfileParts {
    pub host: Option<HostType>,
    pub capabilities: BTreeMap<String, CapabilityValue>,
    pub domains: Vec<BackendDomain>,
    pub choices: BTreeMap<String, BackendChoice>,
    pub aliases: Vec<TypeAlias>,
    pub compiler_standard: Option<CxxStandard>,
    pub required_standard: Option<StandardRequirement>,
}

impl PlatformProfile {
    pub(crate) fn from_parts(parts: ProfileParts) -> Self {
        let fingerprint = fingerprint_parts(&parts);

        PlatformProfile {
            schema_version: PROFILE_SCHEMA_VERSION.clone(),
            host: parts.host,
            capabilities: parts.capabilities,
            domains: parts.domains,
            choices: parts.choices,
            aliases: parts.aliases,
            compiler_standard: parts.compiler_standard,
            required_standard: parts.required_standard,
            fingerprint,
        }
    }

    /// Schema version this profile was built with.
    pub fn schema_version(&self) -> &semver::Version {
        &self.schema_version
    }

    /// Canonical host type, if one was detected.
    pub fn host(&self) -> Option<&HostType> {
        self.host.as_ref()
    }

    /// Query a capability. Undetected names stay `Lookup::Unknown`.
    pub fn get(&self, name: &str) -> Lookup<'_> {
        match self.capabilities.get(name) {
            Some(value) => Lookup::Known(value),
            None => Lookup::Unknown,
        }
    }

    /// Iterate over all capabilities in name order.
    pub fn capabilities(&self) -> impl Iterator<Item = (&str, &CapabilityValue)> + '_ {
        self.capabilities.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Declared backend domains, in declaration order.
    pub fn domains(&self) -> &[BackendDomain] {
        &self.domains
    }

    /// Backend choice for a domain.
    pub fn choice(&self, domain: &str) -> Option<&BackendChoice> {
        self.choices.get(domain)
    }

    /// Selected backend identifier for a domain.
    pub fn backend(&self, domain: &str) -> Option<&str> {
        self.choice(domain).map(|c| c.backend.as_str())
    }

    /// Iterate over all backend choices in domain-name order.
    pub fn choices(&self) -> impl Iterator<Item = &BackendChoice> + '_ {
        self.choices.values()
    }

    /// Synthesized fallback aliases, in portable-type order.
    pub fn aliases(&self) -> &[TypeAlias] {
        &self.aliases
    }

    /// Resolved compiler standard, if detected.
    pub fn compiler_standard(&self) -> Option<CxxStandard> {
        self.compiler_standard
    }

    /// Strictest language-standard requirement, if any capability asserts one.
    pub fn required_standard(&self) -> Option<&StandardRequirement> {
        self.required_standard.as_ref()
    }

    /// Content fingerprint; equal inputs give equal fingerprints.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn fingerprint_parts(parts: &ProfileParts) -> String {
    let mut fp = Fingerprint::new();

    fp.update_str(&PROFILE_SCHEMA_VERSION.to_string());
    fp.update_opt(parts.host.as_ref().map(|h| h.to_string()).as_deref());

    for (name, value) in &parts.capabilities {
        fp.update_str(name);
        match value {
            CapabilityValue::Presence(b) => fp.update_str("p").update_bool(*b),
            CapabilityValue::Integer(n) => fp.update_str("i").update_i64(*n),
            CapabilityValue::String(s) => fp.update_str("s").update_str(s),
        };
    }

    for domain in &parts.domains {
        fp.update_str(&domain.name).update_str(&domain.stem);
        for candidate in &domain.candidates {
            fp.update_str(&candidate.id).update_str(&candidate.requires);
            fp.update_opt(candidate.constant.as_deref());
            fp.update_i64(candidate.value.map_or(-1, i64::from));
        }
        fp.update_opt(domain.default.as_deref());
    }

    for choice in parts.choices.values() {
        fp.update_str(&choice.domain).update_str(&choice.backend);
    }

    for alias in &parts.aliases {
        fp.update_str(&alias.name).update_str(&alias.target);
    }

    fp.update_opt(parts.compiler_standard.map(|s| s.to_string()).as_deref());
    fp.update_opt(
        parts
            .required_standard
            .as_ref()
            .map(|r| r.standard.to_string())
            .as_deref(),
    );

    fp.finish()
}
