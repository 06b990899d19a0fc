//! Capability registry - the mutable side of a profile under construction.
//!
//! A registry starts `Open`. Facts, backend choices and fallback aliases
//! are written while it is open; sealing makes it read-only. Validation
//! then moves it to `Validated` or `Rejected`, both terminal.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::capability::{is_c_identifier, CapabilityValue, Lookup};
use crate::core::domain::BackendChoice;
use crate::core::typedefs::TypeAlias;
use crate::resolver::errors::ConfigureError;

/// Lifecycle state of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileState {
    /// Facts are being set
    Open,
    /// Read-only, waiting for validation
    Sealed,
    /// Terminal success; the only state consumers may read
    Validated,
    /// Terminal failure; the profile is discarded
    Rejected,
}

impl ProfileState {
    /// Check whether `self -> to` is a legal transition.
    pub fn can_transition_to(&self, to: ProfileState) -> bool {
        matches!(
            (self, to),
            (ProfileState::Open, ProfileState::Sealed)
                | (ProfileState::Sealed, ProfileState::Validated)
                | (ProfileState::Sealed, ProfileState::Rejected)
        )
    }
}

impl fmt::Display for ProfileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProfileState::Open => "open",
            ProfileState::Sealed => "sealed",
            ProfileState::Validated => "validated",
            ProfileState::Rejected => "rejected",
        };
        write!(f, "{}", s)
    }
}

/// Named facts, backend choices and fallback aliases for one target.
///
/// Everything is kept in ordered maps so iteration (and therefore every
/// rendered profile) is independent of the order facts arrived in.
#[derive(Debug, Clone)]
pub struct CapabilityRegistry {
    capabilities: BTreeMap<String, CapabilityValue>,
    choices: BTreeMap<String, BackendChoice>,
    aliases: BTreeMap<String, TypeAlias>,
    state: ProfileState,
}

impl CapabilityRegistry {
    /// Create an empty, open registry.
    pub fn new() -> Self {
        CapabilityRegistry {
            capabilities: BTreeMap::new(),
            choices: BTreeMap::new(),
            aliases: BTreeMap::new(),
            state: ProfileState::Open,
        }
    }

    /// Create an open registry populated from raw platform facts.
    pub fn from_facts<I, K>(facts: I) -> Result<Self, ConfigureError>
    where
        I: IntoIterator<Item = (K, CapabilityValue)>,
        K: Into<String>,
    {
        let mut registry = CapabilityRegistry::new();
        for (name, value) in facts {
            registry.set(name, value)?;
        }
        Ok(registry)
    }

    /// Get the current lifecycle state.
    pub fn state(&self) -> ProfileState {
        self.state
    }

    /// Check whether the registry still accepts writes.
    pub fn is_open(&self) -> bool {
        self.state == ProfileState::Open
    }

    /// Store or overwrite a fact.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<CapabilityValue>,
    ) -> Result<(), ConfigureError> {
        let name = name.into();
        if !self.is_open() {
            return Err(ConfigureError::UseAfterSeal { name });
        }
        if !is_c_identifier(&name) {
            return Err(ConfigureError::InvalidName { name });
        }

        let value = value.into();
        if let Some(previous) = self.capabilities.get(&name) {
            if *previous != value {
                tracing::debug!("Overwriting {}: {} -> {}", name, previous, value);
            }
        }
        self.capabilities.insert(name, value);
        Ok(())
    }

    /// Query a fact. Never fails; undetected names are `Lookup::Unknown`.
    pub fn get(&self, name: &str) -> Lookup<'_> {
        match self.capabilities.get(name) {
            Some(value) => Lookup::Known(value),
            None => Lookup::Unknown,
        }
    }

    /// Query a fact that must have been detected.
    pub fn require(&self, name: &str) -> Result<&CapabilityValue, ConfigureError> {
        self.capabilities
            .get(name)
            .ok_or_else(|| ConfigureError::UnknownCapability {
                name: name.to_string(),
            })
    }

    /// Check whether a fact was detected.
    pub fn contains(&self, name: &str) -> bool {
        self.capabilities.contains_key(name)
    }

    /// Iterate over all facts in name order.
    pub fn capabilities(&self) -> impl Iterator<Item = (&str, &CapabilityValue)> + '_ {
        self.capabilities.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Record the backend chosen for a domain. At most one per domain.
    pub fn record_choice(&mut self, choice: BackendChoice) -> Result<(), ConfigureError> {
        if !self.is_open() {
            return Err(ConfigureError::UseAfterSeal {
                name: choice.domain,
            });
        }
        if let Some(existing) = self.choices.get(&choice.domain) {
            return Err(ConfigureError::DuplicateChoice {
                domain: choice.domain,
                existing: existing.backend.clone(),
            });
        }

        self.choices.insert(choice.domain.clone(), choice);
        Ok(())
    }

    /// Get the backend chosen for a domain.
    pub fn choice(&self, domain: &str) -> Option<&BackendChoice> {
        self.choices.get(domain)
    }

    /// Iterate over all backend choices in domain order.
    pub fn choices(&self) -> impl Iterator<Item = &BackendChoice> + '_ {
        self.choices.values()
    }

    /// Record a fallback alias. Re-recording an identical alias is a no-op.
    pub fn record_alias(&mut self, alias: TypeAlias) -> Result<(), ConfigureError> {
        if !self.is_open() {
            return Err(ConfigureError::UseAfterSeal { name: alias.name });
        }
        if !is_c_identifier(&alias.name) {
            return Err(ConfigureError::InvalidName { name: alias.name });
        }

        self.aliases.insert(alias.name.clone(), alias);
        Ok(())
    }

    /// Get the fallback alias for a portable type name.
    pub fn alias(&self, name: &str) -> Option<&TypeAlias> {
        self.aliases.get(name)
    }

    /// Iterate over all fallback aliases in name order.
    pub fn aliases(&self) -> impl Iterator<Item = &TypeAlias> + '_ {
        self.aliases.values()
    }

    /// Make the registry read-only.
    pub fn seal(&mut self) -> Result<(), ConfigureError> {
        self.transition(ProfileState::Sealed)
    }

    /// Move to another lifecycle state, refusing to skip a state.
    pub(crate) fn transition(&mut self, to: ProfileState) -> Result<(), ConfigureError> {
        if !self.state.can_transition_to(to) {
            return Err(ConfigureError::InvalidTransition {
                from: self.state,
                to,
            });
        }

        tracing::debug!("Profile {} -> {}", self.state, to);
        self.state = to;
        Ok(())
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::ChoiceOrigin;

    fn choice(domain: &str, backend: &str) -> BackendChoice {
        BackendChoice {
            domain: domain.to_string(),
            backend: backend.to_string(),
            origin: ChoiceOrigin::Available,
        }
    }

    #[test]
    fn test_set_and_get() {
        let mut registry = CapabilityRegistry::new();
        registry.set("HAVE_ACCEPT", true).unwrap();
        registry.set("SIZEOF_INT", 4i64).unwrap();

        assert!(registry.get("HAVE_ACCEPT").is_present());
        assert_eq!(registry.get("SIZEOF_INT").integer(), Some(4));
        assert!(registry.get("SIZEOF_OFF_T").is_unknown());
    }

    #[test]
    fn test_overwrite_before_seal() {
        let mut registry = CapabilityRegistry::new();
        registry.set("WITH_ICU", true).unwrap();
        registry.set("WITH_ICU", false).unwrap();

        assert_eq!(registry.get("WITH_ICU").presence(), Some(false));
    }

    #[test]
    fn test_require_reports_unknown() {
        let registry = CapabilityRegistry::new();
        let err = registry.require("SIZEOF_OFF_T").unwrap_err();

        assert_eq!(
            err,
            ConfigureError::UnknownCapability {
                name: "SIZEOF_OFF_T".to_string()
            }
        );
    }

    #[test]
    fn test_set_after_seal_fails() {
        let mut registry = CapabilityRegistry::new();
        registry.set("HAVE_ACCEPT", true).unwrap();
        registry.seal().unwrap();

        let err = registry.set("HAVE_ACCEPT", false).unwrap_err();
        assert!(matches!(err, ConfigureError::UseAfterSeal { ref name } if name == "HAVE_ACCEPT"));
        // The sealed value is untouched
        assert!(registry.get("HAVE_ACCEPT").is_present());

        assert!(matches!(
            registry.record_choice(choice("LFS", "LFS64")),
            Err(ConfigureError::UseAfterSeal { .. })
        ));
        assert!(matches!(
            registry.record_alias(TypeAlias::new("uchar", "unsigned char")),
            Err(ConfigureError::UseAfterSeal { .. })
        ));
    }

    #[test]
    fn test_invalid_name_rejected() {
        let mut registry = CapabilityRegistry::new();
        let err = registry.set("HAVE-ACCEPT", true).unwrap_err();
        assert!(matches!(err, ConfigureError::InvalidName { .. }));
    }

    #[test]
    fn test_one_choice_per_domain() {
        let mut registry = CapabilityRegistry::new();
        registry.record_choice(choice("CHARSET", "ICU")).unwrap();

        let err = registry
            .record_choice(choice("CHARSET", "STDLIBC_ICONV"))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigureError::DuplicateChoice {
                domain: "CHARSET".to_string(),
                existing: "ICU".to_string(),
            }
        );
        assert_eq!(registry.choices().count(), 1);
    }

    #[test]
    fn test_state_machine_cannot_skip() {
        let mut registry = CapabilityRegistry::new();
        assert!(registry.transition(ProfileState::Validated).is_err());

        registry.seal().unwrap();
        assert!(registry.seal().is_err());

        registry.transition(ProfileState::Rejected).unwrap();
        assert!(registry.transition(ProfileState::Validated).is_err());
        assert_eq!(registry.state(), ProfileState::Rejected);
    }

    #[test]
    fn test_iteration_is_name_ordered() {
        let registry = CapabilityRegistry::from_facts(vec![
            ("SIZEOF_LONG", CapabilityValue::Integer(8)),
            ("HAVE_ACCEPT", CapabilityValue::Presence(true)),
            ("DCMTK_PREFIX", CapabilityValue::from("/usr/local")),
        ])
        .unwrap();

        let names: Vec<_> = registry.capabilities().map(|(name, _)| name).collect();
        assert_eq!(names, ["DCMTK_PREFIX", "HAVE_ACCEPT", "SIZEOF_LONG"]);
    }
}
