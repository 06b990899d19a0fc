//! Cross-capability consistency checks on a sealed registry.
//!
//! Checks run in a fixed order and stop at the first failure:
//! 1. Backend choices - one per declared domain, all known
//! 2. Language standards - every requirement met by the compiler
//! 3. Sizes - power-of-two, ordered, matching the pointer width
//! 4. Names - no builtin shadowing, no typedef clashes, typed paths

use std::collections::BTreeMap;

use crate::core::capability::{
    is_reserved, CapabilityKind, CapabilityValue, PATH_CAPABILITIES, SIZE_CAPABILITIES,
};
use crate::core::domain::BackendDomain;
use crate::core::host::{HostType, CANONICAL_HOST_TYPE, POINTER_WIDTH};
use crate::core::profile::{PlatformProfile, ProfileParts, StandardRequirement};
use crate::core::registry::{CapabilityRegistry, ProfileState};
use crate::core::standard::{CxxStandard, StandardGate};
use crate::core::typedefs::{portable_type, TypeAlias, PORTABLE_TYPES};
use crate::resolver::errors::ConfigureError;
use crate::resolver::standard;

/// Integer sizes that must not decrease left to right.
const INTEGER_ORDER: &[&str] = &[
    "SIZEOF_CHAR",
    "SIZEOF_SHORT",
    "SIZEOF_INT",
    "SIZEOF_LONG",
    "SIZEOF_LONG_LONG",
];

const FLOAT_ORDER: &[&str] = &["SIZEOF_FLOAT", "SIZEOF_DOUBLE"];

/// Validates a sealed registry and produces the immutable profile.
pub struct ConsistencyValidator<'a> {
    domains: &'a [BackendDomain],
    gates: &'a [StandardGate],
}

impl<'a> ConsistencyValidator<'a> {
    /// Create a validator for the given declarations.
    pub fn new(domains: &'a [BackendDomain], gates: &'a [StandardGate]) -> Self {
        ConsistencyValidator { domains, gates }
    }

    /// Validate the registry.
    ///
    /// On success the registry becomes `Validated` and the profile is
    /// returned; on failure it becomes `Rejected` and nothing is returned.
    pub fn validate(
        &self,
        registry: &mut CapabilityRegistry,
    ) -> Result<PlatformProfile, ConfigureError> {
        if registry.state() != ProfileState::Sealed {
            return Err(ConfigureError::InvalidTransition {
                from: registry.state(),
                to: ProfileState::Validated,
            });
        }

        match self.run_checks(registry) {
            Ok(parts) => {
                registry.transition(ProfileState::Validated)?;
                Ok(PlatformProfile::from_parts(parts))
            }
            Err(err) => {
                registry.transition(ProfileState::Rejected)?;
                tracing::warn!("Profile rejected: {}", err);
                Err(err)
            }
        }
    }

    fn run_checks(&self, registry: &CapabilityRegistry) -> Result<ProfileParts, ConfigureError> {
        self.validate_choices(registry)?;
        let (compiler_standard, required_standard) = self.validate_standards(registry)?;
        let host = self.validate_sizes(registry)?;
        self.validate_names(registry)?;

        Ok(ProfileParts {
            host,
            capabilities: registry
                .capabilities()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
            domains: self.domains.to_vec(),
            choices: registry
                .choices()
                .map(|choice| (choice.domain.clone(), choice.clone()))
                .collect::<BTreeMap<_, _>>(),
            aliases: ordered_aliases(registry),
            compiler_standard,
            required_standard,
        })
    }

    fn validate_choices(&self, registry: &CapabilityRegistry) -> Result<(), ConfigureError> {
        for domain in self.domains {
            let choice = registry
                .choice(&domain.name)
                .ok_or_else(|| ConfigureError::MissingChoice {
                    domain: domain.name.clone(),
                })?;

            if !domain.accepts(&choice.backend) {
                return Err(ConfigureError::UnknownBackend {
                    domain: domain.name.clone(),
                    backend: choice.backend.clone(),
                });
            }
        }

        // A choice for a domain nobody declared
        for choice in registry.choices() {
            if !self.domains.iter().any(|d| d.name == choice.domain) {
                return Err(ConfigureError::UnknownBackend {
                    domain: choice.domain.clone(),
                    backend: choice.backend.clone(),
                });
            }
        }

        Ok(())
    }

    fn validate_standards(
        &self,
        registry: &CapabilityRegistry,
    ) -> Result<(Option<CxxStandard>, Option<StandardRequirement>), ConfigureError> {
        standard::check(registry, self.gates)
    }

    fn validate_sizes(
        &self,
        registry: &CapabilityRegistry,
    ) -> Result<Option<HostType>, ConfigureError> {
        let mut sizes = BTreeMap::new();

        for &name in SIZE_CAPABILITIES {
            let Some(value) = registry.get(name).value() else {
                continue;
            };
            let size = expect_integer(name, value)?;
            if size <= 0 || (size & (size - 1)) != 0 {
                return Err(ConfigureError::InvalidSize {
                    name: name.to_string(),
                    value: size,
                });
            }
            sizes.insert(name, size);
        }

        if let Some(&char_size) = sizes.get("SIZEOF_CHAR") {
            if char_size != 1 {
                return Err(ConfigureError::SizeMismatch {
                    message: format!("SIZEOF_CHAR is {}, must be 1", char_size),
                });
            }
        }

        check_order(&sizes, INTEGER_ORDER)?;
        check_order(&sizes, FLOAT_ORDER)?;

        let host = match registry.get(CANONICAL_HOST_TYPE).value() {
            None => None,
            Some(CapabilityValue::String(s)) => Some(HostType::parse(s).ok_or_else(|| {
                ConfigureError::InvalidHostType { value: s.clone() }
            })?),
            Some(other) => {
                return Err(ConfigureError::KindMismatch {
                    name: CANONICAL_HOST_TYPE.to_string(),
                    expected: CapabilityKind::String,
                    found: other.kind(),
                })
            }
        };

        let declared_bits = match registry.get(POINTER_WIDTH).value() {
            Some(value) => {
                let bits = expect_integer(POINTER_WIDTH, value)?;
                if bits <= 0 || bits % 8 != 0 {
                    return Err(ConfigureError::InvalidSize {
                        name: POINTER_WIDTH.to_string(),
                        value: bits,
                    });
                }
                Some((bits, POINTER_WIDTH.to_string()))
            }
            None => host
                .as_ref()
                .and_then(|h| h.pointer_width().map(|bits| (i64::from(bits), h.to_string()))),
        };

        let pointer_size = sizes.get("SIZEOF_VOID_P");
        if let (Some((bits, source)), Some(&pointer)) = (declared_bits, pointer_size) {
            // Compare in bytes; `pointer * 8` overflows for absurd sizes
            if bits % 8 != 0 || pointer != bits / 8 {
                return Err(ConfigureError::SizeMismatch {
                    message: format!(
                        "SIZEOF_VOID_P is {} bytes, but {} implies {}-bit pointers",
                        pointer, source, bits
                    ),
                });
            }
        }

        Ok(host)
    }

    fn validate_names(&self, registry: &CapabilityRegistry) -> Result<(), ConfigureError> {
        for (name, _) in registry.capabilities() {
            if is_reserved(name) {
                return Err(ConfigureError::ReservedName {
                    name: name.to_string(),
                });
            }
        }

        for alias in registry.aliases() {
            if is_reserved(&alias.name) {
                return Err(ConfigureError::ReservedName {
                    name: alias.name.clone(),
                });
            }

            let provided = portable_type(&alias.name)
                .map(|ty| registry.get(ty.provided_by).is_present())
                .unwrap_or(false);
            if provided || registry.contains(&alias.name) {
                return Err(ConfigureError::TypedefClash {
                    name: alias.name.clone(),
                });
            }
        }

        for &name in PATH_CAPABILITIES {
            if let Some(value) = registry.get(name).value() {
                if value.kind() != CapabilityKind::String {
                    return Err(ConfigureError::KindMismatch {
                        name: name.to_string(),
                        expected: CapabilityKind::String,
                        found: value.kind(),
                    });
                }
            }
        }

        Ok(())
    }
}

fn expect_integer(name: &str, value: &CapabilityValue) -> Result<i64, ConfigureError> {
    match value {
        CapabilityValue::Integer(n) => Ok(*n),
        other => Err(ConfigureError::KindMismatch {
            name: name.to_string(),
            expected: CapabilityKind::Integer,
            found: other.kind(),
        }),
    }
}

/// Check that the known sizes along a chain never decrease.
fn check_order(sizes: &BTreeMap<&str, i64>, chain: &[&str]) -> Result<(), ConfigureError> {
    let mut previous: Option<(&str, i64)> = None;

    for &name in chain {
        let Some(&size) = sizes.get(name) else {
            continue;
        };
        if let Some((prev_name, prev_size)) = previous {
            if size < prev_size {
                return Err(ConfigureError::SizeMismatch {
                    message: format!(
                        "{} ({}) is smaller than {} ({})",
                        name, size, prev_name, prev_size
                    ),
                });
            }
        }
        previous = Some((name, size));
    }

    Ok(())
}

/// Aliases in portable-type order; anything outside the table goes last.
fn ordered_aliases(registry: &CapabilityRegistry) -> Vec<TypeAlias> {
    let mut aliases: Vec<TypeAlias> = registry.aliases().cloned().collect();
    aliases.sort_by_key(|alias| {
        PORTABLE_TYPES
            .iter()
            .position(|ty| ty.name == alias.name)
            .unwrap_or(usize::MAX)
    });
    aliases
}
