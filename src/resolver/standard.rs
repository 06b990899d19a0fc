//! Language-standard requirement computation and enforcement.
//!
//! - Every gate that fires contributes a requirement
//! - The effective requirement is the maximum (first gate wins a tie)
//! - `CXX_STANDARD` must meet it

use crate::core::capability::{CapabilityKind, CapabilityValue};
use crate::core::profile::StandardRequirement;
use crate::core::registry::CapabilityRegistry;
use crate::core::standard::{CxxStandard, GateRequirement, StandardGate, CXX_STANDARD};
use crate::resolver::errors::ConfigureError;

/// Read the compiler's resolved standard, if one was detected.
pub fn compiler_standard(
    registry: &CapabilityRegistry,
) -> Result<Option<CxxStandard>, ConfigureError> {
    match registry.get(CXX_STANDARD).value() {
        None => Ok(None),
        Some(value) => level_of(CXX_STANDARD, value).map(Some),
    }
}

/// Compute the strictest requirement asserted by any gate.
pub fn effective_requirement(
    registry: &CapabilityRegistry,
    gates: &[StandardGate],
) -> Result<Option<StandardRequirement>, ConfigureError> {
    let mut effective: Option<StandardRequirement> = None;

    for gate in gates {
        let Some(standard) = gate_requirement(registry, gate)? else {
            continue;
        };

        tracing::debug!("{} requires {}", gate.capability, standard);

        let stricter = match effective {
            Some(ref current) => standard > current.standard,
            None => true,
        };
        if stricter {
            effective = Some(StandardRequirement {
                capability: gate.capability.clone(),
                standard,
            });
        }
    }

    Ok(effective)
}

/// Check that the compiler standard meets the effective requirement.
///
/// Returns both so the validator can store them in the profile.
pub fn check(
    registry: &CapabilityRegistry,
    gates: &[StandardGate],
) -> Result<(Option<CxxStandard>, Option<StandardRequirement>), ConfigureError> {
    let compiler = compiler_standard(registry)?;
    let required = effective_requirement(registry, gates)?;

    if let Some(ref requirement) = required {
        match compiler {
            None => {
                return Err(ConfigureError::MissingStandard {
                    capability: requirement.capability.clone(),
                    required: requirement.standard.year(),
                })
            }
            Some(actual) if !actual.satisfies(requirement.standard) => {
                return Err(ConfigureError::StandardMismatch {
                    capability: requirement.capability.clone(),
                    required: requirement.standard.year(),
                    actual: actual.year(),
                })
            }
            Some(_) => {}
        }
    }

    Ok((compiler, required))
}

/// Requirement asserted by a single gate, if it fires.
fn gate_requirement(
    registry: &CapabilityRegistry,
    gate: &StandardGate,
) -> Result<Option<CxxStandard>, ConfigureError> {
    let lookup = registry.get(&gate.capability);
    let Some(value) = lookup.value() else {
        return Ok(None);
    };

    match gate.requirement {
        GateRequirement::Flag { standard } => match lookup.presence() {
            Some(true) => Ok(Some(standard)),
            Some(false) => Ok(None),
            None => Err(ConfigureError::KindMismatch {
                name: gate.capability.clone(),
                expected: CapabilityKind::Presence,
                found: value.kind(),
            }),
        },
        GateRequirement::Level => level_of(&gate.capability, value).map(Some),
    }
}

fn level_of(name: &str, value: &CapabilityValue) -> Result<CxxStandard, ConfigureError> {
    let CapabilityValue::Integer(level) = value else {
        return Err(ConfigureError::KindMismatch {
            name: name.to_string(),
            expected: CapabilityKind::Integer,
            found: value.kind(),
        });
    };

    CxxStandard::from_level(*level).ok_or_else(|| ConfigureError::InvalidStandard {
        name: name.to_string(),
        value: *level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::standard::{builtin_gates, CXX_STANDARD_REQUIRED};

    fn registry(facts: Vec<(&str, CapabilityValue)>) -> CapabilityRegistry {
        CapabilityRegistry::from_facts(facts).unwrap()
    }

    #[test]
    fn test_requirement_met() {
        let registry = registry(vec![
            (CXX_STANDARD, CapabilityValue::Integer(2017)),
            ("HAVE_CXX11", CapabilityValue::Presence(true)),
            ("HAVE_CXX14", CapabilityValue::Presence(true)),
        ]);

        let (compiler, required) = check(&registry, &builtin_gates()).unwrap();
        assert_eq!(compiler, Some(CxxStandard::Cxx17));

        let required = required.unwrap();
        assert_eq!(required.standard, CxxStandard::Cxx14);
        assert_eq!(required.capability, "HAVE_CXX14");
    }

    #[test]
    fn test_cplusplus_199711_meets_cxx03_requirement() {
        let registry = registry(vec![
            (CXX_STANDARD, CapabilityValue::Integer(199711)),
            (CXX_STANDARD_REQUIRED, CapabilityValue::Integer(2003)),
        ]);

        let (compiler, required) = check(&registry, &builtin_gates()).unwrap();
        assert_eq!(compiler, Some(CxxStandard::Cxx98));
        assert_eq!(required.unwrap().standard, CxxStandard::Cxx03);

        let registry = registry_with_required(199711, 2011);
        assert!(matches!(
            check(&registry, &builtin_gates()),
            Err(ConfigureError::StandardMismatch { required: 2011, actual: 1998, .. })
        ));
    }

    fn registry_with_required(actual: i64, required: i64) -> CapabilityRegistry {
        registry(vec![
            (CXX_STANDARD, CapabilityValue::Integer(actual)),
            (CXX_STANDARD_REQUIRED, CapabilityValue::Integer(required)),
        ])
    }

    #[test]
    fn test_requested_newer_than_compiler() {
        let registry = registry(vec![
            (CXX_STANDARD_REQUIRED, CapabilityValue::Integer(2017)),
            (CXX_STANDARD, CapabilityValue::Integer(2003)),
        ]);

        let err = check(&registry, &builtin_gates()).unwrap_err();
        assert_eq!(
            err,
            ConfigureError::StandardMismatch {
                capability: CXX_STANDARD_REQUIRED.to_string(),
                required: 2017,
                actual: 2003,
            }
        );
    }

    #[test]
    fn test_requirement_without_compiler_standard() {
        let registry = registry(vec![("HAVE_CXX20", CapabilityValue::Presence(true))]);

        let err = check(&registry, &builtin_gates()).unwrap_err();
        assert!(matches!(err, ConfigureError::MissingStandard { required: 2020, .. }));
    }

    #[test]
    fn test_absent_flags_assert_nothing() {
        let registry = registry(vec![
            ("HAVE_CXX20", CapabilityValue::Presence(false)),
            (CXX_STANDARD, CapabilityValue::Integer(199711)),
        ]);

        let (compiler, required) = check(&registry, &builtin_gates()).unwrap();
        assert_eq!(compiler, Some(CxxStandard::Cxx98));
        assert!(required.is_none());
    }

    #[test]
    fn test_tie_keeps_first_gate() {
        let registry = registry(vec![
            (CXX_STANDARD_REQUIRED, CapabilityValue::Integer(17)),
            ("HAVE_CXX17", CapabilityValue::Presence(true)),
        ]);

        let required = effective_requirement(&registry, &builtin_gates())
            .unwrap()
            .unwrap();
        assert_eq!(required.capability, CXX_STANDARD_REQUIRED);
    }

    #[test]
    fn test_invalid_levels() {
        let bad_level = registry(vec![(CXX_STANDARD, CapabilityValue::Integer(2016))]);
        assert!(matches!(
            compiler_standard(&bad_level),
            Err(ConfigureError::InvalidStandard { value: 2016, .. })
        ));

        let bad_kind = registry(vec![(CXX_STANDARD, CapabilityValue::from("c++17"))]);
        assert!(matches!(
            compiler_standard(&bad_kind),
            Err(ConfigureError::KindMismatch { .. })
        ));
    }
}
