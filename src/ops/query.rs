//! Implementation of `osconfig query`.

use std::path::Path;

use anyhow::Result;

use crate::core::capability::CapabilityValue;
use crate::core::profile::PlatformProfile;
use crate::ops::configure::load_profile;
use crate::resolver::Declarations;

/// Answer for one queried name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryAnswer {
    pub name: String,
    /// `None` when the capability was never detected
    pub value: Option<CapabilityValue>,
}

impl std::fmt::Display for QueryAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value {
            Some(ref value) => write!(f, "{} = {}", self.name, value),
            None => write!(f, "{} = unknown", self.name),
        }
    }
}

/// Query capabilities of a validated profile.
///
/// Names may also be backend domains, answered with the chosen backend.
pub fn query(
    facts: &Path,
    names: &[String],
    declarations: &Declarations,
) -> Result<Vec<QueryAnswer>> {
    let profile = load_profile(facts, declarations)?;
    Ok(names.iter().map(|name| answer(&profile, name)).collect())
}

fn answer(profile: &PlatformProfile, name: &str) -> QueryAnswer {
    let value = match profile.backend(name) {
        Some(backend) => Some(CapabilityValue::from(backend)),
        None => profile.get(name).value().cloned(),
    };

    QueryAnswer {
        name: name.to_string(),
        value,
    }
}
