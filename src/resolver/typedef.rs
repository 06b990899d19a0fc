//! Fallback typedefs for portable type names the platform lacks.

use crate::core::registry::CapabilityRegistry;
use crate::core::typedefs::{PortableType, TypeAlias, UnderlyingType, PORTABLE_TYPES};
use crate::resolver::errors::ConfigureError;

/// Synthesizes `typedef` aliases for missing portable types.
///
/// A type whose provided flag is present never gets an alias. Running the
/// resolver again over the same registry yields the same aliases.
pub struct TypedefFallbackResolver {
    types: &'static [PortableType],
}

impl TypedefFallbackResolver {
    /// Create a resolver over the built-in portable type list.
    pub fn new() -> Self {
        TypedefFallbackResolver {
            types: PORTABLE_TYPES,
        }
    }

    /// Compute the aliases the registry needs, in portable-type order.
    pub fn resolve(
        &self,
        registry: &CapabilityRegistry,
    ) -> Result<Vec<TypeAlias>, ConfigureError> {
        let mut aliases = Vec::new();

        for ty in self.types {
            if registry.get(ty.provided_by).is_present() {
                tracing::debug!("{} provided by the platform", ty.name);
                continue;
            }

            let target = pick_underlying(ty, registry)?;
            tracing::debug!("{} missing, falling back to {}", ty.name, target.spelling);
            aliases.push(TypeAlias::new(ty.name, target.spelling));
        }

        Ok(aliases)
    }

    /// Compute the aliases and record them in the registry.
    pub fn apply(
        &self,
        registry: &mut CapabilityRegistry,
    ) -> Result<Vec<TypeAlias>, ConfigureError> {
        let aliases = self.resolve(registry)?;
        for alias in &aliases {
            registry.record_alias(alias.clone())?;
        }

        if !aliases.is_empty() {
            tracing::info!("Synthesized {} fallback typedef(s)", aliases.len());
        }
        Ok(aliases)
    }
}

impl Default for TypedefFallbackResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Choose the underlying type for a missing portable type.
///
/// Fixed-width types prefer a candidate of known matching size, then one
/// whose size was never detected. A candidate with a known wrong size is
/// never used.
fn pick_underlying(
    ty: &PortableType,
    registry: &CapabilityRegistry,
) -> Result<&'static UnderlyingType, ConfigureError> {
    let Some(width) = ty.width else {
        return ty
            .candidates
            .first()
            .ok_or_else(|| ConfigureError::UnrepresentableType {
                name: ty.name.to_string(),
                width: 0,
            });
    };

    let size_of = |c: &UnderlyingType| {
        c.size_capability.and_then(|cap| registry.get(cap).integer())
    };

    let exact = ty.candidates.iter().find(|c| size_of(*c) == Some(width));
    let unmeasured = || ty.candidates.iter().find(|c| size_of(*c).is_none());

    exact
        .or_else(unmeasured)
        .ok_or_else(|| ConfigureError::UnrepresentableType {
            name: ty.name.to_string(),
            width,
        })
}
