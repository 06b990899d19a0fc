//! Backend selection - one strategy per domain.
//!
//! Candidates are tried in declaration order; the first one whose
//! availability capability is present wins. Fact order never matters.

use crate::core::domain::{BackendChoice, BackendDomain, ChoiceOrigin};
use crate::core::registry::CapabilityRegistry;
use crate::resolver::errors::ConfigureError;

/// Pick the backend for one domain.
///
/// Pure: reads the registry, writes nothing.
pub fn resolve(
    domain: &BackendDomain,
    registry: &CapabilityRegistry,
) -> Result<BackendChoice, ConfigureError> {
    for candidate in &domain.candidates {
        let lookup = registry.get(&candidate.requires);
        tracing::debug!(
            "{}: candidate {} ({} = {})",
            domain.name,
            candidate.id,
            candidate.requires,
            lookup
        );

        if lookup.is_present() {
            return Ok(BackendChoice {
                domain: domain.name.clone(),
                backend: candidate.id.clone(),
                origin: ChoiceOrigin::Available,
            });
        }
    }

    match domain.default {
        Some(ref default) => Ok(BackendChoice {
            domain: domain.name.clone(),
            backend: default.clone(),
            origin: ChoiceOrigin::Default,
        }),
        None => Err(ConfigureError::NoAvailableBackend {
            domain: domain.name.clone(),
            candidates: domain
                .candidates
                .iter()
                .map(|c| (c.id.clone(), c.requires.clone()))
                .collect(),
        }),
    }
}

/// Selects backends for every declared domain.
pub struct BackendSelector<'a> {
    domains: &'a [BackendDomain],
}

impl<'a> BackendSelector<'a> {
    /// Create a selector over the declared domains.
    pub fn new(domains: &'a [BackendDomain]) -> Self {
        BackendSelector { domains }
    }

    /// Resolve a single domain by name.
    pub fn resolve(
        &self,
        domain: &str,
        registry: &CapabilityRegistry,
    ) -> Result<BackendChoice, ConfigureError> {
        let declared = self
            .domains
            .iter()
            .find(|d| d.name == domain)
            .ok_or_else(|| ConfigureError::MissingChoice {
                domain: domain.to_string(),
            })?;
        resolve(declared, registry)
    }

    /// Resolve every domain and record the choices in the registry.
    ///
    /// Fails on the first domain with no available backend and no default.
    pub fn resolve_all(
        &self,
        registry: &mut CapabilityRegistry,
    ) -> Result<Vec<BackendChoice>, ConfigureError> {
        let mut choices = Vec::with_capacity(self.domains.len());

        for domain in self.domains {
            let choice = resolve(domain, registry)?;
            match choice.origin {
                ChoiceOrigin::Available => {
                    tracing::info!("{}: using {}", domain.name, choice.backend)
                }
                ChoiceOrigin::Default => tracing::info!(
                    "{}: no candidate available, using default {}",
                    domain.name,
                    choice.backend
                ),
            }

            registry.record_choice(choice.clone())?;
            choices.push(choice);
        }

        Ok(choices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{builtin_domains, charset_domain, lfs_domain, NONE_BACKEND};

    fn registry(facts: &[(&str, bool)]) -> CapabilityRegistry {
        let mut registry = CapabilityRegistry::new();
        for (name, value) in facts {
            registry.set(*name, *value).unwrap();
        }
        registry
    }

    #[test]
    fn test_icu_absent_selects_stdlibc_iconv() {
        let registry = registry(&[
            ("WITH_ICU", false),
            ("WITH_LIBICONV", false),
            ("WITH_STDLIBC_ICONV", true),
        ]);

        let choice = resolve(&charset_domain(), &registry).unwrap();
        assert_eq!(choice.backend, "STDLIBC_ICONV");
        assert_eq!(choice.origin, ChoiceOrigin::Available);
    }

    #[test]
    fn test_priority_follows_declaration() {
        // Both available: ICU is declared first and wins regardless of fact order
        let a = registry(&[("WITH_STDLIBC_ICONV", true), ("WITH_ICU", true)]);
        let b = registry(&[("WITH_ICU", true), ("WITH_STDLIBC_ICONV", true)]);

        assert_eq!(resolve(&charset_domain(), &a).unwrap().backend, "ICU");
        assert_eq!(resolve(&charset_domain(), &b).unwrap().backend, "ICU");
    }

    #[test]
    fn test_unknown_availability_is_not_available() {
        let registry = registry(&[]);
        let choice = resolve(&charset_domain(), &registry).unwrap();

        assert_eq!(choice.backend, NONE_BACKEND);
        assert_eq!(choice.origin, ChoiceOrigin::Default);
    }

    #[test]
    fn test_lfs_without_default_fails() {
        let registry = registry(&[("HAVE_LFS64_SUPPORT", false)]);
        let err = resolve(&lfs_domain(), &registry).unwrap_err();

        match err {
            ConfigureError::NoAvailableBackend { domain, candidates } => {
                assert_eq!(domain, "LFS");
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_all_records_one_choice_per_domain() {
        let domains = builtin_domains();
        let mut registry = registry(&[("WITH_ICU", true), ("HAVE_LFS_SUPPORT", true)]);

        let choices = BackendSelector::new(&domains)
            .resolve_all(&mut registry)
            .unwrap();

        assert_eq!(choices.len(), 2);
        assert_eq!(registry.choice("CHARSET").unwrap().backend, "ICU");
        assert_eq!(registry.choice("LFS").unwrap().backend, "LFS32");
        assert_eq!(registry.choices().count(), domains.len());
    }

    #[test]
    fn test_resolve_by_name() {
        let domains = builtin_domains();
        let registry = registry(&[("HAVE_LFS64_SUPPORT", true)]);
        let selector = BackendSelector::new(&domains);

        assert_eq!(selector.resolve("LFS", &registry).unwrap().backend, "LFS64");
        assert!(selector.resolve("THREADS", &registry).is_err());
    }
}
