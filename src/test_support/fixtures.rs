//! Fact-sheet fixtures for common test scenarios.

use crate::core::capability::CapabilityValue;
use crate::core::facts::FactSheet;

/// Detection results of an Apple Silicon macOS host.
pub const DARWIN_ARM64: &str = include_str!("../../tests/fixtures/darwin_arm64.toml");

/// The macOS fact sheet, parsed.
pub fn darwin_arm64() -> FactSheet {
    FactSheet::from_toml(DARWIN_ARM64).expect("darwin fixture must parse")
}

/// A 64-bit Linux host with only the facts resolution needs.
pub fn linux_x86_64() -> FactSheet {
    FactSheet::new()
        .with_fact("CANONICAL_HOST_TYPE", "X86_64-Linux")
        .with_fact("CXX_STANDARD", 2014i64)
        .with_fact("SIZEOF_CHAR", 1i64)
        .with_fact("SIZEOF_SHORT", 2i64)
        .with_fact("SIZEOF_INT", 4i64)
        .with_fact("SIZEOF_LONG", 8i64)
        .with_fact("SIZEOF_LONG_LONG", 8i64)
        .with_fact("SIZEOF_VOID_P", 8i64)
        .with_fact("WITH_ICU", true)
        .with_fact("HAVE_LFS64_SUPPORT", true)
}

/// Builder for variations of a base fact sheet.
#[derive(Debug, Clone)]
pub struct SheetFixture {
    sheet: FactSheet,
}

impl SheetFixture {
    /// Set or overwrite a fact.
    pub fn with(mut self, name: &str, value: impl Into<CapabilityValue>) -> Self {
        self.sheet.facts.insert(name.to_string(), value.into());
        self
    }

    /// Drop a fact so it becomes unknown.
    pub fn without(mut self, name: &str) -> Self {
        self.sheet.facts.remove(name);
        self
    }

    /// Override a domain default.
    pub fn with_default(mut self, domain: &str, backend: &str) -> Self {
        self.sheet = self.sheet.with_domain_default(domain, backend);
        self
    }

    pub fn build(self) -> FactSheet {
        self.sheet
    }
}

impl From<FactSheet> for SheetFixture {
    fn from(sheet: FactSheet) -> Self {
        SheetFixture { sheet }
    }
}
