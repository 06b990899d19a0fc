//! Canonical host type (`<ARCH>-<OS>`).

use serde::{Deserialize, Serialize};

/// Capability holding the canonical host type string.
pub const CANONICAL_HOST_TYPE: &str = "CANONICAL_HOST_TYPE";

/// Capability that declares the pointer width in bits explicitly.
pub const POINTER_WIDTH: &str = "POINTER_WIDTH";

/// Canonical host type components, e.g. `ARM_64-Darwin`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostType {
    /// CPU architecture (ARM_64, X86_64, I686, ...)
    pub arch: String,
    /// Operating system (Darwin, Linux, Windows, ...)
    pub os: String,
}

impl HostType {
    /// Create a new host type.
    pub fn new(arch: &str, os: &str) -> Self {
        HostType {
            arch: arch.to_string(),
            os: os.to_string(),
        }
    }

    /// Parse a host type string.
    ///
    /// The architecture may itself contain underscores but never a dash,
    /// so the first dash separates the two parts.
    pub fn parse(s: &str) -> Option<Self> {
        let (arch, os) = s.split_once('-')?;
        if arch.is_empty() || os.is_empty() || os.contains('-') {
            return None;
        }

        Some(HostType::new(arch, os))
    }

    /// Pointer width in bits implied by the architecture name, if recognizable.
    pub fn pointer_width(&self) -> Option<u32> {
        let arch = self.arch.to_ascii_uppercase();

        if arch.ends_with("_64") || arch.ends_with("64") {
            return Some(64);
        }

        match arch.as_str() {
            "X86" | "I386" | "I486" | "I586" | "I686" | "ARM" | "ARM_32" | "MIPS" | "PPC" => {
                Some(32)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for HostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.arch, self.os)
    }
}
