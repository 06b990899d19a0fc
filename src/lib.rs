//! osconfig - platform capability profiles for C/C++ builds
//!
//! This crate turns raw platform facts about a build target (headers,
//! functions, type sizes, language standards) into a validated, immutable
//! `PlatformProfile`, selects one backend per backend domain, synthesizes
//! fallback typedefs, and renders the result as a C header or JSON.

pub mod core;
pub mod emit;
pub mod ops;
pub mod resolver;
pub mod util;

/// Fact-sheet fixtures for osconfig unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests.
#[cfg(test)]
pub mod test_support;

pub use core::{
    facts::FactSheet, profile::PlatformProfile, registry::CapabilityRegistry, Lookup,
};

pub use resolver::{resolve, ConfigureError, Declarations};
