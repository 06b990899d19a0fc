//! Core data structures for osconfig.
//!
//! This module contains the foundational types of a platform profile:
//! - Capabilities and the registry that holds them
//! - Backend domains and choices
//! - Language standards, host types and portable type names
//! - The immutable, validated `PlatformProfile`

pub mod capability;
pub mod domain;
pub mod facts;
pub mod host;
pub mod profile;
pub mod registry;
pub mod standard;
pub mod typedefs;

pub use capability::{CapabilityKind, CapabilityValue, Lookup};
pub use domain::{BackendChoice, BackendDomain, ChoiceOrigin, DomainOverride};
pub use facts::FactSheet;
pub use host::HostType;
pub use profile::{PlatformProfile, StandardRequirement};
pub use registry::{CapabilityRegistry, ProfileState};
pub use standard::{CxxStandard, StandardGate};
pub use typedefs::TypeAlias;
