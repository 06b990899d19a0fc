//! Configuration error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::capability::CapabilityKind;
use crate::core::registry::ProfileState;
use crate::util::diagnostic::Diagnostic;

/// Error raised while building or validating a platform profile.
///
/// Any of these aborts configuration; no partial profile is ever handed
/// out. `UnknownCapability` only surfaces from `require`.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum ConfigureError {
    #[error("capability `{name}` was not detected")]
    #[diagnostic(code(osconfig::capability::unknown))]
    UnknownCapability { name: String },

    #[error("no available backend for domain `{domain}`")]
    #[diagnostic(code(osconfig::backend::none_available))]
    NoAvailableBackend {
        domain: String,
        candidates: Vec<(String, String)>, // (backend, availability capability)
    },

    #[error("`{capability}` requires C++ standard {required}, but the compiler provides {actual}")]
    #[diagnostic(code(osconfig::standard::mismatch))]
    StandardMismatch {
        capability: String,
        required: u32,
        actual: u32,
    },

    #[error(
        "`{capability}` requires C++ standard {required}, but no compiler standard was resolved"
    )]
    #[diagnostic(code(osconfig::standard::missing))]
    MissingStandard { capability: String, required: u32 },

    #[error("`{name}` is not a recognized C++ standard level: {value}")]
    #[diagnostic(code(osconfig::standard::invalid))]
    InvalidStandard { name: String, value: i64 },

    #[error("cannot modify `{name}`: the profile is already sealed")]
    #[diagnostic(code(osconfig::registry::use_after_seal))]
    UseAfterSeal { name: String },

    #[error("invalid profile transition: {from} -> {to}")]
    #[diagnostic(code(osconfig::registry::invalid_transition))]
    InvalidTransition { from: ProfileState, to: ProfileState },

    #[error("`{name}` is not a valid C identifier")]
    #[diagnostic(code(osconfig::capability::invalid_name))]
    InvalidName { name: String },

    #[error("`{name}` must be a {expected} capability, found {found}")]
    #[diagnostic(code(osconfig::capability::kind_mismatch))]
    KindMismatch {
        name: String,
        expected: CapabilityKind,
        found: CapabilityKind,
    },

    #[error("`{name}` = {value} is not a positive power-of-two byte count")]
    #[diagnostic(code(osconfig::size::invalid))]
    InvalidSize { name: String, value: i64 },

    #[error("inconsistent type sizes: {message}")]
    #[diagnostic(code(osconfig::size::mismatch))]
    SizeMismatch { message: String },

    #[error("malformed host type `{value}`, expected `<ARCH>-<OS>`")]
    #[diagnostic(code(osconfig::host::invalid))]
    InvalidHostType { value: String },

    #[error("`{name}` collides with a reserved or generated macro name")]
    #[diagnostic(code(osconfig::capability::reserved))]
    ReservedName { name: String },

    #[error("fallback typedef for `{name}` would redefine a type the platform provides")]
    #[diagnostic(code(osconfig::typedef::clash))]
    TypedefClash { name: String },

    #[error("no {width}-byte underlying type available for `{name}`")]
    #[diagnostic(code(osconfig::typedef::unrepresentable))]
    UnrepresentableType { name: String, width: i64 },

    #[error("domain `{domain}` already has backend `{existing}` selected")]
    #[diagnostic(code(osconfig::backend::duplicate_choice))]
    DuplicateChoice { domain: String, existing: String },

    #[error("no backend selected for domain `{domain}`")]
    #[diagnostic(code(osconfig::backend::missing_choice))]
    MissingChoice { domain: String },

    #[error("backend `{backend}` is not declared for domain `{domain}`")]
    #[diagnostic(code(osconfig::backend::unknown))]
    UnknownBackend { domain: String, backend: String },
}

impl ConfigureError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());

        match self {
            ConfigureError::UnknownCapability { name } => diag
                .with_suggestion(format!("Add `{}` to the fact sheet", name))
                .with_suggestion("Query with `get` to treat the value as optional"),

            ConfigureError::NoAvailableBackend { domain, candidates } => {
                let mut diag = diag;
                for (backend, requires) in candidates {
                    diag = diag.with_context(format!(
                        "`{}` needs `{}` to be present",
                        backend, requires
                    ));
                }
                diag.with_suggestion(format!(
                    "Declare a default: `[domains.{}] default = \"...\"`",
                    domain
                ))
                .with_suggestion("Install a candidate library and regenerate the fact sheet")
            }

            ConfigureError::StandardMismatch {
                capability,
                required,
                actual,
            } => diag
                .with_context(format!("`{}` asks for {}", capability, required))
                .with_context(format!("`CXX_STANDARD` is {}", actual))
                .with_suggestion(format!(
                    "Configure the compiler for C++{:02} or newer",
                    required % 100
                ))
                .with_suggestion(format!("Drop `{}` from the fact sheet", capability)),

            ConfigureError::MissingStandard { capability, .. } => diag
                .with_context(format!("`{}` is standard-gated", capability))
                .with_suggestion("Detect the compiler standard and set `CXX_STANDARD`"),

            ConfigureError::UseAfterSeal { .. } | ConfigureError::InvalidTransition { .. } => {
                diag.with_context("profiles move Open -> Sealed -> Validated | Rejected")
            }

            ConfigureError::KindMismatch { name, expected, .. } => diag.with_suggestion(
                format!("Write `{}` as a {} value in the fact sheet", name, expected),
            ),

            ConfigureError::InvalidSize { name, .. } => {
                diag.with_suggestion(format!("Re-measure `sizeof` for `{}`", name))
            }

            ConfigureError::SizeMismatch { .. } => diag
                .with_suggestion("Check that all sizes were detected for the same target")
                .with_suggestion("Set `POINTER_WIDTH` explicitly for unusual architectures"),

            ConfigureError::InvalidHostType { .. } => {
                diag.with_suggestion("Use a host type such as `ARM_64-Darwin`")
            }

            ConfigureError::ReservedName { name } => {
                diag.with_suggestion(format!(
                "Rename `{}`; the compiler or the generated header defines it",
                name
            ))
            }

            ConfigureError::TypedefClash { name } => diag.with_context(format!(
                "the platform already provides `{}`",
                name
            )),

            ConfigureError::UnrepresentableType { .. } => {
                diag.with_suggestion("Measure `SIZEOF_LONG_LONG` or mark the type as provided")
            }

            ConfigureError::UnknownBackend { domain, .. } => diag.with_suggestion(format!(
                "Run `osconfig domains` to see the backends of `{}`",
                domain
            )),

            ConfigureError::InvalidStandard { .. }
            | ConfigureError::InvalidName { .. }
            | ConfigureError::DuplicateChoice { .. }
            | ConfigureError::MissingChoice { .. } => diag,
        }
    }
}
