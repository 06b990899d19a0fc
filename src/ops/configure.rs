//! Implementation of `osconfig configure`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::facts::FactSheet;
use crate::core::profile::PlatformProfile;
use crate::emit::{self, EmitOptions, OutputFormat};
use crate::resolver::{self, Declarations};

/// Options for resolving a fact sheet and writing the result.
#[derive(Debug, Clone)]
pub struct ConfigureOptions {
    /// Fact sheet to resolve
    pub facts: PathBuf,

    /// Output file (stdout when `None`)
    pub output: Option<PathBuf>,

    /// Output format
    pub format: OutputFormat,

    /// Naming options for the output
    pub emit: EmitOptions,

    /// Domains and standard gates to resolve against
    pub declarations: Declarations,
}

/// Result of a configure run.
#[derive(Debug)]
pub struct ConfigureResult {
    /// The validated profile
    pub profile: PlatformProfile,

    /// Rendered output
    pub rendered: String,

    /// Output file, if one was requested
    pub output: Option<PathBuf>,

    /// True if the output file already had identical content
    pub unchanged: bool,
}

/// Load, resolve and validate a fact sheet.
pub fn load_profile(facts: &Path, declarations: &Declarations) -> Result<PlatformProfile> {
    let sheet = FactSheet::load(facts)?;

    let profile = resolver::resolve(&sheet, declarations)
        .with_context(|| format!("failed to configure {}", facts.display()))?;

    tracing::debug!("Profile fingerprint {}", profile.fingerprint());
    Ok(profile)
}

/// Resolve a fact sheet and render it, writing the output file if requested.
///
/// An output file whose content is already identical is left untouched so
/// its modification time does not trigger rebuilds.
pub fn configure(opts: &ConfigureOptions) -> Result<ConfigureResult> {
    let profile = load_profile(&opts.facts, &opts.declarations)?;
    let rendered = emit::render(&profile, opts.format, &opts.emit)?;

    let mut unchanged = false;
    if let Some(ref output) = opts.output {
        unchanged = fs::read_to_string(output)
            .map(|existing| existing == rendered)
            .unwrap_or(false);

        if unchanged {
            tracing::info!("{} is up to date", output.display());
        } else {
            write_output(output, &rendered)?;
            tracing::info!("Wrote {}", output.display());
        }
    }

    Ok(ConfigureResult {
        profile,
        rendered,
        output: opts.output.clone(),
        unchanged,
    })
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory: {}", parent.display())
            })?;
        }
    }

    fs::write(path, contents)
        .with_context(|| format!("failed to write output: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ConfigureError;
    use crate::test_support::DARWIN_ARM64;
    use tempfile::TempDir;

    fn options(tmp: &TempDir, facts: &str) -> ConfigureOptions {
        let facts_path = tmp.path().join("facts.toml");
        fs::write(&facts_path, facts).unwrap();

        ConfigureOptions {
            facts: facts_path,
            output: Some(tmp.path().join("include").join("osconfig.h")),
            format: OutputFormat::Header,
            emit: EmitOptions::default(),
            declarations: Declarations::builtin(),
        }
    }

    #[test]
    fn test_configure_writes_header() {
        let tmp = TempDir::new().unwrap();
        let opts = options(&tmp, DARWIN_ARM64);

        let result = configure(&opts).unwrap();
        assert!(!result.unchanged);

        let written = fs::read_to_string(opts.output.as_ref().unwrap()).unwrap();
        assert_eq!(written, result.rendered);
        assert!(written.contains("DCMTK_ENABLE_LFS DCMTK_LFS64"));
    }

    #[test]
    fn test_second_run_leaves_output_untouched() {
        let tmp = TempDir::new().unwrap();
        let opts = options(&tmp, DARWIN_ARM64);

        configure(&opts).unwrap();
        let second = configure(&opts).unwrap();
        assert!(second.unchanged);
    }

    #[test]
    fn test_failure_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let facts = DARWIN_ARM64
            .replace("HAVE_LFS64_SUPPORT = true", "HAVE_LFS64_SUPPORT = false")
            .replace("HAVE_LFS_SUPPORT = true", "HAVE_LFS_SUPPORT = false");
        let opts = options(&tmp, &facts);

        let err = configure(&opts).unwrap_err();
        let cause = err.downcast_ref::<ConfigureError>().unwrap();
        assert!(matches!(cause, ConfigureError::NoAvailableBackend { .. }));
        assert!(!opts.output.as_ref().unwrap().exists());
    }
}
