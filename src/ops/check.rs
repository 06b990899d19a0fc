//! Implementation of `osconfig check` and `osconfig domains`.

use std::path::Path;

use anyhow::Result;

use crate::core::capability::{CapabilityKind, SIZE_CAPABILITIES};
use crate::core::domain::ChoiceOrigin;
use crate::core::profile::PlatformProfile;
use crate::ops::configure::load_profile;
use crate::resolver::Declarations;

/// Summary of a validated profile.
#[derive(Debug, Clone)]
pub struct CheckReport {
    /// Canonical host type, if detected
    pub host: Option<String>,
    /// Number of capabilities by kind (presence, integer, string)
    pub counts: [usize; 3],
    /// `(domain, backend, fell back to default)` in declaration order
    pub choices: Vec<(String, String, bool)>,
    /// Synthesized aliases as C declarations
    pub aliases: Vec<String>,
    /// Effective standard requirement and the compiler standard
    pub standard: Option<(String, String)>,
    /// Size capabilities that were never detected
    pub unknown_sizes: Vec<String>,
    /// Profile fingerprint
    pub fingerprint: String,
}

/// Resolve and validate a fact sheet without writing anything.
pub fn check(facts: &Path, declarations: &Declarations) -> Result<CheckReport> {
    let profile = load_profile(facts, declarations)?;
    Ok(report(&profile))
}

fn report(profile: &PlatformProfile) -> CheckReport {
    let mut counts = [0usize; 3];
    for (_, value) in profile.capabilities() {
        let slot = match value.kind() {
            CapabilityKind::Presence => 0,
            CapabilityKind::Integer => 1,
            CapabilityKind::String => 2,
        };
        counts[slot] += 1;
    }

    let choices = profile
        .domains()
        .iter()
        .filter_map(|domain| profile.choice(&domain.name))
        .map(|c| {
            (
                c.domain.clone(),
                c.backend.clone(),
                c.origin == ChoiceOrigin::Default,
            )
        })
        .collect();

    let standard = profile.required_standard().map(|req| {
        let compiler = profile
            .compiler_standard()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        (format!("{} ({})", req.standard, req.capability), compiler)
    });

    CheckReport {
        host: profile.host().map(|h| h.to_string()),
        counts,
        choices,
        aliases: profile.aliases().iter().map(|a| a.to_string()).collect(),
        standard,
        unknown_sizes: SIZE_CAPABILITIES
            .iter()
            .filter(|name| profile.get(name).is_unknown())
            .map(|name| name.to_string())
            .collect(),
        fingerprint: profile.fingerprint().to_string(),
    }
}

/// Format a check report for display.
pub fn format_report(report: &CheckReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Host: {}\n",
        report.host.as_deref().unwrap_or("unknown")
    ));
    output.push_str(&format!(
        "Capabilities: {} flags, {} integers, {} strings\n",
        report.counts[0], report.counts[1], report.counts[2]
    ));

    output.push_str("\nBackends:\n");
    for (domain, backend, is_default) in &report.choices {
        let note = if *is_default { " (default)" } else { "" };
        output.push_str(&format!("  {:<10} {}{}\n", domain, backend, note));
    }

    if !report.aliases.is_empty() {
        output.push_str("\nFallback typedefs:\n");
        for alias in &report.aliases {
            output.push_str(&format!("  {}\n", alias));
        }
    }

    if let Some((ref required, ref compiler)) = report.standard {
        output.push_str(&format!("\nStandard: requires {}, compiler {}\n", required, compiler));
    }

    if !report.unknown_sizes.is_empty() {
        output.push_str(&format!("\nUnknown sizes: {}\n", report.unknown_sizes.join(", ")));
    }

    output.push_str(&format!("\nFingerprint: {}\n", report.fingerprint));
    output
}

/// Format the declared domains and standard gates.
pub fn format_declarations(declarations: &Declarations) -> String {
    let mut output = String::new();

    for domain in &declarations.domains {
        output.push_str(&format!(
            "{} (selector {})\n",
            domain.name,
            domain.enable_constant()
        ));
        for (i, candidate) in domain.candidates.iter().enumerate() {
            let constant = domain.constant(&candidate.id).unwrap_or_default();
            let value = domain.ordinal(&candidate.id).unwrap_or_default();
            output.push_str(&format!(
                "  {}. {:<14} requires {:<20} {} = {}\n",
                i + 1,
                candidate.id,
                candidate.requires,
                constant,
                value
            ));
        }
        match domain.default {
            Some(ref default) => output.push_str(&format!("  default: {}\n", default)),
            None => output.push_str("  default: none (a candidate must be available)\n"),
        }
    }

    if !declarations.gates.is_empty() {
        output.push_str("\nStandard gates:\n");
        for gate in &declarations.gates {
            output.push_str(&format!("  {}\n", gate));
        }
    }

    output
}
