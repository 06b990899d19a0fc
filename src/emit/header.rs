//! C header rendering.
//!
//! Layout:
//!
//! ```c
//! #ifndef OSCONFIG_H
//! #define OSCONFIG_H
//!
//! #define HAVE_ACCEPT 1
//! /* #undef HAVE_IO_H */
//! #define SIZEOF_LONG 8
//!
//! #define DCMTK_LFS 1
//! #define DCMTK_LFS64 2
//! #define DCMTK_ENABLE_LFS DCMTK_LFS64
//!
//! typedef unsigned char uchar;
//!
//! #if defined(__cplusplus) && __cplusplus < 201103L
//! #error "HAVE_CXX11 requires C++11 or newer"
//! #endif
//!
//! #endif /* OSCONFIG_H */
//! ```
//!
//! Unknown capabilities are omitted entirely. A domain resolved to a
//! default outside its candidate list leaves its `ENABLE` selector
//! undefined, so `#ifdef <NS>_ENABLE_<STEM>` reads as compiled out.

use std::collections::BTreeSet;

use crate::core::capability::{CapabilityValue, CHAR_CAPABILITIES};
use crate::core::domain::BackendDomain;
use crate::core::profile::PlatformProfile;
use crate::emit::EmitOptions;
use crate::resolver::errors::ConfigureError;

/// Render the profile as a C header.
///
/// Fails if a capability or alias would redefine a macro the header
/// generates itself (the include guard or a backend constant).
pub fn render(
    profile: &PlatformProfile,
    options: &EmitOptions,
) -> Result<String, ConfigureError> {
    check_collisions(profile, options)?;

    let mut out = String::new();

    out.push_str(&format!(
        "/* Generated by osconfig {}. Do not edit. */\n",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(host) = profile.host() {
        out.push_str(&format!("/* Host: {} */\n", host));
    }
    out.push_str(&format!("/* Fingerprint: {} */\n\n", &profile.fingerprint()[..16]));

    out.push_str(&format!("#ifndef {}\n#define {}\n", options.guard, options.guard));

    out.push('\n');
    for (name, value) in profile.capabilities() {
        out.push_str(&define_capability(name, value));
        out.push('\n');
    }

    for domain in profile.domains() {
        let Some(chosen) = profile.backend(&domain.name) else {
            continue;
        };
        out.push('\n');
        out.push_str(&backend_constants(domain, chosen, &options.namespace));
    }

    if !profile.aliases().is_empty() {
        out.push('\n');
        for alias in profile.aliases() {
            out.push_str(&format!("{}\n", alias));
        }
    }

    if let Some(requirement) = profile.required_standard() {
        out.push('\n');
        out.push_str(&format!(
            "#if defined(__cplusplus) && __cplusplus < {}L\n",
            requirement.standard.cplusplus_value()
        ));
        out.push_str(&format!(
            "#error \"{} requires {} or newer\"\n",
            requirement.capability, requirement.standard
        ));
        out.push_str("#endif\n");
    }

    out.push_str(&format!("\n#endif /* {} */\n", options.guard));
    Ok(out)
}

/// Macro names the header defines besides the capabilities.
fn generated_names(profile: &PlatformProfile, options: &EmitOptions) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    names.insert(options.guard.clone());

    for domain in profile.domains() {
        names.insert(format!("{}_{}", options.namespace, domain.enable_constant()));
        for candidate in &domain.candidates {
            if let Some(constant) = domain.constant(&candidate.id) {
                names.insert(format!("{}_{}", options.namespace, constant));
            }
        }
    }

    names
}

fn check_collisions(
    profile: &PlatformProfile,
    options: &EmitOptions,
) -> Result<(), ConfigureError> {
    let generated = generated_names(profile, options);

    let clash = profile
        .capabilities()
        .map(|(name, _)| name)
        .chain(profile.aliases().iter().map(|alias| alias.name.as_str()))
        .find(|name| generated.contains(*name));

    match clash {
        Some(name) => Err(ConfigureError::ReservedName {
            name: name.to_string(),
        }),
        None => Ok(()),
    }
}

/// One line for a known capability.
fn define_capability(name: &str, value: &CapabilityValue) -> String {
    match value {
        CapabilityValue::Presence(true) => format!("#define {} 1", name),
        CapabilityValue::Presence(false) => format!("/* #undef {} */", name),
        CapabilityValue::Integer(n) => format!("#define {} {}", name, n),
        CapabilityValue::String(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if CHAR_CAPABILITIES.contains(&name) => {
                    format!("#define {} {}", name, char_literal(c))
                }
                _ => format!("#define {} {}", name, string_literal(s)),
            }
        }
    }
}

/// Enumerated constants for a domain plus the `ENABLE` selector.
///
/// Constants are listed by value. Choosing a backend without a constant
/// (a `NONE` default) leaves the selector undefined.
fn backend_constants(domain: &BackendDomain, chosen: &str, namespace: &str) -> String {
    let mut constants: Vec<(u32, String)> = domain
        .candidates
        .iter()
        .filter_map(|c| Some((domain.ordinal(&c.id)?, domain.constant(&c.id)?)))
        .collect();
    constants.sort();

    let mut out = String::new();
    for (value, constant) in &constants {
        out.push_str(&format!("#define {}_{} {}\n", namespace, constant, value));
    }

    let selector = format!("{}_{}", namespace, domain.enable_constant());
    match domain.constant(chosen) {
        Some(constant) => {
            out.push_str(&format!("#define {} {}_{}\n", selector, namespace, constant))
        }
        None => out.push_str(&format!("/* #undef {} */\n", selector)),
    }
    out
}

fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            _ => push_escaped(&mut out, c),
        }
    }
    out.push('"');
    out
}

fn char_literal(c: char) -> String {
    let mut out = String::from("'");
    match c {
        '\'' => out.push_str("\\'"),
        _ => push_escaped(&mut out, c),
    }
    out.push('\'');
    out
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\t' => out.push_str("\\t"),
        '\r' => out.push_str("\\r"),
        // Octal escapes cannot swallow following hex digits
        c if c.is_ascii_control() => out.push_str(&format!("\\{:03o}", c as u32)),
        c => out.push(c),
    }
}
