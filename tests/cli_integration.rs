//! CLI integration tests for osconfig.
//!
//! These tests drive the binary end to end: fact sheet in, header or JSON out.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

const DARWIN: &str = include_str!("fixtures/darwin_arm64.toml");

/// Get the osconfig binary command, isolated from the user's global config.
fn osconfig(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("osconfig").unwrap();
    cmd.env("HOME", dir.join("home")).current_dir(dir);
    cmd
}

/// Create a temporary directory holding a fact sheet.
fn with_facts(contents: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let facts = tmp.path().join("facts.toml");
    fs::write(&facts, contents).unwrap();
    (tmp, facts)
}

// ============================================================================
// osconfig configure
// ============================================================================

#[test]
fn test_configure_prints_header() {
    let (tmp, facts) = with_facts(DARWIN);

    osconfig(tmp.path())
        .arg("configure")
        .arg(&facts)
        .assert()
        .success()
        .stdout(predicate::str::contains("#ifndef OSCONFIG_H"))
        .stdout(predicate::str::contains("#define HAVE_ACCEPT 1"))
        .stdout(predicate::str::contains(
            "#define DCMTK_ENABLE_CHARSET_CONVERSION DCMTK_CHARSET_CONVERSION_STDLIBC_ICONV",
        ))
        .stdout(predicate::str::contains("typedef unsigned char uchar;"))
        .stdout(predicate::str::contains("SIZEOF_OFF_T").not());
}

#[test]
fn test_configure_writes_output_file() {
    let (tmp, facts) = with_facts(DARWIN);
    let output = tmp.path().join("include").join("osconfig.h");

    osconfig(tmp.path())
        .arg("configure")
        .arg(&facts)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let header = fs::read_to_string(&output).unwrap();
    assert!(header.contains("#define DCMTK_ENABLE_LFS DCMTK_LFS64"));
}

#[test]
fn test_configure_is_deterministic() {
    let (tmp, facts) = with_facts(DARWIN);

    let first = osconfig(tmp.path()).arg("configure").arg(&facts).output().unwrap();
    let second = osconfig(tmp.path()).arg("configure").arg(&facts).output().unwrap();

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_configure_json() {
    let (tmp, facts) = with_facts(DARWIN);

    let output = osconfig(tmp.path())
        .args(["configure", "--format", "json"])
        .arg(&facts)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["choices"]["LFS"]["backend"], "LFS64");
    assert_eq!(value["capabilities"]["CANONICAL_HOST_TYPE"], "ARM_64-Darwin");
}

#[test]
fn test_configure_json_fact_sheet() {
    let tmp = TempDir::new().unwrap();
    let facts = tmp.path().join("facts.json");
    fs::write(
        &facts,
        r#"{"facts": {"WITH_ICU": true, "HAVE_LFS_SUPPORT": true, "SIZEOF_INT": 4}}"#,
    )
    .unwrap();

    osconfig(tmp.path())
        .arg("configure")
        .arg(&facts)
        .assert()
        .success()
        .stdout(predicate::str::contains("DCMTK_CHARSET_CONVERSION_ICU"))
        .stdout(predicate::str::contains("DCMTK_ENABLE_LFS DCMTK_LFS\n"));
}

#[test]
fn test_configure_namespace_flag() {
    let (tmp, facts) = with_facts(DARWIN);

    osconfig(tmp.path())
        .args(["configure", "--namespace", "OFCONFIG"])
        .arg(&facts)
        .assert()
        .success()
        .stdout(predicate::str::contains("#define OFCONFIG_ENABLE_LFS OFCONFIG_LFS64"));
}

#[test]
fn test_configure_unknown_format() {
    let (tmp, facts) = with_facts(DARWIN);

    osconfig(tmp.path())
        .args(["configure", "--format", "yaml"])
        .arg(&facts)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown output format"));
}

#[test]
fn test_project_config_sets_namespace_and_default() {
    let facts = DARWIN
        .replace("HAVE_LFS64_SUPPORT = true", "HAVE_LFS64_SUPPORT = false")
        .replace("HAVE_LFS_SUPPORT = true", "HAVE_LFS_SUPPORT = false");
    let (tmp, facts) = with_facts(&facts);

    let config_dir = tmp.path().join(".osconfig");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[emit]\nnamespace = \"MYNS\"\n\n[domains.LFS]\ndefault = \"NONE\"\n",
    )
    .unwrap();

    osconfig(tmp.path())
        .arg("configure")
        .arg(&facts)
        .assert()
        .success()
        .stdout(predicate::str::contains("#define MYNS_LFS64 2"))
        .stdout(predicate::str::contains("/* #undef MYNS_ENABLE_LFS */"))
        .stdout(predicate::str::contains("#define MYNS_ENABLE_LFS").not())
        .stdout(predicate::str::contains("_NONE").not());
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_no_available_backend_fails() {
    let facts = DARWIN
        .replace("HAVE_LFS64_SUPPORT = true", "HAVE_LFS64_SUPPORT = false")
        .replace("HAVE_LFS_SUPPORT = true", "HAVE_LFS_SUPPORT = false");
    let (tmp, facts) = with_facts(&facts);
    let output = tmp.path().join("osconfig.h");

    osconfig(tmp.path())
        .arg("configure")
        .arg(&facts)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no available backend for domain `LFS`"))
        .stderr(predicate::str::contains("HAVE_LFS64_SUPPORT"))
        .stderr(predicate::str::contains("help: consider:"))
        .stderr(predicate::str::contains("--> ").and(predicate::str::contains("facts.toml")));

    assert!(!output.exists());
}

#[test]
fn test_standard_mismatch_fails() {
    let facts = DARWIN.replace(
        "CXX_STANDARD = 2017",
        "CXX_STANDARD = 2003\nCXX_STANDARD_REQUIRED = 2017",
    );
    let (tmp, facts) = with_facts(&facts);

    osconfig(tmp.path())
        .args(["check"])
        .arg(&facts)
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires C++ standard 2017"))
        .stderr(predicate::str::contains("2003"));
}

#[test]
fn test_fact_redefining_generated_constant_fails() {
    let facts = DARWIN.replace("[facts]", "[facts]\nDCMTK_ENABLE_LFS = 7");
    let (tmp, facts) = with_facts(&facts);

    osconfig(tmp.path())
        .arg("configure")
        .arg(&facts)
        .assert()
        .failure()
        .stderr(predicate::str::contains("`DCMTK_ENABLE_LFS`"));
}

#[test]
fn test_missing_fact_sheet() {
    let tmp = TempDir::new().unwrap();

    osconfig(tmp.path())
        .args(["check", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read fact sheet"));
}

// ============================================================================
// osconfig check / query / domains
// ============================================================================

#[test]
fn test_check_reports_profile() {
    let (tmp, facts) = with_facts(DARWIN);

    osconfig(tmp.path())
        .arg("check")
        .arg(&facts)
        .assert()
        .success()
        .stdout(predicate::str::contains("Host: ARM_64-Darwin"))
        .stdout(predicate::str::contains("STDLIBC_ICONV"))
        .stdout(predicate::str::contains("Unknown sizes:"))
        .stdout(predicate::str::contains("Profile is valid."));
}

#[test]
fn test_query_known_and_unknown() {
    let (tmp, facts) = with_facts(DARWIN);

    osconfig(tmp.path())
        .arg("query")
        .arg(&facts)
        .args(["SIZEOF_LONG", "SIZEOF_OFF_T", "WITH_ICU", "CHARSET"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SIZEOF_LONG = 8\n"))
        .stdout(predicate::str::contains("SIZEOF_OFF_T = unknown\n"))
        .stdout(predicate::str::contains("WITH_ICU = false\n"))
        .stdout(predicate::str::contains("CHARSET = \"STDLIBC_ICONV\"\n"))
        .stderr(predicate::str::contains("warning: not detected: SIZEOF_OFF_T"))
        .stderr(predicate::str::contains("--> "));
}

#[test]
fn test_domains_lists_builtins() {
    let tmp = TempDir::new().unwrap();

    osconfig(tmp.path())
        .arg("domains")
        .assert()
        .success()
        .stdout(predicate::str::contains("CHARSET (selector ENABLE_CHARSET_CONVERSION)"))
        .stdout(predicate::str::contains("LFS64 = 2"))
        .stdout(predicate::str::contains("CXX_STANDARD_REQUIRED requires its value"));
}

#[test]
fn test_completions() {
    let tmp = TempDir::new().unwrap();

    osconfig(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("osconfig"));
}
