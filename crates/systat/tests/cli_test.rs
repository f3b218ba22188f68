//! Integration tests for the `systat` binary.
//!
//! Argument parsing, help, completions, output shape and exit codes.
//! Nothing here needs a cluster or a reachable DNS server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

const ISOLATED_HOME: &str = "/tmp/systat-cli-test-nonexistent";

/// A `systat` command that never sees the user's config or environment.
fn systat_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("systat");
    cmd.env("HOME", ISOLATED_HOME)
        .env("XDG_CONFIG_HOME", ISOLATED_HOME)
        .env("XDG_DATA_HOME", ISOLATED_HOME)
        .env("NO_COLOR", "1")
        .env_remove("SYSTAT_CONFIG")
        .env_remove("SYSTAT_KUBECONFIG")
        .env_remove("SYSTAT_DEFAULTS__OUTPUT")
        .env_remove("SYSTAT_DEFAULTS__COLOR")
        .env_remove("SYSTAT_DNS__SERVER")
        .env_remove("KUBECONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, body).unwrap();
    path
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = systat_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    systat_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("sysinfo")
            .and(predicate::str::contains("metrics"))
            .and(predicate::str::contains("dns"))
            .and(predicate::str::contains("k8s"))
            .and(predicate::str::contains("dashboard")),
    );
}

#[test]
fn test_version_flag() {
    systat_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("systat"));
}

#[test]
fn test_completions_bash() {
    systat_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("systat"));
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    systat_cmd().arg("frobnicate").assert().code(2);
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn test_dns_requires_a_domain() {
    systat_cmd().arg("dns").assert().code(2);
}

#[test]
fn test_dns_rejects_extra_arguments() {
    systat_cmd()
        .args(["dns", "example.com", "example.org"])
        .assert()
        .code(2);
}

#[test]
fn test_dns_invalid_domain_exits_before_querying() {
    systat_cmd()
        .args(["dns", "bad..domain", "--server", "192.0.2.1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("bad..domain"));
}

#[test]
fn test_dns_unknown_record_type() {
    systat_cmd()
        .args(["dns", "example.com", "--type", "BOGUS"])
        .assert()
        .code(2);
}

#[test]
fn test_dns_bad_server_flag() {
    systat_cmd()
        .args(["dns", "example.com", "--server", "not-an-ip"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--server"));
}

#[test]
fn test_invalid_log_level() {
    systat_cmd()
        .args(["--level", "loud", "sysinfo"])
        .assert()
        .code(2);
}

#[test]
fn test_json_conflicts_with_output() {
    systat_cmd()
        .args(["--json", "-o", "yaml", "sysinfo"])
        .assert()
        .code(2);
}

#[test]
fn test_dashboard_refresh_must_be_positive() {
    systat_cmd()
        .args(["dashboard", "--refresh", "0"])
        .assert()
        .code(2);
}

// ── Output shape ────────────────────────────────────────────────────

#[test]
fn test_metrics_json_shape() {
    let output = systat_cmd().args(["metrics", "--json"]).output().unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value.get("host").is_some(), "missing host: {value}");
    assert!(value.get("cpu").is_some(), "missing cpu: {value}");
    assert!(value.get("memory").is_some(), "missing memory: {value}");
}

#[test]
fn test_process_json_is_a_list() {
    let output = systat_cmd().args(["ps", "--json"]).output().unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let list = value.as_array().unwrap();
    assert!(!list.is_empty());
    assert!(list[0].get("pid").is_some());
}

#[test]
fn test_raw_yaml_has_no_escapes() {
    let output = systat_cmd()
        .args(["sysinfo", "--raw", "--color", "always"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(!output.stdout.contains(&0x1b));
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_config_path_honours_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "");
    systat_cmd()
        .args(["config", "path", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(path.display().to_string()));
}

#[test]
fn test_config_show_merges_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[dns]\nserver = \"9.9.9.9:53\"\n");
    systat_cmd()
        .args(["config", "show", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("9.9.9.9:53"));
}

#[test]
fn test_malformed_config_exits_three() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[defaults\noutput = ");
    systat_cmd()
        .args(["sysinfo", "--config"])
        .arg(&path)
        .assert()
        .code(3);
}

#[test]
fn test_unknown_output_in_config_exits_three() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[defaults]\noutput = \"xml\"\n");
    systat_cmd()
        .args(["sysinfo", "--config"])
        .arg(&path)
        .assert()
        .code(3);
}

// ── Cluster ─────────────────────────────────────────────────────────

#[test]
fn test_k8s_missing_kubeconfig_exits_three() {
    systat_cmd()
        .args(["k8s", "--kubeconfig", "/nonexistent/systat/kubeconfig"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("kubeconfig"));
}
