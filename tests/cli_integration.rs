// CLI integration tests for probe/init/version flows.
use std::process::Command;

use serde_json::Value;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_fitzlink");
    Command::new(exe)
}

fn parse_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("valid json")
}

fn parse_json_line(output: &[u8]) -> Value {
    let text = String::from_utf8_lossy(output);
    let line = text.lines().next().expect("json line");
    serde_json::from_str(line).expect("valid json")
}

fn linked() -> bool {
    fitzlink::core::native::NativeAllocator::is_linked()
}

#[test]
fn probe_reports_balanced_cycles() {
    let output = cmd()
        .args(["probe", "--repeat", "3"])
        .env_remove("RUST_LOG")
        .output()
        .expect("probe");
    assert!(output.status.success());
    assert!(output.stderr.is_empty());

    let report = parse_json(&output.stdout);
    assert_eq!(report["attempts"], 3);
    assert_eq!(report["budget"], "unlimited");
    assert_eq!(report["linked"], linked());
    assert_eq!(report["acquired"], report["released"]);
    let expected_acquired = if linked() { 3 } else { 0 };
    assert_eq!(report["acquired"], expected_acquired);
    assert_eq!(report["mupdf_version"].is_string(), linked());
}

#[test]
fn probe_normalizes_budget() {
    let output = cmd()
        .args(["probe", "--budget", "1MiB"])
        .output()
        .expect("probe");
    assert!(output.status.success());
    let report = parse_json(&output.stdout);
    assert_eq!(report["budget"], "1048576");
}

#[test]
fn probe_rejects_bad_budget() {
    let output = cmd()
        .args(["probe", "--budget", "0"])
        .output()
        .expect("probe");
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let err = parse_json_line(&output.stderr);
    assert_eq!(err["error"]["kind"], "Usage");
    assert!(err["error"]["message"].as_str().unwrap().contains("store budget"));
    assert!(err["error"]["hint"].is_string());
}

#[test]
fn require_native_fails_on_stub_build() {
    let output = cmd()
        .args(["probe", "--require-native"])
        .output()
        .expect("probe");
    if linked() {
        assert!(output.status.success());
        return;
    }
    assert_eq!(output.status.code(), Some(3));
    let err = parse_json_line(&output.stderr);
    assert_eq!(err["error"]["kind"], "Unavailable");
}

#[test]
fn init_is_silent() {
    for _ in 0..2 {
        let output = cmd()
            .arg("init")
            .env_remove("RUST_LOG")
            .output()
            .expect("init");
        assert!(output.status.success());
        assert!(output.stdout.is_empty());
        assert!(output.stderr.is_empty());
    }
}

#[test]
fn version_reports_crate_and_linkage() {
    let output = cmd().arg("version").output().expect("version");
    assert!(output.status.success());
    let value = parse_json(&output.stdout);
    assert_eq!(value["fitzlink"], env!("CARGO_PKG_VERSION"));
    assert_eq!(value["linked"], linked());
    assert_eq!(value["mupdf"].is_null(), !linked());
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let output = cmd().arg("render").output().expect("render");
    assert_eq!(output.status.code(), Some(2));
    let err = parse_json_line(&output.stderr);
    assert_eq!(err["error"]["kind"], "Usage");
}

#[test]
fn completion_mentions_subcommands() {
    let output = cmd().args(["completion", "bash"]).output().expect("completion");
    assert!(output.status.success());
    let script = String::from_utf8_lossy(&output.stdout);
    assert!(script.contains("fitzlink"));
    assert!(script.contains("probe"));
}
