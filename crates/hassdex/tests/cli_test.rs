//! Integration tests for the `hassdex` CLI binary.
//!
//! Argument parsing, help output, completions and error exits run without
//! a hub; the indexing round-trip talks to a wiremock hub.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

const NOWHERE: &str = "/tmp/hassdex-cli-test-nonexistent";

/// Build a [`Command`] for the `hassdex` binary with env isolation.
///
/// Clears all `HASSDEX_*` env vars and points config and data directories
/// at a nonexistent path so tests never touch the user's real files.
fn hassdex_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("hassdex");
    cmd.env("HOME", NOWHERE)
        .env("XDG_CONFIG_HOME", NOWHERE)
        .env("XDG_DATA_HOME", NOWHERE)
        .env_remove("RUST_LOG")
        .env_remove("HASSDEX_PROFILE")
        .env_remove("HASSDEX_HUB")
        .env_remove("HASSDEX_TOKEN")
        .env_remove("HASSDEX_TOKEN_FILE")
        .env_remove("HASSDEX_INDEX")
        .env_remove("HASSDEX_PREVIOUS_INDEX")
        .env_remove("HASSDEX_OUTPUT")
        .env_remove("HASSDEX_COLOR")
        .env_remove("HASSDEX_INSECURE")
        .env_remove("HASSDEX_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn write_snapshot(path: &Path, value: &serde_json::Value) {
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

async fn template(server: &MockServer, needle: &str, body: &str) {
    Mock::given(method("POST"))
        .and(path("/api/template"))
        .and(body_string_contains(needle))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_hub(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/states"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "entity_id": "light.kitchen", "state": "off",
              "attributes": { "friendly_name": "Kitchen" } },
            { "entity_id": "sensor.door", "state": "unavailable", "attributes": {} }
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "2026.10.0",
            "location_name": "Flat"
        })))
        .mount(server)
        .await;

    template(server, "areas()", "kitchen|Kitchen\n").await;
    template(server, "area_entities('kitchen')", "light.kitchen").await;
    template(server, "device_id(state.entity_id)", "").await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = hassdex_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    hassdex_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Home Assistant")
            .and(predicate::str::contains("index"))
            .and(predicate::str::contains("show"))
            .and(predicate::str::contains("diff")),
    );
}

#[test]
fn test_version_flag() {
    hassdex_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hassdex"));
}

#[test]
fn test_unknown_output_format_is_usage_error() {
    hassdex_cmd()
        .args(["-o", "xml", "show", "summary"])
        .assert()
        .code(2);
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    hassdex_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Offline commands ────────────────────────────────────────────────

#[test]
fn test_show_without_snapshot_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");

    let output = hassdex_cmd()
        .args(["show", "summary", "--index"])
        .arg(&missing)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(4));
    let text = combined_output(&output);
    assert!(text.contains("No snapshot"), "unexpected output:\n{text}");
}

#[test]
fn test_diff_two_files_plain() {
    let dir = tempfile::tempdir().unwrap();
    let old = dir.path().join("old.json");
    let new = dir.path().join("new.json");
    write_snapshot(
        &old,
        &json!({
            "indexed_at": "2026-10-01T08:00:00+02:00",
            "entities": [
                { "entity_id": "light.kitchen", "state": "off" },
                { "entity_id": "switch.gone", "state": "on" }
            ]
        }),
    );
    write_snapshot(
        &new,
        &json!({
            "indexed_at": "2026-10-02T08:00:00+02:00",
            "entities": [
                { "entity_id": "light.kitchen", "state": "on" },
                { "entity_id": "sensor.new_temp", "state": "21.5" }
            ],
            "issues": { "unavailable_entities": [], "devices_with_issues": [] }
        }),
    );

    hassdex_cmd()
        .args(["-o", "plain", "diff"])
        .arg(&old)
        .arg(&new)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("+ sensor.new_temp")
                .and(predicate::str::contains("- switch.gone"))
                .and(predicate::str::contains("~ light.kitchen off on")),
        );
}

#[test]
fn test_diff_rejects_corrupt_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.json");
    let bad = dir.path().join("bad.json");
    write_snapshot(&good, &json!({ "indexed_at": "2026-10-01T08:00:00+02:00" }));
    std::fs::write(&bad, "{ not json").unwrap();

    let output = hassdex_cmd().arg("diff").arg(&good).arg(&bad).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("unusable"));
}

#[test]
fn test_index_without_config_explains_setup() {
    let output = hassdex_cmd().arg("index").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("config init"), "unexpected output:\n{text}");
}

#[test]
fn test_config_path_prints_location() {
    hassdex_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Against a hub ───────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_index_then_show_round_trip() {
    let server = MockServer::start().await;
    mount_hub(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let index = dir.path().join("home-index.json");

    let output = hassdex_cmd()
        .args(["-o", "json", "--hub", &server.uri(), "--token", "test-token", "--index"])
        .arg(&index)
        .arg("index")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "index failed:\n{}",
        combined_output(&output)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["changes"], json!({ "first_index": true }));
    assert_eq!(report["summary"]["total_entities"], 2);
    assert_eq!(report["issues"]["unavailable_entities"], json!(["sensor.door"]));
    assert!(index.exists());

    hassdex_cmd()
        .args(["-o", "plain", "show", "summary", "--index"])
        .arg(&index)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("total_entities=2")
                .and(predicate::str::contains("unavailable_count=1"))
                .and(predicate::str::contains("domain.light=1")),
        );

    hassdex_cmd()
        .args(["-o", "plain", "show", "entities", "--unavailable", "--index"])
        .arg(&index)
        .assert()
        .success()
        .stdout(predicate::str::contains("sensor.door").and(predicate::str::contains("light.kitchen").not()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_token_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let index = dir.path().join("home-index.json");

    let output = hassdex_cmd()
        .args(["--hub", &server.uri(), "--token", "bad", "--index"])
        .arg(&index)
        .arg("index")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    assert!(!index.exists());
}
