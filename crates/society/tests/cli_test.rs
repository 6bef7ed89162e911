//! Integration tests for the `society` CLI binary.
//!
//! Argument parsing, help, completions and error exit codes run without a
//! server. A few end-to-end paths run against a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// A `society` command with env isolation rooted at `home`.
///
/// Clears all `SOCIETY_*` env vars so tests never touch the user's real
/// configuration or stored tokens.
fn society_in(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("society");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("SOCIETY_PROFILE")
        .env_remove("SOCIETY_SERVER")
        .env_remove("SOCIETY_OUTPUT")
        .env_remove("SOCIETY_INSECURE")
        .env_remove("SOCIETY_TIMEOUT")
        .env_remove("SOCIETY_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

fn society_cmd() -> assert_cmd::Command {
    society_in(Path::new("/tmp/society-cli-test-nonexistent"))
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Nothing listens here; commands that reach the network fail fast.
const DEAD_SERVER: &str = "http://127.0.0.1:9/api";

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

fn user_json() -> serde_json::Value {
    json!({
        "_id": "u1",
        "name": "Asha Rao",
        "email": "asha@society.example",
        "role": "admin",
        "status": "active",
        "flatNumber": "101",
        "building": "A"
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = society_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    society_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("alerts")
            .and(predicate::str::contains("parking"))
            .and(predicate::str::contains("billing"))
            .and(predicate::str::contains("users")),
    );
}

#[test]
fn test_version_flag() {
    society_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("society"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    society_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    society_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Argument errors ─────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = society_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_review_action() {
    let output = society_cmd()
        .args(["parking", "review", "v1", "pardon"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("possible values"));
}

#[test]
fn test_subcommands_exist() {
    society_cmd()
        .args(["alerts", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("escalate")
                .and(predicate::str::contains("resolve"))
                .and(predicate::str::contains("watch")),
        );
    society_cmd()
        .args(["parking", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bulk-review").and(predicate::str::contains("export")));
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_alerts_without_server_needs_config() {
    let output = society_cmd().args(["alerts", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("config init"), "{text}");
}

#[test]
fn test_unknown_profile_is_not_found() {
    let output = society_cmd()
        .args(["-p", "office", "alerts", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_config_show_no_config() {
    society_cmd()
        .args(["config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_profile"));
}

#[test]
fn test_config_use_unknown_profile() {
    let home = tempfile::tempdir().unwrap();
    let output = society_in(home.path())
        .args(["config", "use", "office"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

// ── Client-side validation (no request is made) ─────────────────────

#[test]
fn test_whoami_without_token_is_auth_error() {
    let home = tempfile::tempdir().unwrap();
    let output = society_in(home.path())
        .args(["--server", DEAD_SERVER, "auth", "whoami"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("auth login"));
}

#[test]
fn test_negative_fine_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let output = society_in(home.path())
        .args(["--server", DEAD_SERVER, "parking", "review", "v1", "approve", "--fine=-5"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("negative"));
}

#[test]
fn test_blank_bulk_selection_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let output = society_in(home.path())
        .args(["--server", DEAD_SERVER, "parking", "bulk-review", " ", "-a", "approve"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_unreachable_server_is_connection_error() {
    let home = tempfile::tempdir().unwrap();
    let output = society_in(home.path())
        .args(["--server", DEAD_SERVER, "--timeout", "2", "alerts", "active"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
}

#[test]
fn test_all_pending_conflicts_with_explicit_ids() {
    let output = society_cmd()
        .args(["parking", "bulk-review", "v1", "--all-pending", "-a", "approve"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Against a mock server ───────────────────────────────────────────

async fn run(cmd: assert_cmd::Command) -> std::process::Output {
    let mut cmd = cmd;
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_active_alerts_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/alerts/active"))
        .respond_with(ok(json!([{
            "_id": "a1",
            "alertId": "ALT-0042",
            "title": "Water shutdown",
            "description": "Tank cleaning",
            "type": "water",
            "priority": "high",
            "status": "active",
            "createdBy": "u1",
            "createdAt": "2026-01-05T09:30:00Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = society_in(home.path());
    cmd.args(["--server", &format!("{}/api", server.uri()), "-o", "plain", "alerts", "active"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "ALT-0042");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_persists_tokens_for_later_commands() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ok(json!({
            "user": user_json(),
            "accessToken": "access-1",
            "refreshToken": "refresh-1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ok(json!({ "user": user_json() })))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let api = format!("{}/api", server.uri());

    let mut login = society_in(home.path());
    login
        .env("SOCIETY_PASSWORD", "secret123")
        .args(["--server", &api, "auth", "login", "--email", "asha@society.example"]);
    let output = run(login).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Signed in as Asha Rao"));

    let mut whoami = society_in(home.path());
    whoami.args(["--server", &api, "-o", "plain", "auth", "whoami"]);
    let output = run(whoami).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "u1");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_bill_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/billing/bills/nope"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "success": false, "message": "Bill not found" })),
        )
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = society_in(home.path());
    cmd.args(["--server", &format!("{}/api", server.uri()), "billing", "show", "nope"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("Bill not found"));
}

fn violation_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "category": { "_id": "c1", "name": "No parking zone", "fineAmount": 500 },
        "vehicleNumber": "KA01AB1234",
        "status": status,
        "createdAt": "2026-10-02T18:00:00Z"
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn test_all_pending_selects_only_reviewable_violations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/parking/violations/pending"))
        .respond_with(ok(json!({
            "violations": [
                violation_json("v1", "pending"),
                violation_json("v2", "approved"),
                violation_json("v3", "under_review")
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/parking/violations/bulk-review"))
        .and(body_partial_json(json!({
            "violationIds": ["v1", "v3"],
            "action": "reject"
        })))
        .respond_with(ok(json!({
            "successful": 2,
            "failed": 0,
            "results": [
                { "violationId": "v1", "success": true },
                { "violationId": "v3", "success": true }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = society_in(home.path());
    cmd.args([
        "--server",
        &format!("{}/api", server.uri()),
        "parking",
        "bulk-review",
        "--all-pending",
        "-a",
        "reject",
    ]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("2 violation(s) rejected"));
}
