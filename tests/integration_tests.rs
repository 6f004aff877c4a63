//! Integration tests for the vit CLI
//!
//! These tests exercise the CLI end-to-end using assert_cmd, with all state
//! confined to a temp dir via --state-dir and the API played by a canned
//! stub server.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

use common::{envelope, rejection, serve, Route, StubServer};

/// Helper to get a vit command with isolated state
fn vit(state: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vit").unwrap();
    cmd.env("VIT_STATE_DIR", state.path());
    cmd.env_remove("VIT_BASE_URL");
    cmd
}

fn identity_json() -> serde_json::Value {
    json!({
        "_id": "u1",
        "name": "Asha Rao",
        "email": "asha@example.com",
        "role": "admin",
        "emailVerified": true,
        "onboardingCompleted": true
    })
}

fn login_route() -> Route {
    Route {
        method: "POST",
        path: "/api/auth/login",
        status: 200,
        body: envelope(json!({ "token": "tok-abc", "user": identity_json() })),
    }
}

fn projects_route() -> Route {
    Route {
        method: "GET",
        path: "/api/projects",
        status: 200,
        body: envelope(json!([
            {
                "_id": "p1",
                "name": "Sky Gardens",
                "developer": "Meridian Builders",
                "reraNumber": "P52100012345",
                "isActive": true
            },
            {
                "_id": "p2",
                "name": "Harbour View",
                "developer": "Coastline Estates",
                "reraNumber": "P52100054321",
                "isActive": false
            }
        ])),
    }
}

/// Sign in against the stub so later commands have a session
fn sign_in(state: &TempDir, server: &StubServer) {
    vit(state)
        .env("VIT_BASE_URL", server.base_url())
        .args(["login", "-e", "asha@example.com", "--password", "pw", "-r", "admin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Asha Rao"));
}

// ============================================================================
// CLI basics
// ============================================================================

#[test]
fn test_help_displays() {
    let state = TempDir::new().unwrap();
    vit(&state)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Vantage Inventory Toolkit"))
        .stdout(predicate::str::contains("project"))
        .stdout(predicate::str::contains("unit"));
}

#[test]
fn test_version_displays() {
    let state = TempDir::new().unwrap();
    vit(&state)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vit"));
}

#[test]
fn test_unknown_command_fails() {
    let state = TempDir::new().unwrap();
    vit(&state).arg("frobnicate").assert().failure();
}

#[test]
fn test_completions_generate() {
    let state = TempDir::new().unwrap();
    vit(&state)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vit"));
}

#[test]
fn test_config_path_lists_state_files() {
    let state = TempDir::new().unwrap();
    vit(&state)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("session.json"))
        .stdout(predicate::str::contains("cache.db"));
}

#[test]
fn test_config_show_reports_defaults() {
    let state = TempDir::new().unwrap();
    vit(&state)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url"))
        .stdout(predicate::str::contains("demo_data: true"));
}

// ============================================================================
// Sessions
// ============================================================================

#[test]
fn test_commands_require_login() {
    let state = TempDir::new().unwrap();
    vit(&state)
        .args(["project", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn test_login_then_whoami() {
    let state = TempDir::new().unwrap();
    let server = serve(vec![login_route()]);

    sign_in(&state, &server);
    assert!(state.path().join("session.json").exists());

    // whoami reads the stored session, no network needed
    vit(&state)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("asha@example.com"))
        .stdout(predicate::str::contains("admin"));
}

#[test]
fn test_login_rejection_shows_server_message() {
    let state = TempDir::new().unwrap();
    let server = serve(vec![Route {
        method: "POST",
        path: "/api/auth/login",
        status: 400,
        body: rejection("account disabled"),
    }]);

    vit(&state)
        .env("VIT_BASE_URL", server.base_url())
        .args(["login", "-e", "asha@example.com", "--password", "pw"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("account disabled"));

    assert!(!state.path().join("session.json").exists());
}

#[test]
fn test_logout_clears_session() {
    let state = TempDir::new().unwrap();
    let server = serve(vec![login_route()]);
    sign_in(&state, &server);

    vit(&state).arg("logout").assert().success();
    assert!(!state.path().join("session.json").exists());

    vit(&state)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}

// ============================================================================
// Listing and caching
// ============================================================================

#[test]
fn test_project_list_renders_table() {
    let state = TempDir::new().unwrap();
    let server = serve(vec![login_route(), projects_route()]);
    sign_in(&state, &server);

    vit(&state)
        .env("VIT_BASE_URL", server.base_url())
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sky Gardens"))
        .stdout(predicate::str::contains("Harbour View"))
        .stdout(predicate::str::contains("2 project(s) found"));
}

#[test]
fn test_project_list_filters_by_status_and_search() {
    let state = TempDir::new().unwrap();
    let server = serve(vec![login_route(), projects_route()]);
    sign_in(&state, &server);

    vit(&state)
        .env("VIT_BASE_URL", server.base_url())
        .args(["project", "list", "--status", "active"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sky Gardens"))
        .stdout(predicate::str::contains("Harbour View").not());

    vit(&state)
        .env("VIT_BASE_URL", server.base_url())
        .args(["project", "list", "--search", "coastline", "-f", "id"])
        .assert()
        .success()
        .stdout(predicate::str::diff("p2\n"));
}

#[test]
fn test_project_list_serves_second_call_from_cache() {
    let state = TempDir::new().unwrap();
    let server = serve(vec![login_route(), projects_route()]);
    sign_in(&state, &server);

    vit(&state)
        .env("VIT_BASE_URL", server.base_url())
        .args(["project", "list"])
        .assert()
        .success();

    // The server is gone now; a fresh cache entry must still answer.
    vit(&state)
        .env("VIT_BASE_URL", "http://127.0.0.1:9/api")
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sky Gardens"));

    // But --refresh goes back to the network and fails loudly.
    vit(&state)
        .env("VIT_BASE_URL", "http://127.0.0.1:9/api")
        .args(["project", "list", "--refresh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("network"));
}

#[test]
fn test_cache_info_and_clear() {
    let state = TempDir::new().unwrap();
    let server = serve(vec![login_route(), projects_route()]);
    sign_in(&state, &server);

    vit(&state)
        .env("VIT_BASE_URL", server.base_url())
        .args(["project", "list"])
        .assert()
        .success();

    vit(&state)
        .args(["cache", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("projects"));

    vit(&state).args(["cache", "clear"]).assert().success();
    vit(&state)
        .args(["cache", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache is empty"));
}

// ============================================================================
// Destructive actions
// ============================================================================

#[test]
fn test_wing_delete_without_yes_issues_no_remote_call() {
    let state = TempDir::new().unwrap();
    let server = serve(vec![
        login_route(),
        projects_route(),
        Route {
            method: "GET",
            path: "/api/projects/p1/wings",
            status: 200,
            body: envelope(json!([{
                "_id": "w1",
                "name": "Wing A",
                "totalFloors": 12,
                "isActive": true,
                "projectId": "p1"
            }])),
        },
        // A DELETE reaching the server would be a bug; answer it with a
        // distinctive rejection so the assertion below would catch it.
        Route {
            method: "DELETE",
            path: "/api/projects/p1/wings/w1",
            status: 200,
            body: rejection("delete reached the server"),
        },
    ]);
    sign_in(&state, &server);

    vit(&state)
        .env("VIT_BASE_URL", server.base_url())
        .args(["wing", "delete", "-p", "Sky Gardens", "Wing A"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"))
        .stderr(predicate::str::contains("delete reached the server").not());
}

#[test]
fn test_delete_without_yes_fails_when_unattended() {
    let state = TempDir::new().unwrap();
    let server = serve(vec![login_route(), projects_route()]);
    sign_in(&state, &server);

    vit(&state)
        .env("VIT_BASE_URL", server.base_url())
        .args(["project", "delete", "Sky Gardens"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
}

// ============================================================================
// Expired sessions
// ============================================================================

#[test]
fn test_unauthorized_clears_session_and_points_at_login() {
    let state = TempDir::new().unwrap();
    let login_server = serve(vec![login_route()]);
    sign_in(&state, &login_server);

    let expired_server = serve(vec![Route {
        method: "GET",
        path: "/api/projects",
        status: 401,
        body: rejection("token expired"),
    }]);

    vit(&state)
        .env("VIT_BASE_URL", expired_server.base_url())
        .args(["project", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("vit login"));

    assert!(!state.path().join("session.json").exists());
}

// ============================================================================
// Status dashboard
// ============================================================================

#[test]
fn test_status_shows_role_menu_when_logged_in() {
    let state = TempDir::new().unwrap();
    let server = serve(vec![login_route()]);
    sign_in(&state, &server);

    // Admin sees every section, including the cache tools
    vit(&state)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Asha Rao"))
        .stdout(predicate::str::contains("Projects"))
        .stdout(predicate::str::contains("Categories"))
        .stdout(predicate::str::contains("Cache"));
}

#[test]
fn test_status_without_login_points_at_login() {
    let state = TempDir::new().unwrap();
    vit(&state)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}
