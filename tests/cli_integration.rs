//! End-to-end tests of the `ghpub` binary.
//!
//! Each test points `--config` at a temporary file so the user's real
//! configuration is never read or written. Tests that reach GitHub talk to a
//! wiremock server through `--api-url`.

use std::fs;
use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ghpublish::git::Git;

// =============================================================================
// Test Fixtures
// =============================================================================

/// An isolated config location plus a scratch directory.
struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn config_path(&self) -> std::path::PathBuf {
        self.dir.path().join("config.toml")
    }

    fn configure(&self, username: &str, token: &str) {
        fs::write(
            self.config_path(),
            format!(
                "github_token = \"{}\"\ngithub_username = \"{}\"\n",
                token, username
            ),
        )
        .unwrap();
    }

    /// `ghpub --config <tmp> --no-interactive` with the given arguments.
    fn ghpub(&self) -> Command {
        let mut cmd = Command::cargo_bin("ghpub").unwrap();
        cmd.arg("--config")
            .arg(self.config_path())
            .arg("--no-interactive")
            .env_remove("GHPUBLISH_CONFIG");
        cmd
    }
}

fn run_git(dir: &Path, args: &[&str]) {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");
    assert!(output.status.success(), "git {:?} failed", args);
}

// =============================================================================
// Help and Version
// =============================================================================

#[test]
fn help_lists_commands() {
    Command::cargo_bin("ghpub")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("setup"))
        .stdout(predicate::str::contains("upload"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn version_flag() {
    Command::cargo_bin("ghpub")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn completion_bash() {
    Command::cargo_bin("ghpub")
        .unwrap()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ghpub"));
}

// =============================================================================
// Status
// =============================================================================

#[test]
fn status_unconfigured() {
    let env = Env::new();
    env.ghpub()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not configured"));
}

#[test]
fn quiet_status_is_machine_readable() {
    let env = Env::new();
    env.ghpub()
        .args(["-q", "status"])
        .assert()
        .success()
        .stdout("not_configured\n");

    env.configure("octocat", "ghp_secret_value");
    env.ghpub()
        .args(["-q", "status"])
        .assert()
        .success()
        .stdout("configured\n");
}

#[test]
fn status_never_shows_token() {
    let env = Env::new();
    env.configure("octocat", "ghp_secret_value");
    env.ghpub()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("octocat"))
        .stdout(predicate::str::contains("ghp_secret_value").not());
}

// =============================================================================
// Config
// =============================================================================

#[test]
fn config_set_get_list() {
    let env = Env::new();

    env.ghpub()
        .args(["config", "set", "username", "octocat"])
        .assert()
        .success();
    env.ghpub()
        .args(["config", "set", "token", "ghp_secret_value"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ghp_secret_value").not());

    env.ghpub()
        .args(["config", "get", "username"])
        .assert()
        .success()
        .stdout("octocat\n");
    env.ghpub()
        .args(["config", "get", "token"])
        .assert()
        .success()
        .stdout("(set)\n");
    env.ghpub()
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("private = false"))
        .stdout(predicate::str::contains("ghp_secret_value").not());
}

#[test]
fn config_rejects_unknown_key() {
    let env = Env::new();
    env.ghpub()
        .args(["config", "get", "color"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

// =============================================================================
// Setup
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn setup_saves_validated_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "login": "octocat" })))
        .mount(&server)
        .await;

    let env = Env::new();
    env.ghpub()
        .args(["--api-url", &server.uri()])
        .args(["setup", "--token", "ghp_secret_value", "--private"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ghp_secret_value").not())
        .stderr(predicate::str::contains("ghp_secret_value").not());

    let saved = fs::read_to_string(env.config_path()).unwrap();
    assert!(saved.contains("github_username = \"octocat\""));
    assert!(saved.contains("default_private = true"));
}

#[tokio::test(flavor = "multi_thread")]
async fn setup_with_rejected_token_saves_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })))
        .mount(&server)
        .await;

    let env = Env::new();
    env.ghpub()
        .args(["--api-url", &server.uri()])
        .args(["setup", "--username", "octocat", "--token", "ghp_bad"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing was saved"));

    assert!(!env.config_path().exists());
}

#[test]
fn setup_without_token_requires_interaction() {
    let env = Env::new();
    env.ghpub()
        .args(["setup", "--username", "octocat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Token required"));
}

// =============================================================================
// Upload
// =============================================================================

#[test]
fn upload_without_config_fails() {
    let env = Env::new();
    let source = TempDir::new().unwrap();
    fs::write(source.path().join("readme.txt"), "hello").unwrap();

    env.ghpub()
        .arg("upload")
        .arg(source.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Upload failed: not configured"))
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn upload_missing_folder_fails_before_network() {
    let env = Env::new();
    env.configure("octocat", "ghp_secret_value");

    // Nothing listens on port 9; reaching the network would fail differently
    env.ghpub()
        .args(["--api-url", "http://127.0.0.1:9"])
        .arg("upload")
        .arg(env.dir.path().join("missing"))
        .assert()
        .failure()
        .stdout(predicate::str::starts_with("Upload failed: folder not found"))
        .stderr(predicate::str::contains("folder not found"));
}

#[test]
fn upload_without_folder_needs_interaction() {
    let env = Env::new();
    env.configure("octocat", "ghp_secret_value");

    env.ghpub()
        .arg("upload")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No folder given"));
}

#[tokio::test(flavor = "multi_thread")]
async fn bare_folder_argument_uploads() {
    let remote = TempDir::new().unwrap();
    let bare = remote.path().join("demo1.git");
    fs::create_dir(&bare).unwrap();
    run_git(&bare, &["init", "--quiet", "--bare"]);

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "name": "demo1",
            "owner": { "login": "octocat" },
            "clone_url": bare.to_string_lossy(),
            "html_url": "https://github.com/octocat/demo1",
            "private": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let env = Env::new();
    env.configure("octocat", "ghp_secret_value");
    let parent = TempDir::new().unwrap();
    let source = parent.path().join("demo1");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("readme.txt"), "hello").unwrap();

    env.ghpub()
        .args(["--api-url", &server.uri()])
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Uploaded: https://github.com/octocat/demo1",
        ))
        .stdout(predicate::str::contains("ghp_secret_value").not())
        .stderr(predicate::str::contains("ghp_secret_value").not());

    let pushed = Git::open(&bare).unwrap();
    assert_eq!(pushed.commit_count("refs/heads/main").unwrap(), 1);
    assert_eq!(
        pushed.tree_paths("refs/heads/main").unwrap(),
        vec!["readme.txt"]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn remote_failure_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "Server Error" })),
        )
        .mount(&server)
        .await;

    let env = Env::new();
    env.configure("octocat", "ghp_secret_value");
    let source = TempDir::new().unwrap();
    fs::write(source.path().join("readme.txt"), "hello").unwrap();

    env.ghpub()
        .args(["--api-url", &server.uri()])
        .args(["upload", "--name", "demo1"])
        .arg(source.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Upload failed: GitHub request failed (HTTP 500)"))
        .stderr(predicate::str::contains("500"));
}

#[tokio::test(flavor = "multi_thread")]
async fn forbidden_create_is_not_a_setup_problem() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "Resource not accessible by personal access token"
        })))
        .mount(&server)
        .await;

    let env = Env::new();
    env.configure("octocat", "ghp_secret_value");
    let source = TempDir::new().unwrap();
    fs::write(source.path().join("readme.txt"), "hello").unwrap();

    env.ghpub()
        .args(["--api-url", &server.uri()])
        .args(["upload", "--name", "demo1"])
        .arg(source.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("HTTP 403"))
        .stderr(predicate::str::contains("ghpub setup").not());
}
