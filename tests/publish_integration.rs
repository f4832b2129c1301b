//! Integration tests for the publish workflow.
//!
//! These run the full create-or-adopt, stage, push sequence against
//! MockForge, with clone URLs pointing at local bare repositories so the
//! pushed result can be inspected with git2.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use ghpublish::core::types::Credentials;
use ghpublish::forge::mock::{MockForge, MockOperation};
use ghpublish::git::{Git, GitCli};
use ghpublish::publish::{
    PublishError, Publisher, StagingPipeline, UploadRequest, INITIAL_COMMIT_MESSAGE,
};
use ghpublish::ui::output::Verbosity;

// =============================================================================
// Test Fixtures
// =============================================================================

/// A directory of bare repositories standing in for GitHub.
struct Remotes {
    dir: TempDir,
}

impl Remotes {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.path().join(format!("{}.git", name))
    }

    /// Create an empty bare repository for `name`.
    fn create(&self, name: &str) -> PathBuf {
        let path = self.path_for(name);
        fs::create_dir_all(&path).unwrap();
        run_git(&path, &["init", "--quiet", "--bare"]);
        path
    }

    /// A forge whose clone URLs point into this directory.
    fn forge(&self) -> MockForge {
        let root = self.dir.path().to_path_buf();
        MockForge::new("octocat").with_clone_url(move |_, name| {
            root.join(format!("{}.git", name))
                .to_string_lossy()
                .into_owned()
        })
    }
}

/// A workflow run with its own observable workspace root.
struct Harness {
    workspaces: TempDir,
    git: GitCli,
}

impl Harness {
    fn new() -> Self {
        Self::with_git(GitCli::new())
    }

    fn with_git(git: GitCli) -> Self {
        Self {
            workspaces: TempDir::new().unwrap(),
            git,
        }
    }

    fn publisher<'a>(&self, forge: &'a MockForge) -> Publisher<'a> {
        Publisher::new(forge, self.git.clone(), Verbosity::Quiet).with_pipeline(
            StagingPipeline::new(self.git.clone(), Verbosity::Quiet)
                .with_workspace_root(self.workspaces.path()),
        )
    }

    fn assert_no_workspace_left(&self) {
        let leftovers: Vec<_> = fs::read_dir(self.workspaces.path()).unwrap().collect();
        assert!(leftovers.is_empty(), "workspace left behind: {:?}", leftovers);
    }
}

fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

fn creds() -> Credentials {
    Credentials::new("octocat", "ghp_test_token")
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn publish(
    harness: &Harness,
    forge: &MockForge,
    request: &UploadRequest,
) -> Result<ghpublish::publish::UploadOutcome, PublishError> {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(harness.publisher(forge).publish(&creds(), request))
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn new_repository_gets_single_commit_on_main() {
    let remotes = Remotes::new();
    let bare = remotes.create("demo1");
    let forge = remotes.forge();
    let harness = Harness::new();

    let source = TempDir::new().unwrap();
    write(source.path(), "readme.txt", "hello");

    let outcome = publish(
        &harness,
        &forge,
        &UploadRequest::new(source.path()).with_name("demo1"),
    )
    .unwrap();

    assert!(outcome.created);
    assert_eq!(outcome.handle.web_url, "https://github.com/octocat/demo1");
    assert_eq!(outcome.commit.summary, INITIAL_COMMIT_MESSAGE);

    let pushed = Git::open(&bare).unwrap();
    assert_eq!(pushed.commit_count("refs/heads/main").unwrap(), 1);
    assert_eq!(
        pushed.commit_at("refs/heads/main").unwrap().oid,
        outcome.commit.oid
    );
    assert_eq!(pushed.tree_paths("refs/heads/main").unwrap(), vec!["readme.txt"]);

    harness.assert_no_workspace_left();
}

#[test]
fn existing_repository_is_adopted() {
    let remotes = Remotes::new();
    remotes.create("demo1");
    let forge = remotes.forge().with_repo("octocat", "demo1");
    let existing = forge.repo("octocat", "demo1").unwrap();
    let harness = Harness::new();

    let source = TempDir::new().unwrap();
    write(source.path(), "readme.txt", "hello");

    let outcome = publish(
        &harness,
        &forge,
        &UploadRequest::new(source.path()).with_name("demo1"),
    )
    .unwrap();

    assert!(!outcome.created);
    assert_eq!(outcome.handle.clone_url, existing.clone_url);
    assert_eq!(forge.repo_count(), 1);
    assert!(matches!(
        forge.operations().as_slice(),
        [MockOperation::CreateRepo { .. }, MockOperation::GetRepo { .. }]
    ));
}

#[test]
fn missing_source_fails_before_any_request() {
    let remotes = Remotes::new();
    let forge = remotes.forge();
    let harness = Harness::new();
    let missing = remotes.dir.path().join("does-not-exist");

    let err = publish(&harness, &forge, &UploadRequest::new(&missing)).unwrap_err();

    assert_eq!(err, PublishError::SourceNotFound(missing));
    assert!(forge.operations().is_empty());
    harness.assert_no_workspace_left();
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn folder_name_is_default_repository_name() {
    let remotes = Remotes::new();
    let bare = remotes.create("my-project");
    let forge = remotes.forge();
    let harness = Harness::new();

    let parent = TempDir::new().unwrap();
    let source = parent.path().join("my project");
    write(&source, "main.rs", "fn main() {}");

    let outcome = publish(&harness, &forge, &UploadRequest::new(&source)).unwrap();

    assert_eq!(outcome.handle.name, "my-project");
    assert!(Git::open(&bare).unwrap().commit_at("refs/heads/main").is_ok());
}

#[test]
fn git_entries_are_not_published() {
    let remotes = Remotes::new();
    let bare = remotes.create("demo1");
    let forge = remotes.forge();
    let harness = Harness::new();

    let source = TempDir::new().unwrap();
    write(source.path(), "src/main.rs", "fn main() {}");
    write(source.path(), ".env.example", "KEY=value");
    write(source.path(), ".gitignore", "target/");
    write(source.path(), ".github/workflows/ci.yml", "on: push");
    // A foreign repository's history must not be nested
    run_git(source.path(), &["init", "--quiet"]);

    publish(
        &harness,
        &forge,
        &UploadRequest::new(source.path()).with_name("demo1"),
    )
    .unwrap();

    assert_eq!(
        Git::open(&bare).unwrap().tree_paths("refs/heads/main").unwrap(),
        vec![".env.example", "src/main.rs"]
    );
    // The source keeps its own repository
    assert!(source.path().join(".git").is_dir());
}

#[test]
fn missing_git_makes_no_remote_calls() {
    let remotes = Remotes::new();
    let forge = remotes.forge();
    let harness = Harness::with_git(GitCli::with_program("/nonexistent/bin/git"));

    let source = TempDir::new().unwrap();
    write(source.path(), "readme.txt", "hello");

    let err = publish(
        &harness,
        &forge,
        &UploadRequest::new(source.path()).with_name("demo1"),
    )
    .unwrap_err();

    assert!(matches!(err, PublishError::LocalToolError { .. }));
    assert!(forge.operations().is_empty());
    harness.assert_no_workspace_left();
}

#[test]
fn failed_push_leaves_repository_for_retry() {
    let remotes = Remotes::new();
    let forge = remotes.forge();
    let harness = Harness::new();

    let source = TempDir::new().unwrap();
    write(source.path(), "readme.txt", "hello");
    let request = UploadRequest::new(source.path()).with_name("demo1");

    // No bare repository behind the clone URL yet
    let err = publish(&harness, &forge, &request).unwrap_err();
    assert!(matches!(err, PublishError::PushError(_)));
    assert!(!err.to_string().contains("ghp_test_token"));
    assert_eq!(forge.repo_count(), 1);
    harness.assert_no_workspace_left();

    // Retrying adopts the repository created by the failed attempt
    let bare = remotes.create("demo1");
    let outcome = publish(&harness, &forge, &request).unwrap();
    assert!(!outcome.created);
    assert_eq!(Git::open(&bare).unwrap().commit_count("refs/heads/main").unwrap(), 1);
}

#[test]
fn populated_repository_rejects_fresh_history() {
    let remotes = Remotes::new();
    remotes.create("demo1");
    let forge = remotes.forge();
    let harness = Harness::new();

    let source = TempDir::new().unwrap();
    write(source.path(), "readme.txt", "hello");
    let request = UploadRequest::new(source.path()).with_name("demo1");

    publish(&harness, &forge, &request).unwrap();

    write(source.path(), "readme.txt", "changed");
    let err = publish(&harness, &forge, &request).unwrap_err();

    assert!(matches!(err, PublishError::PushError(_)));
    harness.assert_no_workspace_left();
}

#[test]
fn empty_source_is_rejected_up_front() {
    let remotes = Remotes::new();
    let forge = remotes.forge();
    let harness = Harness::new();

    let source = TempDir::new().unwrap();
    fs::create_dir(source.path().join("empty-dir")).unwrap();
    write(source.path(), ".gitignore", "target/");

    let err = publish(
        &harness,
        &forge,
        &UploadRequest::new(source.path()).with_name("demo1"),
    )
    .unwrap_err();

    assert!(matches!(err, PublishError::EmptySource(_)));
    assert!(forge.operations().is_empty());
}

#[test]
fn workflow_leaves_process_cwd_alone() {
    let before = std::env::current_dir().unwrap();

    let remotes = Remotes::new();
    remotes.create("demo1");
    let forge = remotes.forge();
    let harness = Harness::new();
    let source = TempDir::new().unwrap();
    write(source.path(), "readme.txt", "hello");

    publish(
        &harness,
        &forge,
        &UploadRequest::new(source.path()).with_name("demo1"),
    )
    .unwrap();

    assert_eq!(std::env::current_dir().unwrap(), before);
}

#[cfg(unix)]
#[test]
fn named_pipe_in_source_aborts_before_any_request() {
    let remotes = Remotes::new();
    let forge = remotes.forge();
    let harness = Harness::new();

    let source = TempDir::new().unwrap();
    write(source.path(), "readme.txt", "hello");
    let status = Command::new("mkfifo")
        .arg(source.path().join("pipe"))
        .status()
        .expect("mkfifo failed");
    assert!(status.success());

    let err = publish(
        &harness,
        &forge,
        &UploadRequest::new(source.path()).with_name("demo1"),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        PublishError::LocalToolError { ref step, .. } if step == "populate"
    ));
    assert!(err.to_string().contains("not a regular file"));
    assert!(forge.operations().is_empty());
    harness.assert_no_workspace_left();
}
