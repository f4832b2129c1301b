//! publish::pipeline
//!
//! Turns a folder into one commit on a fresh branch and pushes it.
//!
//! # Steps
//!
//! 1. Preflight: `git --version`
//! 2. Acquire a unique workspace
//! 3. `git init`, add `origin`
//! 4. Copy the source folder (minus `.git*` entries)
//! 5. Stage everything, commit "Initial commit", rename the branch
//! 6. Push with upstream tracking
//! 7. Remove the workspace
//!
//! Any failure aborts the remaining steps. Step 7 runs regardless.

use std::path::{Path, PathBuf};

use crate::core::types::{BranchName, Credentials, RepositoryHandle};
use crate::git::{CommitInfo, Git, GitCli, PushAuth};
use crate::ui::output::{self, Verbosity};

use super::workspace::{SourceManifest, StagingWorkspace};
use super::PublishError;

/// Message of the single commit.
pub const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

/// Name of the only remote.
pub const REMOTE_NAME: &str = "origin";

const TOTAL_STEPS: usize = 7;

/// What was pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedCommit {
    /// Web URL of the repository
    pub web_url: String,
    /// The pushed commit
    pub commit: CommitInfo,
}

/// Runs the staging steps with a given git executable.
#[derive(Debug, Clone)]
pub struct StagingPipeline {
    git: GitCli,
    workspace_root: Option<PathBuf>,
    verbosity: Verbosity,
}

impl StagingPipeline {
    /// A pipeline using `git`, with workspaces under the system temp dir.
    pub fn new(git: GitCli, verbosity: Verbosity) -> Self {
        Self {
            git,
            workspace_root: None,
            verbosity,
        }
    }

    /// Create workspaces under `root` instead of the system temp dir.
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    /// Confirm git can be run.
    pub fn preflight(&self) -> Result<(), PublishError> {
        let version = self.git.version().map_err(|e| {
            PublishError::local_tool("preflight", format!("git is not available: {}", e))
        })?;
        output::debug(
            format!("{}: {}", self.git.program().display(), version),
            self.verbosity,
        );
        Ok(())
    }

    /// Publish the contents of `source` to `handle` on `branch`.
    ///
    /// # Errors
    ///
    /// - [`PublishError::LocalToolError`] if git is unusable or a local step fails
    /// - [`PublishError::PushError`] if the push is rejected or cannot connect
    pub fn stage_and_push(
        &self,
        handle: &RepositoryHandle,
        source: &Path,
        credentials: &Credentials,
        branch: &BranchName,
    ) -> Result<StagedCommit, PublishError> {
        output::step(1, TOTAL_STEPS, "preflight", self.verbosity);
        self.preflight()?;

        output::step(2, TOTAL_STEPS, "acquire workspace", self.verbosity);
        let workspace = match &self.workspace_root {
            Some(root) => StagingWorkspace::acquire_in(root),
            None => StagingWorkspace::acquire(),
        }
        .map_err(|e| PublishError::local_tool("workspace", e.to_string()))?;
        output::debug(
            format!("workspace: {}", workspace.path().display()),
            self.verbosity,
        );

        let result = self.run_in(workspace.path(), handle, source, credentials, branch);

        output::step(7, TOTAL_STEPS, "teardown", self.verbosity);
        if let Err(e) = workspace.teardown() {
            output::warn(
                format!("could not remove staging workspace: {}", e),
                self.verbosity,
            );
        }

        result
    }

    fn run_in(
        &self,
        dir: &Path,
        handle: &RepositoryHandle,
        source: &Path,
        credentials: &Credentials,
        branch: &BranchName,
    ) -> Result<StagedCommit, PublishError> {
        output::step(3, TOTAL_STEPS, "initialize", self.verbosity);
        self.git.init(dir)?;
        self.git.remote_add(dir, REMOTE_NAME, &handle.clone_url)?;

        output::step(4, TOTAL_STEPS, "populate", self.verbosity);
        let manifest = SourceManifest::scan(source)
            .map_err(|e| PublishError::local_tool("populate", e.to_string()))?;
        manifest
            .copy_into(dir)
            .map_err(|e| PublishError::local_tool("populate", e.to_string()))?;
        output::debug(
            format!(
                "copied {} file(s) from {}: {}",
                manifest.file_count(),
                source.display(),
                manifest.top_level().join(", ")
            ),
            self.verbosity,
        );

        output::step(5, TOTAL_STEPS, "snapshot", self.verbosity);
        self.ensure_identity(dir, credentials.owner())?;
        self.git.add_all(dir)?;
        self.git.commit(dir, INITIAL_COMMIT_MESSAGE)?;
        self.git.rename_branch(dir, branch)?;
        let commit = Git::open(dir)
            .and_then(|repo| repo.head_commit())
            .map_err(|e| PublishError::local_tool("commit", e.to_string()))?;
        output::debug(format!("committed {}", commit.short_oid()), self.verbosity);

        output::step(6, TOTAL_STEPS, "publish", self.verbosity);
        let auth = PushAuth::new(credentials.owner(), credentials.bearer());
        self.git
            .push_upstream(dir, REMOTE_NAME, &handle.clone_url, branch, Some(&auth))
            .map_err(|e| match PublishError::from(e) {
                PublishError::PushError(msg) => {
                    PublishError::PushError(output::redact(&msg, credentials.bearer()))
                }
                other => other,
            })?;

        Ok(StagedCommit {
            web_url: handle.web_url.clone(),
            commit,
        })
    }

    /// Give the workspace a committer identity when none is configured.
    fn ensure_identity(&self, dir: &Path, username: &str) -> Result<(), PublishError> {
        if self.git.config_get(dir, "user.name")?.is_none() {
            self.git.config_set(dir, "user.name", username)?;
        }
        if self.git.config_get(dir, "user.email")?.is_none() {
            let email = format!("{}@users.noreply.github.com", username);
            output::debug(format!("using commit email {}", email), self.verbosity);
            self.git.config_set(dir, "user.email", &email)?;
        }
        Ok(())
    }
}
