//! git::cli
//!
//! Mutating git operations, run through the `git` executable.
//!
//! # Design
//!
//! Every operation takes the directory it acts on and passes it to the
//! child process as its working directory. The process's own current
//! directory is never changed.
//!
//! All invocations run with `GIT_TERMINAL_PROMPT=0` and a null stdin, so a
//! missing credential fails the command instead of blocking on a prompt.
//!
//! # Push Authentication
//!
//! The token is handed to git as an `http.<origin>.extraHeader` through the
//! `GIT_CONFIG_COUNT` / `GIT_CONFIG_KEY_n` / `GIT_CONFIG_VALUE_n`
//! environment, scoped to the push URL's origin. It never appears on the
//! command line, in the remote URL or in any config file.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

use crate::core::types::BranchName;

/// Program used when none is configured.
pub const DEFAULT_PROGRAM: &str = "git";

/// Errors from running git.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GitCliError {
    /// The executable could not be started at all.
    #[error("could not run '{program}': {message}")]
    Unavailable {
        /// Program that was attempted
        program: String,
        /// Why it could not be spawned
        message: String,
    },

    /// The command ran and exited unsuccessfully.
    #[error("git {step} failed: {stderr}")]
    Failed {
        /// Operation that failed (e.g. "commit")
        step: String,
        /// Exit code, if the process exited normally
        code: Option<i32>,
        /// Trimmed standard error
        stderr: String,
    },
}

impl GitCliError {
    /// The operation this error came from.
    pub fn step(&self) -> &str {
        match self {
            GitCliError::Unavailable { .. } => "preflight",
            GitCliError::Failed { step, .. } => step,
        }
    }
}

/// HTTP basic credentials presented on push.
#[derive(Clone, PartialEq, Eq)]
pub struct PushAuth {
    username: String,
    token: String,
}

impl std::fmt::Debug for PushAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushAuth")
            .field("username", &self.username)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl PushAuth {
    /// Credentials for `username` authenticating with `token`.
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }

    fn header(&self) -> String {
        let pair = format!("{}:{}", self.username, self.token);
        format!("Authorization: Basic {}", STANDARD.encode(pair))
    }

    /// Config environment for pushing to `url`, empty for non-HTTP URLs.
    fn env_for(&self, url: &str) -> Vec<(String, String)> {
        match http_origin(url) {
            Some(origin) => vec![
                ("GIT_CONFIG_COUNT".into(), "1".into()),
                (
                    "GIT_CONFIG_KEY_0".into(),
                    format!("http.{}.extraHeader", origin),
                ),
                ("GIT_CONFIG_VALUE_0".into(), self.header()),
            ],
            None => Vec::new(),
        }
    }
}

/// `scheme://host[:port]/` of an HTTP(S) URL.
fn http_origin(url: &str) -> Option<String> {
    let (scheme, rest) = url.split_once("://")?;
    if scheme != "https" && scheme != "http" {
        return None;
    }
    let host = rest.split('/').next().filter(|h| !h.is_empty())?;
    // Drop any userinfo so the config key matches the request URL
    let host = host.rsplit('@').next().unwrap_or(host);
    Some(format!("{}://{}/", scheme, host))
}

/// Runs git subcommands against explicit directories.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    /// Use `git` from `PATH`.
    pub fn new() -> Self {
        Self::with_program(DEFAULT_PROGRAM)
    }

    /// Use a specific executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The executable this runner invokes.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Report the installed version (`git --version`).
    ///
    /// Serves as the preflight check: any failure means git is unusable.
    pub fn version(&self) -> Result<String, GitCliError> {
        self.run(None, "preflight", &["--version"], &[])
    }

    /// Create an empty repository in `dir`.
    pub fn init(&self, dir: &Path) -> Result<(), GitCliError> {
        self.run(Some(dir), "init", &["init", "--quiet"], &[])
            .map(drop)
    }

    /// Register a remote.
    pub fn remote_add(&self, dir: &Path, name: &str, url: &str) -> Result<(), GitCliError> {
        self.run(Some(dir), "remote add", &["remote", "add", name, url], &[])
            .map(drop)
    }

    /// Stage everything in the working tree.
    pub fn add_all(&self, dir: &Path) -> Result<(), GitCliError> {
        self.run(Some(dir), "add", &["add", "--all"], &[]).map(drop)
    }

    /// Commit the index with `message`.
    pub fn commit(&self, dir: &Path, message: &str) -> Result<(), GitCliError> {
        self.run(
            Some(dir),
            "commit",
            &["commit", "--quiet", "--no-verify", "-m", message],
            &[],
        )
        .map(drop)
    }

    /// Rename the current branch, replacing any existing branch of that name.
    pub fn rename_branch(&self, dir: &Path, branch: &BranchName) -> Result<(), GitCliError> {
        self.run(
            Some(dir),
            "branch",
            &["branch", "-M", branch.as_str()],
            &[],
        )
        .map(drop)
    }

    /// Push `branch` to `remote` and record it as the upstream.
    ///
    /// `url` is the remote's push URL; credentials are only attached when
    /// it is an HTTP(S) URL.
    pub fn push_upstream(
        &self,
        dir: &Path,
        remote: &str,
        url: &str,
        branch: &BranchName,
        auth: Option<&PushAuth>,
    ) -> Result<(), GitCliError> {
        let env = auth.map(|a| a.env_for(url)).unwrap_or_default();
        self.run(
            Some(dir),
            "push",
            &["push", "--quiet", "-u", remote, branch.as_str()],
            &env,
        )
        .map(drop)
    }

    /// Read a config value as git resolves it from `dir`.
    ///
    /// Returns `None` when the key is unset.
    pub fn config_get(&self, dir: &Path, key: &str) -> Result<Option<String>, GitCliError> {
        match self.run(Some(dir), "config", &["config", "--get", key], &[]) {
            Ok(value) if value.is_empty() => Ok(None),
            Ok(value) => Ok(Some(value)),
            // Exit code 1 means the key is not set
            Err(GitCliError::Failed { code: Some(1), .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a repository-local config value.
    pub fn config_set(&self, dir: &Path, key: &str, value: &str) -> Result<(), GitCliError> {
        self.run(Some(dir), "config", &["config", "--local", key, value], &[])
            .map(drop)
    }

    fn run(
        &self,
        dir: Option<&Path>,
        step: &str,
        args: &[&str],
        env: &[(String, String)],
    ) -> Result<String, GitCliError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in env {
            cmd.env(key, value);
        }
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|e| GitCliError::Unavailable {
            program: self.program.display().to_string(),
            message: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(GitCliError::Failed {
                step: step.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
