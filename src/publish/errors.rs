//! publish::errors
//!
//! Failure kinds of the publish workflow.
//!
//! # Design
//!
//! Each component returns one of these kinds through its `Result`; only the
//! command layer turns them into a message for the operator. Messages never
//! include the access token.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::TypeError;
use crate::forge::ForgeError;
use crate::git::GitCliError;

/// Errors from publishing a folder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// No usable credentials are stored.
    #[error("not configured: run 'ghpub setup' to store a GitHub username and token")]
    ConfigurationMissing,

    /// The token was rejected by the remote.
    #[error("GitHub rejected the stored token: run 'ghpub setup' again")]
    AuthInvalid,

    /// Creating or looking up the repository failed.
    #[error("{}", describe_remote(.status, .message))]
    RemoteError {
        /// HTTP status, or `None` if no response was received
        status: Option<u16>,
        /// What went wrong
        message: String,
    },

    /// Git is missing or a local staging step failed.
    #[error("{step} failed: {message}")]
    LocalToolError {
        /// The step that failed (e.g. "preflight", "commit")
        step: String,
        /// What went wrong
        message: String,
    },

    /// The final push failed. The remote repository may exist without content.
    #[error("push failed: {0}")]
    PushError(String),

    /// The source folder does not exist or is not a directory.
    #[error("folder not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The source folder holds nothing to publish.
    #[error("nothing to upload: {} has no files outside .git entries", .0.display())]
    EmptySource(PathBuf),

    /// The repository name is not acceptable.
    #[error("{0}")]
    InvalidRepoName(String),

    /// The operator cancelled.
    #[error("cancelled")]
    Cancelled,
}

fn describe_remote(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("GitHub request failed (HTTP {}): {}", status, message),
        None => format!("GitHub request failed: {}", message),
    }
}

impl PublishError {
    /// Build a local tool failure for `step`.
    pub fn local_tool(step: impl Into<String>, message: impl Into<String>) -> Self {
        PublishError::LocalToolError {
            step: step.into(),
            message: message.into(),
        }
    }

    /// Whether rerunning setup is the fix.
    pub fn needs_setup(&self) -> bool {
        matches!(
            self,
            PublishError::ConfigurationMissing | PublishError::AuthInvalid
        )
    }

    /// Whether a failure happened after the remote repository was resolved,
    /// leaving it in place for a retry.
    pub fn leaves_remote(&self) -> bool {
        matches!(self, PublishError::PushError(_))
    }
}

impl From<ForgeError> for PublishError {
    fn from(err: ForgeError) -> Self {
        match err {
            ForgeError::AuthRequired | ForgeError::AuthFailed(_) => PublishError::AuthInvalid,
            other => PublishError::RemoteError {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}

impl From<GitCliError> for PublishError {
    fn from(err: GitCliError) -> Self {
        match err {
            GitCliError::Failed { step, stderr, .. } if step == "push" => {
                PublishError::PushError(stderr)
            }
            other => PublishError::local_tool(other.step().to_string(), other.to_string()),
        }
    }
}

impl From<TypeError> for PublishError {
    fn from(err: TypeError) -> Self {
        PublishError::InvalidRepoName(err.to_string())
    }
}
