//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Credentials`] - Account identity and upload defaults
//! - [`RepoName`] - Validated remote repository name
//! - [`BranchName`] - Validated Git branch name
//! - [`RepositoryHandle`] - Resolved identity of a remote repository
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, so a bad repository name is rejected before
//! any request reaches the remote.
//!
//! # Examples
//!
//! ```
//! use ghpublish::core::types::{BranchName, RepoName};
//!
//! let name = RepoName::new("my-project").unwrap();
//! assert_eq!(name.as_str(), "my-project");
//!
//! assert!(RepoName::new("has space").is_err());
//! assert!(BranchName::new("main").is_ok());
//! assert!(BranchName::new("bad..name").is_err());
//! ```

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Maximum repository name length accepted by GitHub.
const MAX_REPO_NAME_LEN: usize = 100;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid repository name: {0}")]
    InvalidRepoName(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),
}

/// Account credentials and per-account upload defaults.
///
/// A value is *usable* only when both the username and the token are
/// non-empty after trimming whitespace.
///
/// The `Debug` implementation redacts the token.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    /// Account login on the remote service
    pub username: String,
    /// Personal access token
    pub token: String,
    /// Create new repositories as private
    pub default_private: bool,
    /// Description sent when creating repositories (empty means none)
    pub default_description: String,
}

impl Credentials {
    /// Create credentials with default visibility (public) and no description.
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
            default_private: false,
            default_description: String::new(),
        }
    }

    /// Whether both username and token are present.
    pub fn is_usable(&self) -> bool {
        !self.username.trim().is_empty() && !self.token.trim().is_empty()
    }

    /// The username with surrounding whitespace removed.
    pub fn owner(&self) -> &str {
        self.username.trim()
    }

    /// The token with surrounding whitespace removed.
    pub fn bearer(&self) -> &str {
        self.token.trim()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("has_token", &!self.token.trim().is_empty())
            .field("default_private", &self.default_private)
            .field("default_description", &self.default_description)
            .finish()
    }
}

/// A validated remote repository name.
///
/// Names must be 1-100 characters of ASCII letters, digits, `-`, `_`
/// or `.`, and cannot be `.` or `..`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoName(String);

impl RepoName {
    /// Create a new validated repository name.
    ///
    /// Surrounding whitespace is trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRepoName` if the name is not acceptable.
    pub fn new(name: impl AsRef<str>) -> Result<Self, TypeError> {
        let name = name.as_ref().trim();

        if name.is_empty() {
            return Err(TypeError::InvalidRepoName(
                "repository name cannot be empty".into(),
            ));
        }
        if name.len() > MAX_REPO_NAME_LEN {
            return Err(TypeError::InvalidRepoName(format!(
                "repository name cannot exceed {} characters",
                MAX_REPO_NAME_LEN
            )));
        }
        if name == "." || name == ".." {
            return Err(TypeError::InvalidRepoName(format!(
                "'{}' is reserved",
                name
            )));
        }
        if let Some(c) = name.chars().find(|c| !Self::is_allowed(*c)) {
            return Err(TypeError::InvalidRepoName(format!(
                "repository name cannot contain '{}'",
                c
            )));
        }

        Ok(Self(name.to_string()))
    }

    /// Suggest a repository name for a source folder.
    ///
    /// Uses the folder's final path component, replacing characters that
    /// are not allowed with `-`. Returns `None` if nothing usable remains.
    ///
    /// ```
    /// use ghpublish::core::types::RepoName;
    /// use std::path::Path;
    ///
    /// let name = RepoName::suggest_for(Path::new("/home/me/My Project")).unwrap();
    /// assert_eq!(name.as_str(), "My-Project");
    /// ```
    pub fn suggest_for(folder: &Path) -> Option<Self> {
        let base = folder.file_name()?.to_string_lossy();
        let sanitized: String = base
            .chars()
            .map(|c| if Self::is_allowed(c) { c } else { '-' })
            .take(MAX_REPO_NAME_LEN)
            .collect();
        Self::new(sanitized.trim_matches('-')).ok()
    }

    fn is_allowed(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
    }

    /// Get the repository name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated Git branch name.
///
/// Branch names follow a subset of Git's refname rules (see
/// `git check-ref-format`): non-empty, no leading `.` or `-`, no trailing
/// `.lock` or `/`, and none of `..`, `@{`, `//`, whitespace, `~`, `^`,
/// `:`, `\`, `?`, `*`, `[` or control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name violates the rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// The canonical default branch, `main`.
    pub fn main() -> Self {
        Self("main".to_string())
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        let reject = |msg: &str| Err(TypeError::InvalidBranchName(msg.to_string()));

        if name.is_empty() {
            return reject("branch name cannot be empty");
        }
        if name == "@" {
            return reject("branch name cannot be '@' (reserved)");
        }
        if name.starts_with('.') || name.starts_with('-') {
            return reject("branch name cannot start with '.' or '-'");
        }
        if name.ends_with(".lock") || name.ends_with('/') {
            return reject("branch name cannot end with '.lock' or '/'");
        }
        for seq in ["..", "@{", "//"] {
            if name.contains(seq) {
                return Err(TypeError::InvalidBranchName(format!(
                    "branch name cannot contain '{}'",
                    seq
                )));
            }
        }
        const INVALID_CHARS: [char; 8] = [' ', '~', '^', ':', '\\', '?', '*', '['];
        if let Some(c) = name
            .chars()
            .find(|c| INVALID_CHARS.contains(c) || c.is_ascii_control())
        {
            return Err(TypeError::InvalidBranchName(format!(
                "branch name cannot contain {:?}",
                c
            )));
        }

        Ok(())
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BranchName {
    fn default() -> Self {
        Self::main()
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The resolved identity of a remote repository.
///
/// Produced by the reconciler (by creation or discovery) and consumed
/// immediately by the staging pipeline. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryHandle {
    /// Repository name
    pub name: String,
    /// Push endpoint for the repository
    pub clone_url: String,
    /// Human-facing page for the repository
    pub web_url: String,
}
