//! git::interface
//!
//! Read-only view of a repository through `git2`.
//!
//! # Design
//!
//! Mutations go through [`GitCli`](super::GitCli). This view only reads
//! what those mutations produced: the commit behind a ref, how many
//! commits it has, which paths its tree holds. It opens bare repositories
//! too, so the same code can inspect a push target.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from reading a repository.
#[derive(Debug, Error)]
pub enum GitError {
    /// No repository at the given path.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was opened
        path: PathBuf,
    },

    /// Requested ref does not exist or does not point at a commit.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound | git2::ErrorCode::UnbornBranch => GitError::RefNotFound {
                refname: context.to_string(),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

/// Information about a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Full hex object id
    pub oid: String,
    /// First line of the commit message
    pub summary: String,
    /// Author name
    pub author_name: String,
    /// Author email
    pub author_email: String,
    /// Number of parents
    pub parent_count: usize,
}

impl CommitInfo {
    /// Abbreviated object id for display.
    pub fn short_oid(&self) -> &str {
        &self.oid[..self.oid.len().min(7)]
    }
}

/// Read view over one repository.
pub struct Git {
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    /// Open the repository rooted exactly at `path`.
    ///
    /// Unlike discovery, this never walks up into a parent repository, so a
    /// fresh workspace inside someone else's checkout is still seen as
    /// itself.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if `path` is not a repository (bare or not)
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::open(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;
        Ok(Self { repo })
    }

    /// Whether the repository has no working directory.
    pub fn is_bare(&self) -> bool {
        self.repo.is_bare()
    }

    /// Name of the branch HEAD points at, even before its first commit.
    pub fn current_branch(&self) -> Option<String> {
        match self.repo.head() {
            Ok(head) => head.shorthand().map(String::from),
            Err(_) => {
                // Unborn HEAD still names its target
                let head = self.repo.find_reference("HEAD").ok()?;
                let target = head.symbolic_target()?;
                target.strip_prefix("refs/heads/").map(String::from)
            }
        }
    }

    /// The commit HEAD points at.
    pub fn head_commit(&self) -> Result<CommitInfo, GitError> {
        self.commit_at("HEAD")
    }

    /// The commit a ref or revision resolves to.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefNotFound`] if `spec` does not resolve to a commit
    pub fn commit_at(&self, spec: &str) -> Result<CommitInfo, GitError> {
        let commit = self.peel_commit(spec)?;
        let author = commit.author();
        Ok(CommitInfo {
            oid: commit.id().to_string(),
            summary: commit.summary().unwrap_or("").to_string(),
            author_name: author.name().unwrap_or("").to_string(),
            author_email: author.email().unwrap_or("").to_string(),
            parent_count: commit.parent_count(),
        })
    }

    /// Number of commits reachable from `spec`.
    pub fn commit_count(&self, spec: &str) -> Result<usize, GitError> {
        let commit = self.peel_commit(spec)?;
        let mut walk = self
            .repo
            .revwalk()
            .map_err(|e| GitError::from_git2(e, spec))?;
        walk.push(commit.id())
            .map_err(|e| GitError::from_git2(e, spec))?;
        Ok(walk.count())
    }

    /// Every blob path in the tree of `spec`, `/`-separated and sorted.
    pub fn tree_paths(&self, spec: &str) -> Result<Vec<String>, GitError> {
        let tree = self
            .peel_commit(spec)?
            .tree()
            .map_err(|e| GitError::from_git2(e, spec))?;

        let mut paths = Vec::new();
        tree.walk(git2::TreeWalkMode::PreOrder, |root, entry| {
            if entry.kind() == Some(git2::ObjectType::Blob) {
                paths.push(format!("{}{}", root, entry.name().unwrap_or("")));
            }
            git2::TreeWalkResult::Ok
        })
        .map_err(|e| GitError::from_git2(e, spec))?;

        paths.sort();
        Ok(paths)
    }

    /// URL configured for a remote, or `None` if there is no such remote.
    pub fn remote_url(&self, name: &str) -> Result<Option<String>, GitError> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(String::from)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::from_git2(e, name)),
        }
    }

    /// The upstream configured for a local branch, as `(remote, merge ref)`.
    pub fn upstream_of(&self, branch: &str) -> Result<Option<(String, String)>, GitError> {
        let config = self
            .repo
            .config()
            .map_err(|e| GitError::from_git2(e, "config"))?;
        let remote = config.get_string(&format!("branch.{}.remote", branch)).ok();
        let merge = config.get_string(&format!("branch.{}.merge", branch)).ok();
        Ok(remote.zip(merge))
    }

    fn peel_commit(&self, spec: &str) -> Result<git2::Commit<'_>, GitError> {
        self.repo
            .revparse_single(spec)
            .and_then(|obj| obj.peel_to_commit())
            .map_err(|e| GitError::from_git2(e, spec))
    }
}
