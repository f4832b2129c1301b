//! git
//!
//! Git access for the publish workflow.
//!
//! # Architecture
//!
//! - [`GitCli`] runs the `git` executable for every mutation: init, remote
//!   setup, staging, commit, branch rename, push.
//! - [`Git`] is a `git2` read view used to inspect results (the commit
//!   that was pushed, the tree it holds).
//!
//! # Invariants
//!
//! - Every operation names the directory it works in; nothing depends on
//!   or changes the process's current directory
//! - No git invocation can block on an interactive prompt
//!
//! # Example
//!
//! ```no_run
//! use ghpublish::core::types::BranchName;
//! use ghpublish::git::{Git, GitCli};
//! use std::path::Path;
//!
//! let dir = Path::new("/tmp/workspace");
//! let git = GitCli::new();
//! git.init(dir)?;
//! git.add_all(dir)?;
//! git.commit(dir, "Initial commit")?;
//! git.rename_branch(dir, &BranchName::main())?;
//!
//! let head = Git::open(dir)?.head_commit()?;
//! println!("{}", head.short_oid());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod cli;
mod interface;

pub use cli::{GitCli, GitCliError, PushAuth, DEFAULT_PROGRAM};
pub use interface::{CommitInfo, Git, GitError};
