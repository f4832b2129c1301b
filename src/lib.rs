//! ghpublish - Publish a local folder as a GitHub repository
//!
//! Takes a directory, creates (or reuses) a repository on the authenticated
//! account, and pushes the directory's contents as a single commit on a
//! fresh branch.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, collects input)
//! - [`publish`] - The upload workflow: reconcile, stage, push
//! - [`auth`] - Token validation and first-run setup
//! - [`forge`] - Abstraction over the GitHub REST API
//! - [`git`] - Git invocations and read-back
//! - [`core`] - Domain types and the configuration store
//! - [`ui`] - Output and prompts
//!
//! # Invariants
//!
//! 1. A bad folder, name or missing git is rejected before any request
//! 2. The staging workspace is removed on every exit path
//! 3. The process's current directory is never changed
//! 4. Tokens never appear in output, errors or debug formatting

pub mod auth;
pub mod cli;
pub mod core;
pub mod forge;
pub mod git;
pub mod publish;
pub mod ui;
