//! core
//!
//! Core domain types and configuration for ghpublish.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Credentials, RepoName, BranchName, RepositoryHandle
//! - [`config`] - Configuration store and its on-disk schema
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Configuration is passed explicitly, never read from globals

pub mod config;
pub mod types;
