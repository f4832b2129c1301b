//! auth
//!
//! Credential validation and first-run setup.
//!
//! # Overview
//!
//! A token is valid when `GET /user` answers 200. Every other outcome,
//! including network failures and timeouts, counts as invalid. Validation
//! never returns an error; it reports a [`Validation`] the caller can act on.
//!
//! Setup combines validation with the config store: values are only
//! persisted after the token has been accepted.
//!
//! # Security
//!
//! Tokens never appear in [`Validation`], in [`SetupError`] messages or in
//! debug output.

mod setup;
mod validator;

pub use setup::{complete_setup, SetupError, SetupRequest};
pub use validator::{validate, validate_token, Validation};
