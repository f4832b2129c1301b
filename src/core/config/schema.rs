//! core::config::schema
//!
//! Persisted configuration document.
//!
//! # Example
//!
//! ```toml
//! github_token = "ghp_xxxx"
//! github_username = "octocat"
//! default_private = false
//! default_description = "Uploaded with ghpub"
//! ```
//!
//! # Validation
//!
//! Every field has a default, so a partial document parses. Whether the
//! document describes usable credentials is decided by
//! [`Credentials::is_usable`](crate::core::types::Credentials::is_usable).

use serde::{Deserialize, Serialize};

use crate::core::types::Credentials;

/// On-disk configuration (user scope).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoredConfig {
    /// Personal access token
    pub github_token: String,

    /// Account login
    pub github_username: String,

    /// Create repositories as private by default
    pub default_private: bool,

    /// Description sent when creating repositories
    pub default_description: String,
}

impl StoredConfig {
    /// Convert to credentials, or `None` if they would not be usable.
    pub fn credentials(&self) -> Option<Credentials> {
        let creds = Credentials {
            username: self.github_username.clone(),
            token: self.github_token.clone(),
            default_private: self.default_private,
            default_description: self.default_description.clone(),
        };
        creds.is_usable().then_some(creds)
    }
}

impl From<&Credentials> for StoredConfig {
    fn from(creds: &Credentials) -> Self {
        Self {
            github_token: creds.token.clone(),
            github_username: creds.username.clone(),
            default_private: creds.default_private,
            default_description: creds.default_description.clone(),
        }
    }
}
