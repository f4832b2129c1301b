//! forge::factory
//!
//! Forge creation.
//!
//! # Design
//!
//! Commands use [`create_forge`] instead of naming `GitHubForge` directly,
//! so the publish workflow only ever sees `dyn Forge` and tests can swap
//! in [`MockForge`](super::mock::MockForge).
//!
//! # Example
//!
//! ```
//! use ghpublish::forge::{create_forge, ForgeOptions};
//!
//! let forge = create_forge("ghp_token", &ForgeOptions::default());
//! assert_eq!(forge.name(), "github");
//! ```

use std::time::Duration;

use super::github::{GitHubForge, DEFAULT_API_BASE};
use super::traits::Forge;

/// Timeout applied while validating a candidate token.
pub const VALIDATION_TIMEOUT: Duration = Duration::from_secs(5);

/// How to reach the forge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForgeOptions {
    /// API base URL override (GitHub Enterprise, local mock server)
    pub api_base: Option<String>,
    /// Connect/response timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl ForgeOptions {
    /// Options with a custom API base URL.
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            api_base: Some(api_base.into()),
            timeout: None,
        }
    }

    /// The same options with the token validation timeout applied.
    pub fn for_validation(&self) -> Self {
        Self {
            api_base: self.api_base.clone(),
            timeout: Some(VALIDATION_TIMEOUT),
        }
    }

    /// The effective API base URL.
    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }
}

/// Create a forge bound to `token`.
pub fn create_forge(token: &str, options: &ForgeOptions) -> Box<dyn Forge> {
    let forge = GitHubForge::with_api_base(token, options.api_base());
    match options.timeout {
        Some(timeout) => Box::new(forge.with_timeout(timeout)),
        None => Box::new(forge),
    }
}
