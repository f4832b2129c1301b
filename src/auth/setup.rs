//! auth::setup
//!
//! First-run setup: validate a token, then persist it.
//!
//! Nothing is written unless validation succeeds, so a failed setup leaves
//! any previous configuration untouched.

use thiserror::Error;

use super::validator::validate;
use crate::core::config::ConfigStore;
use crate::core::types::Credentials;
use crate::forge::Forge;

/// Errors from setup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    /// The token was rejected.
    #[error("token was rejected by GitHub: {0}")]
    InvalidToken(String),

    /// The token was accepted but could not be saved.
    #[error("failed to save configuration")]
    SaveFailed,
}

/// Values collected from the user during setup.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SetupRequest {
    /// Account login; `None` uses the login the token belongs to.
    pub username: Option<String>,
    /// Personal access token.
    pub token: String,
    /// Create repositories as private by default.
    pub default_private: bool,
    /// Description sent when creating repositories.
    pub default_description: String,
}

impl std::fmt::Debug for SetupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetupRequest")
            .field("username", &self.username)
            .field("token", &"[REDACTED]")
            .field("default_private", &self.default_private)
            .field("default_description", &self.default_description)
            .finish()
    }
}

/// Validate the request's token with `forge` and save the resulting
/// credentials to `store`.
///
/// `forge` must be bound to `request.token`.
pub async fn complete_setup(
    store: &dyn ConfigStore,
    forge: &dyn Forge,
    request: SetupRequest,
) -> Result<Credentials, SetupError> {
    let validation = validate(forge).await;
    if !validation.valid {
        return Err(SetupError::InvalidToken(
            validation.reason.unwrap_or_else(|| "unknown reason".into()),
        ));
    }

    let username = request
        .username
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .or(validation.login)
        .unwrap_or_default();

    let credentials = Credentials {
        username,
        token: request.token.trim().to_string(),
        default_private: request.default_private,
        default_description: request.default_description.trim().to_string(),
    };

    if !credentials.is_usable() || !store.save(&credentials) {
        return Err(SetupError::SaveFailed);
    }
    Ok(credentials)
}
