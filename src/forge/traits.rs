//! forge::traits
//!
//! Forge trait definition for interacting with remote hosting services.
//!
//! # Design
//!
//! The `Forge` trait is async because forge operations involve network I/O.
//! All methods return `Result` to handle API errors gracefully. A forge
//! instance is bound to one access token at construction time.
//!
//! # Example
//!
//! ```ignore
//! use ghpublish::forge::{CreateRepoRequest, Forge};
//!
//! async fn create(forge: &dyn Forge) -> Result<(), ForgeError> {
//!     let repo = forge.create_repo(CreateRepoRequest {
//!         name: "demo1".to_string(),
//!         private: false,
//!         description: None,
//!     }).await?;
//!     println!("Created {}", repo.html_url);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

/// Errors from forge operations.
///
/// These error types map to common failure modes when interacting
/// with remote hosting services like GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForgeError {
    /// Authentication is required but not available.
    #[error("authentication required")]
    AuthRequired,

    /// Authentication failed (invalid or expired token).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ForgeError {
    /// The HTTP status code behind this error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ForgeError::NotFound(_) => Some(404),
            ForgeError::RateLimited => Some(429),
            ForgeError::ApiError { status, .. } => Some(*status),
            ForgeError::AuthRequired | ForgeError::AuthFailed(_) | ForgeError::NetworkError(_) => {
                None
            }
        }
    }

    /// Whether this is the "name already exists on this account" conflict.
    pub fn is_name_conflict(&self) -> bool {
        matches!(self, ForgeError::ApiError { status: 422, .. })
    }
}

/// Request to create a repository owned by the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRepoRequest {
    /// Repository name
    pub name: String,
    /// Create as private
    pub private: bool,
    /// Optional description
    pub description: Option<String>,
}

/// Repository information returned from the forge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepository {
    /// Repository name
    pub name: String,
    /// Owner login
    pub owner: String,
    /// HTTPS clone/push URL
    pub clone_url: String,
    /// Web URL for viewing
    pub html_url: String,
    /// Whether the repository is private
    pub private: bool,
}

/// The account a token authenticates as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Account login
    pub login: String,
}

/// The Forge trait for interacting with remote hosting services.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, ForgeError>`. Callers should handle:
/// - `AuthRequired` / `AuthFailed`: Rerun setup
/// - `ApiError` with status 422 on create: the name is taken
/// - `NotFound`: Resource doesn't exist
/// - `NetworkError`: Check connectivity
#[async_trait]
pub trait Forge: Send + Sync {
    /// Get the forge name (e.g., "github").
    fn name(&self) -> &'static str;

    /// Identify the account the token belongs to (`GET /user`).
    ///
    /// # Errors
    ///
    /// - `AuthFailed` if the token is rejected
    /// - `NetworkError` if the forge could not be reached
    async fn current_user(&self) -> Result<AuthenticatedUser, ForgeError>;

    /// Create a repository for the authenticated user (`POST /user/repos`).
    ///
    /// The repository is created empty (no auto-generated initial commit).
    ///
    /// # Errors
    ///
    /// - `ApiError` with status 422 if the name is already taken
    /// - `ApiError` with status 403 if the token lacks permission
    async fn create_repo(&self, request: CreateRepoRequest)
        -> Result<RemoteRepository, ForgeError>;

    /// Look up a repository by owner and name (`GET /repos/{owner}/{name}`).
    ///
    /// # Errors
    ///
    /// - `NotFound` if the repository doesn't exist or is not visible
    async fn get_repo(&self, owner: &str, name: &str) -> Result<RemoteRepository, ForgeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forge_error_display() {
        assert_eq!(
            format!("{}", ForgeError::AuthRequired),
            "authentication required"
        );
        assert_eq!(
            format!("{}", ForgeError::AuthFailed("expired token".into())),
            "authentication failed: expired token"
        );
        assert_eq!(
            format!("{}", ForgeError::NotFound("octocat/demo".into())),
            "not found: octocat/demo"
        );
        assert_eq!(format!("{}", ForgeError::RateLimited), "rate limited");
        assert_eq!(
            format!(
                "{}",
                ForgeError::ApiError {
                    status: 422,
                    message: "Repository creation failed.".into()
                }
            ),
            "API error: 422 - Repository creation failed."
        );
        assert_eq!(
            format!("{}", ForgeError::NetworkError("connection refused".into())),
            "network error: connection refused"
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(ForgeError::NotFound("x".into()).status(), Some(404));
        assert_eq!(ForgeError::RateLimited.status(), Some(429));
        assert_eq!(
            ForgeError::ApiError {
                status: 500,
                message: String::new()
            }
            .status(),
            Some(500)
        );
        assert_eq!(ForgeError::NetworkError("x".into()).status(), None);
        assert_eq!(ForgeError::AuthRequired.status(), None);
        assert_eq!(ForgeError::AuthFailed("x".into()).status(), None);
    }

    #[test]
    fn name_conflict_is_only_422() {
        let conflict = ForgeError::ApiError {
            status: 422,
            message: "name already exists on this account".into(),
        };
        assert!(conflict.is_name_conflict());

        let other = ForgeError::ApiError {
            status: 400,
            message: String::new(),
        };
        assert!(!other.is_name_conflict());
        assert!(!ForgeError::NotFound("x".into()).is_name_conflict());
    }
}
