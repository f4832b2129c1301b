//! forge::github
//!
//! GitHub forge implementation using the REST API.
//!
//! # Design
//!
//! This module implements the `Forge` trait for GitHub with three
//! endpoints:
//! - `GET /user` to identify the token's account
//! - `POST /user/repos` to create a repository
//! - `GET /repos/{owner}/{name}` to look one up
//!
//! # Authentication
//!
//! A personal access token is sent as a bearer token on every request.
//! The token is never included in `Debug` output or error messages.
//!
//! # Rate Limiting
//!
//! Returns `ForgeError::RateLimited` on HTTP 429. No automatic retry.
//!
//! # Example
//!
//! ```ignore
//! use ghpublish::forge::github::GitHubForge;
//! use ghpublish::forge::{CreateRepoRequest, Forge};
//!
//! let forge = GitHubForge::new("ghp_xxx");
//! let repo = forge.create_repo(CreateRepoRequest {
//!     name: "demo1".to_string(),
//!     private: false,
//!     description: None,
//! }).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::traits::{AuthenticatedUser, CreateRepoRequest, Forge, ForgeError, RemoteRepository};

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "ghpublish-cli";

/// GitHub forge implementation.
///
/// Implements the `Forge` trait for GitHub using the REST API.
pub struct GitHubForge {
    /// HTTP client for making requests
    client: Client,
    /// Personal access token
    token: String,
    /// API base URL (configurable for GitHub Enterprise)
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubForge")
            .field("has_token", &!self.token.is_empty())
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubForge {
    /// Create a new GitHub forge against `api.github.com`.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_base(token, DEFAULT_API_BASE)
    }

    /// Create a GitHub forge with a custom API base URL.
    ///
    /// Use this for GitHub Enterprise (`https://github.example.com/api/v3`)
    /// or to point at a local mock server. A trailing `/` is ignored.
    pub fn with_api_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        let mut api_base = api_base.into();
        while api_base.ends_with('/') {
            api_base.pop();
        }
        Self {
            client: Client::new(),
            token: token.into(),
            api_base,
        }
    }

    /// Apply a connect and response timeout to every request.
    ///
    /// Falls back to the default client if the builder fails.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if let Ok(client) = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
        {
            self.client = client;
        }
        self
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, ForgeError> {
        if self.token.trim().is_empty() {
            return Err(ForgeError::AuthRequired);
        }
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.token.trim()))
            .map_err(|_| ForgeError::AuthFailed("token contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Build URL for an API path (must start with `/`).
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Handle API response, mapping errors appropriately.
    ///
    /// Only `expected` counts as success; any other 2xx is an API error.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: Response,
        expected: StatusCode,
    ) -> Result<T, ForgeError> {
        let status = response.status();

        if status == expected {
            response.json().await.map_err(|e| ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("Failed to parse response: {}", e),
            })
        } else if status.is_success() {
            Err(ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("Unexpected response status (expected {})", expected.as_u16()),
            })
        } else {
            Err(Self::error_for(response, status).await)
        }
    }

    /// Map an error response from the API.
    async fn error_for(response: Response, status: StatusCode) -> ForgeError {
        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.describe(),
            Err(_) => "Unknown error".to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
            // A valid token can still be refused an action
            StatusCode::FORBIDDEN => ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("Permission denied: {}", message),
            },
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ if status.is_server_error() => ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl Forge for GitHubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn current_user(&self) -> Result<AuthenticatedUser, ForgeError> {
        let response = self
            .client
            .get(self.url("/user"))
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let user: GitHubUser = self.handle_response(response, StatusCode::OK).await?;
        Ok(AuthenticatedUser { login: user.login })
    }

    async fn create_repo(
        &self,
        request: CreateRepoRequest,
    ) -> Result<RemoteRepository, ForgeError> {
        let body = CreateRepoBody {
            name: &request.name,
            private: request.private,
            auto_init: false,
            description: request.description.as_deref().filter(|d| !d.is_empty()),
        };

        let response = self
            .client
            .post(self.url("/user/repos"))
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let repo: GitHubRepository = self.handle_response(response, StatusCode::CREATED).await?;
        Ok(repo.into())
    }

    async fn get_repo(&self, owner: &str, name: &str) -> Result<RemoteRepository, ForgeError> {
        let response = self
            .client
            .get(self.url(&format!("/repos/{}/{}", owner, name)))
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let repo: GitHubRepository = self.handle_response(response, StatusCode::OK).await?;
        Ok(repo.into())
    }
}

// =============================================================================
// API Types
// =============================================================================

/// Request body for creating a repository.
#[derive(Debug, Serialize)]
struct CreateRepoBody<'a> {
    name: &'a str,
    private: bool,
    auto_init: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

/// GitHub user response (subset).
#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
}

/// GitHub repository owner (subset).
#[derive(Debug, Deserialize)]
struct GitHubOwner {
    login: String,
}

/// GitHub repository response (subset).
#[derive(Debug, Deserialize)]
struct GitHubRepository {
    name: String,
    owner: GitHubOwner,
    clone_url: String,
    html_url: String,
    #[serde(default)]
    private: bool,
}

impl From<GitHubRepository> for RemoteRepository {
    fn from(repo: GitHubRepository) -> Self {
        Self {
            name: repo.name,
            owner: repo.owner.login,
            clone_url: repo.clone_url,
            html_url: repo.html_url,
            private: repo.private,
        }
    }
}

/// GitHub error response.
#[derive(Debug, Deserialize)]
struct GitHubErrorResponse {
    message: String,
    #[serde(default)]
    errors: Vec<GitHubErrorDetail>,
}

/// One entry of the `errors` array in a validation failure.
#[derive(Debug, Deserialize)]
struct GitHubErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

impl GitHubErrorResponse {
    /// Message plus the first detail, e.g.
    /// "Repository creation failed. (name already exists on this account)".
    fn describe(&self) -> String {
        match self.errors.iter().find_map(|e| e.message.as_deref()) {
            Some(detail) => format!("{} ({})", self.message, detail),
            None => self.message.clone(),
        }
    }
}
