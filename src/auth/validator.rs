//! auth::validator
//!
//! Token validation against the authenticated-user endpoint.

use crate::forge::{create_forge, Forge, ForgeError, ForgeOptions};

/// Outcome of validating a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    /// Whether the token was accepted.
    pub valid: bool,
    /// Login the token belongs to, when accepted.
    pub login: Option<String>,
    /// Why the token was rejected, when it was.
    pub reason: Option<String>,
}

impl Validation {
    fn accepted(login: String) -> Self {
        Self {
            valid: true,
            login: Some(login),
            reason: None,
        }
    }

    fn rejected(err: &ForgeError) -> Self {
        Self {
            valid: false,
            login: None,
            reason: Some(err.to_string()),
        }
    }
}

/// Validate the token a forge is bound to.
pub async fn validate(forge: &dyn Forge) -> Validation {
    match forge.current_user().await {
        Ok(user) => Validation::accepted(user.login),
        Err(err) => Validation::rejected(&err),
    }
}

/// Validate a raw token against GitHub.
///
/// Uses the short validation timeout from [`ForgeOptions::for_validation`],
/// so an unreachable API reports invalid instead of hanging.
pub async fn validate_token(token: &str, options: &ForgeOptions) -> Validation {
    if token.trim().is_empty() {
        return Validation::rejected(&ForgeError::AuthRequired);
    }
    let forge = create_forge(token.trim(), &options.for_validation());
    validate(forge.as_ref()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::mock::{FailOn, MockForge};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn accepted_token_reports_login() {
        let forge = MockForge::new("octocat");
        let result = validate(&forge).await;
        assert!(result.valid);
        assert_eq!(result.login.as_deref(), Some("octocat"));
        assert!(result.reason.is_none());
    }

    #[tokio::test]
    async fn every_failure_is_invalid() {
        let failures = [
            ForgeError::AuthFailed("Bad credentials".into()),
            ForgeError::NetworkError("connection refused".into()),
            ForgeError::RateLimited,
            ForgeError::ApiError {
                status: 500,
                message: "boom".into(),
            },
        ];

        for err in failures {
            let forge = MockForge::new("octocat").fail_on(FailOn::CurrentUser(err));
            let result = validate(&forge).await;
            assert!(!result.valid);
            assert!(result.login.is_none());
        }
    }

    #[tokio::test]
    async fn blank_token_skips_network() {
        let result = validate_token("   ", &ForgeOptions::default()).await;
        assert!(!result.valid);
    }

    #[tokio::test]
    async fn validates_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("authorization", "Bearer ghp_good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "login": "octocat",
                "id": 1
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "message": "Bad credentials"
            })))
            .mount(&server)
            .await;

        let options = ForgeOptions::with_api_base(server.uri());

        let good = validate_token("ghp_good", &options).await;
        assert!(good.valid);
        assert_eq!(good.login.as_deref(), Some("octocat"));

        let bad = validate_token("ghp_bad", &options).await;
        assert!(!bad.valid);
        assert!(!bad.reason.unwrap_or_default().contains("ghp_bad"));
    }

    #[tokio::test]
    async fn unreachable_api_is_invalid() {
        // Nothing listens on the discard port
        let options = ForgeOptions::with_api_base("http://127.0.0.1:9");
        let result = validate_token("ghp_abc", &options).await;
        assert!(!result.valid);
    }
}
