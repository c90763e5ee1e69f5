//! Sign-In Collaborator
//!
//! Resolves the bearer token consumed verbatim by `set_auth_token`.
//! Token sources, in priority order:
//!
//! 1. an explicit token supplied through configuration;
//! 2. the sign-in HTTP endpoint, called with username and password;
//! 3. the `"unauthorized_user_token"` placeholder.
//!
//! The fallback is an explicit degraded mode, not an error: the service
//! accepts the placeholder and serves a reduced entitlement (shorter
//! ranges, delayed data for some exchanges). Missing or rejected
//! credentials therefore log a warning and degrade instead of failing
//! the client.

use serde::Deserialize;
use thiserror::Error;

use crate::infrastructure::config::Credentials;

/// Placeholder token for the degraded, unauthenticated mode.
pub const UNAUTHORIZED_TOKEN: &str = "unauthorized_user_token";

/// Sign-in errors. Internal to token resolution; callers always receive
/// a token because resolution degrades instead of failing.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The sign-in HTTP call failed.
    #[error("sign-in request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response carried no token (wrong credentials, captcha, or a
    /// changed response shape).
    #[error("sign-in response carried no auth token")]
    TokenMissing,
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    user: Option<SignInUser>,
}

#[derive(Debug, Deserialize)]
struct SignInUser {
    auth_token: String,
}

/// HTTP client for the sign-in endpoint.
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    sign_in_url: String,
    referer: String,
}

impl AuthClient {
    /// Create a sign-in client.
    #[must_use]
    pub const fn new(client: reqwest::Client, sign_in_url: String, referer: String) -> Self {
        Self {
            client,
            sign_in_url,
            referer,
        }
    }

    /// Resolve a token from the configured sources.
    ///
    /// Never fails: absent or rejected credentials fall back to
    /// [`UNAUTHORIZED_TOKEN`] with a warning.
    pub async fn resolve_token(
        &self,
        explicit_token: Option<&str>,
        credentials: Option<&Credentials>,
    ) -> String {
        if let Some(token) = explicit_token {
            return token.to_string();
        }

        let Some(credentials) = credentials else {
            tracing::warn!(
                "No auth token or credentials provided, using unauthorized token. \
                 Access may be limited."
            );
            return UNAUTHORIZED_TOKEN.to_string();
        };

        match self.sign_in(credentials).await {
            Ok(token) => {
                tracing::info!(username = credentials.username(), "Signed in");
                token
            }
            Err(e) => {
                tracing::warn!(
                    username = credentials.username(),
                    error = %e,
                    "Sign-in failed, using unauthorized token. Access may be limited."
                );
                UNAUTHORIZED_TOKEN.to_string()
            }
        }
    }

    /// Perform the sign-in HTTP call.
    async fn sign_in(&self, credentials: &Credentials) -> Result<String, AuthError> {
        let form = [
            ("username", credentials.username()),
            ("password", credentials.password()),
            ("remember", "on"),
        ];

        let response = self
            .client
            .post(&self.sign_in_url)
            .header(reqwest::header::REFERER, &self.referer)
            .form(&form)
            .send()
            .await?
            .error_for_status()?;

        let body: SignInResponse = response.json().await?;
        body.user
            .map(|user| user.auth_token)
            .ok_or(AuthError::TokenMissing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AuthClient {
        AuthClient::new(
            reqwest::Client::new(),
            "http://127.0.0.1:1/signin".to_string(),
            "http://127.0.0.1:1".to_string(),
        )
    }

    #[tokio::test]
    async fn explicit_token_wins() {
        let token = client()
            .resolve_token(Some("my-token"), Some(&Credentials::new("u", "p")))
            .await;
        assert_eq!(token, "my-token");
    }

    #[tokio::test]
    async fn missing_credentials_degrade() {
        let token = client().resolve_token(None, None).await;
        assert_eq!(token, UNAUTHORIZED_TOKEN);
    }

    #[tokio::test]
    async fn failed_sign_in_degrades() {
        // Unroutable endpoint: the request fails and resolution degrades.
        let token = client()
            .resolve_token(None, Some(&Credentials::new("user", "pass")))
            .await;
        assert_eq!(token, UNAUTHORIZED_TOKEN);
    }

    #[test]
    fn sign_in_response_shape() {
        let body = r#"{"user":{"id":1,"auth_token":"abc123"}}"#;
        let parsed: SignInResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.user.unwrap().auth_token, "abc123");

        let no_user = r#"{"error":"invalid credentials"}"#;
        let parsed: SignInResponse = serde_json::from_str(no_user).unwrap();
        assert!(parsed.user.is_none());
    }
}
