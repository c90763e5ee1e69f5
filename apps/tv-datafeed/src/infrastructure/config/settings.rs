//! Datafeed Configuration Settings
//!
//! Configuration types for the datafeed client, loaded from environment
//! variables. No variable is strictly required: missing credentials put
//! the client in the documented unauthorized mode, and every endpoint
//! and timeout has a production default.

use std::time::Duration;

/// Sign-in credentials.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create new credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Get the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Get the password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// WebSocket connection settings.
#[derive(Debug, Clone)]
pub struct WebSocketSettings {
    /// Chart stream endpoint.
    pub url: String,
    /// `Origin` header value required by the endpoint.
    pub origin: String,
    /// Handshake timeout.
    pub connect_timeout: Duration,
    /// Per-read timeout in the streaming phase; a timed-out read ends
    /// the receive loop instead of hanging when the completion sentinel
    /// never arrives.
    pub read_timeout: Duration,
}

impl Default for WebSocketSettings {
    fn default() -> Self {
        Self {
            url: "wss://data.tradingview.com/socket.io/websocket".to_string(),
            origin: "https://data.tradingview.com".to_string(),
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(5),
        }
    }
}

/// HTTP collaborator settings (sign-in and symbol search).
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Sign-in endpoint.
    pub sign_in_url: String,
    /// `Referer` header value sent with sign-in.
    pub referer: String,
    /// Symbol-search endpoint.
    pub search_url: String,
    /// Request timeout for both collaborators.
    pub request_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            sign_in_url: "https://www.tradingview.com/accounts/signin/".to_string(),
            referer: "https://www.tradingview.com".to_string(),
            search_url: "https://symbol-search.tradingview.com/symbol_search/".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Complete datafeed configuration.
#[derive(Debug, Clone, Default)]
pub struct DatafeedConfig {
    /// Explicit bearer token; wins over credentials when set.
    pub auth_token: Option<String>,
    /// Sign-in credentials; used when no explicit token is set.
    pub credentials: Option<Credentials>,
    /// WebSocket connection settings.
    pub websocket: WebSocketSettings,
    /// HTTP collaborator settings.
    pub http: HttpSettings,
}

impl DatafeedConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a credential variable is set but empty, or
    /// when a username is given without a password (or vice versa) —
    /// silent half-configuration would look like the deliberate
    /// unauthorized mode.
    pub fn from_env() -> Result<Self, ConfigError> {
        let auth_token = non_empty_env("TV_AUTH_TOKEN")?;
        let username = non_empty_env("TV_USERNAME")?;
        let password = non_empty_env("TV_PASSWORD")?;

        let credentials = match (username, password) {
            (Some(username), Some(password)) => Some(Credentials::new(username, password)),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::MissingEnvVar("TV_PASSWORD".to_string())),
            (None, Some(_)) => return Err(ConfigError::MissingEnvVar("TV_USERNAME".to_string())),
        };

        let websocket_defaults = WebSocketSettings::default();
        let websocket = WebSocketSettings {
            url: string_env("TV_WS_URL", websocket_defaults.url),
            origin: string_env("TV_WS_ORIGIN", websocket_defaults.origin),
            connect_timeout: parse_env_duration_secs(
                "TV_CONNECT_TIMEOUT_SECS",
                websocket_defaults.connect_timeout,
            ),
            read_timeout: parse_env_duration_secs(
                "TV_READ_TIMEOUT_SECS",
                websocket_defaults.read_timeout,
            ),
        };

        let http_defaults = HttpSettings::default();
        let http = HttpSettings {
            sign_in_url: string_env("TV_SIGN_IN_URL", http_defaults.sign_in_url),
            referer: string_env("TV_REFERER", http_defaults.referer),
            search_url: string_env("TV_SEARCH_URL", http_defaults.search_url),
            request_timeout: parse_env_duration_secs(
                "TV_HTTP_TIMEOUT_SECS",
                http_defaults.request_timeout,
            ),
        };

        Ok(Self {
            auth_token,
            credentials,
            websocket,
            http,
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A paired environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
}

fn string_env(key: &str, default: String) -> String {
    std::env::var(key).ok().filter(|v| !v.is_empty()).unwrap_or(default)
}

fn non_empty_env(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(value) if value.is_empty() => Err(ConfigError::EmptyValue(key.to_string())),
        Ok(value) => Ok(Some(value)),
        Err(_) => Ok(None),
    }
}

fn parse_env_duration_secs(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_redacted_debug() {
        let creds = Credentials::new("trader", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("trader"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn websocket_settings_defaults() {
        let settings = WebSocketSettings::default();
        assert!(settings.url.starts_with("wss://"));
        assert!(settings.origin.starts_with("https://"));
        assert_eq!(settings.connect_timeout, Duration::from_secs(5));
        assert_eq!(settings.read_timeout, Duration::from_secs(5));
    }

    #[test]
    fn http_settings_defaults() {
        let settings = HttpSettings::default();
        assert!(settings.sign_in_url.contains("signin"));
        assert!(settings.search_url.contains("symbol_search"));
        assert_eq!(settings.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn default_config_is_unauthenticated() {
        let config = DatafeedConfig::default();
        assert!(config.auth_token.is_none());
        assert!(config.credentials.is_none());
    }
}
