//! Application Services
//!
//! [`Datafeed`] is the public surface of the client: it holds the
//! resolved auth token, the stream connector, and the HTTP search
//! collaborator, and exposes one bounded history fetch plus symbol
//! search. Every fetch opens a fresh connection with a fresh session
//! pair; nothing is shared between calls except the token, so separate
//! `Datafeed` instances (or clones of the connector) may fetch
//! concurrently without locking.

use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::StreamConnector;
use crate::domain::{BarSeries, Interval, format_symbol};
use crate::infrastructure::config::DatafeedConfig;
use crate::infrastructure::tradingview::{
    AuthClient, FetchError, FetchRequest, ProtocolSession, SearchClient, SymbolMatch,
    TungsteniteConnector,
};

/// Errors surfaced when building a [`Datafeed`].
#[derive(Debug, thiserror::Error)]
pub enum DatafeedError {
    /// The shared HTTP client could not be built.
    #[error("HTTP client construction failed: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// The datafeed client.
pub struct Datafeed {
    auth_token: String,
    connector: Arc<dyn StreamConnector>,
    search: SearchClient,
    read_timeout: Duration,
}

impl Datafeed {
    /// Build a client from configuration, resolving the auth token
    /// through the sign-in collaborator (degrading to the unauthorized
    /// token when no usable credentials exist).
    ///
    /// # Errors
    ///
    /// Returns [`DatafeedError::HttpClient`] when the underlying HTTP
    /// client cannot be constructed. Token resolution itself never
    /// fails; it degrades.
    pub async fn from_config(config: DatafeedConfig) -> Result<Self, DatafeedError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http.request_timeout)
            .build()?;

        let auth = AuthClient::new(
            http_client.clone(),
            config.http.sign_in_url.clone(),
            config.http.referer.clone(),
        );
        let auth_token = auth
            .resolve_token(config.auth_token.as_deref(), config.credentials.as_ref())
            .await;

        let search = SearchClient::new(http_client, config.http.search_url.clone());
        let connector = Arc::new(TungsteniteConnector::new(config.websocket.clone()));

        Ok(Self::new(
            auth_token,
            connector,
            search,
            config.websocket.read_timeout,
        ))
    }

    /// Build a client from explicit parts. Used directly by tests to
    /// substitute a scripted connector for the live websocket.
    #[must_use]
    pub fn new(
        auth_token: impl Into<String>,
        connector: Arc<dyn StreamConnector>,
        search: SearchClient,
        read_timeout: Duration,
    ) -> Self {
        Self {
            auth_token: auth_token.into(),
            connector,
            search,
            read_timeout,
        }
    }

    /// Fetch one bounded historical series.
    ///
    /// Formats the instrument identifier first (failing fast before any
    /// connection is opened), then opens a fresh stream, runs the
    /// bootstrap and streaming phases, and decodes the result. The
    /// stream is torn down on every exit path.
    ///
    /// # Errors
    ///
    /// [`FetchError::Symbol`] for invalid arguments (no I/O performed),
    /// [`FetchError::Transport`] for connect/bootstrap failures,
    /// [`FetchError::Decode`] when the stream carried no decodable
    /// series.
    pub async fn fetch_history(
        &self,
        symbol: &str,
        exchange: &str,
        interval: Interval,
        bar_count: u32,
        futures_contract: Option<i64>,
        extended_session: bool,
    ) -> Result<BarSeries, FetchError> {
        let instrument = format_symbol(symbol, exchange, futures_contract)?;

        let request = FetchRequest {
            instrument,
            interval,
            bar_count,
            extended_session,
        };

        let mut stream = self.connector.connect().await?;
        let session = ProtocolSession::new(self.read_timeout);
        session
            .fetch(stream.as_mut(), &self.auth_token, &request)
            .await
    }

    /// Search symbols by free text, optionally restricted to an
    /// exchange. Best effort: failures yield an empty list.
    pub async fn search_symbol(&self, text: &str, exchange: Option<&str>) -> Vec<SymbolMatch> {
        self.search.search(text, exchange).await
    }
}

impl std::fmt::Debug for Datafeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Datafeed")
            .field("auth_token", &"[REDACTED]")
            .field("read_timeout", &self.read_timeout)
            .finish_non_exhaustive()
    }
}
