//! WebSocket Transport Adapter
//!
//! tokio-tungstenite implementation of the [`StreamConnector`] and
//! [`MarketStream`] ports. The chart endpoint requires an `Origin`
//! header naming the data service's domain; connections without it are
//! rejected at the handshake. Connect attempts are bounded by the
//! configured timeout so a fetch never hangs in the handshake.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::ORIGIN;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::application::ports::{MarketStream, StreamConnector, TransportError};
use crate::infrastructure::config::WebSocketSettings;

/// Connector opening one chart-protocol websocket per fetch.
#[derive(Debug, Clone)]
pub struct TungsteniteConnector {
    settings: WebSocketSettings,
}

impl TungsteniteConnector {
    /// Create a connector from websocket settings.
    #[must_use]
    pub const fn new(settings: WebSocketSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl StreamConnector for TungsteniteConnector {
    async fn connect(&self) -> Result<Box<dyn MarketStream>, TransportError> {
        let mut request = self
            .settings
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        let origin = HeaderValue::from_str(&self.settings.origin)
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        request.headers_mut().insert(ORIGIN, origin);

        tracing::debug!(url = %self.settings.url, "Connecting to chart stream");

        let (stream, _response) = tokio::time::timeout(
            self.settings.connect_timeout,
            tokio_tungstenite::connect_async(request),
        )
        .await
        .map_err(|_| TransportError::ConnectTimeout(self.settings.connect_timeout))?
        .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        Ok(Box::new(TungsteniteStream { inner: stream }))
    }
}

/// One open websocket, exclusively owned by a single fetch call.
struct TungsteniteStream {
    inner: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl MarketStream for TungsteniteStream {
    async fn send_text(&mut self, frame: String) -> Result<(), TransportError> {
        self.inner
            .send(Message::Text(frame.into()))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }

    async fn recv_text(&mut self) -> Result<String, TransportError> {
        loop {
            match self.inner.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text.to_string()),
                Some(Ok(Message::Close(_))) | None => return Err(TransportError::Closed),
                // Pings are answered by tungstenite itself; binary and
                // pong frames carry nothing the chart protocol uses.
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(TransportError::Receive(e.to_string())),
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.inner.close(None).await {
            tracing::debug!(error = %e, "Error closing chart stream");
        }
    }
}
