//! Port Interfaces
//!
//! Defines the interfaces (ports) for external systems following
//! the Hexagonal Architecture pattern. These are the contracts that
//! infrastructure adapters must implement.
//!
//! ## Driven Ports (Outbound)
//!
//! - [`StreamConnector`]: opens one framed text stream to the chart service
//! - [`MarketStream`]: one open stream, exclusively owned by a single
//!   fetch call for its whole lifetime
//!
//! The protocol engine only ever talks to these traits, which is what
//! allows the end-to-end tests to drive it with a scripted in-memory
//! transport instead of a live socket.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Transport-level errors surfaced through the ports.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Opening the stream failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Opening the stream did not complete within the connect timeout.
    #[error("connection timed out after {0:?}")]
    ConnectTimeout(Duration),

    /// Sending a frame failed after the stream was open.
    #[error("send failed: {0}")]
    Send(String),

    /// Receiving a frame failed.
    #[error("receive failed: {0}")]
    Receive(String),

    /// The peer closed the stream.
    #[error("stream closed by peer")]
    Closed,
}

/// One open, ordered text stream to the chart service.
///
/// A stream is exclusively owned by one fetch call: the bootstrap send
/// phase and the receive loop never interleave with another caller, so
/// implementations need no internal synchronization.
#[async_trait]
pub trait MarketStream: Send {
    /// Send one already-framed text message.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Send`] when transmission fails.
    async fn send_text(&mut self, frame: String) -> Result<(), TransportError>;

    /// Receive the next text message.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Receive`] on transport failure and
    /// [`TransportError::Closed`] when the peer ends the stream.
    async fn recv_text(&mut self) -> Result<String, TransportError>;

    /// Close the stream. Best effort; errors are swallowed because close
    /// runs on every exit path, including error paths.
    async fn close(&mut self);
}

/// Factory opening a fresh [`MarketStream`] per fetch call.
#[async_trait]
pub trait StreamConnector: Send + Sync {
    /// Open a new stream to the chart service.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ConnectionFailed`] or
    /// [`TransportError::ConnectTimeout`] when the stream cannot be opened.
    async fn connect(&self) -> Result<Box<dyn MarketStream>, TransportError>;
}
