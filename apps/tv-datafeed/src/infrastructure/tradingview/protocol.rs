//! Protocol Session
//!
//! Drives one historical-fetch round trip over an open stream:
//! the fixed bootstrap sequence, the receive loop with completion
//! detection, and decoding of the accumulated text. Each session owns a
//! freshly generated quote/chart sub-session pair and is used for
//! exactly one call; the stream is closed on every exit path.
//!
//! One connection per fetch trades efficiency for simplicity: historical
//! pulls are bounded, low-frequency operations, and a fresh connection
//! per call avoids cross-request session-id collision and backpressure
//! concerns entirely.

use std::time::Duration;

use thiserror::Error;

use crate::application::ports::{MarketStream, TransportError};
use crate::domain::{BarSeries, SymbolError};

use super::codec::{self, CodecError};
use super::decoder::{self, DecodeError};
use super::messages::{self, FetchRequest};
use super::session::{CHART_SESSION_PREFIX, QUOTE_SESSION_PREFIX, new_session_id};

/// Substring whose presence in a received frame signals logical
/// completion of the series. The service ends a historical pull with
/// this sentinel, not by closing the socket.
pub const COMPLETION_SENTINEL: &str = "series_completed";

/// Errors of one fetch round trip.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Instrument formatting rejected the arguments; raised before any
    /// network resource is acquired.
    #[error(transparent)]
    Symbol(#[from] SymbolError),

    /// Connection or send failure. Bootstrap transport errors abort
    /// immediately: the server-side session state would be inconsistent
    /// after a partial bootstrap.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Control-frame encoding failed.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The accumulated stream did not decode into a series.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// One single-use protocol session.
///
/// The session pair, the stream, and the raw accumulation buffer are
/// exclusively owned by one call; a session is not reused across
/// fetches or reconnects.
#[derive(Debug)]
pub struct ProtocolSession {
    quote_session: String,
    chart_session: String,
    read_timeout: Duration,
}

impl ProtocolSession {
    /// Create a session with a freshly generated sub-session pair.
    #[must_use]
    pub fn new(read_timeout: Duration) -> Self {
        Self {
            quote_session: new_session_id(QUOTE_SESSION_PREFIX),
            chart_session: new_session_id(CHART_SESSION_PREFIX),
            read_timeout,
        }
    }

    /// Quote sub-session identifier.
    #[must_use]
    pub fn quote_session(&self) -> &str {
        &self.quote_session
    }

    /// Chart sub-session identifier.
    #[must_use]
    pub fn chart_session(&self) -> &str {
        &self.chart_session
    }

    /// Run one fetch over an open stream.
    ///
    /// The stream is closed before returning, regardless of which phase
    /// failed.
    ///
    /// # Errors
    ///
    /// Propagates bootstrap transport errors and decoder errors; receive
    /// errors during streaming end the receive loop and decoding
    /// proceeds on whatever was accumulated.
    pub async fn fetch(
        &self,
        stream: &mut dyn MarketStream,
        auth_token: &str,
        request: &FetchRequest,
    ) -> Result<BarSeries, FetchError> {
        let result = self.run(stream, auth_token, request).await;
        stream.close().await;
        result
    }

    async fn run(
        &self,
        stream: &mut dyn MarketStream,
        auth_token: &str,
        request: &FetchRequest,
    ) -> Result<BarSeries, FetchError> {
        self.bootstrap(stream, auth_token, request).await?;

        tracing::info!(
            instrument = %request.instrument,
            interval = request.interval.as_token(),
            bars = request.bar_count,
            "Fetching historical series"
        );

        let raw = self.stream_until_completed(stream, &request.instrument).await;
        Ok(decoder::decode(&raw, &request.instrument)?)
    }

    /// Send the fixed bootstrap sequence. Order is significant: later
    /// calls reference session and resolution identifiers established by
    /// earlier ones.
    async fn bootstrap(
        &self,
        stream: &mut dyn MarketStream,
        auth_token: &str,
        request: &FetchRequest,
    ) -> Result<(), FetchError> {
        let calls = messages::bootstrap_sequence(
            auth_token,
            &self.quote_session,
            &self.chart_session,
            request,
        )
        .map_err(CodecError::from)?;

        for call in calls {
            let frame = codec::encode_control(&call)?;
            tracing::trace!(method = call.method, "Sending control call");
            stream.send_text(frame).await?;
        }

        Ok(())
    }

    /// Accumulate inbound frames until the completion sentinel appears.
    ///
    /// A receive error or per-read timeout ends the loop without failing
    /// the fetch: a usable prefix may already be sufficient, and if it is
    /// not, the decoder surfaces `NoDataFound` on the accumulated text.
    async fn stream_until_completed(
        &self,
        stream: &mut dyn MarketStream,
        instrument: &str,
    ) -> String {
        let mut raw = String::new();

        loop {
            match tokio::time::timeout(self.read_timeout, stream.recv_text()).await {
                Ok(Ok(frame)) => {
                    let completed = frame.contains(COMPLETION_SENTINEL);
                    raw.push_str(&frame);
                    raw.push('\n');
                    if completed {
                        tracing::debug!(instrument, "Series completed");
                        break;
                    }
                }
                Ok(Err(e)) => {
                    tracing::warn!(
                        instrument,
                        error = %e,
                        "Receive error, decoding accumulated data"
                    );
                    break;
                }
                Err(_) => {
                    tracing::warn!(
                        instrument,
                        timeout_ms = self.read_timeout.as_millis(),
                        "Read timed out before completion, decoding accumulated data"
                    );
                    break;
                }
            }
        }

        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_generate_distinct_pairs() {
        let a = ProtocolSession::new(Duration::from_secs(1));
        let b = ProtocolSession::new(Duration::from_secs(1));
        assert_ne!(a.quote_session(), b.quote_session());
        assert_ne!(a.chart_session(), b.chart_session());
        assert!(a.quote_session().starts_with("qs_"));
        assert!(a.chart_session().starts_with("cs_"));
    }
}
