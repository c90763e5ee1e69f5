#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::default_trait_access
    )
)]

//! tv-datafeed - TradingView Historical Data Client
//!
//! A client for TradingView's text-framed, session-multiplexed chart
//! protocol. Each call opens one websocket, walks the fixed bootstrap
//! sequence, streams frames until the series-completed sentinel, and
//! decodes the embedded positional payload into a typed bar series.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Bar-series types and instrument identity
//!   - `bar`: `Bar` and `BarSeries`
//!   - `interval`: chart granularities
//!   - `symbol`: canonical instrument-id formatting
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: stream connector and market stream interfaces
//!   - `services`: the `Datafeed` facade (fetch history, search symbols)
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `tradingview`: protocol engine (codec, session, decoder) plus
//!     sign-in and symbol-search HTTP collaborators
//!   - `config`: environment-based configuration
//!
//! # Data Flow
//!
//! ```text
//! fetch_history ──► connect ──► 9-call bootstrap ──► frame stream ──┐
//!                                                                   │
//!        BarSeries ◄── positional decoder ◄── raw buffer ◄──────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Core bar-series types with no I/O dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::{Bar, BarSeries, Interval, SymbolError, format_symbol};

// Ports (for integration tests and alternative transports)
pub use application::ports::{MarketStream, StreamConnector, TransportError};

// Public facade
pub use application::services::{Datafeed, DatafeedError};

// Infrastructure config
pub use infrastructure::config::{
    ConfigError, Credentials, DatafeedConfig, HttpSettings, WebSocketSettings,
};

// Protocol engine (for integration tests)
pub use infrastructure::tradingview::{
    COMPLETION_SENTINEL, CodecError, DecodeError, FetchError, ProtocolSession, SearchClient,
    SymbolMatch, UNAUTHORIZED_TOKEN,
};
