//! TradingView Chart Protocol Adapters
//!
//! Implements the chart websocket protocol engine and its HTTP
//! collaborators:
//!
//! - **codec**: `~m~<len>~m~` wire framing
//! - **messages**: control calls and the fixed bootstrap sequence
//! - **session**: quote/chart sub-session identity generation
//! - **protocol**: the per-fetch state machine
//! - **decoder**: positional bar-series payload decoding
//! - **auth**: sign-in token resolution with degraded fallback
//! - **search**: symbol-search lookup
//! - **websocket**: tokio-tungstenite transport adapter

pub mod auth;
pub mod codec;
pub mod decoder;
pub mod messages;
pub mod protocol;
pub mod search;
pub mod session;
pub mod websocket;

pub use auth::{AuthClient, AuthError, UNAUTHORIZED_TOKEN};
pub use codec::{CodecError, FRAME_MARKER, encode_control, extract_control, split_frames};
pub use decoder::{DecodeError, decode};
pub use messages::{ControlCall, FetchRequest, QUOTE_FIELDS, SymbolResolution};
pub use protocol::{COMPLETION_SENTINEL, FetchError, ProtocolSession};
pub use search::{SearchClient, SymbolMatch};
pub use session::{CHART_SESSION_PREFIX, QUOTE_SESSION_PREFIX, new_session_id};
pub use websocket::TungsteniteConnector;
