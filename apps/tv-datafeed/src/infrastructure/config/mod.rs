//! Configuration loading for the datafeed client.

mod settings;

pub use settings::{ConfigError, Credentials, DatafeedConfig, HttpSettings, WebSocketSettings};
