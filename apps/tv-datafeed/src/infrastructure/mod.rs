//! Infrastructure Layer - Adapters and external integrations.
//!
//! This layer contains the concrete implementations of the port
//! interfaces defined in the application layer, plus the HTTP
//! collaborators and configuration loading.

/// TradingView chart protocol engine and HTTP collaborators.
pub mod tradingview;

/// Configuration loading.
pub mod config;
