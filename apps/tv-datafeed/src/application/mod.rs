//! Application Layer - Use cases and port definitions.
//!
//! This layer contains the public datafeed facade and the port
//! interfaces that define how the protocol engine reaches the network.

/// Port interfaces for external systems (websocket transport).
pub mod ports;

/// Application services exposing the public fetch and search operations.
pub mod services;
