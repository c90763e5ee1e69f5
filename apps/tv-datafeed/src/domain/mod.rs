//! Domain Layer - Core bar-series types and instrument identity.
//!
//! This layer contains the core domain types for historical market data
//! with no I/O dependencies. All types here are pure Rust with
//! serialization support.

/// Bar and bar-series types.
pub mod bar;

/// Chart interval granularities.
pub mod interval;

/// Instrument identifier formatting.
pub mod symbol;

pub use bar::{Bar, BarSeries};
pub use interval::Interval;
pub use symbol::{SymbolError, format_symbol};
