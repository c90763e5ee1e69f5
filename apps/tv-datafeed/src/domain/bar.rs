//! Bar Series Types
//!
//! Canonical internal representation of a decoded historical series:
//! one [`Bar`] per time-series point, collected into a [`BarSeries`]
//! tagged with the instrument it was fetched for.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One decoded time-series point.
///
/// Open, high, low, and close are always present; volume defaults to
/// `0.0` when the service omits it for the instrument (indices and some
/// futures have no volume feed).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bar {
    /// Bar open time (seconds resolution, as emitted by the service).
    pub timestamp: DateTime<Utc>,
    /// Opening price.
    pub open: f64,
    /// Highest price.
    pub high: f64,
    /// Lowest price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume, `0.0` when the service sent none.
    pub volume: f64,
}

/// An ordered historical series for one instrument.
///
/// Bars preserve the order they appeared in the raw payload, which is
/// chronological ascending as emitted by the service. An empty series is
/// a valid (if unusual) result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    /// Canonical exchange-qualified instrument identifier.
    pub instrument: String,
    /// Decoded bars in chronological order.
    pub bars: Vec<Bar>,
    /// Set when at least one bar arrived without a volume field.
    pub volume_incomplete: bool,
}

impl BarSeries {
    /// Create an empty series for an instrument.
    #[must_use]
    pub fn empty(instrument: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
            bars: Vec::new(),
            volume_incomplete: false,
        }
    }

    /// Number of bars in the series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check whether the series holds no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series() {
        let series = BarSeries::empty("NSE:NIFTY");
        assert_eq!(series.instrument, "NSE:NIFTY");
        assert!(series.is_empty());
        assert_eq!(series.len(), 0);
        assert!(!series.volume_incomplete);
    }

    #[test]
    fn series_len_tracks_bars() {
        let mut series = BarSeries::empty("NSE:NIFTY");
        series.bars.push(Bar {
            timestamp: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            open: 10.0,
            high: 12.0,
            low: 9.5,
            close: 11.0,
            volume: 1000.0,
        });
        assert_eq!(series.len(), 1);
        assert!(!series.is_empty());
    }
}
