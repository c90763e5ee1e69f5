//! Bar Stream Decoder
//!
//! Reconstructs a typed [`BarSeries`] from the raw text accumulated
//! during the streaming phase. The series payload is embedded in one of
//! the received frames as a loosely structured `"s":[...]` array of
//! records; each record carries its values positionally, so decoding is
//! a strict positional-field parse rather than a JSON parse.
//!
//! Field policy per record (0-indexed after structural splitting):
//!
//! - field 4: Unix timestamp in seconds, fractional allowed — required;
//! - fields 5-8: open, high, low, close — required, an unparsable value
//!   aborts the whole decode since these are defining fields;
//! - field 9: volume — optional, absence or an unparsable value yields
//!   `0.0` and marks the series volume-incomplete instead of aborting.
//!
//! There is no partial-series recovery below the volume exception: a
//! record failing on a required field aborts the decode even when
//! earlier records decoded cleanly.

use chrono::DateTime;
use thiserror::Error;

use crate::domain::{Bar, BarSeries};

/// Marker opening the embedded series payload.
const SERIES_MARKER: &str = "\"s\":[";

/// Delimiter separating successive bar records inside the payload body.
const RECORD_DELIMITER: &str = ",{\"";

/// Positional index of the timestamp field after structural splitting.
const FIELD_TIMESTAMP: usize = 4;

/// Positional index of the volume field after structural splitting.
const FIELD_VOLUME: usize = 9;

/// Decoder errors.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The series payload marker is absent from the accumulated stream.
    /// Signals a wrong symbol/exchange or no historical data for the
    /// requested range; distinct from an empty (but present) payload.
    #[error("no data found for {instrument}: check symbol and exchange")]
    NoDataFound {
        /// Instrument the fetch was issued for.
        instrument: String,
    },

    /// A required field of a bar record failed to parse.
    #[error("malformed bar record for {instrument}: field {field} unparsable in {record:?}")]
    MalformedBar {
        /// Instrument the fetch was issued for.
        instrument: String,
        /// Positional index of the offending field.
        field: usize,
        /// The record token that failed.
        record: String,
    },
}

/// Decode the accumulated raw stream text into a bar series.
///
/// Bars are collected in encountered order, which is chronological
/// ascending as emitted by the service. A present-but-empty payload
/// yields an empty series.
///
/// # Errors
///
/// [`DecodeError::NoDataFound`] when the payload marker is absent,
/// [`DecodeError::MalformedBar`] when a required field fails to parse.
pub fn decode(raw: &str, instrument: &str) -> Result<BarSeries, DecodeError> {
    let body = locate_series_body(raw, instrument)?;

    let Some(body) = body else {
        tracing::debug!(instrument, "Series payload present but empty");
        return Ok(BarSeries::empty(instrument));
    };

    let mut bars = Vec::new();
    let mut volume_incomplete = false;

    for record in body.split(RECORD_DELIMITER) {
        bars.push(decode_record(record, instrument, &mut volume_incomplete)?);
    }

    if volume_incomplete {
        tracing::debug!(instrument, "Volume data missing for at least one bar");
    }

    Ok(BarSeries {
        instrument: instrument.to_string(),
        bars,
        volume_incomplete,
    })
}

/// Locate the series body between `"s":[` and the first `}]` after it.
///
/// Returns `Ok(None)` for a present-but-empty payload.
fn locate_series_body<'a>(
    raw: &'a str,
    instrument: &str,
) -> Result<Option<&'a str>, DecodeError> {
    let start = raw
        .find(SERIES_MARKER)
        .ok_or_else(|| DecodeError::NoDataFound {
            instrument: instrument.to_string(),
        })?
        + SERIES_MARKER.len();
    let rest = &raw[start..];

    if rest.trim_start().starts_with(']') {
        return Ok(None);
    }

    // Non-greedy: the body ends at the first record-closing "}]".
    let end = rest.find("}]").ok_or_else(|| DecodeError::NoDataFound {
        instrument: instrument.to_string(),
    })?;

    Ok(Some(&rest[..end]))
}

/// Decode one positionally-encoded bar record.
fn decode_record(
    record: &str,
    instrument: &str,
    volume_incomplete: &mut bool,
) -> Result<Bar, DecodeError> {
    let fields: Vec<&str> = record
        .split(['[', ':', ',', ']'])
        .collect();

    let timestamp_secs = required_field(&fields, FIELD_TIMESTAMP, record, instrument)?;
    let timestamp = to_timestamp(timestamp_secs).ok_or_else(|| DecodeError::MalformedBar {
        instrument: instrument.to_string(),
        field: FIELD_TIMESTAMP,
        record: record.to_string(),
    })?;

    let open = required_field(&fields, FIELD_TIMESTAMP + 1, record, instrument)?;
    let high = required_field(&fields, FIELD_TIMESTAMP + 2, record, instrument)?;
    let low = required_field(&fields, FIELD_TIMESTAMP + 3, record, instrument)?;
    let close = required_field(&fields, FIELD_TIMESTAMP + 4, record, instrument)?;

    let volume = match fields.get(FIELD_VOLUME).and_then(|f| f.parse::<f64>().ok()) {
        Some(v) => v,
        None => {
            *volume_incomplete = true;
            0.0
        }
    };

    Ok(Bar {
        timestamp,
        open,
        high,
        low,
        close,
        volume,
    })
}

/// Parse a required positional field as a float.
fn required_field(
    fields: &[&str],
    index: usize,
    record: &str,
    instrument: &str,
) -> Result<f64, DecodeError> {
    fields
        .get(index)
        .and_then(|f| f.parse::<f64>().ok())
        .ok_or_else(|| DecodeError::MalformedBar {
            instrument: instrument.to_string(),
            field: index,
            record: record.to_string(),
        })
}

/// Convert fractional Unix seconds to a UTC timestamp.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_timestamp(secs: f64) -> Option<chrono::DateTime<chrono::Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.trunc() as i64;
    let nanos = (secs.fract().abs() * 1_000_000_000.0) as u32;
    DateTime::from_timestamp(whole, nanos)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_BARS: &str = concat!(
        r#"{"m":"timescale_update","p":["cs_x",{"s1":{"node":"n1","s":["#,
        r#"{"i":0,"v":[1700000000,10.0,12.0,9.5,11.0,1000.0]},"#,
        r#"{"i":1,"v":[1700000300,11.0,11.5,10.5,11.2]}"#,
        r#"],"ns":{"d":"","indexes":[]}}}]}"#,
    );

    #[test]
    fn decodes_bars_in_order_with_volume_tolerance() {
        let series = decode(TWO_BARS, "NSE:NIFTY").unwrap();

        assert_eq!(series.instrument, "NSE:NIFTY");
        assert_eq!(series.len(), 2);
        assert!(series.volume_incomplete);

        let first = &series.bars[0];
        assert_eq!(first.timestamp.timestamp(), 1_700_000_000);
        assert_eq!(first.open, 10.0);
        assert_eq!(first.high, 12.0);
        assert_eq!(first.low, 9.5);
        assert_eq!(first.close, 11.0);
        assert_eq!(first.volume, 1000.0);

        let second = &series.bars[1];
        assert_eq!(second.timestamp.timestamp(), 1_700_000_300);
        assert_eq!(second.close, 11.2);
        assert_eq!(second.volume, 0.0);

        assert!(first.timestamp < second.timestamp);
    }

    #[test]
    fn full_volume_leaves_flag_clear() {
        let raw = r#""s":[{"i":0,"v":[1700000000,10.0,12.0,9.5,11.0,1000.0]}]"#;
        let series = decode(raw, "NSE:NIFTY").unwrap();
        assert_eq!(series.len(), 1);
        assert!(!series.volume_incomplete);
        assert_eq!(series.bars[0].volume, 1000.0);
    }

    #[test]
    fn missing_marker_is_no_data() {
        let raw = r#"{"m":"symbol_error","p":["cs_x","symbol_1"]}"#;
        let err = decode(raw, "NSE:BOGUS").unwrap_err();
        assert!(matches!(err, DecodeError::NoDataFound { instrument } if instrument == "NSE:BOGUS"));
    }

    #[test]
    fn empty_payload_is_empty_series() {
        let raw = r#"{"s1":{"node":"n1","s":[],"ns":{}}}"#;
        let series = decode(raw, "NSE:NIFTY").unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn unparsable_close_aborts_decode() {
        let raw = concat!(
            r#""s":[{"i":0,"v":[1700000000,10.0,12.0,9.5,11.0,1000.0]},"#,
            r#"{"i":1,"v":[1700000300,11.0,11.5,10.5,null,90.0]}]"#,
        );
        let err = decode(raw, "NSE:NIFTY").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedBar { field: 8, .. }));
    }

    #[test]
    fn fractional_timestamp_accepted() {
        let raw = r#""s":[{"i":0,"v":[1700000000.5,10.0,12.0,9.5,11.0,1.0]}]"#;
        let series = decode(raw, "NSE:NIFTY").unwrap();
        assert_eq!(series.bars[0].timestamp.timestamp(), 1_700_000_000);
        assert_eq!(
            series.bars[0].timestamp.timestamp_subsec_millis(),
            500
        );
    }

    #[test]
    fn record_missing_timestamp_aborts() {
        let raw = r#""s":[{"i":0}]"#;
        let err = decode(raw, "NSE:NIFTY").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedBar { field: 4, .. }));
    }
}
