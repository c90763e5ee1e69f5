//! Chart Protocol Control Calls
//!
//! Wire types for the outbound control calls of the chart protocol.
//! A control call is a named remote procedure invocation serialized as
//! `{"m":<method>,"p":<params>}` with key order significant (`m` before
//! `p`), then wrapped into the length-prefixed frame by the codec.
//!
//! Also defines the fixed bootstrap sequence a history fetch performs.
//! The order is significant and must not change: later calls reference
//! the session and resolution identifiers established by earlier ones.

use serde::Serialize;
use serde_json::Value;

use crate::domain::Interval;

/// Quote fields declared via `quote_set_fields` after the quote session
/// is created. Fixed list, taken as-is from the chart protocol.
pub const QUOTE_FIELDS: [&str; 23] = [
    "ch",
    "chp",
    "current_session",
    "description",
    "local_description",
    "language",
    "exchange",
    "fractional",
    "is_tradable",
    "lp",
    "lp_time",
    "minmov",
    "minmove2",
    "original_name",
    "pricescale",
    "pro_name",
    "short_name",
    "type",
    "update_mode",
    "volume",
    "currency_code",
    "rchp",
    "rtc",
];

/// Identifier the chart session assigns to the resolved symbol. Referenced
/// by `create_series` after `resolve_symbol`.
pub const SYMBOL_SLOT: &str = "symbol_1";

/// Identifier for the single bar series created per fetch.
pub const SERIES_SLOT: &str = "s1";

/// One outbound control call: method name plus ordered parameter list.
///
/// Field order matters: the wire payload must serialize `m` before `p`.
#[derive(Debug, Clone, Serialize)]
pub struct ControlCall {
    /// Remote method name.
    #[serde(rename = "m")]
    pub method: &'static str,

    /// Ordered parameter list.
    #[serde(rename = "p")]
    pub params: Vec<Value>,
}

impl ControlCall {
    /// Create a control call.
    #[must_use]
    pub const fn new(method: &'static str, params: Vec<Value>) -> Self {
        Self { method, params }
    }
}

/// Resolution descriptor passed (JSON-encoded) to `resolve_symbol`.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolResolution<'a> {
    /// Canonical instrument identifier.
    pub symbol: &'a str,
    /// Price adjustment mode; always split-adjusted.
    pub adjustment: &'a str,
    /// `"extended"` or `"regular"` trading session.
    pub session: &'a str,
}

impl<'a> SymbolResolution<'a> {
    /// Build the descriptor for an instrument.
    #[must_use]
    pub const fn new(symbol: &'a str, extended_session: bool) -> Self {
        Self {
            symbol,
            adjustment: "splits",
            session: if extended_session {
                "extended"
            } else {
                "regular"
            },
        }
    }
}

/// Parameters of one history fetch, expressed at the protocol boundary.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Canonical instrument identifier (already formatted).
    pub instrument: String,
    /// Bar granularity.
    pub interval: Interval,
    /// Number of bars requested.
    pub bar_count: u32,
    /// Request extended-session data instead of regular-session only.
    pub extended_session: bool,
}

/// Build the fixed 9-call bootstrap sequence for one history fetch.
///
/// # Errors
///
/// Returns a serialization error if the resolution descriptor cannot be
/// encoded, which would indicate a programming error in the descriptor
/// type rather than bad input.
pub fn bootstrap_sequence(
    auth_token: &str,
    quote_session: &str,
    chart_session: &str,
    request: &FetchRequest,
) -> Result<Vec<ControlCall>, serde_json::Error> {
    let resolution = SymbolResolution::new(&request.instrument, request.extended_session);
    let resolution_json = serde_json::to_string(&resolution)?;

    let mut quote_fields: Vec<Value> = Vec::with_capacity(1 + QUOTE_FIELDS.len());
    quote_fields.push(Value::from(quote_session));
    quote_fields.extend(QUOTE_FIELDS.iter().map(|field| Value::from(*field)));

    Ok(vec![
        ControlCall::new("set_auth_token", vec![Value::from(auth_token)]),
        ControlCall::new(
            "chart_create_session",
            vec![Value::from(chart_session), Value::from("")],
        ),
        ControlCall::new("quote_create_session", vec![Value::from(quote_session)]),
        ControlCall::new("quote_set_fields", quote_fields),
        ControlCall::new(
            "quote_add_symbols",
            vec![
                Value::from(quote_session),
                Value::from(request.instrument.as_str()),
                serde_json::json!({ "flags": ["force_permission"] }),
            ],
        ),
        ControlCall::new(
            "quote_fast_symbols",
            vec![
                Value::from(quote_session),
                Value::from(request.instrument.as_str()),
            ],
        ),
        ControlCall::new(
            "resolve_symbol",
            vec![
                Value::from(chart_session),
                Value::from(SYMBOL_SLOT),
                Value::from(resolution_json),
            ],
        ),
        ControlCall::new(
            "create_series",
            vec![
                Value::from(chart_session),
                Value::from(SERIES_SLOT),
                Value::from(SERIES_SLOT),
                Value::from(SYMBOL_SLOT),
                Value::from(request.interval.as_token()),
                Value::from(request.bar_count),
            ],
        ),
        ControlCall::new(
            "switch_timezone",
            vec![Value::from(chart_session), Value::from("exchange")],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> FetchRequest {
        FetchRequest {
            instrument: "NSE:NIFTY".to_string(),
            interval: Interval::OneHour,
            bar_count: 5,
            extended_session: false,
        }
    }

    #[test]
    fn bootstrap_order_is_fixed() {
        let calls = bootstrap_sequence("token", "qs_aaaaaaaaaaaa", "cs_bbbbbbbbbbbb", &request())
            .unwrap();
        let methods: Vec<&str> = calls.iter().map(|c| c.method).collect();
        assert_eq!(
            methods,
            [
                "set_auth_token",
                "chart_create_session",
                "quote_create_session",
                "quote_set_fields",
                "quote_add_symbols",
                "quote_fast_symbols",
                "resolve_symbol",
                "create_series",
                "switch_timezone",
            ]
        );
    }

    #[test]
    fn quote_fields_follow_session_id() {
        let calls = bootstrap_sequence("token", "qs_aaaaaaaaaaaa", "cs_bbbbbbbbbbbb", &request())
            .unwrap();
        let fields = &calls[3].params;
        assert_eq!(fields[0], "qs_aaaaaaaaaaaa");
        assert_eq!(fields.len(), 1 + QUOTE_FIELDS.len());
        assert_eq!(fields[1], "ch");
        assert_eq!(fields[fields.len() - 1], "rtc");
    }

    #[test]
    fn resolve_symbol_embeds_json_descriptor() {
        let calls = bootstrap_sequence("token", "qs_aaaaaaaaaaaa", "cs_bbbbbbbbbbbb", &request())
            .unwrap();
        let descriptor = calls[6].params[2].as_str().unwrap();
        assert_eq!(
            descriptor,
            r#"{"symbol":"NSE:NIFTY","adjustment":"splits","session":"regular"}"#
        );
    }

    #[test]
    fn extended_session_flag_switches_descriptor() {
        let mut req = request();
        req.extended_session = true;
        let calls =
            bootstrap_sequence("token", "qs_aaaaaaaaaaaa", "cs_bbbbbbbbbbbb", &req).unwrap();
        let descriptor = calls[6].params[2].as_str().unwrap();
        assert!(descriptor.contains(r#""session":"extended""#));
    }

    #[test]
    fn create_series_carries_interval_and_count() {
        let calls = bootstrap_sequence("token", "qs_aaaaaaaaaaaa", "cs_bbbbbbbbbbbb", &request())
            .unwrap();
        let params = &calls[7].params;
        assert_eq!(params[4], "1H");
        assert_eq!(params[5], 5);
    }

    #[test]
    fn control_call_serializes_method_before_params() {
        let call = ControlCall::new("quote_create_session", vec![Value::from("qs_x")]);
        let json = serde_json::to_string(&call).unwrap();
        assert_eq!(json, r#"{"m":"quote_create_session","p":["qs_x"]}"#);
    }
}
