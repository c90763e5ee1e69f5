//! Frame Codec
//!
//! Encoding and decoding for the chart protocol's length-prefixed text
//! framing. Every message on the wire is one or more frames of the form
//!
//! ```text
//! ~m~<decimal byte length>~m~<payload>
//! ```
//!
//! where the payload of an outbound control call is compact JSON
//! `{"m":<method>,"p":<params>}` with `m` serialized before `p`.
//!
//! Inbound decoding is split into two independent stages:
//!
//! - [`split_frames`]: a tolerant splitter that walks the framing headers
//!   and recovers from malformed ones, so one bad frame never poisons the
//!   rest of a message;
//! - [`extract_control`]: a strict, best-effort textual extraction of the
//!   method name and parameter fragment from a single payload. The
//!   service does not guarantee strictly valid nested structure on all
//!   message types, so this is deliberately not a general JSON parser.
//!   Heartbeats and session acks fail extraction by design and are
//!   skipped by callers, never treated as fatal.

use thiserror::Error;

use super::messages::ControlCall;

/// Delimiter marking both sides of the decimal length prefix.
pub const FRAME_MARKER: &str = "~m~";

/// Codec errors.
#[derive(Debug, Error)]
pub enum CodecError {
    /// JSON encoding of an outbound control call failed.
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// A single inbound frame did not carry an extractable control call.
    /// Skippable by callers: not all inbound frames carry data of interest.
    #[error("malformed control frame: {0}")]
    MalformedFrame(String),
}

/// Encode one control call into a framed wire message.
///
/// The length prefix counts the bytes of the serialized payload, not its
/// characters.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if payload serialization fails.
pub fn encode_control(call: &ControlCall) -> Result<String, CodecError> {
    let payload = serde_json::to_string(call)?;
    Ok(format!(
        "{FRAME_MARKER}{}{FRAME_MARKER}{payload}",
        payload.len()
    ))
}

/// Split raw inbound text into frame payloads.
///
/// Tolerant by contract: a header that does not parse is skipped and
/// scanning resumes at the next marker, and a truncated trailing frame
/// yields whatever bytes are present. Returns payloads in wire order.
#[must_use]
pub fn split_frames(raw: &str) -> Vec<&str> {
    let mut frames = Vec::new();
    let mut rest = raw;

    while let Some(start) = rest.find(FRAME_MARKER) {
        rest = &rest[start + FRAME_MARKER.len()..];

        let Some(len_end) = rest.find(FRAME_MARKER) else {
            break;
        };
        let Ok(len) = rest[..len_end].parse::<usize>() else {
            // Not a length header; resume scanning at the marker we found.
            rest = &rest[len_end..];
            continue;
        };

        let body_start = len_end + FRAME_MARKER.len();
        // The length comes from untrusted header text; an overflowing end
        // offset is handled like a truncated frame.
        let body_end = body_start.checked_add(len);
        match body_end.and_then(|end| rest.get(body_start..end)) {
            Some(payload) => {
                frames.push(payload);
                rest = &rest[body_start + len..];
            }
            None => {
                // Truncated trailing frame: keep the partial payload.
                if let Some(partial) = rest.get(body_start..) {
                    if !partial.is_empty() {
                        frames.push(partial);
                    }
                }
                break;
            }
        }
    }

    frames
}

/// Extract the method name and parameter fragment from one frame payload.
///
/// The method is the text between `"m":"` and the next `",`. The
/// parameter fragment is everything after `"p":` up to the literal
/// terminator `"}"]}` (inclusive of `"}"]`), or up to the closing brace
/// of the payload when the terminator is absent.
///
/// # Errors
///
/// Returns [`CodecError::MalformedFrame`] when either pattern fails to
/// match. The caller decides whether the frame was expected to carry a
/// control call.
pub fn extract_control(payload: &str) -> Result<(&str, &str), CodecError> {
    const METHOD_KEY: &str = "\"m\":\"";
    const PARAMS_KEY: &str = "\"p\":";
    const PARAMS_TERMINATOR: &str = "\"}\"]}";

    let m_start = payload
        .find(METHOD_KEY)
        .ok_or_else(|| CodecError::MalformedFrame("missing method field".to_string()))?
        + METHOD_KEY.len();
    let m_len = payload[m_start..]
        .find("\",")
        .ok_or_else(|| CodecError::MalformedFrame("unterminated method field".to_string()))?;
    let method = &payload[m_start..m_start + m_len];

    let p_start = payload
        .find(PARAMS_KEY)
        .ok_or_else(|| CodecError::MalformedFrame("missing params field".to_string()))?
        + PARAMS_KEY.len();
    let rest = &payload[p_start..];

    let params = if let Some(end) = rest.find(PARAMS_TERMINATOR) {
        &rest[..end + PARAMS_TERMINATOR.len() - 1]
    } else if let Some(stripped) = rest.strip_suffix('}') {
        stripped
    } else {
        return Err(CodecError::MalformedFrame(
            "unterminated params field".to_string(),
        ));
    };

    Ok((method, params))
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    #[test]
    fn encode_prepends_byte_length() {
        let call = ControlCall::new("quote_create_session", vec![Value::from("qs_abcdefghijkl")]);
        let framed = encode_control(&call).unwrap();

        let payload = r#"{"m":"quote_create_session","p":["qs_abcdefghijkl"]}"#;
        assert_eq!(framed, format!("~m~{}~m~{payload}", payload.len()));
    }

    #[test]
    fn encode_extract_round_trip() {
        let call = ControlCall::new(
            "chart_create_session",
            vec![Value::from("cs_abcdefghijkl"), Value::from("")],
        );
        let framed = encode_control(&call).unwrap();

        let frames = split_frames(&framed);
        assert_eq!(frames.len(), 1);

        let (method, params) = extract_control(frames[0]).unwrap();
        assert_eq!(method, "chart_create_session");

        let recovered: Vec<Value> = serde_json::from_str(params).unwrap();
        assert_eq!(recovered, call.params);
    }

    #[test]
    fn length_header_counts_payload_bytes() {
        let call = ControlCall::new("set_auth_token", vec![Value::from("tok")]);
        let framed = encode_control(&call).unwrap();

        let without_prefix = framed.strip_prefix("~m~").unwrap();
        let (len, payload) = without_prefix.split_once("~m~").unwrap();
        assert_eq!(len.parse::<usize>().unwrap(), payload.len());
    }

    #[test]
    fn split_multiple_frames() {
        let raw = "~m~4~m~~h~1~m~11~m~{\"m\":\"qsd\"}";
        let frames = split_frames(raw);
        assert_eq!(frames, vec!["~h~1", "{\"m\":\"qsd\"}"]);
    }

    #[test]
    fn split_skips_malformed_header() {
        let raw = "garbage~m~notanumber~m~4~m~~h~1";
        let frames = split_frames(raw);
        assert_eq!(frames, vec!["~h~1"]);
    }

    #[test]
    fn split_keeps_truncated_tail() {
        let raw = "~m~100~m~{\"m\":\"partial";
        let frames = split_frames(raw);
        assert_eq!(frames, vec!["{\"m\":\"partial"]);
    }

    #[test]
    fn split_survives_absurd_length_header() {
        let raw = "~m~18446744073709551615~m~{\"m\":\"tail";
        let frames = split_frames(raw);
        assert_eq!(frames, vec!["{\"m\":\"tail"]);
    }

    #[test]
    fn split_empty_input() {
        assert!(split_frames("").is_empty());
        assert!(split_frames("no markers here").is_empty());
    }

    #[test]
    fn extract_with_nested_terminator() {
        let payload = r#"{"m":"resolve_symbol","p":["cs_x","symbol_1","{\"symbol\":\"NSE:NIFTY\"}"]}"#;
        let (method, params) = extract_control(payload).unwrap();
        assert_eq!(method, "resolve_symbol");
        assert!(params.starts_with("[\"cs_x\""));
        assert!(params.ends_with("\"}\"]"));
    }

    #[test]
    fn heartbeat_fails_extraction() {
        let err = extract_control("~h~17").unwrap_err();
        assert!(matches!(err, CodecError::MalformedFrame(_)));
    }

    #[test]
    fn missing_params_fails_extraction() {
        let err = extract_control(r#"{"m":"session_ack","x":1}"#).unwrap_err();
        assert!(matches!(err, CodecError::MalformedFrame(_)));
    }
}
