//! Symbol Search Collaborator
//!
//! Thin HTTP wrapper around the symbol-search endpoint. The endpoint
//! highlights the matched part of each symbol with `<em>` markup inside
//! the JSON body, so the raw text is stripped of those tags before
//! parsing. Any failure yields an empty result list rather than an
//! error; search is a best-effort convenience, not part of the protocol
//! engine.

use serde::Deserialize;

/// One symbol-search match.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolMatch {
    /// Symbol name without the exchange qualifier.
    pub symbol: String,

    /// Human-readable instrument description.
    #[serde(default)]
    pub description: String,

    /// Exchange the symbol trades on.
    #[serde(default)]
    pub exchange: String,

    /// Instrument type reported by the service (stock, futures, index).
    #[serde(rename = "type", default)]
    pub instrument_type: String,
}

/// HTTP client for the symbol-search endpoint.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: reqwest::Client,
    search_url: String,
}

impl SearchClient {
    /// Create a search client.
    #[must_use]
    pub const fn new(client: reqwest::Client, search_url: String) -> Self {
        Self { client, search_url }
    }

    /// Search symbols by free text, optionally restricted to an exchange.
    ///
    /// Returns an empty list on any failure; the failure is logged.
    pub async fn search(&self, text: &str, exchange: Option<&str>) -> Vec<SymbolMatch> {
        match self.request(text, exchange.unwrap_or("")).await {
            Ok(matches) => matches,
            Err(e) => {
                tracing::error!(
                    text,
                    exchange = exchange.unwrap_or(""),
                    error = %e,
                    "Symbol search failed"
                );
                Vec::new()
            }
        }
    }

    async fn request(&self, text: &str, exchange: &str) -> Result<Vec<SymbolMatch>, reqwest::Error> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[
                ("text", text),
                ("hl", "1"),
                ("exchange", exchange),
                ("lang", "en"),
                ("type", ""),
                ("domain", "production"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        Ok(parse_matches(&body))
    }
}

/// Strip highlight markup and parse the match list.
///
/// A body that fails to parse yields an empty list; the endpoint
/// occasionally returns HTML error pages under load.
fn parse_matches(body: &str) -> Vec<SymbolMatch> {
    let cleaned = body.replace("<em>", "").replace("</em>", "");
    serde_json::from_str(&cleaned).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Unparsable symbol search response");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_highlight_markup() {
        let body = r#"[{"symbol":"<em>AAPL</em>","description":"Apple Inc","exchange":"NASDAQ","type":"stock"}]"#;
        let matches = parse_matches(body);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].symbol, "AAPL");
        assert_eq!(matches[0].exchange, "NASDAQ");
        assert_eq!(matches[0].instrument_type, "stock");
    }

    #[test]
    fn unparsable_body_yields_empty() {
        assert!(parse_matches("<html>502 Bad Gateway</html>").is_empty());
        assert!(parse_matches("").is_empty());
    }

    #[test]
    fn missing_optional_fields_default() {
        let body = r#"[{"symbol":"NIFTY"}]"#;
        let matches = parse_matches(body);
        assert_eq!(matches[0].symbol, "NIFTY");
        assert!(matches[0].description.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_yields_empty() {
        let client = SearchClient::new(
            reqwest::Client::new(),
            "http://127.0.0.1:1/symbol_search/".to_string(),
        );
        let matches = client.search("AAPL", Some("NASDAQ")).await;
        assert!(matches.is_empty());
    }
}
