//! Instrument Identifier Formatting
//!
//! Normalizes a (symbol, exchange, optional futures contract) triple into
//! the canonical exchange-qualified identifier the chart protocol expects:
//! `EXCHANGE:SYMBOL`, or `EXCHANGE:SYMBOL<N>!` for the N-th futures
//! contract. A symbol that already contains a colon is taken verbatim.
//!
//! Pure formatting, no I/O. Validation failures here must surface before
//! any network resource is acquired.

use thiserror::Error;

/// Instrument formatting errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    /// Futures contract offset must be a non-negative integer.
    #[error("invalid futures contract {0}: must be a non-negative contract offset")]
    InvalidContract(i64),
}

/// Format an instrument identifier.
///
/// - A `symbol` containing `:` is already canonical and is returned
///   unchanged; `exchange` and `contract` are ignored.
/// - Without a contract the result is `exchange:symbol`.
/// - With a contract offset `n >= 0` the result is `exchange:symbol{n}!`.
///
/// # Errors
///
/// Returns [`SymbolError::InvalidContract`] for a negative contract offset.
pub fn format_symbol(
    symbol: &str,
    exchange: &str,
    contract: Option<i64>,
) -> Result<String, SymbolError> {
    if symbol.contains(':') {
        return Ok(symbol.to_string());
    }

    match contract {
        None => Ok(format!("{exchange}:{symbol}")),
        Some(n) if n >= 0 => Ok(format!("{exchange}:{symbol}{n}!")),
        Some(n) => Err(SymbolError::InvalidContract(n)),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_case::test_case;

    use super::*;

    #[test_case("NIFTY", "NSE", None => "NSE:NIFTY"; "plain symbol")]
    #[test_case("AAPL", "NASDAQ", None => "NASDAQ:AAPL"; "us equity")]
    #[test_case("CRUDEOIL", "MCX", Some(1) => "MCX:CRUDEOIL1!"; "front month future")]
    #[test_case("CRUDEOIL", "MCX", Some(0) => "MCX:CRUDEOIL0!"; "zero contract offset")]
    #[test_case("NSE:RELIANCE", "IGNORED", None => "NSE:RELIANCE"; "colon short circuits")]
    #[test_case("NSE:RELIANCE", "IGNORED", Some(2) => "NSE:RELIANCE"; "colon ignores contract")]
    fn formats(symbol: &str, exchange: &str, contract: Option<i64>) -> String {
        format_symbol(symbol, exchange, contract).unwrap()
    }

    #[test]
    fn negative_contract_rejected() {
        let err = format_symbol("X", "Y", Some(-1)).unwrap_err();
        assert_eq!(err, SymbolError::InvalidContract(-1));
    }

    proptest! {
        #[test]
        fn plain_symbols_concatenate(
            symbol in "[A-Z0-9]{1,12}",
            exchange in "[A-Z]{1,8}",
        ) {
            let formatted = format_symbol(&symbol, &exchange, None).unwrap();
            prop_assert_eq!(formatted, format!("{exchange}:{symbol}"));
        }

        #[test]
        fn futures_symbols_append_contract(
            symbol in "[A-Z0-9]{1,12}",
            exchange in "[A-Z]{1,8}",
            contract in 0i64..1000,
        ) {
            let formatted = format_symbol(&symbol, &exchange, Some(contract)).unwrap();
            prop_assert_eq!(formatted, format!("{exchange}:{symbol}{contract}!"));
        }

        #[test]
        fn negative_contracts_always_fail(
            symbol in "[A-Z0-9]{1,12}",
            exchange in "[A-Z]{1,8}",
            contract in i64::MIN..0,
        ) {
            let err = format_symbol(&symbol, &exchange, Some(contract)).unwrap_err();
            prop_assert_eq!(err, SymbolError::InvalidContract(contract));
        }
    }
}
