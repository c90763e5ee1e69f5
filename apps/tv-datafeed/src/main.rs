//! tv-datafeed Binary
//!
//! Fetches one historical bar series and prints it.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p tv-datafeed
//! ```
//!
//! # Environment Variables
//!
//! ## Authentication (all optional; without them the client runs in the
//! degraded unauthorized mode)
//! - `TV_AUTH_TOKEN`: explicit bearer token, wins over credentials
//! - `TV_USERNAME` / `TV_PASSWORD`: sign-in credentials
//!
//! ## Fetch parameters
//! - `TV_SYMBOL`: symbol to fetch (default: NIFTY)
//! - `TV_EXCHANGE`: exchange qualifier (default: NSE)
//! - `TV_INTERVAL`: interval token - "1", "5", "1H", "1D", ... (default: 1D)
//! - `TV_BARS`: number of bars (default: 10)
//! - `TV_FUT_CONTRACT`: futures contract offset (default: unset)
//! - `TV_EXTENDED_SESSION`: "1" to request extended-session data
//!
//! ## Endpoints and timeouts (production defaults)
//! - `TV_WS_URL`, `TV_WS_ORIGIN`, `TV_SIGN_IN_URL`, `TV_SEARCH_URL`
//! - `TV_CONNECT_TIMEOUT_SECS`, `TV_READ_TIMEOUT_SECS`, `TV_HTTP_TIMEOUT_SECS`
//! - `RUST_LOG`: log level (default: info)

use anyhow::{Context, bail};
use tv_datafeed::{BarSeries, Datafeed, DatafeedConfig, Interval};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls crypto provider"))?;

    load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = DatafeedConfig::from_env().context("loading configuration")?;
    tracing::debug!(?config, "Configuration loaded");

    let symbol = string_env("TV_SYMBOL", "NIFTY");
    let exchange = string_env("TV_EXCHANGE", "NSE");
    let interval = interval_env("TV_INTERVAL")?;
    let bar_count = parse_env("TV_BARS", 10u32);
    let futures_contract = std::env::var("TV_FUT_CONTRACT")
        .ok()
        .and_then(|v| v.parse::<i64>().ok());
    let extended_session = std::env::var("TV_EXTENDED_SESSION").is_ok_and(|v| v == "1");

    let datafeed = Datafeed::from_config(config).await?;

    let series = datafeed
        .fetch_history(
            &symbol,
            &exchange,
            interval,
            bar_count,
            futures_contract,
            extended_session,
        )
        .await
        .with_context(|| format!("fetching {exchange}:{symbol}"))?;

    print_series(&series);
    Ok(())
}

/// Print a decoded series as an aligned table.
fn print_series(series: &BarSeries) {
    println!(
        "{:<24} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "datetime", "open", "high", "low", "close", "volume"
    );
    for bar in &series.bars {
        println!(
            "{:<24} {:>12.4} {:>12.4} {:>12.4} {:>12.4} {:>14.2}",
            bar.timestamp.format("%Y-%m-%d %H:%M:%S"),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume,
        );
    }
    println!(
        "{} bars for {}{}",
        series.len(),
        series.instrument,
        if series.volume_incomplete {
            " (volume data incomplete)"
        } else {
            ""
        }
    );
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

fn string_env(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn interval_env(key: &str) -> anyhow::Result<Interval> {
    match std::env::var(key) {
        Ok(token) => match Interval::from_token(&token) {
            Some(interval) => Ok(interval),
            None => bail!("unknown interval token: {token}"),
        },
        Err(_) => Ok(Interval::default()),
    }
}

fn parse_env<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
