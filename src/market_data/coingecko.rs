// =============================================================================
// CoinGecko REST API Client
// =============================================================================
//
// Read-only public endpoints, no authentication.  Two calls are used:
//   GET /coins/markets        — top coins by market cap (registry refresh)
//   GET /coins/{id}/ohlc      — OHLC bars for one coin
//
// OHLC payloads arrive as `[[timestamp_ms, open, high, low, close], ...]`;
// timestamps are converted to whole seconds on ingest.
// =============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::market_data::Bar;

/// One entry of the coin registry, as returned by `/coins/markets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinInfo {
    pub id: String,
    pub name: String,
    pub symbol: String,
}

/// CoinGecko REST client.
#[derive(Clone)]
pub struct CoinGeckoClient {
    base_url: String,
    client: reqwest::Client,
}

impl CoinGeckoClient {
    /// Create a new client against the public CoinGecko API.
    pub fn new() -> Self {
        Self::with_base_url("https://api.coingecko.com/api/v3")
    }

    /// Create a client against an alternative base URL (used by tests and
    /// proxy deployments).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// Fetch the top `per_page` coins by market cap.
    #[instrument(skip(self), name = "coingecko::top_coins")]
    pub async fn top_coins(&self, vs_currency: &str, per_page: u32) -> Result<Vec<CoinInfo>> {
        let url = format!(
            "{}/coins/markets?vs_currency={}&order=market_cap_desc&per_page={}&page=1&sparkline=false",
            self.base_url, vs_currency, per_page
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("GET /coins/markets request failed")?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("GET /coins/markets returned {status}");
        }

        let coins: Vec<CoinInfo> = resp
            .json()
            .await
            .context("failed to parse /coins/markets payload")?;

        // Tickers come back lowercase; the registry displays them uppercase.
        let coins = coins
            .into_iter()
            .map(|c| CoinInfo {
                symbol: c.symbol.to_uppercase(),
                ..c
            })
            .collect::<Vec<_>>();

        debug!(count = coins.len(), "coin registry payload fetched");
        Ok(coins)
    }

    /// Fetch OHLC bars for `coin_id` over the trailing `days` window.
    ///
    /// `days` is passed through verbatim — CoinGecko accepts 1/7/14/30/90/
    /// 180/365/max and picks the bar interval itself.
    #[instrument(skip(self), name = "coingecko::fetch_ohlc")]
    pub async fn fetch_ohlc(&self, coin_id: &str, vs_currency: &str, days: &str) -> Result<Vec<Bar>> {
        let url = format!(
            "{}/coins/{}/ohlc?vs_currency={}&days={}",
            self.base_url, coin_id, vs_currency, days
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET /coins/{coin_id}/ohlc request failed"))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("GET /coins/{coin_id}/ohlc returned {status}");
        }

        let rows: Vec<[f64; 5]> = resp
            .json()
            .await
            .with_context(|| format!("failed to parse OHLC payload for {coin_id}"))?;

        let bars = parse_ohlc_rows(&rows);
        debug!(coin_id, bars = bars.len(), "OHLC payload fetched");
        Ok(bars)
    }
}

impl Default for CoinGeckoClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert raw `[timestamp_ms, o, h, l, c]` rows into bars with epoch-second
/// timestamps.
fn parse_ohlc_rows(rows: &[[f64; 5]]) -> Vec<Bar> {
    rows.iter()
        .map(|row| Bar {
            time: (row[0] / 1000.0).floor() as i64,
            open: row[1],
            high: row[2],
            low: row[3],
            close: row[4],
        })
        .collect()
}
