// =============================================================================
// Runtime Configuration — analyzer settings with atomic save
// =============================================================================
//
// Central configuration hub for the Borealis analyzer.  Every tunable
// parameter lives here so the service can be reconfigured through the API
// without a restart.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.  All fields carry serde defaults so that adding new fields never
// breaks loading an older config file.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_vs_currency() -> String {
    "usd".to_string()
}

fn default_days() -> String {
    "7".to_string()
}

fn default_limit() -> usize {
    500
}

fn default_registry_size() -> u32 {
    200
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_rsi_period() -> usize {
    14
}

fn default_atr_period() -> usize {
    14
}

fn default_sma_period() -> usize {
    20
}

fn default_trend_fast() -> usize {
    50
}

fn default_trend_slow() -> usize {
    200
}

fn default_warmup_floor() -> usize {
    200
}

fn default_rsi_buy_floor() -> f64 {
    40.0
}

fn default_rsi_sell_ceiling() -> f64 {
    60.0
}

// =============================================================================
// IndicatorParams
// =============================================================================

/// Tunable indicator periods and signal-rule thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    /// Fast EMA period of the MACD line.
    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    /// Slow EMA period of the MACD line.
    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    /// EMA period of the MACD signal line.
    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    /// RSI look-back period.
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// ATR look-back period.
    #[serde(default = "default_atr_period")]
    pub atr_period: usize,

    /// SMA overlay period.
    #[serde(default = "default_sma_period")]
    pub sma_period: usize,

    /// Fast trend EMA period (the "EMA50" of the trend filter).
    #[serde(default = "default_trend_fast")]
    pub trend_fast: usize,

    /// Slow trend EMA period (the "EMA200" of the trend filter).
    #[serde(default = "default_trend_slow")]
    pub trend_slow: usize,

    /// No signal is ever emitted below this bar index.  Tied to the slow
    /// trend EMA warmup.
    #[serde(default = "default_warmup_floor")]
    pub warmup_floor: usize,

    /// Minimum RSI for a buy signal.
    #[serde(default = "default_rsi_buy_floor")]
    pub rsi_buy_floor: f64,

    /// Maximum RSI for a sell signal.
    #[serde(default = "default_rsi_sell_ceiling")]
    pub rsi_sell_ceiling: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            rsi_period: default_rsi_period(),
            atr_period: default_atr_period(),
            sma_period: default_sma_period(),
            trend_fast: default_trend_fast(),
            trend_slow: default_trend_slow(),
            warmup_floor: default_warmup_floor(),
            rsi_buy_floor: default_rsi_buy_floor(),
            rsi_sell_ceiling: default_rsi_sell_ceiling(),
        }
    }
}

// =============================================================================
// AnalyzerConfig
// =============================================================================

/// Top-level runtime configuration for the Borealis analyzer.
///
/// Every field has a serde default so that older JSON files missing new
/// fields will still deserialise correctly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Quote currency for all market-data requests.
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,

    /// Default trailing window requested from the provider ("1", "7", "30",
    /// ..., "max" — passed through verbatim).
    #[serde(default = "default_days")]
    pub default_days: String,

    /// Default maximum number of bars retained for analysis.
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// How many coins the registry keeps (top N by market cap).
    #[serde(default = "default_registry_size")]
    pub registry_size: u32,

    /// Indicator periods and signal thresholds.
    #[serde(default)]
    pub indicator_params: IndicatorParams,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            vs_currency: default_vs_currency(),
            default_days: default_days(),
            default_limit: default_limit(),
            registry_size: default_registry_size(),
            indicator_params: IndicatorParams::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read analyzer config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse analyzer config from {}", path.display()))?;

        info!(
            path = %path.display(),
            vs_currency = %config.vs_currency,
            "analyzer config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    ///
    /// This prevents corruption if the process crashes mid-write.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise analyzer config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "analyzer config saved (atomic)");
        Ok(())
    }
}
