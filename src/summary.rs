// =============================================================================
// Summary Projector — display-ready digest of the latest analysis
// =============================================================================
//
// Reduces the latest values of every derived series plus the signal list
// into a compact digest for the rendering surface: latest close, trend
// classification, latest defined MACD histogram / RSI / ATR, total signal
// count, and the most recent five signals with human-readable timestamps.

use chrono::{TimeZone, Utc};
use serde::Serialize;

use crate::analysis::AnalysisReport;
use crate::market_data::Bar;
use crate::series::last_defined;
use crate::types::{SignalEvent, Trend};

/// How many trailing signals the digest lists.
const RECENT_SIGNALS: usize = 5;

/// Display-ready reduction of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSummary {
    pub last_close: f64,
    pub trend: Trend,
    /// Latest defined MACD histogram value, if any.
    pub macd_histogram: Option<f64>,
    /// Latest defined RSI value, if any.
    pub rsi: Option<f64>,
    /// Latest defined ATR value, if any.
    pub atr: Option<f64>,
    pub signal_count: usize,
    /// The most recent signals, oldest first.
    pub recent_signals: Vec<SignalEvent>,
    /// Periods used, for labelling.
    rsi_period: usize,
    atr_period: usize,
    trend_fast: usize,
    trend_slow: usize,
}

impl MarketSummary {
    /// Project a report into a summary.  Returns `None` for an empty bar
    /// series — there is no "latest close" to report.
    pub fn project(bars: &[Bar], report: &AnalysisReport) -> Option<Self> {
        let last = bars.last()?;

        let trend = match (
            last_defined(&report.trend_fast_ema),
            last_defined(&report.trend_slow_ema),
        ) {
            (Some(fast), Some(slow)) if fast > slow => Trend::Bullish,
            (Some(fast), Some(slow)) if fast < slow => Trend::Bearish,
            _ => Trend::Neutral,
        };

        let recent_start = report.signals.len().saturating_sub(RECENT_SIGNALS);

        Some(Self {
            last_close: last.close,
            trend,
            macd_histogram: last_defined(&report.macd.histogram),
            rsi: last_defined(&report.rsi),
            atr: last_defined(&report.atr),
            signal_count: report.signals.len(),
            recent_signals: report.signals[recent_start..].to_vec(),
            rsi_period: report.params.rsi_period,
            atr_period: report.params.atr_period,
            trend_fast: report.params.trend_fast,
            trend_slow: report.params.trend_slow,
        })
    }
}

impl std::fmt::Display for MarketSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Last price: {}", self.last_close)?;

        match self.trend {
            Trend::Bullish => writeln!(
                f,
                "Trend: Bullish (EMA{} > EMA{})",
                self.trend_fast, self.trend_slow
            )?,
            Trend::Bearish => writeln!(
                f,
                "Trend: Bearish (EMA{} < EMA{})",
                self.trend_fast, self.trend_slow
            )?,
            Trend::Neutral => writeln!(f, "Trend: Neutral")?,
        }

        match self.macd_histogram {
            Some(v) => writeln!(f, "MACD histogram (latest): {v:.6}")?,
            None => writeln!(f, "MACD histogram (latest): n/a")?,
        }
        match self.rsi {
            Some(v) => writeln!(f, "RSI({}): {v:.2}", self.rsi_period)?,
            None => writeln!(f, "RSI({}): n/a", self.rsi_period)?,
        }
        match self.atr {
            Some(v) => writeln!(f, "ATR({}): {v:.6}", self.atr_period)?,
            None => writeln!(f, "ATR({}): n/a", self.atr_period)?,
        }

        writeln!(f, "Signals found: {}", self.signal_count)?;
        writeln!(f, "Last {} signals:", RECENT_SIGNALS)?;
        for s in &self.recent_signals {
            writeln!(f, "{} {} {}", format_time(s.time), s.kind, s.rationale)?;
        }
        Ok(())
    }
}

/// Render an epoch-second timestamp as a human-readable UTC string.
fn format_time(epoch_secs: i64) -> String {
    match Utc.timestamp_opt(epoch_secs, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("t={epoch_secs}"),
    }
}
