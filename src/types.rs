// =============================================================================
// Shared types used across the Borealis analysis engine
// =============================================================================

use serde::{Deserialize, Serialize};

/// Direction of a generated trade signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalKind {
    Buy,
    Sell,
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// A discrete buy/sell event derived from the indicator pipeline.
///
/// Events are read-only once created and are produced in ascending bar-index
/// order. The whole list is rebuilt from scratch on every analysis run; no
/// signal state is carried across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    /// Bar time, seconds since the UNIX epoch.
    pub time: i64,
    pub kind: SignalKind,
    /// Suggested entry price (offset from the bar's low/high).
    pub price: f64,
    /// Human-readable justification for the event.
    pub rationale: String,
}

/// Trend classification from comparing the latest defined EMA50 and EMA200.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl Default for Trend {
    fn default() -> Self {
        Self::Neutral
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "Bullish"),
            Self::Bearish => write!(f, "Bearish"),
            Self::Neutral => write!(f, "Neutral"),
        }
    }
}
