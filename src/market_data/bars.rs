// =============================================================================
// OHLC bars — the ordered input of the analysis engine
// =============================================================================

use serde::{Deserialize, Serialize};

/// A single OHLC price observation for a fixed time interval.
///
/// `time` is seconds since the UNIX epoch and is strictly increasing across a
/// series.  The engine assumes `low <= open,close <= high` but does not
/// enforce it; malformed bars propagate arithmetically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Trim a bar series to its most recent `limit` bars.
///
/// The provider may return more history than the caller asked to analyze;
/// only the tail is retained.  A `limit` of zero keeps nothing.
pub fn retain_last(mut bars: Vec<Bar>, limit: usize) -> Vec<Bar> {
    if bars.len() > limit {
        bars.drain(..bars.len() - limit);
    }
    bars
}
