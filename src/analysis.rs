// =============================================================================
// Analysis Engine — full indicator/signal pipeline for one bar series
// =============================================================================
//
// Pipeline:
//   1. Split the bar series into close/high/low scalar series
//   2. Compute every indicator family (SMA overlay, trend EMAs, MACD bundle,
//      RSI, ATR) as aligned series
//   3. Run the signal generator over the composed outputs
//
// Every step is a pure function of the input bars; running the pipeline twice
// on the same series produces identical output.  There is no incremental
// mode — each invocation recomputes from scratch.

use serde::Serialize;

use crate::indicators::{
    calculate_atr, calculate_ema, calculate_macd, calculate_rsi, calculate_sma, MacdResult,
};
use crate::market_data::Bar;
use crate::runtime_config::IndicatorParams;
use crate::signals::generate_signals;
use crate::types::SignalEvent;

/// Every derived series plus the signal list, aligned by index to the input
/// bar series.  Undefined elements serialise as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Parameters the report was computed with.
    pub params: IndicatorParams,
    /// SMA overlay of the close series.
    pub sma: Vec<Option<f64>>,
    /// Fast trend EMA of the close series (EMA50 by default).
    pub trend_fast_ema: Vec<Option<f64>>,
    /// Slow trend EMA of the close series (EMA200 by default).
    pub trend_slow_ema: Vec<Option<f64>>,
    pub macd: MacdResult,
    pub rsi: Vec<Option<f64>>,
    pub atr: Vec<Option<f64>>,
    pub signals: Vec<SignalEvent>,
}

/// Run the full pipeline over `bars`.
///
/// Accepts any series length, including zero: with too few bars every series
/// element stays undefined and the signal list is empty — insufficient data
/// is defined behavior, not an error.
pub fn analyze(bars: &[Bar], params: &IndicatorParams) -> AnalysisReport {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let sma = calculate_sma(&closes, params.sma_period);
    let trend_fast_ema = calculate_ema(&closes, params.trend_fast);
    let trend_slow_ema = calculate_ema(&closes, params.trend_slow);
    let macd = calculate_macd(&closes, params.macd_fast, params.macd_slow, params.macd_signal);
    let rsi = calculate_rsi(&closes, params.rsi_period);
    let atr = calculate_atr(bars, params.atr_period);

    let signals = generate_signals(bars, &trend_fast_ema, &trend_slow_ema, &macd, &rsi, params);

    AnalysisReport {
        params: params.clone(),
        sma,
        trend_fast_ema,
        trend_slow_ema,
        macd,
        rsi,
        atr,
        signals,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn bar(time: i64, close: f64) -> Bar {
        Bar {
            time,
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
        }
    }

    fn uptrend(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| bar(i as i64 * 3600, 100.0 + i as f64 * 0.5))
            .collect()
    }

    #[test]
    fn analyze_zero_bars_does_not_crash() {
        let report = analyze(&[], &IndicatorParams::default());
        assert!(report.sma.is_empty());
        assert!(report.trend_fast_ema.is_empty());
        assert!(report.trend_slow_ema.is_empty());
        assert!(report.macd.line.is_empty());
        assert!(report.rsi.is_empty());
        assert!(report.atr.is_empty());
        assert!(report.signals.is_empty());
    }

    #[test]
    fn analyze_short_series_all_undefined() {
        let bars = uptrend(10);
        let report = analyze(&bars, &IndicatorParams::default());
        assert_eq!(report.trend_slow_ema.len(), 10);
        assert!(report.trend_slow_ema.iter().all(|v| v.is_none()));
        assert!(report.rsi.iter().all(|v| v.is_none()));
        assert!(report.signals.is_empty());
    }

    #[test]
    fn all_series_aligned_to_input_length() {
        let bars = uptrend(260);
        let report = analyze(&bars, &IndicatorParams::default());
        for len in [
            report.sma.len(),
            report.trend_fast_ema.len(),
            report.trend_slow_ema.len(),
            report.macd.line.len(),
            report.macd.signal.len(),
            report.macd.histogram.len(),
            report.macd.cross_up.len(),
            report.macd.cross_down.len(),
            report.rsi.len(),
            report.atr.len(),
        ] {
            assert_eq!(len, 260);
        }
    }

    #[test]
    fn analyze_is_deterministic() {
        let bars: Vec<Bar> = (0..300)
            .map(|i| {
                let c = 150.0 + (i as f64 * 0.19).sin() * 12.0 - i as f64 * 0.05;
                bar(i as i64 * 60, c)
            })
            .collect();
        let params = IndicatorParams::default();
        let first = analyze(&bars, &params);
        let second = analyze(&bars, &params);
        // Bit-identical output, signals included.
        assert_eq!(first, second);
    }

    #[test]
    fn uptrend_rsi_pinned_and_trend_bullish() {
        let bars = uptrend(260);
        let report = analyze(&bars, &IndicatorParams::default());
        for v in report.rsi[14..].iter() {
            assert!((v.unwrap() - 100.0).abs() < 1e-10);
        }
        for i in 200..260 {
            assert!(report.trend_fast_ema[i].unwrap() > report.trend_slow_ema[i].unwrap());
        }
    }

    #[test]
    fn report_serialises_undefined_as_null() {
        let bars = uptrend(30);
        let report = analyze(&bars, &IndicatorParams::default());
        let json = serde_json::to_value(&report).unwrap();
        let rsi = json["rsi"].as_array().unwrap();
        assert!(rsi[0].is_null());
        assert!(rsi[20].is_number());
    }
}
