// =============================================================================
// Signal Generator — rule-based buy/sell event derivation
// =============================================================================
//
// A pure reduction over one bar series using the indicator outputs.  For each
// bar at or above the warmup floor:
//
//   BUY  when trend EMA fast > slow, the MACD line crossed up, and RSI is
//        defined and above the buy floor.  Price = low * 0.997.
//   SELL when trend EMA fast < slow, the MACD line crossed down, and RSI is
//        defined and below the sell ceiling.  Price = high * 1.003.
//
// The two rules are mutually exclusive for a given bar (opposite trend and
// crossing conditions).  Events accumulate in bar-index order; consecutive
// bars may each emit if they independently satisfy a rule.

use tracing::debug;

use crate::indicators::MacdResult;
use crate::market_data::Bar;
use crate::runtime_config::IndicatorParams;
use crate::types::{SignalEvent, SignalKind};

/// Conservative undershoot of the bar's low for a buy entry.
const BUY_PRICE_DISCOUNT: f64 = 0.997;
/// Conservative overshoot of the bar's high for a sell entry.
const SELL_PRICE_PREMIUM: f64 = 1.003;

/// Derive the signal list from a bar series and its indicator outputs.
///
/// All series must be aligned to `bars` (same length); undefined elements
/// simply fail the rule for that bar.  Returns an empty list for an empty or
/// all-warmup series.
pub fn generate_signals(
    bars: &[Bar],
    trend_fast_ema: &[Option<f64>],
    trend_slow_ema: &[Option<f64>],
    macd: &MacdResult,
    rsi: &[Option<f64>],
    params: &IndicatorParams,
) -> Vec<SignalEvent> {
    let mut signals = Vec::new();

    for (i, bar) in bars.iter().enumerate() {
        if i < params.warmup_floor {
            continue;
        }

        let (trend_long, trend_short) = match (trend_fast_ema[i], trend_slow_ema[i]) {
            (Some(fast), Some(slow)) => (fast > slow, fast < slow),
            _ => (false, false),
        };

        match rsi[i] {
            Some(rsi_val) if trend_long && macd.cross_up[i] && rsi_val > params.rsi_buy_floor => {
                signals.push(SignalEvent {
                    time: bar.time,
                    kind: SignalKind::Buy,
                    price: bar.low * BUY_PRICE_DISCOUNT,
                    rationale: format!(
                        "EMA{}>EMA{}; MACD up; RSI={:.1}",
                        params.trend_fast, params.trend_slow, rsi_val
                    ),
                });
            }
            Some(rsi_val)
                if trend_short && macd.cross_down[i] && rsi_val < params.rsi_sell_ceiling =>
            {
                signals.push(SignalEvent {
                    time: bar.time,
                    kind: SignalKind::Sell,
                    price: bar.high * SELL_PRICE_PREMIUM,
                    rationale: format!(
                        "EMA{}<EMA{}; MACD down; RSI={:.1}",
                        params.trend_fast, params.trend_slow, rsi_val
                    ),
                });
            }
            _ => {}
        }
    }

    debug!(count = signals.len(), "signal generation complete");
    signals
}
