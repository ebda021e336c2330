// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicator families used by
// the analysis engine.  Every function returns a series aligned to its input
// where each element is `Some(value)` or `None` (warmup not complete), so
// callers never confuse "undefined" with zero.

pub mod atr;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use atr::calculate_atr;
pub use ema::calculate_ema;
pub use macd::{calculate_macd, MacdResult};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
