// =============================================================================
// Central Application State — Borealis Market Analyzer
// =============================================================================
//
// The single source of truth for the service.  Handlers and background tasks
// hold an `Arc<AppState>`; all mutable pieces sit behind parking_lot locks,
// with an atomic counter for lock-free version tracking.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;

use crate::market_data::{CoinGeckoClient, CoinRegistry};
use crate::runtime_config::AnalyzerConfig;

/// Maximum number of recent errors to retain.
const MAX_RECENT_ERRORS: usize = 50;

/// A recorded error event for the dashboard error log.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    /// Human-readable error message.
    pub message: String,
    /// ISO 8601 timestamp.
    pub at: String,
}

/// Central application state shared across all async tasks via
/// `Arc<AppState>`.
pub struct AppState {
    /// Monotonically increasing version counter, incremented on every
    /// meaningful state mutation.
    pub state_version: AtomicU64,

    // ── Configuration ───────────────────────────────────────────────────
    pub config: Arc<RwLock<AnalyzerConfig>>,

    // ── Market Data ─────────────────────────────────────────────────────
    pub market_client: CoinGeckoClient,
    pub registry: Arc<CoinRegistry>,

    // ── Error Log ───────────────────────────────────────────────────────
    pub recent_errors: RwLock<Vec<ErrorRecord>>,

    // ── Timing ──────────────────────────────────────────────────────────
    /// Instant when the service was started.  Used for uptime calculations.
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Construct a new `AppState` from the given configuration.  The
    /// returned value is typically wrapped in `Arc` immediately.
    pub fn new(config: AnalyzerConfig, market_client: CoinGeckoClient) -> Self {
        Self {
            state_version: AtomicU64::new(0),
            config: Arc::new(RwLock::new(config)),
            market_client,
            registry: Arc::new(CoinRegistry::new()),
            recent_errors: RwLock::new(Vec::new()),
            start_time: std::time::Instant::now(),
        }
    }

    pub fn increment_version(&self) {
        self.state_version.fetch_add(1, Ordering::SeqCst);
    }

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::SeqCst)
    }

    /// Record an error for the dashboard log, trimming the oldest entries.
    pub fn push_error(&self, message: impl Into<String>) {
        let mut errors = self.recent_errors.write();
        errors.push(ErrorRecord {
            message: message.into(),
            at: Utc::now().to_rfc3339(),
        });
        let overflow = errors.len().saturating_sub(MAX_RECENT_ERRORS);
        if overflow > 0 {
            errors.drain(..overflow);
        }
        drop(errors);
        self.increment_version();
    }
}
