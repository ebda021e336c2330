// =============================================================================
// Coin Registry — in-memory top-coins cache with autocomplete search
// =============================================================================
//
// Refreshed periodically by a background task in main.rs.  Search is a
// case-insensitive substring match over coin name and ticker, capped so the
// autocomplete dropdown stays short.

use parking_lot::RwLock;

use crate::market_data::CoinInfo;

/// Maximum number of matches returned by a search.
const MAX_MATCHES: usize = 12;

/// Thread-safe cache of the top coins by market cap.
pub struct CoinRegistry {
    coins: RwLock<Vec<CoinInfo>>,
}

impl CoinRegistry {
    pub fn new() -> Self {
        Self {
            coins: RwLock::new(Vec::new()),
        }
    }

    /// Replace the cached list wholesale (called after each refresh).
    pub fn replace(&self, coins: Vec<CoinInfo>) {
        *self.coins.write() = coins;
    }

    pub fn len(&self) -> usize {
        self.coins.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.read().is_empty()
    }

    /// Case-insensitive substring search over name and ticker symbol.
    ///
    /// An empty query matches nothing — the autocomplete field starts blank.
    pub fn search(&self, query: &str) -> Vec<CoinInfo> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }
        self.coins
            .read()
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&q) || c.symbol.to_lowercase().contains(&q))
            .take(MAX_MATCHES)
            .cloned()
            .collect()
    }

    /// Exact match on name or ticker (case-insensitive), used when a caller
    /// types a full coin name instead of picking a suggestion.
    pub fn find_exact(&self, query: &str) -> Option<CoinInfo> {
        let q = query.trim().to_lowercase();
        self.coins
            .read()
            .iter()
            .find(|c| c.name.to_lowercase() == q || c.symbol.to_lowercase() == q)
            .cloned()
    }
}

impl Default for CoinRegistry {
    fn default() -> Self {
        Self::new()
    }
}
