//! Watchlist persistence capability.

use crate::error::ScannerError;
use std::collections::HashSet;

/// Set-of-symbols store persisted outside the page lifecycle.
///
/// The core never touches storage directly; callers inject an
/// implementation so the pipeline stays storage-agnostic and testable
/// with [`InMemoryWatchlist`].
pub trait WatchlistStore {
    /// Membership test.
    fn contains(&self, symbol: &str) -> bool;

    /// Flip membership; returns the new membership state.
    fn toggle(&mut self, symbol: &str) -> bool;

    /// Current members, unordered.
    fn symbols(&self) -> Vec<String>;

    /// Flush to backing storage.
    fn save(&mut self) -> Result<(), ScannerError>;
}

/// Volatile store used in tests and as the degraded fallback when
/// persistence is unavailable.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWatchlist {
    symbols: HashSet<String>,
}

impl InMemoryWatchlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbols(symbols: impl IntoIterator<Item = String>) -> Self {
        Self {
            symbols: symbols.into_iter().collect(),
        }
    }
}

impl WatchlistStore for InMemoryWatchlist {
    fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    fn toggle(&mut self, symbol: &str) -> bool {
        if self.symbols.remove(symbol) {
            false
        } else {
            self.symbols.insert(symbol.to_string());
            true
        }
    }

    fn symbols(&self) -> Vec<String> {
        self.symbols.iter().cloned().collect()
    }

    fn save(&mut self) -> Result<(), ScannerError> {
        Ok(())
    }
}
