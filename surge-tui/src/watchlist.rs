//! JSON-file-backed watchlist store.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::OnceLock;
use surge_core::{ScannerError, WatchlistStore};
use tracing::warn;

/// Watchlist file path from WATCHLIST_PATH (default: surge_watchlist.json)
pub fn watchlist_path() -> &'static str {
    static PATH: OnceLock<String> = OnceLock::new();
    PATH.get_or_init(|| {
        std::env::var("WATCHLIST_PATH").unwrap_or_else(|_| "surge_watchlist.json".to_string())
    })
}

/// Watchlist persisted as a JSON array of symbol strings.
///
/// A missing or unreadable file starts the session with an empty set;
/// every toggle is flushed immediately so a crash cannot lose more than
/// the in-flight change.
#[derive(Debug)]
pub struct FileWatchlist {
    path: PathBuf,
    symbols: HashSet<String>,
}

impl FileWatchlist {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let symbols = match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<Vec<String>>(&text) {
                Ok(list) => list.into_iter().collect(),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "watchlist file unreadable, starting empty");
                    HashSet::new()
                }
            },
            Err(_) => HashSet::new(),
        };
        Self { path, symbols }
    }
}

impl WatchlistStore for FileWatchlist {
    fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    fn toggle(&mut self, symbol: &str) -> bool {
        let added = if self.symbols.remove(symbol) {
            false
        } else {
            self.symbols.insert(symbol.to_string());
            true
        };
        if let Err(e) = self.save() {
            warn!(error = %e, "watchlist save failed");
        }
        added
    }

    fn symbols(&self) -> Vec<String> {
        self.symbols.iter().cloned().collect()
    }

    fn save(&mut self) -> Result<(), ScannerError> {
        let mut list: Vec<&String> = self.symbols.iter().collect();
        list.sort();
        let text = serde_json::to_string(&list)
            .map_err(|e| ScannerError::Watchlist(e.to_string()))?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}
