/// Surge Scanner - Core Library
///
/// This library provides the computation pipeline behind the surge
/// market scanner:
/// - Schema boundary for the static snapshot and IV-history documents
/// - Pure indicator functions (Wilder RSI, annualized Sharpe, IV
///   rank/percentile, composite surge score)
/// - Normalized per-symbol rows and window-dependent enrichment
/// - Filter/sort/view state producing the rendered projection
///
/// Every undercomputable indicator degrades to `None` rather than an
/// error; rendering layers surface that as a placeholder.
pub mod error;
pub mod indicator;
pub mod row;
pub mod series;
pub mod snapshot;
pub mod state;
pub mod watchlist;

// Re-export commonly used types for convenience
pub use error::ScannerError;
pub use indicator::{
    iv_rank_pct, rsi, sharpe_from_closes, surge_score, Interval, IvStanding, SurgeInputs,
    SurgeWeights,
};
pub use row::{Row, WindowConfig, UNSECTORED};
pub use snapshot::{iv_history_from_json, Alert, IvHistory, RawHistory, RawRecord, Snapshot};
pub use state::{Filters, ScannerState, SortDir, SortKey, StatusSummary};
pub use watchlist::{InMemoryWatchlist, WatchlistStore};
