//! Filter, sort and view state producing the rendered projection.
//!
//! [`ScannerState`] is the single source of truth for the page session:
//! the full row set, the active filters, sort order, indicator windows
//! and the expansion set. It is mutated only by explicit user actions or
//! a fresh load, never concurrently; [`ScannerState::apply_filters`]
//! rebuilds the projection the renderer consumes.

use crate::indicator::{Interval, SurgeWeights};
use crate::row::{Row, WindowConfig};
use crate::snapshot::{IvHistory, Snapshot};
use crate::watchlist::WatchlistStore;
use itertools::Itertools;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

/// Sortable row field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Symbol,
    Name,
    Sector,
    Price,
    Ret1d,
    Ret5d,
    Rsi,
    Sharpe,
    VolZ,
    IvRank,
    IvPercentile,
    Mcap,
    PeTtm,
    Pb,
    DivYield,
    Beta,
    News24h,
    Surge,
    Alerts,
}

impl SortKey {
    /// All keys in display order, for cycling through in a UI.
    pub const ALL: [SortKey; 19] = [
        SortKey::Symbol,
        SortKey::Name,
        SortKey::Sector,
        SortKey::Price,
        SortKey::Ret1d,
        SortKey::Ret5d,
        SortKey::Rsi,
        SortKey::Sharpe,
        SortKey::VolZ,
        SortKey::IvRank,
        SortKey::IvPercentile,
        SortKey::Mcap,
        SortKey::PeTtm,
        SortKey::Pb,
        SortKey::DivYield,
        SortKey::Beta,
        SortKey::News24h,
        SortKey::Surge,
        SortKey::Alerts,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Symbol => "symbol",
            SortKey::Name => "name",
            SortKey::Sector => "sector",
            SortKey::Price => "price",
            SortKey::Ret1d => "1d%",
            SortKey::Ret5d => "5d%",
            SortKey::Rsi => "rsi",
            SortKey::Sharpe => "sharpe",
            SortKey::VolZ => "volz",
            SortKey::IvRank => "ivrank",
            SortKey::IvPercentile => "iv%ile",
            SortKey::Mcap => "mcap",
            SortKey::PeTtm => "p/e",
            SortKey::Pb => "p/b",
            SortKey::DivYield => "div%",
            SortKey::Beta => "beta",
            SortKey::News24h => "news",
            SortKey::Surge => "surge",
            SortKey::Alerts => "alerts",
        }
    }

    fn is_string(self) -> bool {
        matches!(self, SortKey::Symbol | SortKey::Name | SortKey::Sector)
    }

    fn string_value(self, row: &Row) -> &str {
        match self {
            SortKey::Symbol => &row.symbol,
            SortKey::Name => &row.name,
            SortKey::Sector => &row.sector,
            _ => "",
        }
    }

    fn numeric_value(self, row: &Row) -> Option<f64> {
        match self {
            SortKey::Price => row.price,
            SortKey::Ret1d => row.ret1d,
            SortKey::Ret5d => row.ret5d,
            SortKey::Rsi => row.rsi_ui,
            SortKey::Sharpe => row.sharpe_ui,
            SortKey::VolZ => row.vol_z,
            SortKey::IvRank => row.iv_rank_ui,
            SortKey::IvPercentile => row.iv_pct_ui,
            SortKey::Mcap => row.mcap,
            SortKey::PeTtm => row.pe_ttm,
            SortKey::Pb => row.pb,
            SortKey::DivYield => row.div_yield,
            SortKey::Beta => row.beta,
            SortKey::News24h => row.news_24h,
            SortKey::Surge => Some(row.surge),
            SortKey::Alerts => Some(row.alert_count as f64),
            SortKey::Symbol | SortKey::Name | SortKey::Sector => None,
        }
    }
}

/// Sort direction toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn flip(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

/// Active row filters. Unset members are no-ops; set members compose by
/// logical AND.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    /// Case-insensitive substring match against symbol or name.
    pub query: String,
    /// Exact sector match.
    pub sector: Option<String>,
    /// Retain rows carrying at least one alert with this code.
    pub alert_code: Option<String>,
    /// Restrict to symbols present in the injected watchlist.
    pub watchlist_only: bool,
}

/// Data for the status strip above the table.
#[derive(Debug, Clone, Default)]
pub struct StatusSummary {
    pub shown: usize,
    pub total: usize,
    pub interval: &'static str,
    pub period: String,
    pub max_hist: usize,
    pub iv_symbols: usize,
    pub as_of: String,
}

/// Full view state for one page session.
#[derive(Debug, Clone, Default)]
pub struct ScannerState {
    /// Every normalized row from the current snapshot.
    pub rows: Vec<Row>,
    /// Filtered, sorted projection rebuilt by [`Self::apply_filters`].
    pub filtered: Vec<Row>,

    pub as_of: String,
    pub interval: Interval,
    pub period: String,
    pub risk_free: f64,
    pub iv_history: IvHistory,

    pub filters: Filters,
    pub sort_key: SortKey,
    pub sort_dir: SortDir,
    pub windows: WindowConfig,
    pub surge_weights: SurgeWeights,

    /// Symbols with an open detail panel. Survives re-filtering and
    /// re-sorting; independent of which rows currently pass the filter.
    pub expanded: HashSet<String>,
}

impl ScannerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all rows from a freshly fetched snapshot.
    ///
    /// Filters, sort order, window config and the expansion set survive
    /// the reload; only the data is swapped wholesale.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) {
        self.as_of = snapshot.as_of_utc;
        self.interval = Interval::from_code(&snapshot.interval);
        self.period = snapshot.period;
        self.risk_free = if snapshot.risk_free.is_finite() {
            snapshot.risk_free
        } else {
            0.0
        };
        self.rows = snapshot
            .data
            .into_iter()
            .map(|raw| Row::from_raw(raw, &self.surge_weights))
            .collect();
        debug!(rows = self.rows.len(), as_of = %self.as_of, "snapshot loaded");
    }

    /// Replace the IV-history map. Symbols absent from the map degrade
    /// their IV fields to unavailable on the next enrichment pass.
    pub fn load_iv_history(&mut self, history: IvHistory) {
        debug!(symbols = history.len(), "iv history loaded");
        self.iv_history = history;
    }

    /// Rebuild the filtered, sorted projection.
    ///
    /// Rows are re-enriched first so indicator fields always reflect the
    /// current windows, then filtered and stable-sorted. Callers follow
    /// any state mutation with this before rendering.
    pub fn apply_filters(&mut self, watchlist: &dyn WatchlistStore) {
        for row in &mut self.rows {
            let iv = self
                .iv_history
                .get(&row.symbol)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            row.enrich(self.windows, iv, self.risk_free, self.interval);
        }

        let query = self.filters.query.trim().to_lowercase();
        let mut rows: Vec<Row> = self
            .rows
            .iter()
            .filter(|row| {
                if !query.is_empty()
                    && !row.symbol.to_lowercase().contains(&query)
                    && !row.name.to_lowercase().contains(&query)
                {
                    return false;
                }
                if let Some(sector) = &self.filters.sector {
                    if &row.sector != sector {
                        return false;
                    }
                }
                if let Some(code) = &self.filters.alert_code {
                    if !row.has_alert(code) {
                        return false;
                    }
                }
                if self.filters.watchlist_only && !watchlist.contains(&row.symbol) {
                    return false;
                }
                true
            })
            .cloned()
            .collect();

        let key = self.sort_key;
        let descending = self.sort_dir == SortDir::Desc;
        rows.sort_by(|a, b| {
            let ordering = if key.is_string() {
                cmp_caseless(key.string_value(a), key.string_value(b))
            } else {
                // Missing values sink to the low end ascending.
                let av = key.numeric_value(a).unwrap_or(f64::NEG_INFINITY);
                let bv = key.numeric_value(b).unwrap_or(f64::NEG_INFINITY);
                av.total_cmp(&bv)
            };
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });

        self.filtered = rows;
    }

    /// Flip a symbol's expansion marker; returns the new state.
    pub fn toggle_expanded(&mut self, symbol: &str) -> bool {
        if self.expanded.remove(symbol) {
            false
        } else {
            self.expanded.insert(symbol.to_string());
            true
        }
    }

    pub fn is_expanded(&self, symbol: &str) -> bool {
        self.expanded.contains(symbol)
    }

    /// Select a sort key; re-selecting the active key flips direction.
    pub fn select_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.sort_dir = self.sort_dir.flip();
        } else {
            self.sort_key = key;
            self.sort_dir = SortDir::Asc;
        }
    }

    /// Distinct sectors across the full row set, sorted.
    pub fn sectors(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.sector.clone())
            .sorted()
            .dedup()
            .collect()
    }

    /// Distinct alert codes across the full row set, sorted.
    pub fn alert_codes(&self) -> Vec<String> {
        self.rows
            .iter()
            .flat_map(|r| r.alerts.iter().map(|a| a.code.clone()))
            .sorted()
            .dedup()
            .collect()
    }

    /// Summary strip data for the renderer.
    pub fn status(&self) -> StatusSummary {
        StatusSummary {
            shown: self.filtered.len(),
            total: self.rows.len(),
            interval: self.interval.code(),
            period: self.period.clone(),
            max_hist: self.rows.iter().map(|r| r.closes.len()).max().unwrap_or(0),
            iv_symbols: self.iv_history.len(),
            as_of: self.as_of.clone(),
        }
    }
}

// Stand-in for locale-aware ordering: case-insensitive lexicographic.
fn cmp_caseless(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
