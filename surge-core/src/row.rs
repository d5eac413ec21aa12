//! Normalized per-symbol row and its window-dependent enrichment.

use crate::indicator::{self, Interval, IvStanding, SurgeInputs, SurgeWeights};
use crate::series::{clamp01, clean_numeric};
use crate::snapshot::{Alert, RawRecord};

/// Placeholder sector for records that arrive without one.
pub const UNSECTORED: &str = "Unclassified";

/// Window sizes driving the UI-derived indicator fields. Each is
/// user-adjustable at runtime; changing any of them requires a full
/// re-enrichment pass over the row set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Wilder RSI period.
    pub rsi: usize,
    /// Sharpe lookback in closes.
    pub sharpe: usize,
    /// IV rank/percentile history window.
    pub iv: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            rsi: 30,
            sharpe: 120,
            iv: 180,
        }
    }
}

/// One traded symbol, normalized from its raw snapshot record.
///
/// The `*_ui` fields and the surge score are derived state: always a
/// pure function of the close series, the current IV reading, the IV
/// history and the active [`WindowConfig`], never persisted.
#[derive(Debug, Clone, Default)]
pub struct Row {
    pub symbol: String,
    pub name: String,
    pub sector: String,

    pub price: Option<f64>,
    pub ret1d: Option<f64>,
    pub ret5d: Option<f64>,
    pub rsi14: Option<f64>,
    pub sharpe: Option<f64>,
    pub vol_z: Option<f64>,
    pub iv30: Option<f64>,
    pub iv_rank: Option<f64>,
    pub iv_percentile: Option<f64>,
    pub mcap: Option<f64>,
    pub pe_ttm: Option<f64>,
    pub pb: Option<f64>,
    pub div_yield: Option<f64>,
    pub beta: Option<f64>,
    pub news_24h: Option<f64>,

    /// Sparkline series clamped to [0, 1].
    pub spark30: Vec<f64>,
    /// Raw close series, oldest first, possibly holed.
    pub closes: Vec<Option<f64>>,
    pub alerts: Vec<Alert>,

    // Derived, recomputed by `enrich`
    pub rsi_ui: Option<f64>,
    pub sharpe_ui: Option<f64>,
    pub iv_rank_ui: Option<f64>,
    pub iv_pct_ui: Option<f64>,
    pub surge: f64,
    pub alert_count: usize,
}

impl Row {
    /// Normalize a raw snapshot record.
    ///
    /// Missing names fall back to the symbol, missing sectors to
    /// [`UNSECTORED`], numeric fields are coerced finite-or-`None`, and
    /// the sparkline is clamped into [0, 1]. The surge score only
    /// depends on server-derived fields, so it is fixed here.
    pub fn from_raw(raw: RawRecord, weights: &SurgeWeights) -> Self {
        let finite = |v: Option<f64>| v.filter(|x| x.is_finite());

        let symbol = raw.symbol;
        let name = raw
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| symbol.clone());
        let sector = raw
            .sector
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| UNSECTORED.to_string());

        let spark30 = raw
            .spark30
            .unwrap_or_default()
            .iter()
            .map(|&v| clamp01(v))
            .collect();
        let closes = raw.hist.map(|h| h.c).unwrap_or_default();
        let alert_count = raw.alerts.len();

        let surge = indicator::surge_score(
            &SurgeInputs {
                iv_rank: finite(raw.iv_rank),
                ret_1d: finite(raw.ret1d),
                ret_5d: finite(raw.ret5d),
                vol_z: finite(raw.vol_z),
                news_24h: finite(raw.news_24h),
                rsi_14: finite(raw.rsi14),
            },
            weights,
        );

        Self {
            symbol,
            name,
            sector,
            price: finite(raw.price),
            ret1d: finite(raw.ret1d),
            ret5d: finite(raw.ret5d),
            rsi14: finite(raw.rsi14),
            sharpe: finite(raw.sharpe),
            vol_z: finite(raw.vol_z),
            iv30: finite(raw.iv30),
            iv_rank: finite(raw.iv_rank),
            iv_percentile: finite(raw.iv_percentile),
            mcap: finite(raw.mcap),
            pe_ttm: finite(raw.pe_ttm),
            pb: finite(raw.pb),
            div_yield: finite(raw.div_yield),
            beta: finite(raw.beta),
            news_24h: finite(raw.news_24h),
            spark30,
            closes,
            alerts: raw.alerts,
            rsi_ui: None,
            sharpe_ui: None,
            iv_rank_ui: None,
            iv_pct_ui: None,
            surge,
            alert_count,
        }
    }

    /// Recompute the window-dependent indicator fields.
    ///
    /// Pure function of the row's own series plus the supplied IV
    /// history and config: running it twice with identical inputs yields
    /// bit-identical fields. Must be re-run for every row whenever a
    /// window size, the interval or the risk-free rate changes; fields
    /// are replaced outright, never incrementally patched.
    ///
    /// IV rank/percentile additionally require the history to hold at
    /// least `max(2, window)` readings before they are surfaced.
    pub fn enrich(
        &mut self,
        windows: WindowConfig,
        iv_history: &[Option<f64>],
        risk_free: f64,
        interval: Interval,
    ) {
        let closes = clean_numeric(&self.closes);
        self.rsi_ui = indicator::rsi(&closes, windows.rsi);
        self.sharpe_ui = indicator::sharpe_from_closes(&closes, windows.sharpe, risk_free, interval);

        let iv_series = clean_numeric(iv_history);
        let standing = match self.iv30 {
            Some(current) if iv_series.len() >= windows.iv.max(2) => {
                indicator::iv_rank_pct(&iv_series, current, windows.iv)
            }
            _ => IvStanding::default(),
        };
        self.iv_rank_ui = standing.rank;
        self.iv_pct_ui = standing.percentile;

        self.alert_count = self.alerts.len();
    }

    /// True when any attached alert carries `code`.
    pub fn has_alert(&self, code: &str) -> bool {
        self.alerts.iter().any(|a| a.code == code)
    }
}
