//! Schema boundary for the static snapshot and IV-history documents.
//!
//! These types match the JSON documents produced by the snapshot
//! builder. Parsing is lenient by design: every per-symbol field beyond
//! the symbol itself is optional, `null` holes are tolerated inside
//! series, and unknown fields are ignored. Internal code never touches
//! raw JSON; it operates on [`crate::row::Row`] after normalization.

use crate::error::ScannerError;
use serde::Deserialize;
use std::collections::HashMap;

/// Top-level market snapshot payload.
///
/// Immutable once fetched; a reload replaces it wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    /// Build timestamp of the snapshot, as written by the builder.
    pub as_of_utc: String,
    /// Sampling interval code of the close series (e.g. "1d", "15m").
    pub interval: String,
    /// Lookback label the builder used (e.g. "120d").
    pub period: String,
    /// Annualized risk-free rate, decimal.
    pub risk_free: f64,
    /// Ordered per-symbol records.
    pub data: Vec<RawRecord>,
}

impl Snapshot {
    /// Parse a snapshot document.
    pub fn from_json(json: &str) -> Result<Self, ScannerError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One raw symbol record as emitted by the snapshot builder.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    pub symbol: String,
    pub name: Option<String>,
    pub sector: Option<String>,
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
    /// Trailing close series normalized to [0, 1] for sparklines.
    pub spark30: Option<Vec<f64>>,
    pub hist: Option<RawHistory>,
    pub alerts: Vec<Alert>,
}

/// Raw history payload. The close series may contain `null` holes where
/// the upstream feed had no reading.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawHistory {
    /// Bar timestamps, ISO formatted, oldest first.
    pub t: Vec<String>,
    /// Close prices, oldest first.
    pub c: Vec<Option<f64>>,
    /// Volumes, oldest first.
    pub v: Vec<Option<f64>>,
}

/// Screener alert attached to a symbol.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Alert {
    /// Machine-readable alert code, e.g. "IV_SPIKE".
    pub code: String,
    /// Human-readable label; the code doubles as one when absent.
    pub label: Option<String>,
    /// Severity tag, e.g. "info" / "warn" / "high".
    pub sev: Option<String>,
    /// Explanation of why the alert fired.
    pub why: Option<String>,
    /// Suggested action, when the screener proposes one.
    pub opt: Option<String>,
}

/// Per-symbol implied-volatility history, oldest reading first.
///
/// Loaded separately from the snapshot; a missing symbol is valid and
/// treated as an empty history.
pub type IvHistory = HashMap<String, Vec<Option<f64>>>;

/// Parse an IV-history document.
pub fn iv_history_from_json(json: &str) -> Result<IvHistory, ScannerError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_minimal_record() {
        let json = r#"{
            "as_of_utc": "2026-08-07T12:00:00Z",
            "interval": "1d",
            "period": "120d",
            "risk_free": 0.02,
            "data": [{"symbol": "AAPL"}]
        }"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        assert_eq!(snapshot.data.len(), 1);
        let record = &snapshot.data[0];
        assert_eq!(record.symbol, "AAPL");
        assert_eq!(record.name, None);
        assert!(record.alerts.is_empty());
        assert!(record.hist.is_none());
    }

    #[test]
    fn test_snapshot_tolerates_null_holes() {
        let json = r#"{
            "data": [{
                "symbol": "XYZ",
                "price": null,
                "vol_z": null,
                "hist": {"c": [100.0, null, 101.5]}
            }]
        }"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        let record = &snapshot.data[0];
        assert_eq!(record.price, None);
        let hist = record.hist.as_ref().unwrap();
        assert_eq!(hist.c, vec![Some(100.0), None, Some(101.5)]);
        assert!(hist.t.is_empty());
    }

    #[test]
    fn test_snapshot_alert_fields() {
        let json = r#"{
            "data": [{
                "symbol": "XYZ",
                "alerts": [
                    {"code": "IV_SPIKE", "sev": "warn", "why": "IV jumped"},
                    {"code": "RSI_HOT"}
                ]
            }]
        }"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        let alerts = &snapshot.data[0].alerts;
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].code, "IV_SPIKE");
        assert_eq!(alerts[0].sev.as_deref(), Some("warn"));
        assert_eq!(alerts[1].label, None);
    }

    #[test]
    fn test_iv_history_parse() {
        let json = r#"{"AAPL": [0.22, 0.25, null, 0.31], "MSFT": []}"#;
        let history = iv_history_from_json(json).unwrap();
        assert_eq!(history["AAPL"].len(), 4);
        assert_eq!(history["AAPL"][2], None);
        assert!(history["MSFT"].is_empty());
    }

    #[test]
    fn test_snapshot_rejects_malformed_document() {
        assert!(Snapshot::from_json("not json").is_err());
    }
}
