//! Snapshot and IV-history loading.
//!
//! Sources may be `http(s)://` URLs or local file paths. Both documents
//! are fetched concurrently; the snapshot must resolve before the first
//! render, while the IV history is best-effort and its absence only
//! degrades IV rank/percentile.

use chrono::Utc;
use std::sync::OnceLock;
use std::time::Duration;
use surge_core::{iv_history_from_json, IvHistory, ScannerError, Snapshot};
use tracing::{info, warn};

/// Snapshot source from SNAPSHOT_URL (default: docs/data/snapshot.json)
pub fn snapshot_source() -> &'static str {
    static SOURCE: OnceLock<String> = OnceLock::new();
    SOURCE.get_or_init(|| {
        std::env::var("SNAPSHOT_URL").unwrap_or_else(|_| "docs/data/snapshot.json".to_string())
    })
}

/// IV-history source from IV_HISTORY_URL (default: docs/data/iv_history.json)
pub fn iv_history_source() -> &'static str {
    static SOURCE: OnceLock<String> = OnceLock::new();
    SOURCE.get_or_init(|| {
        std::env::var("IV_HISTORY_URL").unwrap_or_else(|_| "docs/data/iv_history.json".to_string())
    })
}

/// Auto-refresh interval in seconds from REFRESH_SECS (default: 0 = manual only)
pub fn refresh_secs() -> u64 {
    static SECS: OnceLock<u64> = OnceLock::new();
    *SECS.get_or_init(|| {
        std::env::var("REFRESH_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    })
}

fn is_http(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Fetch one document as text from a URL or file path.
///
/// HTTP fetches carry a cache-busting `ts=` query parameter so a CDN
/// between us and the snapshot bucket cannot serve a stale document.
async fn fetch_text(source: &str) -> Result<String, ScannerError> {
    if is_http(source) {
        let sep = if source.contains('?') { '&' } else { '?' };
        let url = format!("{}{}ts={}", source, sep, Utc::now().timestamp_millis());
        let client = reqwest::Client::new();
        let response = client
            .get(&url)
            .timeout(Duration::from_secs(15))
            .send()
            .await
            .map_err(|e| ScannerError::fetch(source, e))?;
        if !response.status().is_success() {
            return Err(ScannerError::fetch(
                source,
                format!("HTTP {}", response.status()),
            ));
        }
        response
            .text()
            .await
            .map_err(|e| ScannerError::fetch(source, e))
    } else {
        tokio::fs::read_to_string(source)
            .await
            .map_err(ScannerError::from)
    }
}

/// Load the snapshot document. A failure here is user-visible.
pub async fn load_snapshot(source: &str) -> Result<Snapshot, ScannerError> {
    let text = fetch_text(source).await?;
    let snapshot = Snapshot::from_json(&text)?;
    info!(
        source,
        rows = snapshot.data.len(),
        as_of = %snapshot.as_of_utc,
        "snapshot loaded"
    );
    Ok(snapshot)
}

/// Load the IV-history document. Failure is silent by policy: IV
/// rank/percentile simply stay unavailable.
pub async fn load_iv_history(source: &str) -> IvHistory {
    match fetch_text(source).await.and_then(|t| iv_history_from_json(&t)) {
        Ok(history) => {
            info!(source, symbols = history.len(), "iv history loaded");
            history
        }
        Err(e) => {
            warn!(source, error = %e, "iv history unavailable");
            IvHistory::default()
        }
    }
}

/// Fetch both documents concurrently.
pub async fn load_all(
    snapshot_src: &str,
    iv_src: &str,
) -> (Result<Snapshot, ScannerError>, IvHistory) {
    tokio::join!(load_snapshot(snapshot_src), load_iv_history(iv_src))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_http() {
        assert!(is_http("https://example.com/snapshot.json"));
        assert!(is_http("http://localhost:8000/s.json"));
        assert!(!is_http("docs/data/snapshot.json"));
        assert!(!is_http("/tmp/snapshot.json"));
    }

    #[tokio::test]
    async fn test_load_snapshot_from_file() {
        let path = std::env::temp_dir().join("surge_loader_snapshot_test.json");
        std::fs::write(
            &path,
            r#"{"interval": "1d", "data": [{"symbol": "AAPL"}]}"#,
        )
        .unwrap();
        let snapshot = load_snapshot(path.to_str().unwrap()).await.unwrap();
        assert_eq!(snapshot.data.len(), 1);
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_load_snapshot_missing_file_errors() {
        assert!(load_snapshot("/nonexistent/snapshot.json").await.is_err());
    }

    #[tokio::test]
    async fn test_load_iv_history_failure_degrades_to_empty() {
        let history = load_iv_history("/nonexistent/iv_history.json").await;
        assert!(history.is_empty());
    }
}
