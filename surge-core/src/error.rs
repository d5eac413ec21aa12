use thiserror::Error;

/// All errors surfaced by the scanner pipeline.
///
/// Indicator math never errors; availability is modelled as `Option`.
/// These variants cover the document boundary and the watchlist store.
#[derive(Debug, Error)]
pub enum ScannerError {
    #[error("failed to parse snapshot document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("watchlist store failed: {0}")]
    Watchlist(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScannerError {
    /// Fetch failures for the IV-history document are non-fatal: the
    /// pipeline degrades IV rank/percentile to unavailable instead of
    /// blocking the snapshot render.
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}
