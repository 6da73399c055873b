use crate::results::PageScan;
use thiserror::Error;

/// Errors raised by an [`HtmlSource`](crate::sources::HtmlSource) while retrieving a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WebDriver connection failed: {0}")]
    WebDriver(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("fetching {0} timed out")]
    Timeout(String),
}

/// Errors raised by a [`ScanStore`](crate::store::ScanStore)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed stored scan: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("store unavailable: {0}")]
    Store(#[from] StoreError),

    /// The page was scanned but the result could not be written back.
    /// The scan itself is valid and is handed back to the caller.
    #[error("scan of {} could not be persisted: {source}", .scan.path)]
    Unpersisted {
        scan: Box<PageScan>,
        #[source]
        source: StoreError,
    },

    #[error("page not found: {0}")]
    NotFound(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid filter pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("could not encode output: {0}")]
    Output(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;
