pub mod json;
pub mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::results::PageScan;
use async_trait::async_trait;

/// Persistence for page scans, keyed by canonical path
#[async_trait]
pub trait ScanStore: Send + Sync {
    /// Stored scan for a path, if any
    async fn get(&self, path: &str) -> Result<Option<PageScan>, StoreError>;

    /// Store a scan, replacing any previous scan of the same path
    async fn put(&self, scan: &PageScan) -> Result<(), StoreError>;

    /// Every stored scan
    async fn list(&self) -> Result<Vec<PageScan>, StoreError>;
}
