use crate::error::StoreError;
use crate::results::PageScan;
use crate::store::ScanStore;
use crate::utils;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Scans kept in process memory, keyed by canonical path
#[derive(Debug, Default)]
pub struct MemoryStore {
    scans: RwLock<HashMap<String, PageScan>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScanStore for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<PageScan>, StoreError> {
        let key = utils::normalize_path(path);
        Ok(self.scans.read().await.get(&key).cloned())
    }

    async fn put(&self, scan: &PageScan) -> Result<(), StoreError> {
        let key = utils::normalize_path(&scan.path);
        self.scans.write().await.insert(key, scan.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<PageScan>, StoreError> {
        let mut scans: Vec<PageScan> = self.scans.read().await.values().cloned().collect();
        scans.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(scans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoringRules;

    const SITE: &str = "https://example.com";

    #[tokio::test]
    async fn test_keys_by_canonical_path() {
        let store = MemoryStore::new();
        let scan = PageScan::evaluate(
            "<title>Pricing</title>",
            "/pricing",
            "https://example.com",
            &ScoringRules::default(),
        );
        store.put(&scan).await.unwrap();

        assert_eq!(store.get("/pricing/").await.unwrap(), Some(scan.clone()));
        assert_eq!(store.get("/pricing").await.unwrap(), Some(scan));
        assert!(store.get("/").await.unwrap().is_none());
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_paths_sharing_a_doc_id_stay_apart() {
        let store = MemoryStore::new();
        let rules = ScoringRules::default();
        let nested = PageScan::evaluate("<title>Nested</title>", "/a/b/", SITE, &rules);
        store.put(&nested).await.unwrap();

        assert!(store.get("/a_b/").await.unwrap().is_none());

        let flat = PageScan::evaluate("<title>Flat</title>", "/a_b/", SITE, &rules);
        store.put(&flat).await.unwrap();
        assert_eq!(store.get("/a/b/").await.unwrap(), Some(nested));
        assert_eq!(store.get("/a_b/").await.unwrap(), Some(flat));
        assert_eq!(store.list().await.unwrap().len(), 2);
    }
}
