use crate::error::StoreError;
use crate::results::PageScan;
use crate::store::ScanStore;
use crate::utils;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One pretty-printed JSON document per page, named after the page's document id
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, path: &str) -> PathBuf {
        self.dir.join(format!("{}.json", utils::doc_id(path)))
    }
}

#[async_trait]
impl ScanStore for JsonStore {
    async fn get(&self, path: &str) -> Result<Option<PageScan>, StoreError> {
        let file = self.file_for(path);
        let json = match tokio::fs::read_to_string(&file).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // Distinct paths can share a document id (`/a/b/` and `/a_b/`)
        let scan: PageScan = serde_json::from_str(&json)?;
        let path = utils::normalize_path(path);
        if scan.path != path {
            ::log::debug!(
                "{} holds a scan of {}, not {}",
                file.display(),
                scan.path,
                path
            );
            return Ok(None);
        }
        Ok(Some(scan))
    }

    async fn put(&self, scan: &PageScan) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        // Write then rename so readers never see a half-written scan
        let file = self.file_for(&scan.path);
        let tmp = file.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(scan)?).await?;
        tokio::fs::rename(&tmp, &file).await?;

        ::log::debug!("Stored scan of {} at {}", scan.path, file.display());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<PageScan>, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut scans = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let file = entry.path();
            if file.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let json = tokio::fs::read_to_string(&file).await?;
            match serde_json::from_str::<PageScan>(&json) {
                Ok(scan) => scans.push(scan),
                Err(e) => ::log::warn!("Skipping unreadable scan {}: {}", file.display(), e),
            }
        }

        scans.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(scans)
    }
}
