use crate::cache::{Freshness, PageCache};
use crate::error::Result;
use crate::filter::PathFilter;
use crate::sitemap;
use crate::sources::HtmlSource;
use crate::store::ScanStore;
use crate::utils;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;

/// Score of a page scanned during a bulk scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredPath {
    pub path: String,
    pub seo_score: u8,
}

/// A page a bulk scan could not scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedPath {
    pub path: String,
    pub error: String,
}

/// Outcome of a bulk scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkScanReport {
    /// Pages a scan was attempted for
    pub scanned: usize,
    pub success: usize,
    pub failed: usize,
    /// Pages whose stored scan was still fresh
    pub skipped: usize,
    /// Stale or missing pages left for a later run because of the limit
    pub deferred: usize,
    /// Pages rejected by the path filter
    pub excluded: usize,
    pub pages: Vec<ScoredPath>,
    pub failures: Vec<FailedPath>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Scans many pages of a site one after another
///
/// Fetches are spaced by a fixed delay so the page source is not hammered.
pub struct SiteScanner<'a, S, F> {
    cache: &'a PageCache<S, F>,
    filter: PathFilter,
    max_age: Duration,
    request_delay: Duration,
    key_pages_first: bool,
}

impl<'a, S: ScanStore, F: HtmlSource> SiteScanner<'a, S, F> {
    pub fn new(cache: &'a PageCache<S, F>, filter: PathFilter) -> Self {
        Self {
            cache,
            filter,
            max_age: crate::cache::DEFAULT_MAX_AGE,
            request_delay: Duration::from_millis(100),
            key_pages_first: false,
        }
    }

    /// Pages scanned more recently than this are skipped
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Pause between consecutive fetches
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Spend the limit on home, service, conversion and pricing pages before the rest
    pub fn with_key_pages_first(mut self, enabled: bool) -> Self {
        self.key_pages_first = enabled;
        self
    }

    /// Scan up to `limit` pages among `paths` that have no fresh stored scan
    pub async fn scan_site<I, P>(&self, paths: I, limit: usize) -> Result<BulkScanReport>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let mut report = BulkScanReport::default();
        let now = Utc::now();

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for path in paths {
            let path = utils::normalize_path(path.as_ref());
            if !seen.insert(path.clone()) {
                continue;
            }
            if !self.filter.should_scan(&path) {
                ::log::debug!("Excluded by filter: {}", path);
                report.excluded += 1;
                continue;
            }
            candidates.push(path);
        }
        if self.key_pages_first {
            sitemap::key_pages_first(&mut candidates);
        }

        let mut to_scan = Vec::new();
        for path in candidates {
            let stored = self.cache.store().get(&path).await?;
            match Freshness::classify(stored.as_ref(), now, self.max_age) {
                Freshness::Fresh => report.skipped += 1,
                Freshness::Stale | Freshness::Missing if to_scan.len() < limit => {
                    to_scan.push(path)
                }
                Freshness::Stale | Freshness::Missing => report.deferred += 1,
            }
        }

        if to_scan.is_empty() {
            ::log::info!("All {} pages already scanned recently", report.skipped);
        } else {
            ::log::info!(
                "Scanning {} pages ({} fresh, {} deferred)",
                to_scan.len(),
                report.skipped,
                report.deferred
            );
        }

        for (i, path) in to_scan.iter().enumerate() {
            if i > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            report.scanned += 1;
            match self.cache.rescan_at(path, Utc::now()).await {
                Ok(scan) => {
                    report.success += 1;
                    report.pages.push(ScoredPath {
                        path: scan.path,
                        seo_score: scan.seo_score,
                    });
                }
                Err(e) => {
                    ::log::warn!("Failed to scan {}: {}", path, e);
                    report.failed += 1;
                    report.failures.push(FailedPath {
                        path: path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        report.finished_at = Some(Utc::now());
        ::log::info!(
            "Bulk scan complete - {} scanned, {} succeeded, {} failed",
            report.scanned,
            report.success,
            report.failed
        );
        Ok(report)
    }
}
