use crate::error::{AuditError, Result};
use crate::results::PageScan;
use crate::scoring::ScoringRules;
use crate::sources::HtmlSource;
use crate::store::ScanStore;
use crate::utils;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::time::Duration;

/// How long a stored scan is reused by default
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Shorter reuse window for interactive, assistant-driven analysis
pub const INTERACTIVE_MAX_AGE: Duration = Duration::from_secs(60 * 60);

/// State of the stored scan for a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Younger than the max age; reused as-is
    Fresh,
    /// At or past the max age; rescanned
    Stale,
    /// Never scanned
    Missing,
}

impl Freshness {
    pub fn classify(stored: Option<&PageScan>, now: DateTime<Utc>, max_age: Duration) -> Self {
        let Some(scan) = stored else {
            return Freshness::Missing;
        };

        // An age limit too large to represent never expires
        let Ok(max_age) = TimeDelta::from_std(max_age) else {
            return Freshness::Fresh;
        };

        if now - scan.last_scanned < max_age {
            Freshness::Fresh
        } else {
            Freshness::Stale
        }
    }
}

/// A scan handed out by the cache, with whether it came straight from the store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedScan {
    pub fresh: bool,
    pub scan: PageScan,
}

/// Serves page scans from a store, rescanning pages whose scan is missing or stale
pub struct PageCache<S, F> {
    store: S,
    source: F,
    site_url: String,
    rules: ScoringRules,
}

impl<S: ScanStore, F: HtmlSource> PageCache<S, F> {
    pub fn new(store: S, source: F, site_url: &str, rules: ScoringRules) -> Self {
        Self {
            store,
            source,
            site_url: site_url.to_string(),
            rules,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn source(&self) -> &F {
        &self.source
    }

    /// Fetch, score and store a page regardless of any stored scan
    pub async fn scan(&self, path: &str) -> Result<PageScan> {
        self.rescan_at(&utils::normalize_path(path), Utc::now()).await
    }

    /// Stored scan of `path` if younger than `max_age`, otherwise a new scan
    ///
    /// When rescanning fails, an existing stale scan is returned instead of the
    /// failure. `Ok(None)` means the page could not be fetched and was never scanned.
    pub async fn get_or_rescan(
        &self,
        path: &str,
        max_age: Duration,
    ) -> Result<Option<CachedScan>> {
        self.get_or_rescan_at(path, max_age, Utc::now()).await
    }

    /// Same as [`PageCache::get_or_rescan`] as of the instant `now`
    pub async fn get_or_rescan_at(
        &self,
        path: &str,
        max_age: Duration,
        now: DateTime<Utc>,
    ) -> Result<Option<CachedScan>> {
        let path = utils::normalize_path(path);
        let stored = self.store.get(&path).await?;

        let freshness = Freshness::classify(stored.as_ref(), now, max_age);
        ::log::debug!("Scan of {} is {:?}", path, freshness);

        let stored = match (freshness, stored) {
            (Freshness::Fresh, Some(scan)) => {
                return Ok(Some(CachedScan { fresh: true, scan }));
            }
            (_, stored) => stored,
        };

        match self.rescan_at(&path, now).await {
            Ok(scan) => Ok(Some(CachedScan { fresh: false, scan })),
            Err(e @ (AuditError::Fetch(_) | AuditError::NotFound(_))) => match stored {
                Some(scan) => {
                    ::log::warn!("Rescan of {} failed ({}), serving stale scan", path, e);
                    Ok(Some(CachedScan { fresh: false, scan }))
                }
                None => {
                    ::log::warn!("Rescan of {} failed ({}), no stored scan", path, e);
                    Ok(None)
                }
            },
            Err(e) => Err(e),
        }
    }

    /// Fetch, evaluate and persist one page, stamped with `now`
    pub(crate) async fn rescan_at(&self, path: &str, now: DateTime<Utc>) -> Result<PageScan> {
        let html = self
            .source
            .fetch(path)
            .await?
            .ok_or_else(|| AuditError::NotFound(path.to_string()))?;

        let scan = PageScan::evaluate_at(&html, path, &self.site_url, &self.rules, now);
        ::log::info!("Scanned {}: score {}", scan.path, scan.seo_score);

        if let Err(source) = self.store.put(&scan).await {
            return Err(AuditError::Unpersisted {
                scan: Box::new(scan),
                source,
            });
        }

        Ok(scan)
    }
}
