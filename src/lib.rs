// Re-export modules
pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod parsers;
pub mod report;
pub mod results;
pub mod scanner;
pub mod scoring;
pub mod sitemap;
pub mod sources;
pub mod store;
pub mod utils;

// Re-export commonly used types for convenience
pub use cache::{CachedScan, DEFAULT_MAX_AGE, INTERACTIVE_MAX_AGE, PageCache};
pub use config::AuditConfig;
pub use error::{AuditError, FetchError, StoreError};
pub use results::{Issue, IssueKind, PageScan, Severity};
pub use scoring::ScoringRules;

use filter::PathFilter;
use report::{IssueQuery, PageSummary, SiteSummary};
use scanner::{BulkScanReport, SiteScanner};
use sources::{FallbackSource, FilesystemSource, HtmlSource, WebDriverSource};
use std::sync::Arc;
use std::time::Duration;
use store::{JsonStore, ScanStore};

/// Evaluate a page's HTML without touching any source or store
pub fn evaluate(html: &str, path: &str, site_url: &str, rules: &ScoringRules) -> PageScan {
    PageScan::evaluate(html, path, site_url, rules)
}

/// Entry point wiring a configuration to its page source and scan store
pub struct Auditor {
    config: AuditConfig,
    cache: PageCache<JsonStore, Box<dyn HtmlSource>>,
    webdriver: Option<Arc<WebDriverSource>>,
}

impl Auditor {
    /// Build the page source and store described by the configuration
    pub fn new(config: AuditConfig) -> Result<Self, AuditError> {
        // Fail early on bad patterns rather than at the first bulk scan
        PathFilter::new(config.filter.clone())?;

        let webdriver = config.use_webdriver.then(|| {
            Arc::new(WebDriverSource::new(
                &config.site_url,
                &config.webdriver_url,
                config.fetch_timeout(),
            ))
        });

        let source: Box<dyn HtmlSource> = match (&config.site_root, &webdriver) {
            (Some(root), Some(webdriver)) => Box::new(FallbackSource::new(
                FilesystemSource::new(root),
                Arc::clone(webdriver),
            )),
            (Some(root), None) => Box::new(FilesystemSource::new(root)),
            (None, Some(webdriver)) => Box::new(Arc::clone(webdriver)),
            (None, None) => {
                return Err(AuditError::Config(
                    "no page source: set site_root or enable use_webdriver".to_string(),
                ));
            }
        };

        let cache = PageCache::new(
            JsonStore::new(&config.store_dir),
            source,
            &config.site_url,
            config.rules.clone(),
        );

        Ok(Self {
            config,
            cache,
            webdriver,
        })
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    pub fn cache(&self) -> &PageCache<JsonStore, Box<dyn HtmlSource>> {
        &self.cache
    }

    /// Score HTML as if it were served at `path`
    pub fn evaluate(&self, html: &str, path: &str) -> PageScan {
        evaluate(html, path, &self.config.site_url, &self.config.rules)
    }

    /// Fetch, score and store one page now
    pub async fn scan(&self, path: &str) -> Result<PageScan, AuditError> {
        self.cache.scan(path).await
    }

    /// Stored scan if younger than `max_age` (configured default when `None`),
    /// otherwise a fresh one
    pub async fn get(
        &self,
        path: &str,
        max_age: Option<Duration>,
    ) -> Result<Option<CachedScan>, AuditError> {
        let max_age = max_age.unwrap_or_else(|| self.config.max_age());
        self.cache.get_or_rescan(path, max_age).await
    }

    /// Scan every listed page lacking a fresh scan, up to `limit` pages
    pub async fn bulk_scan<I, P>(
        &self,
        paths: I,
        limit: Option<usize>,
    ) -> Result<BulkScanReport, AuditError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let filter = PathFilter::new(self.config.filter.clone())?;
        SiteScanner::new(&self.cache, filter)
            .with_max_age(self.config.max_age())
            .with_request_delay(self.config.request_delay())
            .with_key_pages_first(self.config.key_pages_first)
            .scan_site(paths, limit.unwrap_or(self.config.scan_limit))
            .await
    }

    /// Stored pages matching an issue query, worst first
    pub async fn issues(&self, query: &IssueQuery) -> Result<Vec<PageSummary>, AuditError> {
        let scans = self.cache.store().list().await?;
        Ok(report::pages_with_issues(&scans, query))
    }

    /// Page count, average score and issue counts per severity over all stored scans
    pub async fn summary(&self) -> Result<SiteSummary, AuditError> {
        let scans = self.cache.store().list().await?;
        Ok(report::severity_counts(&scans))
    }

    /// Release the browser session, if one was opened
    pub async fn shutdown(&self) {
        if let Some(webdriver) = &self.webdriver {
            webdriver.close().await;
        }
    }
}
