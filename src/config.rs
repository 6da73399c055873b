use crate::error::AuditError;
use crate::filter::PathFilterConfig;
use crate::scoring::ScoringRules;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for auditing a site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Public URL of the site, used for page URLs and internal link detection
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Directory holding the built site; pages are read from here before the live site
    #[serde(default)]
    pub site_root: Option<PathBuf>,

    /// Whether to fall back to rendering the live site through WebDriver
    #[serde(default = "default_use_webdriver")]
    pub use_webdriver: bool,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Directory scans are persisted to
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,

    /// Age after which a stored scan is considered stale
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,

    /// Pause between page fetches during a bulk scan
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Maximum number of pages scanned by one bulk scan
    #[serde(default = "default_scan_limit")]
    pub scan_limit: usize,

    /// Per-page fetch timeout
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Scoring thresholds and deductions
    #[serde(default)]
    pub rules: ScoringRules,

    /// Which paths a bulk scan visits
    #[serde(default)]
    pub filter: PathFilterConfig,

    /// Give home, service, conversion and pricing pages priority within the scan limit
    #[serde(default = "default_key_pages_first")]
    pub key_pages_first: bool,
}

fn default_key_pages_first() -> bool {
    true
}

/// Default value for site_url
fn default_site_url() -> String {
    "https://example.com".to_string()
}

fn default_use_webdriver() -> bool {
    true
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_store_dir() -> PathBuf {
    PathBuf::from(".page-audit")
}

/// 24 hours
fn default_max_age_secs() -> u64 {
    24 * 60 * 60
}

fn default_request_delay_ms() -> u64 {
    100
}

fn default_scan_limit() -> usize {
    50
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self::new(&default_site_url())
    }
}

impl AuditConfig {
    /// Create a new configuration with default values
    pub fn new(site_url: &str) -> Self {
        Self {
            site_url: site_url.to_string(),
            site_root: None,
            use_webdriver: default_use_webdriver(),
            webdriver_url: default_webdriver_url(),
            store_dir: default_store_dir(),
            max_age_secs: default_max_age_secs(),
            request_delay_ms: default_request_delay_ms(),
            scan_limit: default_scan_limit(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            rules: ScoringRules::default(),
            filter: PathFilterConfig::default(),
            key_pages_first: default_key_pages_first(),
        }
    }

    /// Load and validate configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AuditError> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, leaving validation to the caller so
    /// further overrides can be applied first
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Self, AuditError> {
        let path = path.as_ref();
        let mut contents = String::new();
        File::open(path)
            .and_then(|mut file| file.read_to_string(&mut contents))
            .map_err(|e| AuditError::Config(format!("{}: {}", path.display(), e)))?;

        Self::parse_json(&contents)
    }

    /// Load and validate configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, AuditError> {
        let config = Self::parse_json(json)?;
        config.validate()?;
        Ok(config)
    }

    fn parse_json(json: &str) -> Result<Self, AuditError> {
        let mut config: Self =
            serde_json::from_str(json).map_err(|e| AuditError::Config(e.to_string()))?;
        config.apply_env();
        Ok(config)
    }

    /// Override the WebDriver URL with an environment variable if provided
    pub fn apply_env(&mut self) {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
    }

    pub fn validate(&self) -> Result<(), AuditError> {
        if url::Url::parse(&self.site_url).is_err() {
            return Err(AuditError::Config(format!(
                "site_url is not a valid URL: {}",
                self.site_url
            )));
        }
        if self.site_root.is_none() && !self.use_webdriver {
            return Err(AuditError::Config(
                "no page source: set site_root or enable use_webdriver".to_string(),
            ));
        }
        Ok(())
    }

    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let config = AuditConfig::from_json(r#"{ "site_url": "https://example.com" }"#).unwrap();
        assert_eq!(config.max_age(), Duration::from_secs(86_400));
        assert_eq!(config.request_delay(), Duration::from_millis(100));
        assert_eq!(config.scan_limit, 50);
        assert_eq!(config.rules, ScoringRules::default());
        assert!(config.use_webdriver);
        assert!(config.key_pages_first);
    }

    #[test]
    fn test_validate_catches_overridden_site_url() {
        let mut config =
            AuditConfig::from_json(r#"{ "site_url": "https://example.com" }"#).unwrap();
        config.site_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(AuditError::Config(_))));
    }

    #[test]
    fn test_rules_override() {
        let json = r#"{
            "site_url": "https://example.com",
            "site_root": "dist",
            "rules": { "missing_alt_points_cap": 6 }
        }"#;
        let config = AuditConfig::from_json(json).unwrap();
        assert_eq!(config.rules.missing_alt_points_cap, 6);
        assert_eq!(config.site_root, Some(PathBuf::from("dist")));
    }

    #[test]
    fn test_invalid_site_url_rejected() {
        let err = AuditConfig::from_json(r#"{ "site_url": "not a url" }"#).unwrap_err();
        assert!(matches!(err, AuditError::Config(_)));
    }

    #[test]
    fn test_requires_a_page_source() {
        let err = AuditConfig::from_json(r#"{ "use_webdriver": false }"#).unwrap_err();
        assert!(matches!(err, AuditError::Config(_)));
    }
}
