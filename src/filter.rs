use regex::Regex;
use serde::{Deserialize, Serialize};

/// Configuration for choosing which site paths a bulk scan visits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathFilterConfig {
    /// Path prefix restriction (if None, all paths are allowed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_path_prefix: Option<String>,

    /// Regex patterns for paths to include (if empty, all paths are included unless excluded)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for paths to exclude (these take precedence over include patterns)
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

/// Static assets and feeds never carry page content
fn default_exclude_patterns() -> Vec<String> {
    vec![
        r"\.(jpg|jpeg|png|gif|webp|css|js|ico|svg|woff|woff2|ttf|eot|pdf|xml|txt)/?$".to_string(),
        r"^/(wp-admin|wp-json|feed)/".to_string(),
    ]
}

impl Default for PathFilterConfig {
    fn default() -> Self {
        Self {
            required_path_prefix: None,
            include_patterns: Vec::new(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

/// Path filter that uses regex patterns to determine which pages to scan
#[derive(Debug)]
pub struct PathFilter {
    config: PathFilterConfig,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::new(PathFilterConfig::default()).expect("Default regex patterns should be valid")
    }
}

impl PathFilter {
    /// Create a new path filter from configuration
    pub fn new(config: PathFilterConfig) -> Result<Self, regex::Error> {
        let include_regexes = config
            .include_patterns
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        let exclude_regexes = config
            .exclude_patterns
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            config,
            include_regexes,
            exclude_regexes,
        })
    }

    /// Determine if a normalized site path should be scanned
    pub fn should_scan(&self, path: &str) -> bool {
        if let Some(prefix) = &self.config.required_path_prefix {
            if !path.starts_with(prefix.as_str()) {
                return false;
            }
        }

        // Exclusions take precedence
        if self.exclude_regexes.iter().any(|regex| regex.is_match(path)) {
            return false;
        }

        // If include patterns are specified, at least one must match
        self.include_regexes.is_empty()
            || self.include_regexes.iter().any(|regex| regex.is_match(path))
    }
}
