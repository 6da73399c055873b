use crate::utils;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;

static LOC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<loc>\s*(.*?)\s*</loc>").expect("loc pattern is valid"));

/// Canonical site paths listed in a sitemap, in document order without duplicates
///
/// Entries pointing at other hosts are dropped.
pub fn parse_sitemap(xml: &str, site_url: &str) -> Vec<String> {
    let domain = utils::site_domain(site_url);
    let mut seen = HashSet::new();

    LOC.captures_iter(xml)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().replace("&amp;", "&"))
        .filter(|loc| on_site(loc, &domain))
        .map(|loc| utils::normalize_path(&loc))
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

fn on_site(loc: &str, domain: &str) -> bool {
    match url::Url::parse(loc) {
        Ok(url) => url
            .host_str()
            .is_some_and(|host| host == domain || host.trim_start_matches("www.") == domain),
        // Relative entries belong to the site
        Err(_) => loc.starts_with('/'),
    }
}

/// Role of a page in the site, read off its path
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageCategory {
    Homepage,
    Service,
    Conversion,
    Pricing,
    Blog,
    Other,
}

impl PageCategory {
    pub fn of(path: &str) -> Self {
        let path = utils::normalize_path(path);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some(first) = segments.first() else {
            return PageCategory::Homepage;
        };

        let service = first.starts_with("copier-") || first.starts_with("printer-");
        if path.contains("/blog/") || (service && segments.len() > 1) {
            PageCategory::Blog
        } else if service {
            PageCategory::Service
        } else if ["contact", "about", "quote"]
            .iter()
            .any(|page| first.starts_with(page))
        {
            PageCategory::Conversion
        } else if first.starts_with("pricing") {
            PageCategory::Pricing
        } else {
            PageCategory::Other
        }
    }

    /// Pages worth scanning first: home, service, conversion and pricing pages
    pub fn is_key(self) -> bool {
        !matches!(self, PageCategory::Blog | PageCategory::Other)
    }
}

/// Reorders paths so key pages come first, keeping relative order otherwise
pub fn key_pages_first(paths: &mut [String]) {
    paths.sort_by_key(|path| !PageCategory::of(path).is_key());
}
