use url::Url;

/// Canonicalise a site-relative path so it starts and ends with `/`.
///
/// Absolute URLs are reduced to their path, and query strings and fragments are
/// dropped. Empty input maps to the root path.
pub fn normalize_path(input: &str) -> String {
    let trimmed = input.trim();

    let path = match Url::parse(trimmed) {
        Ok(url) if url.has_host() => url.path().to_string(),
        _ => trimmed
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let mut normalized = String::with_capacity(path.len() + 2);
    if !path.starts_with('/') {
        normalized.push('/');
    }
    normalized.push_str(&path);
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

/// Convert a path to the key its scan is stored under
///
/// `/` becomes `homepage`, `/printer-rental/` becomes `printer-rental` and nested
/// paths have their separators replaced with underscores.
pub fn doc_id(path: &str) -> String {
    let id = normalize_path(path)
        .replace('/', "_")
        .trim_matches('_')
        .to_string();

    if id.is_empty() {
        "homepage".to_string()
    } else {
        id
    }
}

/// Absolute URL of a site path
pub fn page_url(site_url: &str, path: &str) -> String {
    format!("{}{}", site_url.trim_end_matches('/'), normalize_path(path))
}

/// Host part of the configured site URL, e.g. `example.com`
pub fn site_domain(site_url: &str) -> String {
    Url::parse(site_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| {
            site_url
                .trim_start_matches("https://")
                .trim_start_matches("http://")
                .trim_end_matches('/')
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_adds_trailing_slash() {
        assert_eq!(normalize_path("/printer-rental"), "/printer-rental/");
        assert_eq!(normalize_path("/printer-rental/"), "/printer-rental/");
        assert_eq!(normalize_path("printer-rental"), "/printer-rental/");
    }

    #[test]
    fn test_normalize_path_root() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("  "), "/");
    }

    #[test]
    fn test_normalize_path_strips_query_and_host() {
        assert_eq!(normalize_path("/quote?ref=nav#form"), "/quote/");
        assert_eq!(
            normalize_path("https://example.com/copier-lease?x=1"),
            "/copier-lease/"
        );
        assert_eq!(normalize_path("https://example.com"), "/");
    }

    #[test]
    fn test_doc_id() {
        assert_eq!(doc_id("/"), "homepage");
        assert_eq!(doc_id("/printer-rental"), "printer-rental");
        assert_eq!(doc_id("/printer-rental/manila/"), "printer-rental_manila");
    }

    #[test]
    fn test_page_url_and_domain() {
        assert_eq!(
            page_url("https://example.com/", "/about"),
            "https://example.com/about/"
        );
        assert_eq!(site_domain("https://example.com/"), "example.com");
        assert_eq!(site_domain("example.com"), "example.com");
    }
}
