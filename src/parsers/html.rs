use crate::parsers::{PageFeatures, text};
use crate::results::ImageInfo;
use crate::utils;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;
use std::sync::LazyLock;

static SCHEMA_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""@type"\s*:\s*"([^"]+)""#).expect("schema type pattern is valid")
});

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Extracts the SEO features of an HTML document served at `path`
///
/// `site_url` decides which links count as internal. Malformed markup never
/// fails; whatever cannot be found is left empty.
pub fn extract(html: &str, path: &str, site_url: &str) -> PageFeatures {
    let doc = Html::parse_document(html);
    let path = utils::normalize_path(path);
    let domain = utils::site_domain(site_url);

    let (internal_links, external_links) = extract_links(&doc, &domain);
    let has_schema = has_json_ld(&doc);

    let features = PageFeatures {
        url: utils::page_url(site_url, &path),
        path,
        title: title(&doc),
        meta_description: meta_description(&doc),
        canonical: canonical(&doc),
        h1: first_text(&doc, "h1"),
        h2s: all_texts(&doc, "h2"),
        h3s: all_texts(&doc, "h3"),
        word_count: text::count_words(html),
        internal_links,
        external_links,
        images: extract_images(&doc),
        has_schema,
        schema_types: if has_schema {
            schema_types(html)
        } else {
            BTreeSet::new()
        },
    };

    ::log::debug!(
        "Extracted {}: {} words, {} internal links, {} images",
        features.path,
        features.word_count,
        features.internal_links.len(),
        features.images.len()
    );

    features
}

/// Text of an element with inner tags stripped and whitespace collapsed
fn element_text(element: ElementRef<'_>) -> String {
    text::normalize_whitespace(&element.text().collect::<String>())
}

/// Title text trimmed at the ends; inner whitespace counts toward its length
fn title(doc: &Html) -> String {
    doc.select(&selector("title"))
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn first_text(doc: &Html, css: &'static str) -> String {
    doc.select(&selector(css))
        .next()
        .map(element_text)
        .unwrap_or_default()
}

fn all_texts(doc: &Html, css: &'static str) -> Vec<String> {
    doc.select(&selector(css))
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}

fn meta_description(doc: &Html) -> String {
    doc.select(&selector("meta[name][content]"))
        .find(|meta| {
            meta.value()
                .attr("name")
                .is_some_and(|name| name.trim().eq_ignore_ascii_case("description"))
        })
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

fn canonical(doc: &Html) -> String {
    doc.select(&selector("link[rel][href]"))
        .find(|link| {
            link.value().attr("rel").is_some_and(|rel| {
                rel.split_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("canonical"))
            })
        })
        .and_then(|link| link.value().attr("href"))
        .map(|href| href.trim().to_string())
        .unwrap_or_default()
}

/// Where a link points relative to the audited site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkKind {
    /// Normalized site path of an internal link
    Internal(String),
    External(String),
}

/// Classifies an `href` value, returning `None` for links that are neither
/// internal nor web links (fragments, `mailto:`, `tel:`, `javascript:` ...)
pub fn classify_link(href: &str, domain: &str) -> Option<LinkKind> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    // Fragments never change which page a link points to
    let href = href.split('#').next().unwrap_or_default();

    let on_site = !domain.is_empty() && href.contains(domain);
    let protocol_relative = href.starts_with("//");

    if on_site || (href.starts_with('/') && !protocol_relative) {
        return Some(LinkKind::Internal(internal_path(href, domain)));
    }

    if href.starts_with("http") {
        Some(LinkKind::External(href.to_string()))
    } else if protocol_relative {
        Some(LinkKind::External(format!("https:{}", href)))
    } else {
        None
    }
}

/// Strips a leading site origin and any query string from an internal href
///
/// Hrefs that only mention the domain elsewhere, such as share links carrying
/// the page URL in their query, keep their own host.
fn internal_path(href: &str, domain: &str) -> String {
    let href = strip_site_origin(href, domain).unwrap_or(href);
    let path = href.split('?').next().unwrap_or_default();
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

/// The rest of `href` after `https://`, `http://` or `//` and the site host,
/// with or without `www.`
fn strip_site_origin<'a>(href: &'a str, domain: &str) -> Option<&'a str> {
    let host = domain.strip_prefix("www.").unwrap_or(domain);
    if host.is_empty() {
        return None;
    }

    let rest = ["https://", "http://", "//"]
        .iter()
        .find_map(|scheme| href.strip_prefix(scheme))?;
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    let rest = rest.strip_prefix(host)?;

    // `example.com.evil.org` is another host
    (rest.is_empty() || rest.starts_with(['/', '?'])).then_some(rest)
}

fn extract_links(doc: &Html, domain: &str) -> (BTreeSet<String>, BTreeSet<String>) {
    let mut internal = BTreeSet::new();
    let mut external = BTreeSet::new();

    for href in doc
        .select(&selector("a[href]"))
        .filter_map(|a| a.value().attr("href"))
    {
        match classify_link(href, domain) {
            Some(LinkKind::Internal(path)) => {
                internal.insert(path);
            }
            Some(LinkKind::External(url)) => {
                external.insert(url);
            }
            None => ::log::trace!("Ignoring link: {}", href),
        }
    }

    (internal, external)
}

fn extract_images(doc: &Html) -> Vec<ImageInfo> {
    doc.select(&selector("img[src]"))
        .filter_map(|img| {
            let src = img.value().attr("src")?.trim();
            if src.is_empty() {
                return None;
            }
            let alt = img.value().attr("alt").unwrap_or_default();
            Some(ImageInfo {
                src: src.to_string(),
                alt: alt.to_string(),
                has_alt: !alt.is_empty(),
            })
        })
        .collect()
}

fn has_json_ld(doc: &Html) -> bool {
    doc.select(&selector("script[type]")).any(|script| {
        script
            .value()
            .attr("type")
            .is_some_and(|kind| kind.trim().eq_ignore_ascii_case("application/ld+json"))
    })
}

/// Every `"@type"` string value in the document, across all JSON-LD blocks
fn schema_types(html: &str) -> BTreeSet<String> {
    SCHEMA_TYPE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
