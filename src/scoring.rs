use crate::parsers::PageFeatures;
use crate::results::{Issue, IssueKind, Severity};
use serde::{Deserialize, Serialize};

/// Score a page starts from before deductions
pub const PERFECT_SCORE: u32 = 100;

/// Thresholds and point costs of the scoring rubric
///
/// The defaults are the production rubric. The alt-text formula and the internal
/// link minimum are tuning choices, so everything here can be overridden from the
/// configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub missing_title_points: u32,
    /// Titles shorter than this (in characters) are too short
    pub title_min_len: usize,
    pub short_title_points: u32,
    /// Titles longer than this are too long
    pub title_max_len: usize,
    pub long_title_points: u32,

    pub missing_meta_points: u32,
    pub meta_min_len: usize,
    pub short_meta_points: u32,
    pub meta_max_len: usize,
    pub long_meta_points: u32,

    pub missing_h1_points: u32,

    /// Pages with fewer words than this are thin
    pub thin_content_words: usize,
    pub thin_content_points: u32,
    /// Pages with fewer words than this (but not thin) are low on content
    pub low_content_words: usize,
    pub low_content_points: u32,

    pub min_internal_links: usize,
    pub few_links_points: u32,

    /// Points per image without alt text
    pub missing_alt_points_per_image: u32,
    /// Cap on the total alt-text deduction
    pub missing_alt_points_cap: u32,

    pub missing_schema_points: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            missing_title_points: 25,
            title_min_len: 30,
            short_title_points: 10,
            title_max_len: 70,
            long_title_points: 5,

            missing_meta_points: 20,
            meta_min_len: 120,
            short_meta_points: 10,
            meta_max_len: 170,
            long_meta_points: 5,

            missing_h1_points: 15,

            thin_content_words: 300,
            thin_content_points: 15,
            low_content_words: 500,
            low_content_points: 5,

            min_internal_links: 3,
            few_links_points: 10,

            missing_alt_points_per_image: 2,
            missing_alt_points_cap: 10,

            missing_schema_points: 5,
        }
    }
}

/// Score and issues computed for a set of page features
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub score: u8,
    pub issues: Vec<Issue>,
}

/// Applies the rubric to extracted features
///
/// Every check runs; issues come out in rubric order (title, meta description, H1,
/// content length, internal links, alt text, schema).
pub fn evaluate(features: &PageFeatures, rules: &ScoringRules) -> Evaluation {
    let mut issues = Vec::new();

    issues.extend(check_title(&features.title, rules));
    issues.extend(check_meta(&features.meta_description, rules));
    issues.extend(check_h1(&features.h1, rules));
    issues.extend(check_content(features.word_count, rules));
    issues.extend(check_internal_links(features.internal_links.len(), rules));
    issues.extend(check_alt_text(
        features.images_missing_alt(),
        features.images.len(),
        rules,
    ));
    issues.extend(check_schema(features.has_schema, rules));

    let score = score_for(&issues);
    Evaluation { score, issues }
}

/// `100 - total deductions`, floored at zero
pub fn score_for(issues: &[Issue]) -> u8 {
    let deducted: u32 = issues.iter().map(|issue| issue.points_deducted).sum();
    // Bounded by PERFECT_SCORE, so it always fits
    PERFECT_SCORE.saturating_sub(deducted) as u8
}

fn issue(kind: IssueKind, severity: Severity, points: u32, message: String) -> Issue {
    Issue {
        kind,
        severity,
        message,
        points_deducted: points,
    }
}

fn check_title(title: &str, rules: &ScoringRules) -> Option<Issue> {
    let len = title.chars().count();
    if len == 0 {
        Some(issue(
            IssueKind::MissingTitle,
            Severity::Critical,
            rules.missing_title_points,
            "Missing page title".to_string(),
        ))
    } else if len < rules.title_min_len {
        Some(issue(
            IssueKind::TitleTooShort,
            Severity::Warning,
            rules.short_title_points,
            format!("Title too short ({} chars, recommend 50-60)", len),
        ))
    } else if len > rules.title_max_len {
        Some(issue(
            IssueKind::TitleTooLong,
            Severity::Minor,
            rules.long_title_points,
            format!("Title too long ({} chars, may be truncated)", len),
        ))
    } else {
        None
    }
}

fn check_meta(meta: &str, rules: &ScoringRules) -> Option<Issue> {
    let len = meta.chars().count();
    if len == 0 {
        Some(issue(
            IssueKind::MissingMeta,
            Severity::Critical,
            rules.missing_meta_points,
            "Missing meta description".to_string(),
        ))
    } else if len < rules.meta_min_len {
        Some(issue(
            IssueKind::MetaTooShort,
            Severity::Warning,
            rules.short_meta_points,
            format!(
                "Meta description too short ({} chars, recommend 150-160)",
                len
            ),
        ))
    } else if len > rules.meta_max_len {
        Some(issue(
            IssueKind::MetaTooLong,
            Severity::Minor,
            rules.long_meta_points,
            format!(
                "Meta description too long ({} chars, will be truncated)",
                len
            ),
        ))
    } else {
        None
    }
}

fn check_h1(h1: &str, rules: &ScoringRules) -> Option<Issue> {
    h1.is_empty().then(|| {
        issue(
            IssueKind::MissingH1,
            Severity::Critical,
            rules.missing_h1_points,
            "Missing H1 heading".to_string(),
        )
    })
}

fn check_content(words: usize, rules: &ScoringRules) -> Option<Issue> {
    if words < rules.thin_content_words {
        Some(issue(
            IssueKind::ThinContent,
            Severity::Warning,
            rules.thin_content_points,
            format!(
                "Thin content ({} words, aim for {}+)",
                words, rules.low_content_words
            ),
        ))
    } else if words < rules.low_content_words {
        Some(issue(
            IssueKind::LowContent,
            Severity::Minor,
            rules.low_content_points,
            format!(
                "Content could be longer ({} words, aim for {}+)",
                words, rules.low_content_words
            ),
        ))
    } else {
        None
    }
}

fn check_internal_links(count: usize, rules: &ScoringRules) -> Option<Issue> {
    (count < rules.min_internal_links).then(|| {
        issue(
            IssueKind::FewInternalLinks,
            Severity::Warning,
            rules.few_links_points,
            format!(
                "Only {} internal links (recommend at least {})",
                count, rules.min_internal_links
            ),
        )
    })
}

fn check_alt_text(missing: usize, total: usize, rules: &ScoringRules) -> Option<Issue> {
    if missing == 0 {
        return None;
    }

    let per_image = u32::try_from(missing)
        .unwrap_or(u32::MAX)
        .saturating_mul(rules.missing_alt_points_per_image);
    let points = per_image.min(rules.missing_alt_points_cap);

    Some(issue(
        IssueKind::MissingAltText,
        Severity::Warning,
        points,
        format!("{} of {} images missing alt text", missing, total),
    ))
}

fn check_schema(has_schema: bool, rules: &ScoringRules) -> Option<Issue> {
    (!has_schema).then(|| {
        issue(
            IssueKind::MissingSchema,
            Severity::Minor,
            rules.missing_schema_points,
            "No schema markup found".to_string(),
        )
    })
}
