use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::parsers::PageFeatures;
use crate::scoring::{self, ScoringRules};

/// How serious a rubric violation is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Minor,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Minor => "minor",
        };
        f.write_str(name)
    }
}

/// Which rubric check an issue came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingTitle,
    TitleTooShort,
    TitleTooLong,
    MissingMeta,
    MetaTooShort,
    MetaTooLong,
    MissingH1,
    ThinContent,
    LowContent,
    FewInternalLinks,
    MissingAltText,
    MissingSchema,
}

/// A single rubric violation found on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    pub points_deducted: u32,
}

/// Letter grade derived from the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            _ => Grade::F,
        }
    }
}

/// An `<img>` found on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub src: String,
    pub alt: String,
    pub has_alt: bool,
}

/// The scored result of analysing one page
///
/// Scans are only built through [`PageScan::evaluate`] or [`PageScan::evaluate_at`],
/// so the score and issues always agree with the extracted features. A rescan
/// produces a new record; existing records are never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageScan {
    pub path: String,
    pub url: String,
    pub title: String,
    pub meta_description: String,
    pub canonical: String,
    pub h1: String,
    pub h2s: Vec<String>,
    pub h3s: Vec<String>,
    pub word_count: usize,
    pub internal_links: BTreeSet<String>,
    pub external_links: BTreeSet<String>,
    pub images: Vec<ImageInfo>,
    pub has_schema: bool,
    pub schema_types: BTreeSet<String>,
    pub seo_score: u8,
    pub grade: Grade,
    pub issues: Vec<Issue>,
    pub last_scanned: DateTime<Utc>,
}

impl PageScan {
    /// Extract features from `html` and score them, stamped with the current time
    pub fn evaluate(html: &str, path: &str, site_url: &str, rules: &ScoringRules) -> Self {
        Self::evaluate_at(html, path, site_url, rules, Utc::now())
    }

    /// Same as [`PageScan::evaluate`] with an explicit scan time
    pub fn evaluate_at(
        html: &str,
        path: &str,
        site_url: &str,
        rules: &ScoringRules,
        scanned_at: DateTime<Utc>,
    ) -> Self {
        let features = crate::parsers::html::extract(html, path, site_url);
        Self::from_features(features, rules, scanned_at)
    }

    /// Score already-extracted features
    pub fn from_features(
        features: PageFeatures,
        rules: &ScoringRules,
        scanned_at: DateTime<Utc>,
    ) -> Self {
        let evaluation = scoring::evaluate(&features, rules);

        Self {
            path: features.path,
            url: features.url,
            title: features.title,
            meta_description: features.meta_description,
            canonical: features.canonical,
            h1: features.h1,
            h2s: features.h2s,
            h3s: features.h3s,
            word_count: features.word_count,
            internal_links: features.internal_links,
            external_links: features.external_links,
            images: features.images,
            has_schema: features.has_schema,
            schema_types: features.schema_types,
            seo_score: evaluation.score,
            grade: Grade::from_score(evaluation.score),
            issues: evaluation.issues,
            last_scanned: scanned_at,
        }
    }

    /// Whether any issue of the given severity was found
    pub fn has_severity(&self, severity: Severity) -> bool {
        self.issues.iter().any(|issue| issue.severity == severity)
    }

    /// Total points taken off the perfect score
    pub fn points_deducted(&self) -> u32 {
        self.issues.iter().map(|issue| issue.points_deducted).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(Grade::from_score(100), Grade::A);
        assert_eq!(Grade::from_score(90), Grade::A);
        assert_eq!(Grade::from_score(89), Grade::B);
        assert_eq!(Grade::from_score(80), Grade::B);
        assert_eq!(Grade::from_score(70), Grade::C);
        assert_eq!(Grade::from_score(60), Grade::D);
        assert_eq!(Grade::from_score(59), Grade::F);
        assert_eq!(Grade::from_score(0), Grade::F);
    }

    #[test]
    fn test_issue_serializes_like_stored_documents() {
        let issue = Issue {
            kind: IssueKind::MissingTitle,
            severity: Severity::Critical,
            message: "Missing page title".to_string(),
            points_deducted: 25,
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["type"], "missing_title");
        assert_eq!(json["severity"], "critical");
        assert_eq!(json["pointsDeducted"], 25);
    }

    #[test]
    fn test_severity_ordering_worst_first() {
        let mut severities = vec![Severity::Minor, Severity::Critical, Severity::Warning];
        severities.sort();
        assert_eq!(
            severities,
            vec![Severity::Critical, Severity::Warning, Severity::Minor]
        );
    }
}
