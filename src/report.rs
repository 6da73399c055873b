use crate::results::{Issue, PageScan, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which low-scoring pages to report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueQuery {
    /// Pages scoring below this are reported
    pub threshold: u8,
    /// Only report pages with at least one issue of this severity
    pub severity: Option<Severity>,
    /// Maximum number of pages returned
    pub limit: usize,
}

impl Default for IssueQuery {
    fn default() -> Self {
        Self {
            threshold: 80,
            severity: None,
            limit: 20,
        }
    }
}

/// A page that needs attention
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub path: String,
    pub title: String,
    pub seo_score: u8,
    pub issues: Vec<Issue>,
}

/// Pages scoring below the query threshold, worst first
///
/// Ties are broken by path so the report is stable. With a severity filter, only
/// pages carrying such an issue are kept and only those issues are listed.
pub fn pages_with_issues<'a, I>(scans: I, query: &IssueQuery) -> Vec<PageSummary>
where
    I: IntoIterator<Item = &'a PageScan>,
{
    let mut pages: Vec<&PageScan> = scans
        .into_iter()
        .filter(|scan| scan.seo_score < query.threshold)
        .filter(|scan| query.severity.is_none_or(|severity| scan.has_severity(severity)))
        .collect();

    pages.sort_by(|a, b| a.seo_score.cmp(&b.seo_score).then_with(|| a.path.cmp(&b.path)));

    pages
        .into_iter()
        .take(query.limit)
        .map(|scan| PageSummary {
            path: scan.path.clone(),
            title: scan.title.clone(),
            seo_score: scan.seo_score,
            issues: scan
                .issues
                .iter()
                .filter(|issue| query.severity.is_none_or(|severity| issue.severity == severity))
                .cloned()
                .collect(),
        })
        .collect()
}

/// Site-wide overview of stored scans
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSummary {
    pub pages: usize,
    pub average_score: f64,
    /// Issue count per severity across all pages
    pub issues: BTreeMap<Severity, usize>,
}

/// Totals across stored scans, counting issues per severity
pub fn severity_counts<'a, I>(scans: I) -> SiteSummary
where
    I: IntoIterator<Item = &'a PageScan>,
{
    let mut summary = SiteSummary::default();
    let mut total_score = 0u64;

    for scan in scans {
        summary.pages += 1;
        total_score += u64::from(scan.seo_score);
        for issue in &scan.issues {
            *summary.issues.entry(issue.severity).or_default() += 1;
        }
    }

    if summary.pages > 0 {
        summary.average_score = total_score as f64 / summary.pages as f64;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoringRules;
    use chrono::{TimeZone, Utc};

    fn scan(path: &str, html: &str) -> PageScan {
        PageScan::evaluate_at(
            html,
            path,
            "https://example.com",
            &ScoringRules::default(),
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    fn words(n: usize) -> String {
        vec!["printer"; n].join(" ")
    }

    fn site() -> Vec<PageScan> {
        let good = format!(
            r#"<html><head><title>{}</title><meta name="description" content="{}">
            <script type="application/ld+json">{{"@type":"LocalBusiness"}}</script></head>
            <body><h1>Copiers</h1><a href="/a">a</a><a href="/b">b</a><a href="/c">c</a>{}</body></html>"#,
            "t".repeat(55),
            "m".repeat(155),
            words(600)
        );
        // Missing only the schema block and two links: 100 - 5 - 10
        let decent = format!(
            r#"<html><head><title>{}</title><meta name="description" content="{}"></head>
            <body><h1>Copiers</h1><a href="/a">a</a>{}</body></html>"#,
            "t".repeat(55),
            "m".repeat(155),
            words(600)
        );
        vec![
            scan("/good/", &good),
            scan("/empty/", ""),
            scan("/decent/", &decent),
            scan("/title-only/", "<title>Only a title here</title>"),
        ]
    }

    #[test]
    fn test_worst_first_below_threshold() {
        let scans = site();
        let report = pages_with_issues(&scans, &IssueQuery::default());
        let paths: Vec<&str> = report.iter().map(|page| page.path.as_str()).collect();
        assert_eq!(paths, vec!["/empty/", "/title-only/"]);
        assert!(report[0].seo_score <= report[1].seo_score);
    }

    #[test]
    fn test_threshold_and_limit() {
        let scans = site();
        let query = IssueQuery {
            threshold: 101,
            limit: 3,
            ..IssueQuery::default()
        };
        let report = pages_with_issues(&scans, &query);
        let scores: Vec<u8> = report.iter().map(|page| page.seo_score).collect();
        assert_eq!(report.len(), 3);
        assert!(scores.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(report[2].path, "/decent/");
        assert_eq!(report[2].seo_score, 85);
    }

    #[test]
    fn test_severity_filter() {
        let scans = site();
        let query = IssueQuery {
            threshold: 101,
            severity: Some(Severity::Minor),
            ..IssueQuery::default()
        };
        let report = pages_with_issues(&scans, &query);
        assert!(report.iter().all(|page| !page.issues.is_empty()));
        assert!(
            report
                .iter()
                .flat_map(|page| &page.issues)
                .all(|issue| issue.severity == Severity::Minor)
        );
        assert!(report.iter().all(|page| page.path != "/good/"));
    }

    #[test]
    fn test_severity_counts() {
        let scans = site();
        let summary = severity_counts(&scans);
        assert_eq!(summary.pages, 4);
        assert!(summary.issues[&Severity::Critical] >= 4);
        assert_eq!(severity_counts(&Vec::<PageScan>::new()).average_score, 0.0);
    }
}
