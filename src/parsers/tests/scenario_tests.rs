use crate::results::{IssueKind, PageScan, Severity};
use crate::scoring::ScoringRules;
use chrono::{TimeZone, Utc};

const SITE: &str = "https://example.com";

fn body_words(n: usize) -> String {
    (0..n).map(|i| format!("word{}", i)).collect::<Vec<_>>().join(" ")
}

fn evaluate(html: &str, path: &str) -> PageScan {
    PageScan::evaluate_at(
        html,
        path,
        SITE,
        &ScoringRules::default(),
        Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap(),
    )
}

#[cfg(test)]
mod rubric_scenarios {
    use super::*;

    #[test]
    fn test_bare_page_scores_25() {
        let html = format!(
            r#"<html><head></head><body>
            <h1>Hello</h1>
            <p>{}</p>
            <a href="/printer-rental/">Printers</a>
            <a href="/copier-rental/">Copiers</a>
            </body></html>"#,
            body_words(50)
        );
        let scan = evaluate(&html, "/hello");

        let kinds: Vec<IssueKind> = scan.issues.iter().map(|issue| issue.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::MissingTitle,
                IssueKind::MissingMeta,
                IssueKind::ThinContent,
                IssueKind::FewInternalLinks,
                IssueKind::MissingSchema,
            ]
        );
        let points: Vec<u32> = scan.issues.iter().map(|i| i.points_deducted).collect();
        assert_eq!(points, vec![25, 20, 15, 10, 5]);
        assert_eq!(scan.seo_score, 25);
        assert_eq!(scan.points_deducted(), 75);
        assert!(scan.has_severity(Severity::Critical));
        assert_eq!(scan.h1, "Hello");
    }

    #[test]
    fn test_single_char_title_is_short() {
        let scan = evaluate("<title>A</title>", "/");
        assert_eq!(scan.title, "A");
        assert!(
            scan.issues
                .iter()
                .any(|issue| issue.kind == IssueKind::TitleTooShort && issue.points_deducted == 10)
        );
        assert!(scan.issues.iter().all(|issue| issue.kind != IssueKind::MissingTitle));
    }

    #[test]
    fn test_two_of_six_images_missing_alt() {
        let html = r#"<body>
            <img src="/1.png" alt="one"><img src="/2.png" alt="two">
            <img src="/3.png"><img src="/4.png" alt="">
            <img src="/5.png" alt="five"><img src="/6.png" alt="six">
        </body>"#;
        let scan = evaluate(html, "/");

        let issue = scan
            .issues
            .iter()
            .find(|issue| issue.kind == IssueKind::MissingAltText)
            .expect("alt text issue");
        assert_eq!(issue.points_deducted, 4);
        assert_eq!(issue.severity, Severity::Warning);
        assert!(issue.message.contains('2'));
    }

    #[test]
    fn test_path_is_canonicalized() {
        let scan = evaluate("<title>x</title>", "/printer-rental");
        assert_eq!(scan.path, "/printer-rental/");
        assert_eq!(crate::utils::doc_id(&scan.path), "printer-rental");
    }
}

#[cfg(test)]
mod properties {
    use super::*;

    const PAGES: [&str; 5] = [
        "",
        "<title>Copier Rental</title><h1>Copiers</h1>",
        "not html at all <<<>>> \"@type\": \"Thing\"",
        r#"<script type="application/ld+json">{"@type":"Organization"}</script><img src="a.png">"#,
        "<html><body><h2>Only subheadings</h2><a href='/x'>x</a></body></html>",
    ];

    #[test]
    fn test_evaluation_is_deterministic() {
        for html in PAGES {
            let first = evaluate(html, "/page");
            let second = evaluate(html, "/page");
            assert_eq!(first, second);
            assert_eq!(
                serde_json::to_string(&first.issues).unwrap(),
                serde_json::to_string(&second.issues).unwrap()
            );
        }
    }

    #[test]
    fn test_score_matches_deductions_and_stays_in_range() {
        for html in PAGES {
            let scan = evaluate(html, "/page");
            assert!(scan.seo_score <= 100);
            let expected = 100u32.saturating_sub(scan.points_deducted());
            assert_eq!(u32::from(scan.seo_score), expected);
        }
    }

    #[test]
    fn test_stored_scan_round_trips_to_same_issues() {
        let html = PAGES[3];
        let scan = evaluate(html, "/page");
        let stored: PageScan =
            serde_json::from_str(&serde_json::to_string(&scan).unwrap()).unwrap();
        assert_eq!(evaluate(html, &stored.path).issues, stored.issues);
    }
}
