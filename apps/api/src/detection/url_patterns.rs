//! Ordered URL pattern table for known job boards and ATS platforms.
//! First match wins; confidence ≥ 0.8 short-circuits detection entirely.

use std::sync::OnceLock;

use regex::Regex;

pub struct UrlPattern {
    pub pattern: Regex,
    pub platform: &'static str,
    pub confidence: f64,
}

/// A platform-tagged URL match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UrlMatch {
    pub platform: &'static str,
    pub confidence: f64,
}

fn patterns() -> &'static [UrlPattern] {
    static PATTERNS: OnceLock<Vec<UrlPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let table: &[(&str, &str, f64)] = &[
            // Dedicated job boards
            (r"hh\.ru/vacancy/\d+", "hh", 1.0),
            (r"career\.habr\.com/vacancies/\d+", "habr", 0.9),
            (r"linkedin\.com/jobs/view/", "linkedin", 0.9),
            (r"indeed\.com/(viewjob|job/)", "indeed", 0.9),
            (r"superjob\.ru/vakansii/", "superjob", 0.85),
            (r"glassdoor\.[a-z.]+/job-listing/", "glassdoor", 0.85),
            // ATS platforms
            (r"boards\.greenhouse\.io/[^/]+/jobs/\d+", "greenhouse", 0.9),
            (r"jobs\.lever\.co/[^/]+/", "lever", 0.9),
            (r"myworkdayjobs\.com/.+/job/", "workday", 0.85),
            (r"jobs\.ashbyhq\.com/[^/]+/", "ashby", 0.85),
            // Weak generic signals — below the 0.8 bar on their own, blended
            // into the heuristic score instead of short-circuiting.
            (r"/vacanc(y|ies|ii)", "generic", 0.5),
            (r"/careers?/", "generic", 0.4),
            (r"/jobs?/", "generic", 0.3),
        ];
        table
            .iter()
            .map(|(pattern, platform, confidence)| UrlPattern {
                pattern: Regex::new(pattern).expect("url pattern table must compile"),
                platform,
                confidence: *confidence,
            })
            .collect()
    })
}

/// Matches a URL against the table in order, returning the first hit.
pub fn match_url(url: &str) -> Option<UrlMatch> {
    patterns()
        .iter()
        .find(|p| p.pattern.is_match(url))
        .map(|p| UrlMatch {
            platform: p.platform,
            confidence: p.confidence,
        })
}
