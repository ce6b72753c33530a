//! Job Page Detector — decides whether an arbitrary page is a job posting
//! and with what confidence. Pure function of the page snapshot: no network
//! calls, no persistence. Layered strategies, first confident match wins.

use scraper::Html;
use serde::Serialize;
use tracing::debug;

pub mod handlers;
mod heuristics;
mod json_ld;
mod url_patterns;

pub use json_ld::ExtractedJobFields;

/// Confidence at or above which a URL match alone settles detection.
const URL_SHORTCUT_CONFIDENCE: f64 = 0.8;
/// Confidence assigned to a structured-data `JobPosting` match.
const JSON_LD_CONFIDENCE: f64 = 0.95;
/// Heuristic confidence strictly above this counts as a job page.
const HEURISTIC_THRESHOLD: f64 = 0.4;
/// Fraction of a weak URL match blended into the heuristic confidence.
const WEAK_URL_BLEND: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    UrlPattern,
    JsonLd,
    Heuristic,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPageDetection {
    pub is_job_page: bool,
    pub platform: String,
    /// 0.0 – 1.0
    pub confidence: f64,
    pub method: DetectionMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_fields: Option<ExtractedJobFields>,
}

/// Runs the detection ladder against a page snapshot.
///
/// 1. URL pattern table — a match with confidence ≥ 0.8 returns immediately,
///    without touching the DOM.
/// 2. JSON-LD `JobPosting` scan — fixed 0.95 confidence plus extracted
///    fields.
/// 3. Heuristic scoring — with any weak URL confidence blended in, so two
///    weak signals can cross the bar together.
pub fn detect(url: &str, html_source: &str) -> JobPageDetection {
    let url_match = url_patterns::match_url(url);

    if let Some(m) = url_match {
        if m.confidence >= URL_SHORTCUT_CONFIDENCE {
            debug!("Detected job page by URL pattern: {} ({})", url, m.platform);
            return JobPageDetection {
                is_job_page: true,
                platform: m.platform.to_string(),
                confidence: m.confidence,
                method: DetectionMethod::UrlPattern,
                job_fields: None,
            };
        }
    }

    let platform = url_match
        .map(|m| m.platform.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let document = Html::parse_document(html_source);

    if let Some(fields) = json_ld::find_job_posting(&document) {
        debug!("Detected job page by JSON-LD JobPosting: {}", url);
        return JobPageDetection {
            is_job_page: true,
            platform,
            confidence: JSON_LD_CONFIDENCE,
            method: DetectionMethod::JsonLd,
            job_fields: Some(fields),
        };
    }

    let mut confidence = heuristics::heuristic_confidence(&document);
    if let Some(m) = url_match {
        confidence = (confidence + m.confidence * WEAK_URL_BLEND).min(1.0);
    }

    JobPageDetection {
        is_job_page: confidence > HEURISTIC_THRESHOLD,
        platform,
        confidence,
        method: DetectionMethod::Heuristic,
        job_fields: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_pattern_wins_without_inspecting_dom() {
        // Deliberately malformed HTML: the URL path must not require the DOM.
        let result = detect("https://hh.ru/vacancy/123", "<<<not html at all");
        assert!(result.is_job_page);
        assert_eq!(result.platform, "hh");
        assert!((result.confidence - 1.0).abs() < f64::EPSILON);
        assert_eq!(result.method, DetectionMethod::UrlPattern);
        assert!(result.job_fields.is_none());
    }

    #[test]
    fn test_json_ld_wins_on_non_matching_url() {
        let html = r#"<html><head>
            <script type="application/ld+json">
            {"@type": "JobPosting", "title": "Data Engineer",
             "hiringOrganization": {"name": "Initech"}}
            </script></head><body></body></html>"#;
        let result = detect("https://initech.example.com/positions/42", html);
        assert!(result.is_job_page);
        assert!((result.confidence - 0.95).abs() < f64::EPSILON);
        assert_eq!(result.method, DetectionMethod::JsonLd);
        let fields = result.job_fields.unwrap();
        assert_eq!(fields.title.as_deref(), Some("Data Engineer"));
        assert_eq!(fields.company.as_deref(), Some("Initech"));
    }

    #[test]
    fn test_blank_generic_page_is_not_a_job_page() {
        let result = detect(
            "https://example.com/about",
            "<html><head><title>About us</title></head><body><p>We make widgets.</p></body></html>",
        );
        assert!(!result.is_job_page);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.method, DetectionMethod::Heuristic);
        assert_eq!(result.platform, "unknown");
    }

    #[test]
    fn test_heuristic_keywords_and_apply_button_cross_threshold() {
        // 3 body keywords + apply control = 8 → 8/15 ≈ 0.53 > 0.4
        let html = "<html><body>\
            <h2>Responsibilities</h2><h2>Requirements</h2><p>Great benefits</p>\
            <button class=\"apply-button\">Apply</button></body></html>";
        let result = detect("https://example.com/some-page", html);
        assert!(result.is_job_page);
        assert!((result.confidence - 8.0 / 15.0).abs() < 1e-9);
        assert_eq!(result.method, DetectionMethod::Heuristic);
    }

    #[test]
    fn test_weak_url_blends_with_weak_heuristics() {
        // Heuristic alone: 1 keyword in body = 1/15 ≈ 0.067 — far below 0.4.
        // /careers/ URL adds 0.4 * 0.5 = 0.2 — still below.
        // 5 body keywords = 5/15 ≈ 0.333 plus the blend = 0.533 — crosses.
        let weak_html = "<html><body><p>salary</p></body></html>";
        let weak = detect("https://acme.example.com/careers/rust", weak_html);
        assert!(!weak.is_job_page);
        assert_eq!(weak.platform, "generic");

        let richer_html = "<html><body>\
            <p>responsibilities requirements qualifications salary benefits</p>\
            </body></html>";
        let combined = detect("https://acme.example.com/careers/rust", richer_html);
        assert!(combined.is_job_page);
        assert!((combined.confidence - (5.0 / 15.0 + 0.2)).abs() < 1e-9);
        assert_eq!(combined.method, DetectionMethod::Heuristic);
    }

    #[test]
    fn test_weak_url_platform_tag_survives_json_ld_path() {
        let html = r#"<html><head><script type="application/ld+json">
            {"@type": "JobPosting", "title": "Backend Engineer"}
            </script></head><body></body></html>"#;
        let result = detect("https://acme.example.com/careers/backend", html);
        assert_eq!(result.platform, "generic");
        assert_eq!(result.method, DetectionMethod::JsonLd);
    }
}
