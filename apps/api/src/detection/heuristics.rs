//! Heuristic fallback scoring for pages with no URL or structured-data
//! signal. Additive keyword/selector scoring, normalized by a fixed ceiling.

use scraper::{Html, Selector};

/// Score is normalized as `min(score / SCORE_CEILING, 1)`.
const SCORE_CEILING: f64 = 15.0;

/// Bilingual job-posting phrases. Body match +1, page-title match +2 each.
const KEYWORDS: &[&str] = &[
    // English
    "responsibilities",
    "requirements",
    "qualifications",
    "we offer",
    "apply now",
    "job description",
    "employment type",
    "full-time",
    "salary",
    "benefits",
    // Russian
    "обязанности",
    "требования",
    "условия",
    "откликнуться",
    "вакансия",
    "опыт работы",
    "зарплата",
    "график работы",
    "занятость",
];

/// CSS selectors that resolve to an apply control on known layouts. Any one
/// resolving is worth +5.
const APPLY_SELECTORS: &[&str] = &[
    "[data-qa='vacancy-response-link-top']",
    "[data-qa='vacancy-response']",
    ".jobs-apply-button",
    "#apply-button",
    ".apply-button",
    "button.apply",
    "a[href*='apply']",
];

/// Role nouns looked for in a short first `<h1>` (+3).
const ROLE_NOUNS: &[&str] = &[
    "engineer",
    "developer",
    "manager",
    "designer",
    "analyst",
    "инженер",
    "разработчик",
    "менеджер",
    "дизайнер",
    "аналитик",
];

const MAX_H1_CHARS: usize = 100;

/// Computes the raw heuristic confidence in [0,1] for a parsed page.
pub fn heuristic_confidence(document: &Html) -> f64 {
    let mut score = 0u32;

    let body_text = collect_text(document, "body").to_lowercase();
    let title_text = collect_text(document, "title").to_lowercase();

    for keyword in KEYWORDS {
        if title_text.contains(keyword) {
            score += 2;
        }
        if body_text.contains(keyword) {
            score += 1;
        }
    }

    if has_apply_control(document) {
        score += 5;
    }

    if first_h1_names_a_role(document) {
        score += 3;
    }

    (f64::from(score) / SCORE_CEILING).min(1.0)
}

fn collect_text(document: &Html, selector: &str) -> String {
    let Ok(selector) = Selector::parse(selector) else {
        return String::new();
    };
    document
        .select(&selector)
        .flat_map(|el| el.text())
        .collect::<Vec<_>>()
        .join(" ")
}

fn has_apply_control(document: &Html) -> bool {
    APPLY_SELECTORS.iter().any(|raw| {
        Selector::parse(raw)
            .map(|sel| document.select(&sel).next().is_some())
            .unwrap_or(false)
    })
}

/// The first `<h1>`, when short and naming a role, is a strong hint that the
/// page is about one position rather than a careers listing.
fn first_h1_names_a_role(document: &Html) -> bool {
    let Ok(selector) = Selector::parse("h1") else {
        return false;
    };
    let Some(h1) = document.select(&selector).next() else {
        return false;
    };
    let text: String = h1.text().collect::<Vec<_>>().join(" ");
    let text = text.trim().to_lowercase();

    text.chars().count() < MAX_H1_CHARS && ROLE_NOUNS.iter().any(|noun| text.contains(noun))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn test_empty_page_scores_zero() {
        let doc = parse("<html><head><title>Blog</title></head><body><p>Recipes</p></body></html>");
        assert_eq!(heuristic_confidence(&doc), 0.0);
    }

    #[test]
    fn test_three_body_keywords_plus_apply_button() {
        // score 3 (body keywords) + 5 (apply control) = 8 → 8/15 ≈ 0.53
        let doc = parse(
            "<html><body>\
             <h2>Responsibilities</h2><h2>Requirements</h2><p>Competitive salary</p>\
             <button id=\"apply-button\">Apply</button>\
             </body></html>",
        );
        let confidence = heuristic_confidence(&doc);
        assert!((confidence - 8.0 / 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_title_keyword_counts_double() {
        let doc = parse(
            "<html><head><title>Вакансия: бухгалтер</title></head><body>ничего</body></html>",
        );
        assert!((heuristic_confidence(&doc) - 2.0 / 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_h1_with_role_noun_adds_three() {
        let doc = parse("<html><body><h1>Senior Rust Developer</h1></body></html>");
        assert!((heuristic_confidence(&doc) - 3.0 / 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_long_h1_does_not_count() {
        let long_h1 = format!("<h1>{} developer</h1>", "very ".repeat(30));
        let doc = parse(&format!("<html><body>{long_h1}</body></html>"));
        assert_eq!(heuristic_confidence(&doc), 0.0);
    }

    #[test]
    fn test_confidence_is_capped_at_one() {
        let keywords: String = KEYWORDS
            .iter()
            .map(|k| format!("<p>{k}</p>"))
            .collect();
        let doc = parse(&format!(
            "<html><head><title>вакансия requirements salary</title></head>\
             <body><h1>Engineer</h1>{keywords}\
             <button class=\"apply-button\">go</button></body></html>"
        ));
        assert_eq!(heuristic_confidence(&doc), 1.0);
    }

    #[test]
    fn test_russian_body_keywords_count() {
        let doc = parse(
            "<html><body><p>Обязанности: писать код. Требования: опыт работы от 3 лет.</p></body></html>",
        );
        // "обязанности" + "требования" + "опыт работы" = 3 → 0.2
        assert!((heuristic_confidence(&doc) - 3.0 / 15.0).abs() < 1e-9);
    }
}
