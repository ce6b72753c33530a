//! Vacancy shape plus the HTML-stripping used before prompt interpolation.

use scraper::Html;
use serde::{Deserialize, Serialize};

/// Vacancy descriptions are truncated to this many characters before being
/// placed into a prompt.
pub const MAX_DESCRIPTION_CHARS: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vacancy {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub company: String,
    /// Free text, possibly HTML.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Vacancy {
    /// Stripped-HTML description, truncated for prompts.
    pub fn prompt_description(&self) -> String {
        truncate_chars(&strip_html(&self.description), MAX_DESCRIPTION_CHARS)
    }
}

/// Flattens an HTML fragment to whitespace-normalized plain text.
pub fn strip_html(input: &str) -> String {
    let fragment = Html::parse_fragment(input);
    let text: Vec<&str> = fragment.root_element().text().collect();
    text.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Char-boundary-safe truncation.
fn truncate_chars(input: &str, max_chars: usize) -> String {
    input.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vacancy(description: &str) -> Vacancy {
        Vacancy {
            id: Some("123".to_string()),
            name: "Rust Developer".to_string(),
            company: "Acme".to_string(),
            description: description.to_string(),
            skills: vec!["Rust".to_string()],
            experience: Some("3-6 years".to_string()),
            salary: None,
            url: None,
        }
    }

    #[test]
    fn test_strip_html_flattens_markup() {
        let text = strip_html("<p>We are <b>hiring</b>!</p><ul><li>Rust</li><li>Tokio</li></ul>");
        assert_eq!(text, "We are hiring ! Rust Tokio");
    }

    #[test]
    fn test_strip_html_plain_text_passthrough() {
        assert_eq!(strip_html("just   text\n here"), "just text here");
    }

    #[test]
    fn test_prompt_description_truncates_to_2000_chars() {
        let long = "слово ".repeat(1000); // multi-byte chars, >2000 of them
        let desc = vacancy(&long).prompt_description();
        assert_eq!(desc.chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn test_prompt_description_short_text_untouched() {
        assert_eq!(vacancy("short text").prompt_description(), "short text");
    }
}
