//! Language detection by Cyrillic-character ratio. Drives which language the
//! personalization prompts ask the model to write in.

/// Minimum share of Cyrillic letters among alphabetic characters for a text
/// to be classified as Russian.
const CYRILLIC_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    Ru,
    En,
}

impl Lang {
    /// English name of the language, for prompt instructions.
    pub fn display_name(&self) -> &'static str {
        match self {
            Lang::Ru => "Russian",
            Lang::En => "English",
        }
    }
}

/// Classifies free text as Russian or English. Texts without alphabetic
/// characters (including the empty string) default to English.
pub fn detect_language(text: &str) -> Lang {
    let mut alphabetic = 0usize;
    let mut cyrillic = 0usize;

    for c in text.chars() {
        if c.is_alphabetic() {
            alphabetic += 1;
            if ('\u{0400}'..='\u{04FF}').contains(&c) {
                cyrillic += 1;
            }
        }
    }

    if alphabetic == 0 {
        return Lang::En;
    }

    if cyrillic as f64 / alphabetic as f64 >= CYRILLIC_THRESHOLD {
        Lang::Ru
    } else {
        Lang::En
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_russian_text() {
        assert_eq!(detect_language("Требуется опытный разработчик"), Lang::Ru);
    }

    #[test]
    fn test_english_text() {
        assert_eq!(detect_language("We are looking for a Rust developer"), Lang::En);
    }

    #[test]
    fn test_mixed_text_above_threshold_is_russian() {
        // Cyrillic share is well above 30% even with Latin tech terms mixed in.
        assert_eq!(detect_language("Разработка на Rust и Tokio"), Lang::Ru);
    }

    #[test]
    fn test_mostly_latin_with_few_cyrillic_is_english() {
        assert_eq!(
            detect_language("Senior Rust Developer needed for distributed systems team ок"),
            Lang::En
        );
    }

    #[test]
    fn test_empty_string_is_english() {
        assert_eq!(detect_language(""), Lang::En);
    }

    #[test]
    fn test_digits_and_punctuation_only_is_english() {
        assert_eq!(detect_language("12345 --- !!!"), Lang::En);
    }
}
