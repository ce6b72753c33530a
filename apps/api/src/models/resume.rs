//! Base resume shapes as stored for the user and fed into prompts.
//!
//! Field names are camelCase on the wire — the browser surface reads and
//! writes these objects directly.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub full_name: String,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    /// Reverse-chronological by convention; order is preserved, not enforced.
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub contacts: ContactInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub company: String,
    pub position: String,
    pub start_date: String,
    /// `None` means the position is current.
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub achievements: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub institution: String,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub telegram: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
}

impl Experience {
    /// "2021-03 — present" / "2019-01 — 2021-02"
    pub fn period(&self) -> String {
        format!(
            "{} — {}",
            self.start_date,
            self.end_date.as_deref().unwrap_or("present")
        )
    }
}

/// Plain-text experience block for prompt interpolation.
pub fn format_experience(experience: &[Experience]) -> String {
    experience
        .iter()
        .map(|e| {
            let mut block = format!(
                "{} at {} ({})\n{}",
                e.position,
                e.company,
                e.period(),
                e.description
            );
            if let Some(achievements) = &e.achievements {
                if !achievements.is_empty() {
                    block.push_str("\nAchievements: ");
                    block.push_str(&achievements.join("; "));
                }
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

impl Resume {
    pub fn formatted_experience(&self) -> String {
        format_experience(&self.experience)
    }

    /// Checked before any network call: personalization needs at least one
    /// experience entry to rewrite.
    pub fn validate_for_personalization(&self) -> Result<(), AppError> {
        if self.experience.is_empty() {
            return Err(AppError::Validation(
                "Base resume has no experience entries. Fill in your resume before applying."
                    .to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_resume() -> Resume {
        Resume {
            full_name: "Anna Petrova".to_string(),
            title: "Backend Developer".to_string(),
            summary: Some("Backend developer with a focus on reliability.".to_string()),
            experience: vec![
                Experience {
                    company: "Acme".to_string(),
                    position: "Senior Backend Developer".to_string(),
                    start_date: "2021-03".to_string(),
                    end_date: None,
                    description: "Own the billing platform.".to_string(),
                    achievements: Some(vec!["Cut p99 latency by 40%".to_string()]),
                },
                Experience {
                    company: "Globex".to_string(),
                    position: "Backend Developer".to_string(),
                    start_date: "2018-06".to_string(),
                    end_date: Some("2021-02".to_string()),
                    description: "Built internal services.".to_string(),
                    achievements: None,
                },
            ],
            education: vec![],
            skills: vec!["Go".to_string(), "PostgreSQL".to_string()],
            contacts: ContactInfo::default(),
        }
    }

    #[test]
    fn test_period_renders_present_for_open_ended() {
        let resume = sample_resume();
        assert_eq!(resume.experience[0].period(), "2021-03 — present");
        assert_eq!(resume.experience[1].period(), "2018-06 — 2021-02");
    }

    #[test]
    fn test_formatted_experience_includes_achievements() {
        let text = sample_resume().formatted_experience();
        assert!(text.contains("Senior Backend Developer at Acme"));
        assert!(text.contains("Achievements: Cut p99 latency by 40%"));
        assert!(text.contains("Backend Developer at Globex"));
    }

    #[test]
    fn test_validation_rejects_empty_experience() {
        let mut resume = sample_resume();
        resume.experience.clear();
        assert!(resume.validate_for_personalization().is_err());
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = serde_json::to_value(sample_resume()).unwrap();
        assert!(json.get("fullName").is_some());
        assert!(json["experience"][0].get("startDate").is_some());
    }
}
