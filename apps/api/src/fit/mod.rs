//! Fit Assessment Engine — scores candidate↔vacancy fit via the AI Gateway,
//! then derives a deterministic rewrite "aggressiveness" level and a
//! skip/proceed decision from that score.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

pub mod handlers;
pub mod session;

use crate::errors::AppError;
use crate::llm_client::extract::extract_typed;
use crate::llm_client::AiGateway;
use crate::models::resume::Resume;
use crate::models::vacancy::Vacancy;
use crate::prompts::TemplateStore;

/// Slope of the fit→aggressiveness mapping. A perfect fit still gets a 0.1
/// floor (light touch-up); zero fit maps to a full rewrite. Tunable
/// constant, not derived from data.
const AGGRESSIVENESS_SLOPE: f64 = 0.9;

/// Model-estimated match quality plus supporting detail. Ephemeral —
/// recomputed per (resume, vacancy) pair, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitAssessment {
    /// 0.0 – 1.0
    pub fit_score: f64,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
}

/// Skip/proceed decision with a human-readable reason when skipping.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipDecision {
    pub skip: bool,
    pub reason: Option<String>,
}

impl SkipDecision {
    pub fn proceed() -> Self {
        Self {
            skip: false,
            reason: None,
        }
    }
}

/// Asks the model to score candidate-to-job fit.
///
/// The prompt carries the stripped, truncated vacancy description and the
/// resume's formatted experience. Gateway failures propagate unretried;
/// unparseable model output becomes `AppError::Parse`.
pub async fn assess_fit(
    gateway: &AiGateway,
    templates: &TemplateStore,
    model: &str,
    vacancy: &Vacancy,
    resume: &Resume,
) -> Result<FitAssessment, AppError> {
    let vars = json!({
        "vacancy": {
            "name": vacancy.name,
            "company": vacancy.company,
            "description": vacancy.prompt_description(),
            "skills": vacancy.skills,
            "experience": vacancy.experience,
        },
        "resume": {
            "title": resume.title,
            "skills": resume.skills,
            "experience": resume.formatted_experience(),
        },
    });

    let params = templates.build("fit_assessment", model, &vars)?;
    let outcome = gateway.call(&params).await?;

    let mut assessment: FitAssessment = extract_typed(&outcome.content)
        .map_err(|e| AppError::Parse(format!("{e}; content: {}", outcome.content)))?;

    // Models occasionally wander outside [0,1]; the rest of the pipeline
    // relies on the invariant.
    assessment.fit_score = assessment.fit_score.clamp(0.0, 1.0);

    info!(
        "Fit assessed: score={:.2} for vacancy '{}'",
        assessment.fit_score, vacancy.name
    );
    Ok(assessment)
}

/// Derives the rewrite aggressiveness from a fit score.
///
/// A non-null override wins verbatim (clamped to [0,1] — user preference
/// always beats the formula). Otherwise `1 - fit_score * 0.9`, rounded to
/// two decimals.
pub fn calculate_aggressiveness(fit_score: f64, override_level: Option<f64>) -> f64 {
    if let Some(level) = override_level {
        return level.clamp(0.0, 1.0);
    }
    round2(1.0 - fit_score.clamp(0.0, 1.0) * AGGRESSIVENESS_SLOPE)
}

/// Decides whether a vacancy should be skipped.
///
/// Skips when the fit score is strictly below the minimum, or when the
/// aggressiveness implied by the *default* formula strictly exceeds the
/// maximum — rewriting would have to fabricate too much to stay credible.
/// Any user aggressiveness override is deliberately ignored here.
pub fn should_skip_vacancy(
    fit_score: f64,
    min_fit_score: f64,
    max_aggressiveness: f64,
) -> SkipDecision {
    if fit_score < min_fit_score {
        return SkipDecision {
            skip: true,
            reason: Some(format!(
                "Fit score {fit_score:.2} is below minimum {min_fit_score:.2}"
            )),
        };
    }

    let implied = calculate_aggressiveness(fit_score, None);
    if implied > max_aggressiveness {
        return SkipDecision {
            skip: true,
            reason: Some(format!(
                "Required rewrite aggressiveness {implied:.2} exceeds maximum {max_aggressiveness:.2}"
            )),
        };
    }

    SkipDecision::proceed()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
