//! Resume/Cover-Letter Personalization — orchestrates the Prompt Builder and
//! the AI Gateway using the Fit Assessment output.
//!
//! Flow per attempt: validate base resume (before any network call) →
//! assess fit → skip decision → personalize resume at the computed
//! aggressiveness → cover letter from the *personalized* resume.
//!
//! The two generation calls are explicitly sequenced, not concurrent: the
//! letter must reference the rewritten experience, not the base one.
//! Nothing here caches or deduplicates — every attempt restarts from
//! scratch.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

pub mod handlers;

use crate::errors::AppError;
use crate::fit::session::{ApplyPhase, ApplySession};
use crate::fit::{assess_fit, calculate_aggressiveness, should_skip_vacancy, FitAssessment, SkipDecision};
use crate::language::detect_language;
use crate::llm_client::extract::{extract_quoted, extract_typed};
use crate::llm_client::AiGateway;
use crate::models::resume::{format_experience, Experience, Resume};
use crate::models::settings::Settings;
use crate::models::vacancy::Vacancy;
use crate::prompts::TemplateStore;

/// The rewritten resume. Ephemeral — recomputed per (resume, vacancy) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizedResume {
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    pub experience: Vec<Experience>,
    pub key_skills: Vec<String>,
    /// The aggressiveness level actually used for the rewrite.
    pub applied_aggressiveness: f64,
    /// Traceability only; `None` when fit scoring was bypassed.
    #[serde(default)]
    pub original_fit_score: Option<f64>,
}

/// What the model returns for a personalization call — the applied level and
/// original score are attached by the orchestrator, not the model.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelResume {
    title: String,
    #[serde(default)]
    summary: Option<String>,
    experience: Vec<Experience>,
    #[serde(default)]
    key_skills: Vec<String>,
}

/// Result of one apply attempt. When the flow pauses at the skip warning,
/// `resume` and `cover_letter` are `None` and `phase` is `SkipWarning`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyPipelineOutput {
    pub assessment: FitAssessment,
    pub aggressiveness: f64,
    pub skip: SkipDecision,
    pub phase: ApplyPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume: Option<PersonalizedResume>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
}

/// Runs one apply attempt end to end.
///
/// `proceed_anyway` is the user's "proceed anyway" confirmation from a prior
/// skip warning; with it set, the skip decision is acknowledged and the flow
/// continues through personalization.
pub async fn run_apply_pipeline(
    gateway: &AiGateway,
    templates: &TemplateStore,
    settings: &Settings,
    base_resume: &Resume,
    vacancy: &Vacancy,
    proceed_anyway: bool,
) -> Result<ApplyPipelineOutput, AppError> {
    let mut session = ApplySession::new();
    session.begin().map_err(internal)?;

    // Cheap validation first — no network call for an unusable resume.
    if let Err(e) = base_resume.validate_for_personalization() {
        session.fail(e.to_string());
        return Err(e);
    }

    let assessment = match assess_fit(gateway, templates, &settings.model, vacancy, base_resume)
        .await
    {
        Ok(a) => a,
        Err(e) => {
            session.fail(e.to_string());
            return Err(e);
        }
    };

    let policy = &settings.aggressive_fit;
    let skip = if policy.enabled {
        should_skip_vacancy(
            assessment.fit_score,
            policy.min_fit_score,
            policy.max_aggressiveness,
        )
    } else {
        SkipDecision::proceed()
    };

    let aggressiveness =
        calculate_aggressiveness(assessment.fit_score, policy.aggressiveness_override);

    session.fit_scored(&skip).map_err(internal)?;

    if skip.skip {
        if !proceed_anyway {
            info!(
                "Skip warning for vacancy '{}': {}",
                vacancy.name,
                skip.reason.as_deref().unwrap_or("")
            );
            return Ok(ApplyPipelineOutput {
                assessment,
                aggressiveness,
                skip,
                phase: session.phase().clone(),
                resume: None,
                cover_letter: None,
            });
        }
        session.confirm_proceed().map_err(internal)?;
    }

    let resume = match personalize_resume(
        gateway,
        templates,
        settings,
        base_resume,
        vacancy,
        aggressiveness,
        Some(assessment.fit_score),
    )
    .await
    {
        Ok(r) => r,
        Err(e) => {
            session.fail(e.to_string());
            return Err(e);
        }
    };
    session.resume_ready().map_err(internal)?;

    let cover_letter =
        match generate_cover_letter(gateway, templates, settings, &resume, vacancy).await {
            Ok(letter) => letter,
            Err(e) => {
                session.fail(e.to_string());
                return Err(e);
            }
        };
    session.letter_ready().map_err(internal)?;

    info!(
        "Apply pipeline complete for vacancy '{}' (fit={:.2}, aggressiveness={:.2})",
        vacancy.name, assessment.fit_score, aggressiveness
    );

    Ok(ApplyPipelineOutput {
        assessment,
        aggressiveness,
        skip,
        phase: session.phase().clone(),
        resume: Some(resume),
        cover_letter: Some(cover_letter),
    })
}

/// One personalization call: rewrites the base resume toward the vacancy at
/// the given aggressiveness level.
pub async fn personalize_resume(
    gateway: &AiGateway,
    templates: &TemplateStore,
    settings: &Settings,
    base_resume: &Resume,
    vacancy: &Vacancy,
    aggressiveness: f64,
    original_fit_score: Option<f64>,
) -> Result<PersonalizedResume, AppError> {
    let language = detect_language(&vacancy.description);
    let vars = json!({
        "aggressiveness": aggressiveness,
        "language": language.display_name(),
        "vacancy": {
            "name": vacancy.name,
            "company": vacancy.company,
            "skills": vacancy.skills,
            "description": vacancy.prompt_description(),
        },
        "resume": {
            "title": base_resume.title,
            "summary": base_resume.summary,
            "skills": base_resume.skills,
            "experience": base_resume.formatted_experience(),
        },
    });

    let params = templates.build("personalize_resume", &settings.model, &vars)?;
    let outcome = gateway.call(&params).await?;

    let model_resume: ModelResume = extract_typed(&outcome.content)
        .map_err(|e| AppError::Parse(format!("{e}; content: {}", outcome.content)))?;

    let title = if model_resume.title.trim().is_empty() {
        warn!("Personalization returned an empty title, generating a fallback");
        suggest_position_title(gateway, templates, settings, vacancy).await?
    } else {
        model_resume.title
    };

    Ok(PersonalizedResume {
        title,
        summary: model_resume.summary,
        experience: model_resume.experience,
        key_skills: model_resume.key_skills,
        applied_aggressiveness: aggressiveness,
        original_fit_score,
    })
}

/// Generates the cover letter from the already-personalized resume. Plain
/// text output — no JSON extraction.
pub async fn generate_cover_letter(
    gateway: &AiGateway,
    templates: &TemplateStore,
    settings: &Settings,
    personalized: &PersonalizedResume,
    vacancy: &Vacancy,
) -> Result<String, AppError> {
    let language = detect_language(&vacancy.description);
    let vars = json!({
        "language": language.display_name(),
        "vacancy": {
            "name": vacancy.name,
            "company": vacancy.company,
            "description": vacancy.prompt_description(),
        },
        "resume": {
            "title": personalized.title,
            "keySkills": personalized.key_skills,
            "experience": format_experience(&personalized.experience),
        },
    });

    let params = templates.build("cover_letter", &settings.model, &vars)?;
    let outcome = gateway.call(&params).await?;
    Ok(outcome.content.trim().to_string())
}

/// Short position-title generation — the one call whose output is a plain
/// quoted string rather than JSON.
pub async fn suggest_position_title(
    gateway: &AiGateway,
    templates: &TemplateStore,
    settings: &Settings,
    vacancy: &Vacancy,
) -> Result<String, AppError> {
    let vars = json!({
        "vacancy": {"name": vacancy.name, "company": vacancy.company},
    });
    let params = templates.build("vacancy_title", &settings.model, &vars)?;
    let outcome = gateway.call(&params).await?;
    Ok(extract_quoted(&outcome.content))
}

fn internal(e: crate::fit::session::TransitionError) -> AppError {
    AppError::Internal(e.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personalized_resume_wire_format() {
        let resume = PersonalizedResume {
            title: "Rust Developer".to_string(),
            summary: None,
            experience: vec![],
            key_skills: vec!["Rust".to_string()],
            applied_aggressiveness: 0.55,
            original_fit_score: Some(0.5),
        };
        let json = serde_json::to_value(&resume).unwrap();
        assert_eq!(json["keySkills"][0], "Rust");
        assert_eq!(json["appliedAggressiveness"], 0.55);
        assert_eq!(json["originalFitScore"], 0.5);
    }

    #[test]
    fn test_model_resume_parses_without_optional_fields() {
        let parsed: ModelResume = serde_json::from_str(
            r#"{
                "title": "Backend Developer",
                "experience": [{
                    "company": "Acme",
                    "position": "Developer",
                    "startDate": "2020-01",
                    "description": "Rewrote billing."
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.title, "Backend Developer");
        assert!(parsed.summary.is_none());
        assert!(parsed.key_skills.is_empty());
        assert_eq!(parsed.experience[0].company, "Acme");
    }
}
