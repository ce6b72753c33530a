//! Axum route handlers for the Fit Assessment API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::fit::{
    assess_fit, calculate_aggressiveness, should_skip_vacancy, FitAssessment, SkipDecision,
};
use crate::models::vacancy::Vacancy;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessFitRequest {
    pub vacancy: Vacancy,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessFitResponse {
    pub assessment: FitAssessment,
    /// The level personalization would use, override included.
    pub aggressiveness: f64,
    pub skip: SkipDecision,
}

/// POST /api/v1/fit
///
/// Scores the stored base resume against the submitted vacancy and reports
/// the derived aggressiveness and skip decision without personalizing.
pub async fn handle_assess_fit(
    State(state): State<AppState>,
    Json(request): Json<AssessFitRequest>,
) -> Result<Json<AssessFitResponse>, AppError> {
    let settings = state.settings().await?;
    let gateway = state.gateway(&settings)?;
    let resume = state.base_resume().await?;

    let assessment = assess_fit(
        &gateway,
        state.templates.as_ref(),
        &settings.model,
        &request.vacancy,
        &resume,
    )
    .await?;

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

    Ok(Json(AssessFitResponse {
        assessment,
        aggressiveness,
        skip,
    }))
}
