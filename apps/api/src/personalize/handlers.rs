//! Axum route handlers for the Personalization API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::vacancy::Vacancy;
use crate::personalize::{run_apply_pipeline, ApplyPipelineOutput};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizeRequest {
    pub vacancy: Vacancy,
    /// User confirmation from a previous skip warning. The pipeline is
    /// recomputed from scratch — fit is never cached across attempts.
    #[serde(default)]
    pub proceed_anyway: bool,
}

/// POST /api/v1/personalize
///
/// Runs the full apply pipeline: fit assessment, skip decision,
/// personalized resume, then the cover letter from the personalized resume.
pub async fn handle_personalize(
    State(state): State<AppState>,
    Json(request): Json<PersonalizeRequest>,
) -> Result<Json<ApplyPipelineOutput>, AppError> {
    let settings = state.settings().await?;
    let gateway = state.gateway(&settings)?;
    let resume = state.base_resume().await?;

    let output = run_apply_pipeline(
        &gateway,
        state.templates.as_ref(),
        &settings,
        &resume,
        &request.vacancy,
        request.proceed_anyway,
    )
    .await?;

    Ok(Json(output))
}
