//! Axum route handler for job-site submission.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::jobsite::ApplyOutcome;
use crate::state::AppState;
use crate::storage::record_application;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub vacancy_id: String,
    pub resume_hash: String,
    pub cover_letter: String,
}

/// POST /api/v1/apply
///
/// Submits through the configured job-site client and records the
/// application (applied-vacancy list + daily counter). Deployments without
/// a wired client get `NotImplemented`.
pub async fn handle_apply(
    State(state): State<AppState>,
    Json(request): Json<ApplyRequest>,
) -> Result<Json<ApplyOutcome>, AppError> {
    let Some(client) = &state.job_site else {
        return Err(AppError::NotImplemented);
    };

    let outcome = client
        .apply_to_vacancy(
            &request.vacancy_id,
            &request.resume_hash,
            &request.cover_letter,
        )
        .await?;

    if outcome.success {
        record_application(state.store.as_ref(), &request.vacancy_id).await?;
        info!("Application submitted for vacancy {}", request.vacancy_id);
    }

    Ok(Json(outcome))
}
