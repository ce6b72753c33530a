//! Axum route handlers for the Detection API.

use axum::Json;
use serde::Deserialize;

use crate::detection::{detect, JobPageDetection};
use crate::errors::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectRequest {
    pub url: String,
    /// Full page HTML snapshot as seen by the caller.
    #[serde(default)]
    pub html: String,
}

/// POST /api/v1/detect
///
/// Pure function of the submitted snapshot; re-invoked by the caller on SPA
/// navigation (URL-change detection is the caller's responsibility).
pub async fn handle_detect(
    Json(request): Json<DetectRequest>,
) -> Result<Json<JobPageDetection>, AppError> {
    Ok(Json(detect(&request.url, &request.html)))
}
