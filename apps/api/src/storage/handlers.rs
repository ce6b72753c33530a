//! Axum route handlers for stored user data: base resume and settings.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::resume::Resume;
use crate::models::settings::{resolve_settings, Settings};
use crate::state::AppState;
use crate::storage::{self, keys};

/// GET /api/v1/resume
pub async fn handle_get_resume(
    State(state): State<AppState>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(state.base_resume().await?))
}

/// PUT /api/v1/resume
pub async fn handle_put_resume(
    State(state): State<AppState>,
    Json(resume): Json<Resume>,
) -> Result<StatusCode, AppError> {
    storage::set_typed(state.store.as_ref(), keys::BASE_RESUME, &resume).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/settings
///
/// Always returns effective settings: stored layer merged onto defaults.
pub async fn handle_get_settings(
    State(state): State<AppState>,
) -> Result<Json<Settings>, AppError> {
    Ok(Json(state.settings().await?))
}

/// PATCH /api/v1/settings
///
/// Accepts a partial settings object, shallow-merges it onto the stored
/// settings (themselves merged onto defaults), persists and returns the
/// resolved result.
pub async fn handle_patch_settings(
    State(state): State<AppState>,
    Json(patch): Json<Value>,
) -> Result<Json<Settings>, AppError> {
    let stored = state.store.get_raw(keys::SETTINGS).await?;
    let resolved = resolve_settings(stored, Some(patch));
    storage::set_typed(state.store.as_ref(), keys::SETTINGS, &resolved).await?;
    Ok(Json(resolved))
}
