//! Axum route handler for the model catalog (UI model-picker support).

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::llm_client::ModelInfo;
use crate::state::AppState;

/// GET /api/v1/models
///
/// Proxies the provider model catalog, filtered to text-modality,
/// non-embedding models.
pub async fn handle_list_models(
    State(state): State<AppState>,
) -> Result<Json<Vec<ModelInfo>>, AppError> {
    let settings = state.settings().await?;
    let gateway = state.gateway(&settings)?;
    Ok(Json(gateway.list_models().await?))
}
