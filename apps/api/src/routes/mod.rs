pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::detection::handlers as detection_handlers;
use crate::fit::handlers as fit_handlers;
use crate::jobsite::handlers as jobsite_handlers;
use crate::llm_client::handlers as model_handlers;
use crate::personalize::handlers as personalize_handlers;
use crate::state::AppState;
use crate::storage::handlers as storage_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Detection API
        .route("/api/v1/detect", post(detection_handlers::handle_detect))
        // Fit / personalization pipeline
        .route("/api/v1/fit", post(fit_handlers::handle_assess_fit))
        .route(
            "/api/v1/personalize",
            post(personalize_handlers::handle_personalize),
        )
        .route("/api/v1/apply", post(jobsite_handlers::handle_apply))
        // Stored user data
        .route(
            "/api/v1/resume",
            get(storage_handlers::handle_get_resume).put(storage_handlers::handle_put_resume),
        )
        .route(
            "/api/v1/settings",
            get(storage_handlers::handle_get_settings)
                .patch(storage_handlers::handle_patch_settings),
        )
        // Model catalog for the UI picker
        .route("/api/v1/models", get(model_handlers::handle_list_models))
        .with_state(state)
}
