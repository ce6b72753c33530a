use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::GatewayError;
use crate::storage::StorageError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Any failure talking to the AI provider: transport error, non-2xx
    /// status, or a 2xx payload without a usable message body.
    #[error("AI provider error: {0}")]
    Gateway(#[from] GatewayError),

    /// Model output could not be coerced into the expected JSON shape.
    /// The raw content is logged for diagnosis, never shown to the user.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Not implemented")]
    NotImplemented,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Gateway(err) => match err {
                GatewayError::Api { status, message } => {
                    tracing::error!("AI provider returned {status}: {message}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "API_ERROR",
                        format!("AI provider error ({status}): {message}"),
                    )
                }
                GatewayError::EmptyResponse => (
                    StatusCode::BAD_GATEWAY,
                    "EMPTY_RESPONSE",
                    "The AI provider returned an empty response. Try again.".to_string(),
                ),
                GatewayError::Http(e) => {
                    tracing::error!("AI provider transport error: {e}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "API_ERROR",
                        "Could not reach the AI provider".to_string(),
                    )
                }
            },
            AppError::Parse(detail) => {
                // Raw model output goes to the log only.
                tracing::error!("Unparseable model output: {detail}");
                (
                    StatusCode::BAD_GATEWAY,
                    "PARSE_ERROR",
                    "The AI response could not be understood. Try again.".to_string(),
                )
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
            AppError::NotImplemented => (
                StatusCode::NOT_IMPLEMENTED,
                "NOT_IMPLEMENTED",
                "This endpoint is not yet implemented".to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
