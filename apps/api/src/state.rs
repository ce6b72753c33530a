use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppError;
use crate::jobsite::JobSiteClient;
use crate::llm_client::AiGateway;
use crate::models::resume::Resume;
use crate::models::settings::{resolve_settings, Settings};
use crate::prompts::TemplateStore;
use crate::storage::{self, keys, KeyValueStore};

/// Shared application state injected into all route handlers via Axum
/// extractors.
#[derive(Clone)]
pub struct AppState {
    /// One shared HTTP client; gateways are built per request around it with
    /// the effective API key.
    pub http: reqwest::Client,
    pub store: Arc<dyn KeyValueStore>,
    pub templates: Arc<TemplateStore>,
    pub config: Config,
    /// Job-site submission client; `None` until a deployment wires one up.
    pub job_site: Option<Arc<dyn JobSiteClient>>,
}

impl AppState {
    /// Effective settings: stored layer merged onto hard-coded defaults.
    pub async fn settings(&self) -> Result<Settings, AppError> {
        let stored = self.store.get_raw(keys::SETTINGS).await?;
        Ok(resolve_settings(stored, None))
    }

    /// Gateway bound to the effective API key: the user-stored key wins,
    /// the environment key is the fallback.
    pub fn gateway(&self, settings: &Settings) -> Result<AiGateway, AppError> {
        let api_key = if !settings.api_key.is_empty() {
            settings.api_key.clone()
        } else if let Some(key) = &self.config.openrouter_api_key {
            key.clone()
        } else {
            return Err(AppError::Validation(
                "No AI provider API key configured. Set one in settings.".to_string(),
            ));
        };
        Ok(AiGateway::new(self.http.clone(), api_key))
    }

    pub async fn base_resume(&self) -> Result<Resume, AppError> {
        storage::get_typed(self.store.as_ref(), keys::BASE_RESUME)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Base resume is not saved yet. Save it first.".to_string())
            })
    }
}
