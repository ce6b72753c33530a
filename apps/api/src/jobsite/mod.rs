//! Job-site submission seam. The concrete HH.ru client is an ordinary
//! authenticated REST wrapper and lives outside this service; the
//! orchestration layer only ever sees this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub mod handlers;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyOutcome {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Opaque submission client. Carried in `AppState` as
/// `Option<Arc<dyn JobSiteClient>>`; `None` means submission is not wired
/// up in this deployment and the apply endpoint reports it as such.
#[async_trait]
pub trait JobSiteClient: Send + Sync {
    async fn apply_to_vacancy(
        &self,
        vacancy_id: &str,
        resume_hash: &str,
        cover_letter: &str,
    ) -> Result<ApplyOutcome, AppError>;
}
