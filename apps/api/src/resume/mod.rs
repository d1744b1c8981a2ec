// Resume-side persistence contract used by profile extraction and analysis.

pub mod store;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::profile::models::ProfileRecord;

pub use store::PgResumeStore;

/// Ownership metadata for an uploaded resume.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeMeta {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn get_meta(&self, resume_id: Uuid) -> Result<Option<ResumeMeta>, AppError>;

    /// Plain text extracted from the uploaded file, if parsing ever succeeded.
    async fn get_parsed_text(&self, resume_id: Uuid) -> Result<Option<String>, AppError>;

    async fn get_profile(&self, resume_id: Uuid) -> Result<Option<ProfileRecord>, AppError>;

    /// Insert-or-replace keyed by resume id.
    async fn upsert_profile(&self, record: &ProfileRecord) -> Result<(), AppError>;
}
