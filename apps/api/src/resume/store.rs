use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::profile::models::{ProfileRecord, ResumeProfile};
use crate::resume::{ResumeMeta, ResumeStore};

#[derive(Debug, FromRow)]
struct ProfileRow {
    resume_id: Uuid,
    status: String,
    model: String,
    error: String,
    profile: Json<ResumeProfile>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for ProfileRecord {
    type Error = AppError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        Ok(ProfileRecord {
            resume_id: row.resume_id,
            status: row.status.parse()?,
            model_name: row.model,
            error_message: row.error,
            profile: row.profile.0,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn get_meta(&self, resume_id: Uuid) -> Result<Option<ResumeMeta>, AppError> {
        let row: Option<(Uuid, Option<Uuid>)> =
            sqlx::query_as("SELECT id, owner_id FROM resumes WHERE id = $1")
                .bind(resume_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(id, owner_id)| ResumeMeta { id, owner_id }))
    }

    async fn get_parsed_text(&self, resume_id: Uuid) -> Result<Option<String>, AppError> {
        Ok(
            sqlx::query_scalar("SELECT text FROM parsed_resumes WHERE resume_id = $1")
                .bind(resume_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn get_profile(&self, resume_id: Uuid) -> Result<Option<ProfileRecord>, AppError> {
        let row: Option<ProfileRow> = sqlx::query_as(
            r#"
            SELECT resume_id, status, model, error, profile, updated_at
            FROM resume_profiles
            WHERE resume_id = $1
            "#,
        )
        .bind(resume_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(ProfileRecord::try_from).transpose()
    }

    async fn upsert_profile(&self, record: &ProfileRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO resume_profiles (resume_id, status, model, error, profile, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (resume_id) DO UPDATE SET
                status = EXCLUDED.status,
                model = EXCLUDED.model,
                error = EXCLUDED.error,
                profile = EXCLUDED.profile,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(record.resume_id)
        .bind(record.status.as_str())
        .bind(&record.model_name)
        .bind(&record.error_message)
        .bind(Json(&record.profile))
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
