use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::analysis::models::{Analysis, AnalysisReport};
use crate::errors::AppError;

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn create(&self, analysis: Analysis) -> Result<Analysis, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Analysis>, AppError>;

    /// Newest first.
    async fn list_by_vacancy(
        &self,
        vacancy_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Analysis>, AppError>;
}

#[derive(Debug, FromRow)]
struct AnalysisRow {
    id: Uuid,
    resume_id: Uuid,
    vacancy_id: Uuid,
    score: f64,
    model: String,
    report: Json<AnalysisReport>,
    created_at: DateTime<Utc>,
}

impl From<AnalysisRow> for Analysis {
    fn from(row: AnalysisRow) -> Self {
        Analysis {
            id: row.id,
            resume_id: row.resume_id,
            vacancy_id: row.vacancy_id,
            score: row.score,
            model_name: row.model,
            report: row.report.0,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PgAnalysisStore {
    pool: PgPool,
}

impl PgAnalysisStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalysisStore for PgAnalysisStore {
    async fn create(&self, analysis: Analysis) -> Result<Analysis, AppError> {
        sqlx::query(
            r#"
            INSERT INTO analyses (id, resume_id, vacancy_id, score, model, report, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(analysis.id)
        .bind(analysis.resume_id)
        .bind(analysis.vacancy_id)
        .bind(analysis.score)
        .bind(&analysis.model_name)
        .bind(Json(&analysis.report))
        .bind(analysis.created_at)
        .execute(&self.pool)
        .await?;
        Ok(analysis)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Analysis>, AppError> {
        let row: Option<AnalysisRow> = sqlx::query_as(
            r#"
            SELECT id, resume_id, vacancy_id, score, model, report, created_at
            FROM analyses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Analysis::from))
    }

    async fn list_by_vacancy(
        &self,
        vacancy_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Analysis>, AppError> {
        let rows: Vec<AnalysisRow> = sqlx::query_as(
            r#"
            SELECT id, resume_id, vacancy_id, score, model, report, created_at
            FROM analyses
            WHERE vacancy_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(vacancy_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Analysis::from).collect())
    }
}
