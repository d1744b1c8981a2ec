use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::nlp::normalize;
use crate::vacancy::{SkillRequirement, Vacancy, VacancyStore};

#[derive(Debug, FromRow)]
struct VacancyRow {
    id: Uuid,
    owner_id: Option<Uuid>,
    title: String,
    description: String,
}

#[derive(Clone)]
pub struct PgVacancyStore {
    pool: PgPool,
}

impl PgVacancyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VacancyStore for PgVacancyStore {
    async fn get_vacancy(&self, vacancy_id: Uuid) -> Result<Option<Vacancy>, AppError> {
        let Some(row) = sqlx::query_as::<_, VacancyRow>(
            "SELECT id, owner_id, title, description FROM vacancies WHERE id = $1",
        )
        .bind(vacancy_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let skills: Vec<(String, f64)> = sqlx::query_as(
            "SELECT skill, weight FROM vacancy_skills WHERE vacancy_id = $1 ORDER BY position",
        )
        .bind(vacancy_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Vacancy {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            description: row.description,
            requirements: skills
                .into_iter()
                .map(|(skill, weight)| SkillRequirement { skill, weight })
                .collect(),
        }))
    }

    async fn replace_requirements(
        &self,
        vacancy_id: Uuid,
        requirements: &[SkillRequirement],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM vacancy_skills WHERE vacancy_id = $1")
            .bind(vacancy_id)
            .execute(&mut *tx)
            .await?;

        for (position, req) in requirements.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO vacancy_skills (vacancy_id, position, skill_key, skill, weight)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(vacancy_id)
            .bind(position as i32)
            .bind(normalize(&req.skill))
            .bind(&req.skill)
            .bind(req.weight)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!(
            "Replaced {} requirements for vacancy {vacancy_id}",
            requirements.len()
        );
        Ok(())
    }
}
