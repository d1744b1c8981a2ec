// Vacancies and their weighted skill requirements.

pub mod handlers;
pub mod store;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::nlp::normalize;

pub use store::PgVacancyStore;

/// A named skill with an importance weight in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub skill: String,
    pub weight: f64,
}

impl SkillRequirement {
    pub fn new(skill: impl Into<String>, weight: f64) -> Self {
        Self {
            skill: skill.into(),
            weight,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Vacancy {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub requirements: Vec<SkillRequirement>,
}

#[async_trait]
pub trait VacancyStore: Send + Sync {
    /// The vacancy with its requirement set, or `None` if it does not exist.
    async fn get_vacancy(&self, vacancy_id: Uuid) -> Result<Option<Vacancy>, AppError>;

    /// Replaces the whole requirement set. Callers pass an already-collapsed list.
    async fn replace_requirements(
        &self,
        vacancy_id: Uuid,
        requirements: &[SkillRequirement],
    ) -> Result<(), AppError>;
}

/// Collapses requirements keyed by normalized skill text.
///
/// Duplicates keep the position of their first occurrence and the weight of
/// their last. Skills that normalize to nothing are dropped.
pub fn collapse_requirements(items: Vec<SkillRequirement>) -> Vec<SkillRequirement> {
    let mut out: Vec<SkillRequirement> = Vec::with_capacity(items.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let key = normalize(&item.skill);
        if key.is_empty() {
            continue;
        }
        match index.get(&key) {
            Some(&i) => out[i].weight = item.weight,
            None => {
                index.insert(key, out.len());
                out.push(SkillRequirement {
                    skill: item.skill.trim().to_string(),
                    weight: item.weight,
                });
            }
        }
    }

    out
}

/// Rejects weights outside `[0, 1]` (including NaN).
pub fn validate_weights(items: &[SkillRequirement]) -> Result<(), AppError> {
    match items.iter().find(|r| !(0.0..=1.0).contains(&r.weight)) {
        Some(bad) => Err(AppError::Validation(format!(
            "weight for skill '{}' must be between 0 and 1, got {}",
            bad.skill, bad.weight
        ))),
        None => Ok(()),
    }
}
