use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::actor::Actor;
use crate::state::AppState;
use crate::vacancy::{collapse_requirements, validate_weights, SkillRequirement};

#[derive(Deserialize)]
pub struct ReplaceSkillsRequest {
    pub actor_id: Uuid,
    #[serde(default)]
    pub is_admin: bool,
    pub skills: Vec<SkillRequirement>,
}

#[derive(Serialize)]
pub struct ReplaceSkillsResponse {
    pub vacancy_id: Uuid,
    pub skills: Vec<SkillRequirement>,
}

/// PUT /api/v1/vacancies/:id/skills
///
/// Replaces the whole requirement set. Duplicates (by normalized skill text)
/// collapse before storage, so the response shows what was actually saved.
pub async fn handle_replace_skills(
    State(state): State<AppState>,
    Path(vacancy_id): Path<Uuid>,
    Json(req): Json<ReplaceSkillsRequest>,
) -> Result<Json<ReplaceSkillsResponse>, AppError> {
    let actor = Actor {
        id: req.actor_id,
        is_admin: req.is_admin,
    };
    state
        .vacancies
        .get_vacancy(vacancy_id)
        .await?
        .filter(|v| actor.can_access(v.owner_id))
        .ok_or_else(|| AppError::NotFound(format!("Vacancy {vacancy_id} not found")))?;

    validate_weights(&req.skills)?;
    let skills = collapse_requirements(req.skills);
    state
        .vacancies
        .replace_requirements(vacancy_id, &skills)
        .await?;

    info!("Vacancy {vacancy_id}: requirement set replaced ({} skills)", skills.len());
    Ok(Json(ReplaceSkillsResponse { vacancy_id, skills }))
}
