use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::analysis::models::Analysis;
use crate::errors::AppError;
use crate::models::actor::Actor;
use crate::state::AppState;

const DEFAULT_PAGE_LIMIT: i64 = 50;
const MAX_PAGE_LIMIT: i64 = 200;

#[derive(Deserialize)]
pub struct CreateAnalysisRequest {
    pub actor_id: Uuid,
    #[serde(default)]
    pub is_admin: bool,
    pub resume_id: Uuid,
    pub vacancy_id: Uuid,
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// POST /api/v1/analyses
pub async fn handle_create_analysis(
    State(state): State<AppState>,
    Json(req): Json<CreateAnalysisRequest>,
) -> Result<(StatusCode, Json<Analysis>), AppError> {
    let actor = Actor {
        id: req.actor_id,
        is_admin: req.is_admin,
    };

    let resume = state
        .resumes
        .get_meta(req.resume_id)
        .await?
        .filter(|r| actor.can_access(r.owner_id))
        .ok_or_else(|| AppError::NotFound(format!("Resume {} not found", req.resume_id)))?;
    state
        .vacancies
        .get_vacancy(req.vacancy_id)
        .await?
        .filter(|v| actor.can_access(v.owner_id))
        .ok_or_else(|| AppError::NotFound(format!("Vacancy {} not found", req.vacancy_id)))?;

    let analysis = state
        .analysis
        .create_analysis(&actor, resume.id, req.vacancy_id)
        .await?;
    Ok((StatusCode::CREATED, Json(analysis)))
}

/// GET /api/v1/analyses/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(actor): Query<Actor>,
) -> Result<Json<Analysis>, AppError> {
    let not_found = || AppError::NotFound(format!("Analysis {id} not found"));

    let analysis = state.analyses.get(id).await?.ok_or_else(not_found)?;
    if !actor.is_admin {
        let owner = state
            .resumes
            .get_meta(analysis.resume_id)
            .await?
            .and_then(|r| r.owner_id);
        if !actor.can_access(owner) {
            return Err(not_found());
        }
    }
    Ok(Json(analysis))
}

/// GET /api/v1/vacancies/:id/analyses
pub async fn handle_list_vacancy_analyses(
    State(state): State<AppState>,
    Path(vacancy_id): Path<Uuid>,
    Query(actor): Query<Actor>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Analysis>>, AppError> {
    state
        .vacancies
        .get_vacancy(vacancy_id)
        .await?
        .filter(|v| actor.can_access(v.owner_id))
        .ok_or_else(|| AppError::NotFound(format!("Vacancy {vacancy_id} not found")))?;

    let limit = page.limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
    let offset = page.offset.unwrap_or(0).max(0);
    let analyses = state
        .analyses
        .list_by_vacancy(vacancy_id, limit, offset)
        .await?;
    Ok(Json(analyses))
}
