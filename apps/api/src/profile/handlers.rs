use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::actor::Actor;
use crate::profile::models::ProfileRecord;
use crate::state::AppState;

async fn authorize_resume(state: &AppState, actor: &Actor, resume_id: Uuid) -> Result<(), AppError> {
    state
        .resumes
        .get_meta(resume_id)
        .await?
        .filter(|r| actor.can_access(r.owner_id))
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))
}

/// GET /api/v1/resumes/:id/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(actor): Query<Actor>,
) -> Result<Json<ProfileRecord>, AppError> {
    authorize_resume(&state, &actor, resume_id).await?;
    let record = state
        .resumes
        .get_profile(resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for resume {resume_id} not found")))?;
    Ok(Json(record))
}

/// POST /api/v1/resumes/:id/profile/rebuild
///
/// Always answers with the resulting record; a `failed` status is a normal outcome.
pub async fn handle_rebuild_profile(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(actor): Json<Actor>,
) -> Result<Json<ProfileRecord>, AppError> {
    authorize_resume(&state, &actor, resume_id).await?;
    let record = state.extractor.rebuild_from_parsed(resume_id).await?;
    Ok(Json(record))
}
