pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::profile::handlers as profile;
use crate::state::AppState;
use crate::vacancy::handlers as vacancy;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analyses
        .route("/api/v1/analyses", post(analysis::handle_create_analysis))
        .route("/api/v1/analyses/:id", get(analysis::handle_get_analysis))
        .route(
            "/api/v1/vacancies/:id/analyses",
            get(analysis::handle_list_vacancy_analyses),
        )
        // Vacancy requirements
        .route(
            "/api/v1/vacancies/:id/skills",
            put(vacancy::handle_replace_skills),
        )
        // Resume profiles
        .route(
            "/api/v1/resumes/:id/profile",
            get(profile::handle_get_profile),
        )
        .route(
            "/api/v1/resumes/:id/profile/rebuild",
            post(profile::handle_rebuild_profile),
        )
        .with_state(state)
}
