mod analysis;
mod config;
mod db;
mod errors;
mod llm_client;
mod matching;
mod models;
mod nlp;
mod profile;
mod resume;
mod routes;
mod state;
mod vacancy;

#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::PgAnalysisStore;
use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::llm_client::{OpenRouterClient, TextGenerator};
use crate::resume::PgResumeStore;
use crate::routes::build_router;
use crate::state::AppState;
use crate::vacancy::PgVacancyStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting screener v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    ensure_schema(&db).await?;

    // Initialize text-generation client (optional)
    let llm: Option<Arc<dyn TextGenerator>> = match OpenRouterClient::from_config(&config)? {
        Some(client) => {
            info!("LLM client initialized (model: {})", client.model_name());
            Some(Arc::new(client))
        }
        None => {
            warn!("OPENROUTER_API_KEY not set; profile extraction and enrichment are disabled");
            None
        }
    };

    // Build app state
    let state = AppState::new(
        Arc::new(PgResumeStore::new(db.clone())),
        Arc::new(PgVacancyStore::new(db.clone())),
        Arc::new(PgAnalysisStore::new(db)),
        llm,
    );

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
