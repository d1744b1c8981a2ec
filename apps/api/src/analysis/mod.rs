// Resume-vs-vacancy analysis: deterministic skill match plus best-effort LLM narrative.

pub mod handlers;
pub mod models;
pub mod prompts;
pub mod service;
pub mod store;

pub use models::Analysis;
pub use service::AnalysisService;
pub use store::{AnalysisStore, PgAnalysisStore};
