use std::sync::Arc;

use crate::analysis::{AnalysisService, AnalysisStore};
use crate::llm_client::TextGenerator;
use crate::profile::extractor::ProfileExtractor;
use crate::profile::locks::ProfileLocks;
use crate::resume::ResumeStore;
use crate::vacancy::VacancyStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub resumes: Arc<dyn ResumeStore>,
    pub vacancies: Arc<dyn VacancyStore>,
    pub analyses: Arc<dyn AnalysisStore>,
    pub extractor: ProfileExtractor,
    pub analysis: AnalysisService,
}

impl AppState {
    /// Wires the services over the given stores. `llm` is `None` when no
    /// text-generation service is configured.
    pub fn new(
        resumes: Arc<dyn ResumeStore>,
        vacancies: Arc<dyn VacancyStore>,
        analyses: Arc<dyn AnalysisStore>,
        llm: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        let extractor = ProfileExtractor::new(resumes.clone(), llm.clone(), Arc::new(ProfileLocks::new()));
        let analysis = AnalysisService::new(
            resumes.clone(),
            vacancies.clone(),
            analyses.clone(),
            extractor.clone(),
            llm,
        );
        Self {
            resumes,
            vacancies,
            analyses,
            extractor,
            analysis,
        }
    }
}
