//! Analysis Orchestrator — the entry point for scoring a resume against a vacancy.
//!
//! Flow: load vacancy + profile → (bootstrap profile if absent) → require ok →
//!       match_skills → baseline report → LLM enrichment (best-effort) → persist.
//!
//! The deterministic score never depends on the LLM. Enrichment failures are
//! recorded on the report as a note and never reject the analysis.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::models::{Analysis, AnalysisReport, EnrichmentPayload};
use crate::analysis::prompts::{ENRICHMENT_PROMPT_TEMPLATE, ENRICHMENT_ROLE};
use crate::analysis::store::AnalysisStore;
use crate::errors::AppError;
use crate::llm_client::json::{parse_lenient, JsonRecoveryError};
use crate::llm_client::prompts::{render, JSON_ONLY_SYSTEM};
use crate::llm_client::{LlmError, TextGenerator};
use crate::matching::{match_skills, MatchResult};
use crate::models::actor::Actor;
use crate::profile::extractor::ProfileExtractor;
use crate::profile::models::{ProfileRecord, ProfileStatus, ResumeProfile};
use crate::resume::ResumeStore;
use crate::vacancy::{Vacancy, VacancyStore};

/// Why the narrative could not be attached.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("{0}")]
    Llm(#[from] LlmError),

    #[error("{0}")]
    Parse(#[from] JsonRecoveryError),

    #[error("service returned an empty narrative")]
    Empty,
}

#[derive(Clone)]
pub struct AnalysisService {
    resumes: Arc<dyn ResumeStore>,
    vacancies: Arc<dyn VacancyStore>,
    analyses: Arc<dyn AnalysisStore>,
    extractor: ProfileExtractor,
    llm: Option<Arc<dyn TextGenerator>>,
}

impl AnalysisService {
    pub fn new(
        resumes: Arc<dyn ResumeStore>,
        vacancies: Arc<dyn VacancyStore>,
        analyses: Arc<dyn AnalysisStore>,
        extractor: ProfileExtractor,
        llm: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        Self {
            resumes,
            vacancies,
            analyses,
            extractor,
            llm,
        }
    }

    /// Scores `resume_id` against `vacancy_id` and persists the result.
    ///
    /// The caller must already have authorized `actor` for both resources.
    /// Fails with `ProfileNotReady` when the profile is pending or failed.
    pub async fn create_analysis(
        &self,
        actor: &Actor,
        resume_id: Uuid,
        vacancy_id: Uuid,
    ) -> Result<Analysis, AppError> {
        // Step 1: Load vacancy and stored profile
        let vacancy = self
            .vacancies
            .get_vacancy(vacancy_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vacancy {vacancy_id} not found")))?;

        // Step 2: Bootstrap a profile for resumes that never had one built
        let record = match self.resumes.get_profile(resume_id).await? {
            Some(record) => record,
            None => {
                info!("No profile for resume {resume_id}; building from parsed text");
                self.extractor.rebuild_from_parsed(resume_id).await?
            }
        };

        // Step 3: Only a usable profile can be matched
        if record.status != ProfileStatus::Ok {
            return Err(AppError::ProfileNotReady(record.status));
        }
        let ProfileRecord { profile, .. } = record;

        // Step 4: Deterministic match
        let result = match_skills(&vacancy.requirements, &profile);
        info!(
            "Resume {resume_id} vs vacancy {vacancy_id}: score {:.3} ({} matched, {} missing) for actor {}",
            result.score,
            result.matched_skills.len(),
            result.missing_skills.len(),
            actor.id
        );

        // Step 5: Baseline report
        let mut report = AnalysisReport {
            candidate_summary: profile.summary.clone(),
            matched_skills: result.matched_skills.clone(),
            missing_skills: result.missing_skills.clone(),
            ..Default::default()
        };

        // Step 6: Best-effort narrative
        let mut model_name = String::new();
        if let Some(llm) = &self.llm {
            match enrich(llm.as_ref(), &vacancy, &profile, &result).await {
                Ok(payload) => {
                    payload.overlay(&mut report);
                    model_name = llm.model_name().to_string();
                }
                Err(e) => {
                    warn!("Enrichment failed for resume {resume_id} vs vacancy {vacancy_id}: {e}");
                    report.hr_recommendation = format!("Narrative enrichment unavailable: {e}");
                }
            }
        }

        // Step 7: Persist
        let analysis = Analysis {
            id: Uuid::new_v4(),
            resume_id,
            vacancy_id,
            score: result.score,
            model_name,
            report,
            created_at: Utc::now(),
        };
        self.analyses.create(analysis).await
    }
}

/// One enrichment call, decoded with the same lenient parser as extraction.
async fn enrich(
    llm: &dyn TextGenerator,
    vacancy: &Vacancy,
    profile: &ResumeProfile,
    result: &MatchResult,
) -> Result<EnrichmentPayload, EnrichmentError> {
    let system = format!("{ENRICHMENT_ROLE} {JSON_ONLY_SYSTEM}");
    let prompt = build_enrichment_prompt(vacancy, profile, result);

    let raw = llm.ask(&system, &prompt).await?;
    let payload: EnrichmentPayload = parse_lenient(&raw)?;
    if payload.is_empty() {
        return Err(EnrichmentError::Empty);
    }
    Ok(payload)
}

fn build_enrichment_prompt(vacancy: &Vacancy, profile: &ResumeProfile, result: &MatchResult) -> String {
    let skills = profile.skills.join(", ");
    let experience_count = profile.experience.len().to_string();
    let education_count = profile.education.len().to_string();
    let matched = join_or_none(&result.matched_skills);
    let missing = join_or_none(&result.missing_skills);

    render(
        ENRICHMENT_PROMPT_TEMPLATE,
        &[
            ("vacancy_title", vacancy.title.as_str()),
            ("vacancy_description", vacancy.description.as_str()),
            ("profile_summary", profile.summary.as_str()),
            ("profile_skills", skills.as_str()),
            ("experience_count", experience_count.as_str()),
            ("education_count", education_count.as_str()),
            ("matched_skills", matched.as_str()),
            ("missing_skills", missing.as_str()),
        ],
    )
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::locks::ProfileLocks;
    use crate::testing::{MemoryAnalysisStore, MemoryResumeStore, MemoryVacancyStore, StubGenerator};
    use crate::vacancy::SkillRequirement;

    const PROFILE_JSON: &str = r#"{
        "summary": "Backend engineer, mostly Go",
        "skills": ["Golang", "PostgreSQL"],
        "experience": [{"company": "Acme", "role": "Engineer", "start": "2020", "end": "present", "description": "Payments"}],
        "education": []
    }"#;

    const NARRATIVE_JSON: &str = r#"{
        "candidate_summary": "Strong Go backend engineer",
        "unique_strengths": ["Payments domain"],
        "hr_recommendation": "Proceed to technical interview",
        "candidate_recommendations": ["Get hands-on with Kubernetes"]
    }"#;

    struct Fixture {
        resumes: Arc<MemoryResumeStore>,
        vacancies: Arc<MemoryVacancyStore>,
        analyses: Arc<MemoryAnalysisStore>,
        resume_id: Uuid,
        vacancy_id: Uuid,
        actor: Actor,
    }

    impl Fixture {
        fn new() -> Self {
            let owner = Uuid::new_v4();
            let vacancies = Arc::new(MemoryVacancyStore::default());
            let vacancy_id = Uuid::new_v4();
            vacancies.insert(Vacancy {
                id: vacancy_id,
                owner_id: Some(owner),
                title: "Backend Engineer".to_string(),
                description: "Go services on Kubernetes".to_string(),
                requirements: vec![
                    SkillRequirement::new("Go", 0.5),
                    SkillRequirement::new("Kubernetes", 0.5),
                ],
            });
            Self {
                resumes: Arc::new(MemoryResumeStore::default()),
                vacancies,
                analyses: Arc::new(MemoryAnalysisStore::default()),
                resume_id: Uuid::new_v4(),
                vacancy_id,
                actor: Actor {
                    id: owner,
                    is_admin: false,
                },
            }
        }

        fn service(&self, llm: Option<StubGenerator>) -> AnalysisService {
            let llm = llm.map(|l| Arc::new(l) as Arc<dyn TextGenerator>);
            let extractor = ProfileExtractor::new(
                self.resumes.clone(),
                llm.clone(),
                Arc::new(ProfileLocks::new()),
            );
            AnalysisService::new(
                self.resumes.clone(),
                self.vacancies.clone(),
                self.analyses.clone(),
                extractor,
                llm,
            )
        }

        async fn seed_ok_profile(&self) {
            let mut record = ProfileRecord::pending(self.resume_id, "stub-model");
            record.succeed(serde_json::from_str(PROFILE_JSON).unwrap());
            self.resumes.upsert_profile(&record).await.unwrap();
        }

        async fn create(&self, svc: &AnalysisService) -> Result<Analysis, AppError> {
            svc.create_analysis(&self.actor, self.resume_id, self.vacancy_id)
                .await
        }
    }

    #[tokio::test]
    async fn test_enriched_analysis_overlays_narrative() {
        let fx = Fixture::new();
        fx.seed_ok_profile().await;

        let analysis = fx
            .create(&fx.service(Some(StubGenerator::replying(NARRATIVE_JSON))))
            .await
            .unwrap();

        assert!((analysis.score - 0.5).abs() < 1e-9);
        assert_eq!(analysis.report.matched_skills, vec!["Go"]);
        assert_eq!(analysis.report.missing_skills, vec!["Kubernetes"]);
        assert_eq!(analysis.report.candidate_summary, "Strong Go backend engineer");
        assert_eq!(analysis.report.hr_recommendation, "Proceed to technical interview");
        assert_eq!(analysis.model_name, "stub-model");
        assert_eq!(fx.analyses.all(), vec![analysis]);
    }

    #[tokio::test]
    async fn test_enrichment_error_degrades_to_note() {
        let fx = Fixture::new();
        fx.seed_ok_profile().await;

        let analysis = fx
            .create(&fx.service(Some(StubGenerator::failing(502, "bad gateway"))))
            .await
            .unwrap();

        assert!((analysis.score - 0.5).abs() < 1e-9);
        assert_eq!(analysis.report.matched_skills, vec!["Go"]);
        assert_eq!(analysis.report.missing_skills, vec!["Kubernetes"]);
        assert_eq!(analysis.report.candidate_summary, "Backend engineer, mostly Go");
        assert!(analysis.report.hr_recommendation.contains("enrichment unavailable"));
        assert!(analysis.report.hr_recommendation.contains("bad gateway"));
        assert!(analysis.model_name.is_empty());
        assert_eq!(fx.analyses.all().len(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_enrichment_degrades_to_note() {
        let fx = Fixture::new();
        fx.seed_ok_profile().await;

        let analysis = fx
            .create(&fx.service(Some(StubGenerator::replying("Great candidate, hire them."))))
            .await
            .unwrap();

        assert!(!analysis.report.hr_recommendation.is_empty());
        assert!(analysis.report.hr_recommendation.contains("no JSON object"));
        assert_eq!(analysis.report.matched_skills, vec!["Go"]);
    }

    #[tokio::test]
    async fn test_without_llm_report_is_deterministic_only() {
        let fx = Fixture::new();
        fx.seed_ok_profile().await;

        let analysis = fx.create(&fx.service(None)).await.unwrap();

        assert_eq!(analysis.report.candidate_summary, "Backend engineer, mostly Go");
        assert!(analysis.report.hr_recommendation.is_empty());
        assert!(analysis.model_name.is_empty());
    }

    #[tokio::test]
    async fn test_missing_profile_is_bootstrapped_from_parsed_text() {
        let fx = Fixture::new();
        fx.resumes.insert_parsed(fx.resume_id, "Go developer at Acme");
        let stub = StubGenerator::sequence(&[PROFILE_JSON, NARRATIVE_JSON]);

        let analysis = fx.create(&fx.service(Some(stub))).await.unwrap();

        assert_eq!(analysis.report.matched_skills, vec!["Go"]);
        assert_eq!(
            fx.resumes.profile(fx.resume_id).unwrap().status,
            ProfileStatus::Ok
        );
    }

    #[tokio::test]
    async fn test_missing_profile_and_parsed_text_is_not_found() {
        let fx = Fixture::new();
        let err = fx.create(&fx.service(None)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(fx.analyses.all().is_empty());
    }

    #[tokio::test]
    async fn test_failed_profile_is_not_ready() {
        let fx = Fixture::new();
        let mut record = ProfileRecord::pending(fx.resume_id, "");
        record.fail("empty resume text");
        fx.resumes.upsert_profile(&record).await.unwrap();

        let err = fx.create(&fx.service(None)).await.unwrap_err();
        assert!(matches!(err, AppError::ProfileNotReady(ProfileStatus::Failed)));
        assert!(fx.analyses.all().is_empty());
    }

    #[tokio::test]
    async fn test_pending_profile_is_not_ready() {
        let fx = Fixture::new();
        fx.resumes
            .upsert_profile(&ProfileRecord::pending(fx.resume_id, ""))
            .await
            .unwrap();

        let err = fx.create(&fx.service(None)).await.unwrap_err();
        assert!(matches!(err, AppError::ProfileNotReady(ProfileStatus::Pending)));
    }

    #[tokio::test]
    async fn test_unknown_vacancy_is_not_found() {
        let fx = Fixture::new();
        fx.seed_ok_profile().await;
        let err = fx
            .service(None)
            .create_analysis(&fx.actor, fx.resume_id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_enrichment_prompt_leaves_placeholders_in_values_alone() {
        let vacancy = Vacancy {
            id: Uuid::new_v4(),
            owner_id: None,
            title: "Lead {missing_skills}".to_string(),
            description: String::new(),
            requirements: vec![],
        };
        let profile = ResumeProfile {
            summary: "Writes {vacancy_title} daily".to_string(),
            ..Default::default()
        };
        let result = MatchResult {
            matched_skills: vec![],
            missing_skills: vec!["Rust".to_string()],
            score: 0.0,
        };
        let prompt = build_enrichment_prompt(&vacancy, &profile, &result);
        assert!(prompt.contains("Title: Lead {missing_skills}"));
        assert!(prompt.contains("Summary: Writes {vacancy_title} daily"));
        assert!(prompt.contains("Missing skills: Rust"));
    }

    #[test]
    fn test_enrichment_prompt_carries_match_context() {
        let vacancy = Vacancy {
            id: Uuid::new_v4(),
            owner_id: None,
            title: "Platform Engineer".to_string(),
            description: "Own our clusters".to_string(),
            requirements: vec![],
        };
        let profile: ResumeProfile = serde_json::from_str(PROFILE_JSON).unwrap();
        let result = MatchResult {
            matched_skills: vec!["Go".to_string()],
            missing_skills: vec![],
            score: 1.0,
        };
        let prompt = build_enrichment_prompt(&vacancy, &profile, &result);
        assert!(prompt.contains("Title: Platform Engineer"));
        assert!(prompt.contains("Skills: Golang, PostgreSQL"));
        assert!(prompt.contains("Experience entries: 1"));
        assert!(prompt.contains("Education entries: 0"));
        assert!(prompt.contains("Matched skills: Go"));
        assert!(prompt.contains("Missing skills: none"));
    }
}
