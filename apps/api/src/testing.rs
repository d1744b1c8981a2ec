// In-memory stores and a scripted text generator shared by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::analysis::{Analysis, AnalysisStore};
use crate::errors::AppError;
use crate::llm_client::{LlmError, TextGenerator};
use crate::profile::models::{ProfileRecord, ProfileStatus};
use crate::resume::{ResumeMeta, ResumeStore};
use crate::vacancy::{SkillRequirement, Vacancy, VacancyStore};

// ─── Text generator ──────────────────────────────────────────────────────────

#[derive(Clone)]
enum Reply {
    Text(String),
    Error { status: u16, message: String },
    Hang,
}

/// Answers `ask` from a script. The last reply repeats once the script runs out.
pub struct StubGenerator {
    replies: Mutex<VecDeque<Reply>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl StubGenerator {
    fn scripted(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::scripted(vec![Reply::Text(text.to_string())])
    }

    pub fn sequence(texts: &[&str]) -> Self {
        Self::scripted(texts.iter().map(|t| Reply::Text(t.to_string())).collect())
    }

    pub fn failing(status: u16, message: &str) -> Self {
        Self::scripted(vec![Reply::Error {
            status,
            message: message.to_string(),
        }])
    }

    /// Never answers; for exercising cancellation.
    pub fn hanging() -> Self {
        Self::scripted(vec![Reply::Hang])
    }

    /// User prompts received so far, in call order.
    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        self.prompts.clone()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    fn model_name(&self) -> &str {
        "stub-model"
    }

    async fn ask(&self, _system: &str, user: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(user.to_string());
        // Lets concurrent callers interleave here, as a real network call would.
        tokio::task::yield_now().await;
        let reply = {
            let mut replies = self.replies.lock().unwrap();
            if replies.len() > 1 {
                replies.pop_front()
            } else {
                replies.front().cloned()
            }
        };
        match reply {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Error { status, message }) => Err(LlmError::Api { status, message }),
            Some(Reply::Hang) => std::future::pending().await,
            None => Err(LlmError::EmptyContent),
        }
    }
}

// ─── Resume store ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryResumeStore {
    metas: Mutex<HashMap<Uuid, ResumeMeta>>,
    parsed: Mutex<HashMap<Uuid, String>>,
    profiles: Mutex<HashMap<Uuid, ProfileRecord>>,
    history: Mutex<HashMap<Uuid, Vec<ProfileStatus>>>,
}

impl MemoryResumeStore {
    pub fn insert_meta(&self, resume_id: Uuid, owner_id: Option<Uuid>) {
        self.metas.lock().unwrap().insert(
            resume_id,
            ResumeMeta {
                id: resume_id,
                owner_id,
            },
        );
    }

    pub fn insert_parsed(&self, resume_id: Uuid, text: &str) {
        self.parsed.lock().unwrap().insert(resume_id, text.to_string());
    }

    pub fn profile(&self, resume_id: Uuid) -> Option<ProfileRecord> {
        self.profiles.lock().unwrap().get(&resume_id).cloned()
    }

    /// Every status written for `resume_id`, oldest first.
    pub fn upsert_history(&self, resume_id: Uuid) -> Vec<ProfileStatus> {
        self.history
            .lock()
            .unwrap()
            .get(&resume_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn get_meta(&self, resume_id: Uuid) -> Result<Option<ResumeMeta>, AppError> {
        Ok(self.metas.lock().unwrap().get(&resume_id).cloned())
    }

    async fn get_parsed_text(&self, resume_id: Uuid) -> Result<Option<String>, AppError> {
        Ok(self.parsed.lock().unwrap().get(&resume_id).cloned())
    }

    async fn get_profile(&self, resume_id: Uuid) -> Result<Option<ProfileRecord>, AppError> {
        Ok(self.profile(resume_id))
    }

    async fn upsert_profile(&self, record: &ProfileRecord) -> Result<(), AppError> {
        self.history
            .lock()
            .unwrap()
            .entry(record.resume_id)
            .or_default()
            .push(record.status);
        self.profiles
            .lock()
            .unwrap()
            .insert(record.resume_id, record.clone());
        Ok(())
    }
}

// ─── Vacancy store ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryVacancyStore {
    vacancies: Mutex<HashMap<Uuid, Vacancy>>,
}

impl MemoryVacancyStore {
    pub fn insert(&self, vacancy: Vacancy) {
        self.vacancies.lock().unwrap().insert(vacancy.id, vacancy);
    }
}

#[async_trait]
impl VacancyStore for MemoryVacancyStore {
    async fn get_vacancy(&self, vacancy_id: Uuid) -> Result<Option<Vacancy>, AppError> {
        Ok(self.vacancies.lock().unwrap().get(&vacancy_id).cloned())
    }

    async fn replace_requirements(
        &self,
        vacancy_id: Uuid,
        requirements: &[SkillRequirement],
    ) -> Result<(), AppError> {
        match self.vacancies.lock().unwrap().get_mut(&vacancy_id) {
            Some(vacancy) => {
                vacancy.requirements = requirements.to_vec();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Vacancy {vacancy_id} not found"))),
        }
    }
}

// ─── Analysis store ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryAnalysisStore {
    analyses: Mutex<Vec<Analysis>>,
}

impl MemoryAnalysisStore {
    pub fn all(&self) -> Vec<Analysis> {
        self.analyses.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisStore for MemoryAnalysisStore {
    async fn create(&self, analysis: Analysis) -> Result<Analysis, AppError> {
        self.analyses.lock().unwrap().push(analysis.clone());
        Ok(analysis)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Analysis>, AppError> {
        Ok(self.all().into_iter().find(|a| a.id == id))
    }

    async fn list_by_vacancy(
        &self,
        vacancy_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Analysis>, AppError> {
        let mut matching: Vec<Analysis> = self
            .all()
            .into_iter()
            .filter(|a| a.vacancy_id == vacancy_id)
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }
}
