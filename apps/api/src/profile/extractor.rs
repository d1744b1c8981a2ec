//! Profile Extractor — turns raw resume text into a stored `ProfileRecord`.
//!
//! Flow: upsert pending → validate text → truncate → LLM extract →
//!       lenient JSON decode → upsert ok | failed.
//!
//! Extraction failures never surface as `Err`; they become a `failed` record
//! with a message. Only store failures propagate.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::json::parse_lenient;
use crate::llm_client::prompts::{render, EMPTY_ARRAYS_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::TextGenerator;
use crate::profile::locks::ProfileLocks;
use crate::profile::models::{ProfileRecord, ResumeProfile};
use crate::profile::prompts::{PROFILE_EXTRACT_PROMPT_TEMPLATE, PROFILE_EXTRACT_ROLE};
use crate::resume::ResumeStore;

/// Resume text beyond this many characters is not sent to the LLM.
pub const MAX_RESUME_CHARS: usize = 12_000;

pub const ERR_EMPTY_TEXT: &str = "empty resume text";
pub const ERR_NOT_CONFIGURED: &str = "extraction service not configured";
pub const ERR_UNUSABLE_RESPONSE: &str = "could not extract a usable profile from the service response";

#[derive(Clone)]
pub struct ProfileExtractor {
    resumes: Arc<dyn ResumeStore>,
    llm: Option<Arc<dyn TextGenerator>>,
    locks: Arc<ProfileLocks>,
}

impl ProfileExtractor {
    pub fn new(
        resumes: Arc<dyn ResumeStore>,
        llm: Option<Arc<dyn TextGenerator>>,
        locks: Arc<ProfileLocks>,
    ) -> Self {
        Self {
            resumes,
            llm,
            locks,
        }
    }

    /// Rebuilds and persists the profile for `resume_id`, overwriting any prior record.
    ///
    /// Serialized per resume id: a concurrent call for the same resume waits
    /// for this one to reach a terminal state.
    pub async fn build_and_save(
        &self,
        resume_id: Uuid,
        resume_text: &str,
    ) -> Result<ProfileRecord, AppError> {
        let _guard = self.locks.acquire(resume_id).await;
        self.run(resume_id, resume_text).await
    }

    /// Rebuilds from the resume's stored parsed text.
    pub async fn rebuild_from_parsed(&self, resume_id: Uuid) -> Result<ProfileRecord, AppError> {
        let text = self
            .resumes
            .get_parsed_text(resume_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Parsed text for resume {resume_id} not found")))?;
        self.build_and_save(resume_id, &text).await
    }

    async fn run(&self, resume_id: Uuid, resume_text: &str) -> Result<ProfileRecord, AppError> {
        let model_name = self.llm.as_ref().map(|l| l.model_name()).unwrap_or_default();
        let mut record = ProfileRecord::pending(resume_id, model_name);
        self.resumes.upsert_profile(&record).await?;

        let text = resume_text.trim();
        if text.is_empty() {
            return self.finish_failed(record, ERR_EMPTY_TEXT).await;
        }
        let text = truncate_chars(text, MAX_RESUME_CHARS);

        let Some(llm) = &self.llm else {
            return self.finish_failed(record, ERR_NOT_CONFIGURED).await;
        };

        let system = format!("{PROFILE_EXTRACT_ROLE} {JSON_ONLY_SYSTEM} {EMPTY_ARRAYS_INSTRUCTION}");
        let prompt = render(PROFILE_EXTRACT_PROMPT_TEMPLATE, &[("resume_text", text)]);

        let raw = match llm.ask(&system, &prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Profile extraction call failed for resume {resume_id}: {e}");
                return self.finish_failed(record, e.to_string()).await;
            }
        };

        let profile = match parse_lenient::<ResumeProfile>(&raw) {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Unparseable profile response for resume {resume_id}: {e}");
                ResumeProfile::default()
            }
        };

        if profile.is_empty() {
            return self.finish_failed(record, ERR_UNUSABLE_RESPONSE).await;
        }

        info!(
            "Extracted profile for resume {resume_id}: {} skills, {} experience, {} education",
            profile.skills.len(),
            profile.experience.len(),
            profile.education.len()
        );
        record.succeed(profile);
        self.resumes.upsert_profile(&record).await?;
        Ok(record)
    }

    async fn finish_failed(
        &self,
        mut record: ProfileRecord,
        message: impl Into<String>,
    ) -> Result<ProfileRecord, AppError> {
        record.fail(message);
        info!(
            "Profile for resume {} failed: {}",
            record.resume_id, record.error_message
        );
        self.resumes.upsert_profile(&record).await?;
        Ok(record)
    }
}

/// First `max` characters of `text`, never splitting a UTF-8 sequence.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
