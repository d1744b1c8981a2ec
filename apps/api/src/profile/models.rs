use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::llm_client::json::{null_as_default, string_or_number};

/// Structured view of a resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeProfile {
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: Vec<ExperienceItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<EducationItem>,
}

impl ResumeProfile {
    /// Blank summary and no skills, experience, or education.
    pub fn is_empty(&self) -> bool {
        self.summary.trim().is_empty()
            && self.skills.is_empty()
            && self.experience.is_empty()
            && self.education.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceItem {
    #[serde(deserialize_with = "string_or_number")]
    pub company: String,
    #[serde(deserialize_with = "string_or_number")]
    pub role: String,
    /// `YYYY-MM` or free text
    #[serde(deserialize_with = "string_or_number")]
    pub start: String,
    /// `YYYY-MM` or "present"
    #[serde(deserialize_with = "string_or_number")]
    pub end: String,
    #[serde(deserialize_with = "string_or_number")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationItem {
    #[serde(deserialize_with = "string_or_number")]
    pub institution: String,
    #[serde(deserialize_with = "string_or_number")]
    pub degree: String,
    #[serde(deserialize_with = "string_or_number")]
    pub start: String,
    #[serde(deserialize_with = "string_or_number")]
    pub end: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    Pending,
    Ok,
    Failed,
}

impl ProfileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileStatus::Pending => "pending",
            ProfileStatus::Ok => "ok",
            ProfileStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ProfileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ProfileStatus::Pending),
            "ok" => Ok(ProfileStatus::Ok),
            "failed" => Ok(ProfileStatus::Failed),
            other => Err(anyhow::anyhow!("unknown profile status '{other}'")),
        }
    }
}

/// The stored extraction outcome for one resume. At most one per resume id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub resume_id: Uuid,
    pub status: ProfileStatus,
    pub model_name: String,
    pub error_message: String,
    pub profile: ResumeProfile,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    pub fn pending(resume_id: Uuid, model_name: &str) -> Self {
        Self {
            resume_id,
            status: ProfileStatus::Pending,
            model_name: model_name.to_string(),
            error_message: String::new(),
            profile: ResumeProfile::default(),
            updated_at: Utc::now(),
        }
    }

    /// Terminal failure: clears the profile and records why.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = ProfileStatus::Failed;
        self.error_message = message.into();
        self.profile = ResumeProfile::default();
        self.updated_at = Utc::now();
    }

    pub fn succeed(&mut self, profile: ResumeProfile) {
        self.status = ProfileStatus::Ok;
        self.error_message.clear();
        self.profile = profile;
        self.updated_at = Utc::now();
    }
}
