use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::llm_client::json::null_as_default;

/// Narrative + deterministic findings for one resume/vacancy pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisReport {
    pub candidate_summary: String,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub unique_strengths: Vec<String>,
    pub hr_recommendation: String,
    pub candidate_recommendations: Vec<String>,
}

/// A persisted analysis. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub vacancy_id: Uuid,
    pub score: f64,
    /// Model that wrote the narrative; empty when enrichment did not run or failed.
    pub model_name: String,
    pub report: AnalysisReport,
    pub created_at: DateTime<Utc>,
}

/// The narrative fields the LLM is asked for. Camel-case aliases are accepted
/// because models sometimes echo field names in that style.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnrichmentPayload {
    #[serde(alias = "candidateSummary", deserialize_with = "null_as_default")]
    pub candidate_summary: String,
    #[serde(alias = "uniqueStrengths", deserialize_with = "null_as_default")]
    pub unique_strengths: Vec<String>,
    #[serde(
        alias = "hrRecommendation",
        alias = "aiRecommendationForHR",
        deserialize_with = "null_as_default"
    )]
    pub hr_recommendation: String,
    #[serde(
        alias = "candidateRecommendations",
        alias = "aiRecommendationForCandidate",
        deserialize_with = "null_as_default"
    )]
    pub candidate_recommendations: Vec<String>,
}

impl EnrichmentPayload {
    pub fn is_empty(&self) -> bool {
        self.candidate_summary.trim().is_empty()
            && self.hr_recommendation.trim().is_empty()
            && self.unique_strengths.is_empty()
            && self.candidate_recommendations.is_empty()
    }

    /// Writes the narrative onto `report`. The summary is only replaced when
    /// the model produced one.
    pub fn overlay(self, report: &mut AnalysisReport) {
        if !self.candidate_summary.trim().is_empty() {
            report.candidate_summary = self.candidate_summary;
        }
        report.unique_strengths = self.unique_strengths;
        report.hr_recommendation = self.hr_recommendation;
        report.candidate_recommendations = self.candidate_recommendations;
    }
}
