//! Skill Match — tiered, weighted comparison of a vacancy's requirements
//! against a structured resume profile.
//!
//! Pure, deterministic and total: every input produces a result.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::nlp::{contains_phrase, normalize, token_variants, tokens, variants};
use crate::profile::models::ResumeProfile;
use crate::vacancy::SkillRequirement;

/// Requirement skill (or one of its aliases) is a listed candidate skill.
pub const TIER_EXACT: f64 = 1.0;
/// Requirement skill appears as a whole phrase in the profile's free text.
pub const TIER_PHRASE: f64 = 0.8;
/// Most tokens of a multi-word requirement appear among candidate skills.
pub const TIER_PARTIAL: f64 = 0.6;
/// Minimum token overlap for `TIER_PARTIAL`.
const PARTIAL_OVERLAP_THRESHOLD: f64 = 0.6;
/// Tier scores at or above this count as matched.
const MATCHED_THRESHOLD: f64 = 0.6;

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Requirement skills as given, in input order.
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    /// Weighted share of requirement credit earned, in `[0, 1]`.
    pub score: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Candidate side, prepared once per match
// ────────────────────────────────────────────────────────────────────────────

struct CandidateIndex {
    /// Every normalized variant of every listed skill.
    skill_variants: HashSet<String>,
    /// Alias-expanded tokens of all skill variants.
    skill_tokens: HashSet<String>,
    /// Normalized summary + experience + education text.
    corpus: String,
}

impl CandidateIndex {
    fn build(profile: &ResumeProfile) -> Self {
        let skill_variants: HashSet<String> =
            profile.skills.iter().flat_map(|s| variants(s)).collect();

        let skill_tokens = skill_variants
            .iter()
            .flat_map(|v| tokens(v).flat_map(token_variants).collect::<Vec<_>>())
            .collect();

        let mut parts: Vec<&str> = vec![profile.summary.as_str()];
        for exp in &profile.experience {
            parts.extend([exp.company.as_str(), exp.role.as_str(), exp.description.as_str()]);
        }
        for edu in &profile.education {
            parts.extend([edu.institution.as_str(), edu.degree.as_str()]);
        }
        let corpus = normalize(&parts.join(" "));

        Self {
            skill_variants,
            skill_tokens,
            corpus,
        }
    }

    fn tier_for(&self, skill: &str) -> f64 {
        let wanted = variants(skill);

        if wanted.iter().any(|v| self.skill_variants.contains(v)) {
            return TIER_EXACT;
        }
        if wanted.iter().any(|v| contains_phrase(&self.corpus, v)) {
            return TIER_PHRASE;
        }
        if tokens(&normalize(skill)).count() >= 2
            && self.best_token_overlap(&wanted) >= PARTIAL_OVERLAP_THRESHOLD
        {
            return TIER_PARTIAL;
        }
        0.0
    }

    /// Best fraction of a multi-word variant's tokens found among candidate skill tokens.
    fn best_token_overlap(&self, wanted: &BTreeSet<String>) -> f64 {
        wanted
            .iter()
            .filter_map(|variant| {
                let parts: Vec<&str> = tokens(variant).collect();
                if parts.len() < 2 {
                    return None;
                }
                let hits = parts
                    .iter()
                    .filter(|t| self.skill_tokens.contains(**t))
                    .count();
                Some(hits as f64 / parts.len() as f64)
            })
            .fold(0.0, f64::max)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Scores `profile` against `requirements`.
///
/// Algorithm, per requirement (blank skills skipped, negative weights → 0):
/// 1. alias/exact hit in candidate skills → 1.0
/// 2. else whole-phrase hit in summary/experience/education text → 0.8
/// 3. else, multi-word skills only: ≥60% token overlap with candidate skills → 0.6
/// 4. else 0.0
///
/// score = Σ(weight × tier) / Σ(weight), or 0 when Σ(weight) is 0.
/// Tier ≥ 0.6 is matched, anything lower is missing.
pub fn match_skills(requirements: &[SkillRequirement], profile: &ResumeProfile) -> MatchResult {
    let candidate = CandidateIndex::build(profile);

    let mut matched_skills = Vec::new();
    let mut missing_skills = Vec::new();
    let mut total_weight = 0.0_f64;
    let mut earned_weight = 0.0_f64;

    for req in requirements {
        if req.skill.trim().is_empty() {
            continue;
        }
        let weight = if req.weight.is_finite() { req.weight.max(0.0) } else { 0.0 };
        total_weight += weight;

        let tier = candidate.tier_for(&req.skill);
        earned_weight += weight * tier;

        if tier >= MATCHED_THRESHOLD {
            matched_skills.push(req.skill.clone());
        } else {
            missing_skills.push(req.skill.clone());
        }
    }

    let score = if total_weight > 0.0 {
        (earned_weight / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    };

    MatchResult {
        matched_skills,
        missing_skills,
        score,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
