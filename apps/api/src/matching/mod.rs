// Deterministic candidate-to-vacancy skill matching.
// No I/O and no LLM calls here; the analysis service layers narrative on top.

pub mod skill_match;

pub use skill_match::{match_skills, MatchResult};
