// LLM prompt constants for analysis enrichment.

/// Role line for enrichment; the JSON-only fragment is appended.
pub const ENRICHMENT_ROLE: &str = "You are an HR analyst assessing how well a candidate fits a vacancy. \
    The skill match has already been computed; explain it, do not recompute it.";

/// Enrichment prompt template.
/// Replace: {vacancy_title}, {vacancy_description}, {profile_summary}, {profile_skills},
///          {experience_count}, {education_count}, {matched_skills}, {missing_skills}
pub const ENRICHMENT_PROMPT_TEMPLATE: &str = r#"VACANCY
Title: {vacancy_title}
Description: {vacancy_description}

CANDIDATE PROFILE
Summary: {profile_summary}
Skills: {profile_skills}
Experience entries: {experience_count}
Education entries: {education_count}

SKILL MATCH
Matched skills: {matched_skills}
Missing skills: {missing_skills}

Return a JSON object with these fields:
{
  "candidate_summary": "2-3 sentence summary of the candidate for this vacancy",
  "unique_strengths": ["strengths beyond the required skills"],
  "hr_recommendation": "one paragraph recommendation for the recruiter",
  "candidate_recommendations": ["concrete steps the candidate could take to close gaps"]
}"#;
