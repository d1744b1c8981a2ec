// LLM prompt constants for resume profile extraction.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Role line for profile extraction; the JSON-only and empty-array fragments are appended.
pub const PROFILE_EXTRACT_ROLE: &str = "You are an HR analyst extracting structured facts from a resume.";

/// Profile extraction prompt template. Replace `{resume_text}` before sending.
pub const PROFILE_EXTRACT_PROMPT_TEMPLATE: &str = r#"Resume text:
<<<
{resume_text}
>>>

Return EXACTLY one JSON object with this schema:
{
  "summary": string,
  "skills": string[],
  "experience": [{"company": string, "role": string, "start": string, "end": string, "description": string}],
  "education": [{"institution": string, "degree": string, "start": string, "end": string}]
}

Rules:
- No additional fields
- No markdown
- If a list is empty, return []"#;
