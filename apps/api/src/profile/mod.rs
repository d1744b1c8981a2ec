// Resume profile extraction: raw resume text → structured profile via the LLM,
// tracked as a pending → ok | failed record per resume.

pub mod extractor;
pub mod handlers;
pub mod locks;
pub mod models;
pub mod prompts;
