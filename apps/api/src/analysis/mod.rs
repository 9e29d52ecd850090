// CV analysis: prompt construction, result reconciliation, request orchestration.
// All model calls go through llm_client; no direct Gemini calls here.

pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod reconcile;
