//! Model Gateway — the single point of entry for all generative-language calls.
//!
//! No other module may call the Gemini API directly. The gateway is a *blocking*
//! interface: callers on the async side must go through [`generate_off_thread`],
//! which dispatches onto Tokio's bounded blocking pool so one slow upstream call
//! never occupies an executor thread.
//!
//! Single attempt per request: no retries, no caching.

use std::sync::Arc;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("AI service returned no response text")]
    EmptyContent,
}

/// Blocking model invocation. Implementations are shared across requests and
/// must not hold per-request state.
pub trait ModelGateway: Send + Sync {
    /// Declared model identifier, echoed back to API callers.
    fn model(&self) -> &str;

    fn generate(&self, prompt: &str) -> Result<String, GatewayError>;
}

/// Runs `gateway.generate` on the blocking pool and suspends the calling task until
/// it finishes. Blank output is treated as a gateway failure regardless of backend.
///
/// The outer `Err` is a worker failure (panic or runtime shutdown), not an upstream one.
pub async fn generate_off_thread(
    gateway: Arc<dyn ModelGateway>,
    prompt: String,
) -> Result<Result<String, GatewayError>, tokio::task::JoinError> {
    tokio::task::spawn_blocking(move || -> Result<String, GatewayError> {
        let text = gateway.generate(&prompt)?;
        if text.trim().is_empty() {
            return Err(GatewayError::EmptyContent);
        }
        Ok(text)
    })
    .await
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    pub prompt_token_count: u32,
    #[serde(rename = "candidatesTokenCount", default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if it has any.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Gemini `generateContent` over a blocking HTTP client.
///
/// The client must be built outside the async runtime (see `main`) and only used
/// from blocking worker threads.
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, api_base: &str) -> Result<Self, GatewayError> {
        let endpoint = format!(
            "{}/models/{}:generateContent",
            api_base.trim_end_matches('/'),
            model
        );
        Ok(Self {
            // No internal timeout; the deployment's request timeout bounds the call.
            client: Client::builder()
                .timeout(None::<std::time::Duration>)
                .build()?,
            endpoint,
            api_key,
            model,
        })
    }
}

impl ModelGateway for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Gemini call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        parsed.text().ok_or_else(|| {
            let reason = parsed
                .candidates
                .first()
                .and_then(|c| c.finish_reason.as_deref())
                .unwrap_or("none");
            warn!("Gemini returned no text (finish_reason={reason})");
            GatewayError::EmptyContent
        })
    }
}
