//! Generation adapter — the single point of entry for all model API calls.
//!
//! The batch runner only ever sees the `TextGenerator` trait, so tests swap
//! in a stub without touching environment variables or the network. The one
//! real implementation wraps the OpenAI Responses API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/responses";
/// Generation parameters shared by every call in the harness.
/// Hardcoded so baseline and tuned runs differ only in the model id.
const MAX_OUTPUT_TOKENS: u32 = 600;
const TEMPERATURE: f32 = 0.1;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model returned no output text")]
    EmptyOutput,
}

/// Text generation seam between the batch runner and the hosted model API.
/// Each call is a single blocking-style request; the runner awaits them
/// strictly in sequence. Implementations must not retry internally — the
/// failure policy (placeholder output, continue) lives in the runner.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ResponsesBody {
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    item_type: String,
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

impl ResponsesBody {
    /// Concatenated text of all output_text blocks in the first message item.
    fn text(&self) -> Option<String> {
        let message = self.output.iter().find(|i| i.item_type == "message")?;
        let text: String = message
            .content
            .iter()
            .filter(|b| b.block_type == "output_text")
            .filter_map(|b| b.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Real adapter against the OpenAI Responses API.
/// The API key is injected at construction; the client holds no other state.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, LlmError> {
        let request_body = ResponsesRequest {
            model,
            input: prompt,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ResponsesBody = response.json().await?;
        let text = body.text().ok_or(LlmError::EmptyOutput)?;
        debug!("Generation succeeded: model={model}, chars={}", text.len());
        Ok(text)
    }
}
