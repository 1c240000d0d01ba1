/// LLM-backed content generator — the single point of contact with the
/// hosted model API.
///
/// Transport notes: calls are synchronous from the pipeline's point of view
/// and are made exactly once — a failed call degrades to the original text
/// upstream instead of retrying. The model is hardcoded to prevent drift.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sections::SectionName;

use super::{prompts, ContentGenerator, GenerationError, LengthDirection};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
/// The model used for all generation calls.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 2048;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl MessagesResponse {
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
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

/// HTTP client for the messages API.
#[derive(Clone)]
pub struct LlmGenerator {
    client: Client,
    api_key: String,
}

impl LlmGenerator {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            api_key,
        }
    }

    /// Reads `ANTHROPIC_API_KEY` from the environment (a `.env` file is
    /// honored if present).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| anyhow::anyhow!("ANTHROPIC_API_KEY is not set"))?;
        Ok(Self::new(api_key))
    }

    /// Single-shot call. Non-2xx responses surface as `Api` errors with the
    /// server's message when parseable.
    async fn call(&self, prompt: &str, system: &str) -> Result<String, GenerationError> {
        let request_body = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
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
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessagesResponse = response.json().await?;

        debug!(
            "generation call succeeded: input_tokens={}, output_tokens={}",
            parsed.usage.input_tokens, parsed.usage.output_tokens
        );

        let text = parsed
            .text()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(GenerationError::EmptyContent)?;

        Ok(text)
    }
}

#[async_trait]
impl ContentGenerator for LlmGenerator {
    async fn generate(
        &self,
        original: &str,
        job_description: &str,
        section: SectionName,
    ) -> Result<String, GenerationError> {
        let prompt = prompts::customization_prompt(original, job_description, section);
        self.call(&prompt, prompts::SYSTEM).await
    }

    async fn refine_length(
        &self,
        draft: &str,
        target_chars: usize,
        direction: LengthDirection,
    ) -> Result<String, GenerationError> {
        let prompt = prompts::length_adjustment_prompt(draft, target_chars, direction);
        self.call(&prompt, prompts::SYSTEM).await
    }
}
