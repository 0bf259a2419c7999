//! Anthropic Messages API client
//!
//! One request per analyzed reading, no retries, no caching. Transport
//! failures and non-2xx statuses are errors; a malformed reply *body* is not,
//! it degrades in the parser instead.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::parser::parse_reply;
use super::prompt::PromptVersion;
use super::types::ReadingAnalysis;
use crate::config::AnalysisConfig;

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("request to model API failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model API returned {status}: {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("model reply contained no text content")]
    EmptyReply,
}

/// Anything that can turn extracted text into a structured analysis.
///
/// The HTTP layer depends on this trait rather than on the concrete client,
/// so tests can swap in a stub and the upload path never needs a network.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<ReadingAnalysis, AnalysisError>;
}

/// Production analyzer backed by the Anthropic Messages API
pub struct AnthropicClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    prompt: PromptVersion,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl AnthropicClient {
    pub fn new(config: &AnalysisConfig) -> Self {
        AnthropicClient {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            prompt: config.prompt,
        }
    }
}

#[async_trait]
impl Analyzer for AnthropicClient {
    async fn analyze(&self, text: &str) -> Result<ReadingAnalysis, AnalysisError> {
        let full_prompt = format!("{}{}", self.prompt.instructions(), text);
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.prompt.max_tokens(),
            messages: vec![Message {
                role: "user",
                content: &full_prompt,
            }],
        };

        let url = format!("{}/v1/messages", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorResponse>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(AnalysisError::Api { status, message });
        }

        let body: MessagesResponse = response.json().await?;
        let reply = body
            .content
            .iter()
            .find(|block| block.kind == "text")
            .map(|block| block.text.as_str())
            .ok_or(AnalysisError::EmptyReply)?;

        Ok(parse_reply(reply))
    }
}
