//! OpenAI Chat Completions Implementation
//!
//! Calls the Chat Completions API (`{base_url}/v1/chat/completions`) with
//! `stream: true` and hands back the raw event-stream body.

use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{ChatRequest, ChunkStream, LlmConfig, LlmError, LlmMessage, LlmService};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Chat Completions request body
#[derive(Debug, Serialize)]
struct CompletionsRequest<'a> {
    model: &'a str,
    messages: &'a [LlmMessage],
    stream: bool,
}

/// OpenAI API error response
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type")]
    error_type: Option<String>,
    message: String,
}

/// OpenAI LLM service implementation
pub struct OpenAiService {
    client: Client,
    config: LlmConfig,
    endpoint: String,
}

impl OpenAiService {
    /// Create a new OpenAI service
    pub fn new(config: LlmConfig) -> Self {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let endpoint = format!("{}/v1/chat/completions", base_url.trim_end_matches('/'));

        Self {
            client: Client::new(),
            config,
            endpoint,
        }
    }
}

#[async_trait::async_trait]
impl LlmService for OpenAiService {
    async fn stream_chat(&self, request: ChatRequest) -> Result<ChunkStream, LlmError> {
        let model = if request.model.is_empty() {
            self.config.default_model.as_str()
        } else {
            request.model.as_str()
        };

        let body = CompletionsRequest {
            model,
            messages: &request.messages,
            stream: true,
        };

        tracing::debug!(
            model = %model,
            messages = request.messages.len(),
            "Sending streaming chat completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.config.api_key)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Request(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_body) {
                let error_type = error_response
                    .error
                    .error_type
                    .unwrap_or_else(|| status.to_string());
                return Err(LlmError::Response(format!(
                    "OpenAI API error ({}): {}",
                    error_type, error_response.error.message
                )));
            }

            return Err(LlmError::Response(format!(
                "OpenAI API returned {}: {}",
                status, error_body
            )));
        }

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| LlmError::Request(format!("Stream read failed: {}", e))));

        Ok(stream.boxed())
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }
}
