//! PdfChat LLM Service
//!
//! Provides streaming chat completions with support for:
//! - OpenAI-compatible chat completion API for production
//! - Mock LLM service with scripted replies for testing and development
//! - Incremental decoding of the upstream server-sent-event stream

pub mod mock;
pub mod openai;
pub mod sse;

use bytes::Bytes;
use futures::stream::BoxStream;
use pdfchat_common::Config;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    #[error("LLM configuration error: {0}")]
    Configuration(String),

    #[error("LLM request error: {0}")]
    Request(String),

    #[error("LLM response error: {0}")]
    Response(String),
}

impl From<LlmError> for pdfchat_common::Error {
    fn from(err: LlmError) -> Self {
        pdfchat_common::Error::Internal(err.to_string())
    }
}

/// Role of a message sent to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmRole {
    System,
    User,
    Assistant,
}

/// A single message in a chat completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmMessage {
    pub role: LlmRole,
    pub content: String,
}

impl LlmMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::Assistant,
            content: content.into(),
        }
    }
}

/// Streaming chat completion request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Model identifier; empty means the service default
    pub model: String,
    pub messages: Vec<LlmMessage>,
}

/// Raw body of a streaming response, as delivered by the transport
pub type ChunkStream = BoxStream<'static, Result<Bytes, LlmError>>;

/// LLM service configuration
#[derive(Clone)]
pub struct LlmConfig {
    /// LLM provider (openai, mock)
    pub provider: String,
    pub api_key: String,
    pub default_model: String,
    pub base_url: Option<String>,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .field("default_model", &self.default_model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl LlmConfig {
    /// Derive LLM config from the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            provider: config.llm_provider.clone(),
            api_key: config.openai_api_key.clone(),
            default_model: config.openai_model.clone(),
            base_url: Some(config.openai_base_url.clone()),
        }
    }
}

/// LLM service trait for different providers
#[async_trait::async_trait]
pub trait LlmService: Send + Sync {
    /// Open a streaming chat completion.
    ///
    /// Resolves once the upstream has accepted the request; the returned
    /// stream yields the raw event-stream body as it arrives.
    async fn stream_chat(&self, request: ChatRequest) -> Result<ChunkStream, LlmError>;

    /// Model used when a request does not name one
    fn default_model(&self) -> &str;
}

/// Factory for creating LlmService implementations
pub struct LlmServiceFactory;

impl LlmServiceFactory {
    pub fn create(config: LlmConfig) -> Result<Box<dyn LlmService>, LlmError> {
        match config.provider.as_str() {
            "openai" => {
                tracing::info!(model = %config.default_model, "Creating OpenAI LLM service");
                if config.api_key.is_empty() {
                    return Err(LlmError::Configuration(
                        "OPENAI_API_KEY is required for OpenAI provider".to_string(),
                    ));
                }
                Ok(Box::new(openai::OpenAiService::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock LLM service");
                Ok(Box::new(mock::MockLlmService::new()))
            }
            provider => Err(LlmError::Configuration(format!(
                "Unknown LLM provider: {}. Supported providers: openai, mock",
                provider
            ))),
        }
    }
}
