//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables, optionally seeded
//! from a local `.env` file.

use anyhow::Result;
use std::env;
use std::path::PathBuf;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_PROVIDER: &str = "openai";
const DEFAULT_PDF_PATH: &str = "data/document.pdf";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

#[derive(Clone)]
pub struct Config {
    /// Upstream chat-completion API credential
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,

    /// LLM provider (openai, mock)
    pub llm_provider: String,

    /// Document used as the grounding context for every conversation
    pub pdf_path: PathBuf,

    /// Maximum number of history messages forwarded upstream per turn
    pub history_window: Option<usize>,

    /// Runtime configuration
    pub host: String,
    pub port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("openai_api_key", &"[REDACTED]")
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("llm_provider", &self.llm_provider)
            .field("pdf_path", &self.pdf_path)
            .field("history_window", &self.history_window)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openai_api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY is required"))?;

        let history_window = match lookup("HISTORY_WINDOW") {
            Some(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<usize>()
                    .map_err(|e| anyhow::anyhow!("HISTORY_WINDOW must be a positive integer: {e}"))?,
            ),
            _ => None,
        }
        .filter(|window| *window > 0);

        Ok(Self {
            openai_api_key,
            openai_base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            openai_model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            llm_provider: lookup("LLM_PROVIDER").unwrap_or_else(|| DEFAULT_PROVIDER.to_string()),
            pdf_path: lookup("PDF_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PDF_PATH)),
            history_window,
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        })
    }
}
