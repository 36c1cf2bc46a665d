//! Shared configuration, error handling and extractors for PdfChat
//!
//! This crate provides common functionality used across the PdfChat backend:
//! - Configuration loaded from the environment (and an optional `.env` file)
//! - Error types and their HTTP mapping
//! - Request extractors

pub mod config;
pub mod error;
pub mod extractors;

pub use config::Config;
pub use error::{Error, Result};
pub use extractors::ValidatedJson;
