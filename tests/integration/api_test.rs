//! API endpoint integration tests
//!
//! Drives the composed router end to end with a scripted LLM upstream.

mod chat;
mod common;
mod reset;
