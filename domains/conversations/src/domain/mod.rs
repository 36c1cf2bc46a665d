//! Domain layer for the Conversations domain

pub mod entities;
pub mod prompt;
pub mod relay;
