//! HTTP handlers for the Conversations domain

pub mod chat;
