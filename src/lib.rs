//! AI Logo Generation Service
//!
//! This library provides the core functionality for the logoforge system,
//! which turns user prompts into logo images using the Groq chat-completion
//! API and the Pollinations image API, storing results in S3-compatible
//! object storage and tracking job state in PostgreSQL.

pub mod app_state;
pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod services;
