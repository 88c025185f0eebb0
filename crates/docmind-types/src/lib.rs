//! Shared domain types for Docmind.
//!
//! This crate contains the types used across the Docmind AI service:
//! LLM requests and stream events, AI driver settings, page embedding
//! records, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror, secrecy.

pub mod ai;
pub mod embedding;
pub mod error;
pub mod llm;
