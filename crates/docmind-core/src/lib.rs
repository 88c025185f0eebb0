//! Business logic and port definitions for Docmind.
//!
//! This crate defines the "ports" (provider and repository traits) that the
//! infrastructure layer implements, plus the AI service built on top of them.
//! It depends only on `docmind-types` -- never on `docmind-infra` or any
//! HTTP/database crate.

pub mod ai;
pub mod embedding;
pub mod llm;

#[cfg(test)]
pub(crate) mod testing;
