//! Infrastructure layer for Docmind.
//!
//! Concrete implementations of the ports defined in `docmind-core`:
//! vendor LLM clients, the driver-keyed provider factory, the PostgreSQL
//! pgvector repository, the settings loader and the page chunker.

pub mod chunking;
pub mod config;
pub mod llm;
pub mod postgres;
