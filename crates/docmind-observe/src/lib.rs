//! Observability setup for Docmind: structured logging and optional
//! OpenTelemetry span export.

pub mod tracing_setup;
