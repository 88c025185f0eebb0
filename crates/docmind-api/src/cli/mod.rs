//! CLI command definitions for the `docmind` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod ai;
pub mod api_key;
pub mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use docmind_infra::config::DEFAULT_CONFIG_FILE;

/// AI writing assistance and page embeddings for the document editor.
#[derive(Parser)]
#[command(name = "docmind", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout through OpenTelemetry.
    ///
    /// Span dumps share stdout with command output; leave this off when
    /// piping `generate` or `--json` results.
    #[arg(long, global = true)]
    pub otel: bool,

    /// Path to the TOML settings file.
    #[arg(long, global = true, env = "DOCMIND_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on [default: from settings, else 3001].
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to [default: from settings, else 0.0.0.0].
        #[arg(long)]
        host: Option<String>,
    },

    /// Run pending database migrations and exit.
    Migrate,

    /// Manage REST API keys.
    #[command(name = "api-key")]
    ApiKey {
        #[command(subcommand)]
        action: ApiKeyCommand,
    },

    /// Send a tiny completion to check the configured provider.
    Probe,

    /// Generate text once and print it.
    Generate {
        /// Action keyword (e.g. summarize, translate).
        #[arg(long)]
        action: Option<String>,

        /// Custom prompt; overrides the action.
        #[arg(long)]
        prompt: Option<String>,

        /// Print chunks as they arrive.
        #[arg(long)]
        stream: bool,

        /// Text to work on.
        content: String,
    },

    /// Show resolved settings with secrets masked.
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ApiKeyCommand {
    /// Mint a new key and print it once.
    Create {
        /// Label stored with the key.
        #[arg(long, default_value = "default")]
        name: String,
    },
}
