//! Docmind CLI and REST API entry point.
//!
//! Binary name: `docmind`
//!
//! Parses CLI arguments, loads settings, then dispatches to the matching
//! command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use docmind_infra::config::{ProcessEnv, load_config};
use docmind_infra::postgres::pool::DatabasePool;
use docmind_observe::tracing_setup::{filter_for_verbosity, init_tracing, shutdown_tracing};

use cli::{ApiKeyCommand, Cli, Commands};
use state::{AppState, build_ai_service};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(filter_for_verbosity(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!(e))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need settings
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "docmind", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli.config, &ProcessEnv).await?;

    match cli.command {
        Commands::Serve { port, host } => {
            let state = AppState::init(&config).await?;

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !state.ai.is_configured() {
                tracing::warn!("AI_DRIVER is not set; generation endpoints will answer 400");
            }
            if state.api_keys.is_empty() {
                tracing::warn!("No API keys stored; create one with `docmind api-key create`");
            }

            if !cli.quiet {
                println!(
                    "  {} Docmind API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Migrate => {
            let pool = DatabasePool::connect_lazy(config.require_database_url()?)?;
            pool.migrate().await?;
            if cli.json {
                println!("{}", serde_json::json!({ "migrated": true }));
            } else if !cli.quiet {
                println!("  {} Migrations applied", console::style("✓").green().bold());
            }
        }

        Commands::ApiKey { action } => match action {
            ApiKeyCommand::Create { name } => {
                let pool = DatabasePool::new(config.require_database_url()?).await?;
                cli::api_key::create_api_key(pool, &name, cli.json).await?;
            }
        },

        Commands::Probe => {
            cli::ai::probe(&build_ai_service(&config.ai), cli.json).await?;
        }

        Commands::Generate {
            action,
            prompt,
            stream,
            content,
        } => {
            cli::ai::generate(
                &build_ai_service(&config.ai),
                action.as_deref(),
                prompt.as_deref(),
                &content,
                stream,
                cli.json,
            )
            .await?;
        }

        Commands::Config => {
            cli::config::show_config(&config, cli.json)?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
///
/// If a handler cannot be installed, that branch never fires and the other
/// one still can.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
