//! Shiritori - Unified CLI
//!
//! Runs the HTTP game server or a terminal game against the same engine.

use anyhow::Result;
use clap::Parser;
use shiritori::{
    DictionaryMover, FallbackMover, ModelMover, ServerConfig, ShiritoriEngine, TurnEngine,
    build_engine,
};
use shiritori::{Cli, Command, LlmClient};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,shiritori=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { port, host } => run_server(&cli.config, host, port).await,
        Command::Play { offline } => run_terminal(&cli.config, offline).await,
    }
}

/// Run the HTTP game server
#[instrument]
async fn run_server(config_path: &Path, host: Option<String>, port: Option<u16>) -> Result<()> {
    info!("Starting shiritori server");

    let config = ServerConfig::load(config_path)?.with_address(host, port);
    let engine = Arc::new(build_engine(&config)?);

    shiritori::serve(engine, &config).await
}

/// Play a game in the terminal
#[instrument]
async fn run_terminal(config_path: &Path, offline: bool) -> Result<()> {
    let config = ServerConfig::load(config_path)?;

    let engine: ShiritoriEngine = if offline {
        info!("Offline mode, playing from the dictionary only");
        let dictionary = Arc::new(config.load_dictionary()?);
        TurnEngine::new(FallbackMover::<ModelMover<LlmClient>, _>::fallback_only(
            DictionaryMover::new(dictionary),
        ))
    } else {
        build_engine(&config)?
    };

    shiritori::run_play(&engine).await
}
