//! Command-line interface for shiritori.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Shiritori - hiragana word-chain game against an LLM opponent
#[derive(Parser, Debug)]
#[command(name = "shiritori")]
#[command(about = "Hiragana shiritori referee with an LLM opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, global = true, default_value = "shiritori.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
    },

    /// Play in the terminal
    Play {
        /// Skip the LLM and answer from the dictionary only
        #[arg(long)]
        offline: bool,
    },
}
