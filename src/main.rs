//! # FAQ Forge CLI (`faqforge`)
//!
//! The `faqforge` binary runs the document-to-FAQ service. It provides
//! commands for database initialization and starting the HTTP API server.
//!
//! ## Usage
//!
//! ```bash
//! faqforge --config ./config/faqforge.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `faqforge init` | Create the SQLite database and run schema migrations |
//! | `faqforge serve` | Start the HTTP API server |
//!
//! The assistant API key is read from the `OPENAI_API_KEY` environment
//! variable at startup.

mod assistant;
mod config;
mod db;
mod error;
mod extract;
mod files;
mod generate;
mod migrate;
mod models;
mod poller;
mod server;
mod store;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// FAQ Forge CLI — a document-to-FAQ generation service backed by hosted
/// assistant APIs.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/faqforge.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "faqforge",
    about = "FAQ Forge — turn uploaded documents into FAQ collections via a hosted assistant",
    version,
    long_about = "FAQ Forge orchestrates a hosted assistant API to turn uploaded documents into \
    structured question/answer pairs, persists them under named collections in SQLite, and \
    serves the result over a JSON HTTP API."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/faqforge.toml`. Database, server, and
    /// assistant settings are read from this file.
    #[arg(long, global = true, default_value = "./config/faqforge.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the `faq_collections` and
    /// `faqs` tables. This command is idempotent — running it multiple
    /// times is safe.
    Init,

    /// Start the HTTP API server.
    ///
    /// Binds to the address configured in `[server].bind` and serves the
    /// document upload, FAQ generation, and collection endpoints.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
