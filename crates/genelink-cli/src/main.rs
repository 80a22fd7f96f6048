//! genelink: gene-disease association extraction from biomedical articles.
//! Entry point for the `genelink` binary.

mod commands;
mod config;

use std::path::PathBuf;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, ConfigSource};

/// Extract gene-disease associations from PubMed / PMC articles
#[derive(Parser)]
#[command(name = "genelink")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract gene-disease metadata from an article into a CSV file
    Extract {
        /// PMID or PMCID of the article (e.g. 38790019 or PMC11127317)
        #[arg(short, long)]
        input: String,

        /// Path to output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Path to genelink.toml
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Load a gene CSV produced by `extract` into a SQLite database
    LoadDb {
        /// Path to input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Path to output SQLite database file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let default_filter = if cli.verbose { "genelink=debug,info" } else { "genelink=info,warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    match cli.command {
        Command::Extract { input, output, config } => {
            let (config, source) = Config::load(config.as_deref())?;
            match source {
                ConfigSource::File(path) => info!("Configuration loaded from {}", path.display()),
                ConfigSource::Defaults => warn!("No genelink.toml found, using default configuration"),
            }
            commands::extract(&config, &input, &output).await
        }
        Command::LoadDb { input, output } => commands::load_db(&input, &output).await,
    }
}
