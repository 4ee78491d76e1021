//! CLI administration tool for link-registry.
//!
//! Runs registry operations directly against the configured storage backend,
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL (optionally under a custom keyword)
//! cargo run --bin admin -- shorten https://example.com
//! cargo run --bin admin -- shorten https://other.com --keyword promo
//!
//! # Resolve a code (counts as a click)
//! cargo run --bin admin -- resolve aB3xY9
//!
//! # Show click statistics / keyword details
//! cargo run --bin admin -- stats aB3xY9
//! cargo run --bin admin -- lookup promo
//!
//! # Check storage connectivity
//! cargo run --bin admin -- check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `STORAGE_BACKEND`, `SNAPSHOT_PATH`, `REDIS_URL`, ...
//! The memory backend starts empty on every invocation. Do not point the CLI
//! at a snapshot file that a running server is writing; each process keeps
//! its own copy of the table and the last writer wins.

use link_registry::config::{self, Config};
use link_registry::error::RegistryError;
use link_registry::prelude::RegistryService;
use link_registry::server::build_registry;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::process::ExitCode;

/// CLI tool for managing link-registry.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Registry commands.
#[derive(Subcommand)]
enum Commands {
    /// Shorten a long URL
    Shorten {
        /// The long URL
        url: String,

        /// Reserve a custom keyword instead of generating a code
        #[arg(short, long)]
        keyword: Option<String>,
    },

    /// Resolve a short code to its long URL (counts as a click)
    Resolve { code: String },

    /// Show the click count of a short code
    Stats { code: String },

    /// Show the long URL and clicks registered under a keyword
    Lookup { keyword: String },

    /// Check storage backend connectivity
    Check,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;
    let registry = build_registry(&config).await?;

    let result = match cli.command {
        Commands::Shorten { url, keyword } => shorten(&registry, &config, url, keyword).await,
        Commands::Resolve { code } => resolve(&registry, &code).await,
        Commands::Stats { code } => stats(&registry, &code).await,
        Commands::Lookup { keyword } => lookup(&registry, &keyword).await,
        Commands::Check => Ok(check(&registry, &config).await),
    };

    match result {
        Ok(code) => Ok(code),
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn shorten(
    registry: &RegistryService,
    config: &Config,
    url: String,
    keyword: Option<String>,
) -> Result<ExitCode, RegistryError> {
    let outcome = registry.shorten(url, keyword, None).await?;
    let short_url = RegistryService::short_url(&config.base_url, &outcome.record.short_code);

    if outcome.created {
        println!("{} Created", "✓".green().bold());
    } else {
        println!("{} Already shortened", "•".yellow().bold());
    }
    println!("  Code:      {}", outcome.record.short_code.bright_white().bold());
    println!("  Short URL: {}", short_url.cyan());
    println!("  Long URL:  {}", outcome.record.long_url);

    Ok(ExitCode::SUCCESS)
}

async fn resolve(registry: &RegistryService, code: &str) -> Result<ExitCode, RegistryError> {
    let long_url = registry.resolve(code).await?;
    println!("{}", long_url);
    Ok(ExitCode::SUCCESS)
}

async fn stats(registry: &RegistryService, code: &str) -> Result<ExitCode, RegistryError> {
    let clicks = registry.stats(code).await?;
    println!("{} {}", "📊 Clicks:".bright_blue().bold(), clicks);
    Ok(ExitCode::SUCCESS)
}

async fn lookup(registry: &RegistryService, keyword: &str) -> Result<ExitCode, RegistryError> {
    let info = registry.lookup_by_keyword(keyword).await?;
    println!("  Long URL: {}", info.long_url);
    println!("  Clicks:   {}", info.clicks);
    Ok(ExitCode::SUCCESS)
}

async fn check(registry: &RegistryService, config: &Config) -> ExitCode {
    if registry.health_check().await {
        println!(
            "{} Storage backend '{}' is reachable",
            "✓".green().bold(),
            config.storage_backend
        );
        ExitCode::SUCCESS
    } else {
        println!(
            "{} Storage backend '{}' is unreachable",
            "✗".red().bold(),
            config.storage_backend
        );
        ExitCode::FAILURE
    }
}
