use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brickdoc::config::LoggingConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "brickdoc",
    version,
    about = "Building-instruction crawler that keeps one canonical document per product",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the catalog and download the canonical instructions
    Crawl {
        /// Root directory of the instruction tree
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Theme key or label to crawl (repeatable; default: all themes)
        #[arg(short, long = "theme")]
        themes: Vec<String>,

        /// Read products from a JSON file instead of the live catalog
        #[arg(long)]
        catalog_file: Option<PathBuf>,

        /// Run report path (default: {output}/brickdoc-report.json)
        #[arg(long)]
        report: Option<PathBuf>,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Stop at the first product that fails purification
        #[arg(long, default_value = "false")]
        fail_fast: bool,
    },

    /// Show how one instruction description is classified
    Match {
        /// Instruction description
        #[arg(short, long)]
        description: String,

        /// Product id
        #[arg(short, long)]
        product_id: String,

        /// Product title
        #[arg(short, long)]
        title: String,

        /// Number of instructions the product has after deduplication
        #[arg(short, long, default_value = "2")]
        siblings: usize,
    },

    /// Purify a single field value
    Purify {
        /// Field name (theme, id, title, year, filename, description)
        #[arg(short, long)]
        field: String,

        /// Raw value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.command {
        Commands::Crawl { config, .. } => config.clone(),
        _ => None,
    };
    let config = commands::load_config(config_path.as_deref())?;

    // Initialize tracing/logging
    setup_tracing(&config.logging, cli.log_format, cli.verbose)?;

    match cli.command {
        Commands::Crawl {
            output,
            themes,
            catalog_file,
            report,
            config: _,
            fail_fast,
        } => {
            tracing::info!(
                output = ?output,
                themes = ?themes,
                catalog_file = ?catalog_file,
                fail_fast = %fail_fast,
                "Starting crawl command"
            );
            commands::crawl(
                config,
                commands::CrawlParams {
                    output,
                    themes,
                    catalog_file,
                    report,
                    fail_fast,
                },
            )
            .await?;
        }

        Commands::Match {
            description,
            product_id,
            title,
            siblings,
        } => {
            commands::match_description(&description, &product_id, &title, siblings)?;
        }

        Commands::Purify { field, value } => {
            commands::purify_value(&field, &value)?;
        }
    }

    Ok(())
}

/// Install the global subscriber
///
/// `--verbose` forces debug output for this crate; otherwise `BRICKDOC_LOG`
/// (an `EnvFilter` directive) wins over the configured level.
fn setup_tracing(logging: &LoggingConfig, format: Option<LogFormat>, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("brickdoc=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_env("BRICKDOC_LOG").unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(format!("brickdoc={},warn", logging.level))
        })
    };

    let format = format.unwrap_or(if logging.format == "json" {
        LogFormat::Json
    } else {
        LogFormat::Text
    });

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
