pub mod crawl;
pub mod inspect;

use anyhow::{Context, Result};
use std::path::Path;

use brickdoc::config::Config;

// Re-export command functions for convenience
pub use crawl::{crawl, CrawlParams};
pub use inspect::{match_description, purify_value};

/// Load configuration from a TOML file when given, from the environment otherwise
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path),
        None => Config::from_env().context("Failed to load configuration from environment"),
    }
}
