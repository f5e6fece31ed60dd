//! brickdoc - Building-instruction catalog crawler
//!
//! Walks a building-instruction catalog, decides which of the duplicate
//! instruction documents of each product is the canonical one, and
//! downloads the chosen files into a deterministic directory tree.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`purify`] - Text normalization and field validation
//! - [`matcher`] - Product exclusion and instruction selection rules
//! - [`models`] - Core data structures and the run report
//! - [`crawler`] - Catalog sources, downloads and the per-product pipeline
//! - [`storage`] - Target path layout and directory creation
//! - [`config`] - Configuration management and settings
//! - [`error`] - Unified error type
//!
//! # Example
//!
//! ```no_run
//! use brickdoc::config::Config;
//! use brickdoc::crawler::catalog::LegoCatalog;
//! use brickdoc::crawler::client::HttpClient;
//! use brickdoc::crawler::fetcher::DocumentFetcher;
//! use brickdoc::crawler::pipeline::ProductPipeline;
//! use brickdoc::crawler::Crawler;
//! use brickdoc::matcher::ProductMatcher;
//! use brickdoc::storage::Layout;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = Arc::new(HttpClient::new(&config)?);
//!
//!     let pipeline = ProductPipeline::new(
//!         ProductMatcher::new(&config.matcher.excluded_themes),
//!         Layout::new(&config.storage.output_dir)?,
//!         Arc::new(DocumentFetcher::new(client.clone())),
//!     );
//!     let catalog = LegoCatalog::new(client, &config.crawler);
//!
//!     let report = Crawler::new(Box::new(catalog), pipeline).run().await?;
//!     report.save(&config.report_path())?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crawler;
pub mod error;
pub mod matcher;
pub mod models;
pub mod purify;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::crawler::Crawler;
    pub use crate::error::{BrickdocErrorTrait, Error, ErrorCategory, FailureScope, Result};
    pub use crate::matcher::{match_instruction, ProductMatcher};
    pub use crate::models::{MatchResult, ProductReport, RawProduct, RunReport};
    pub use crate::purify::{purify, purify_product, Field};
    pub use crate::storage::Layout;
}

// Direct re-exports for convenience
pub use models::{MatchResult, ProductReport, RawInstruction, RawProduct, RunReport};
