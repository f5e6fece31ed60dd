use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use brickdoc::config::Config;
use brickdoc::crawler::catalog::{CatalogSource, FileCatalog, LegoCatalog};
use brickdoc::crawler::client::HttpClient;
use brickdoc::crawler::fetcher::DocumentFetcher;
use brickdoc::crawler::pipeline::ProductPipeline;
use brickdoc::crawler::Crawler;
use brickdoc::matcher::ProductMatcher;
use brickdoc::storage::Layout;

/// Command-line overrides of the crawl configuration
pub struct CrawlParams {
    pub output: Option<PathBuf>,
    pub themes: Vec<String>,
    pub catalog_file: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub fail_fast: bool,
}

pub async fn crawl(mut config: Config, params: CrawlParams) -> Result<()> {
    if let Some(output) = params.output {
        config.storage.output_dir = output;
    }
    if let Some(report) = params.report {
        config.storage.report_path = Some(report);
    }
    if params.fail_fast {
        config.matcher.stop_on_purification_error = true;
    }
    config.validate().context("Invalid configuration")?;

    println!("Starting Instruction Crawl");
    println!("==========================");

    let client = Arc::new(HttpClient::new(&config)?);
    let layout = Layout::new(&config.storage.output_dir).context("Failed to resolve output directory")?;
    let report_path = config.report_path();

    let pipeline = ProductPipeline::new(
        ProductMatcher::new(&config.matcher.excluded_themes),
        layout.clone(),
        Arc::new(DocumentFetcher::new(client.clone())),
    );

    let catalog: Box<dyn CatalogSource> = match &params.catalog_file {
        Some(path) => {
            println!("Catalog: {}", path.display());
            Box::new(FileCatalog::load(path).context("Failed to load catalog file")?)
        }
        None => {
            println!("Catalog: {}", config.crawler.base_url);
            Box::new(LegoCatalog::new(client, &config.crawler))
        }
    };
    println!("Output directory: {}", layout.root().display());

    let crawler = Crawler::new(catalog, pipeline)
        .with_themes(params.themes)
        .stop_on_purification_error(config.matcher.stop_on_purification_error);

    let report = crawler.run().await.context("Crawl failed")?;

    report
        .save(&report_path)
        .with_context(|| format!("Failed to write report: {}", report_path.display()))?;

    let stats = &report.stats;
    println!("\nCrawl Summary");
    println!("=============");
    println!("Products processed: {}", stats.products_processed);
    println!("  Excluded:         {}", stats.products_excluded);
    println!("  Failed:           {}", stats.products_failed);
    println!("Instructions kept:  {}", stats.instructions_kept);
    println!("  Duplicates:       {}", stats.duplicates_dropped);
    println!("  Desired:          {}", stats.instructions_desired);
    println!("Downloads:          {}", stats.downloads_new);
    println!("  Already present:  {}", stats.downloads_existing);
    println!("  Failed:           {}", stats.downloads_failed);
    println!("Report: {}", report_path.display());

    for failure in &report.failures {
        println!("  skipped product {}: {}", failure.product_id, failure.error);
    }

    Ok(())
}
