//! Catalog crawling
//!
//! This module walks the catalog theme by theme and page by page, handing
//! every product to the [`ProductPipeline`](pipeline::ProductPipeline).
//! Processing is strictly sequential: one page, one product, one download at
//! a time.

pub mod catalog;
pub mod client;
pub mod fetcher;
pub mod headers;
pub mod pipeline;

use crate::error::{BrickdocErrorTrait, Error, Result};
use crate::models::{RawProduct, RunReport};

use catalog::{CatalogSource, ThemeRef};
use pipeline::ProductPipeline;

/// Drives a full run over a catalog
pub struct Crawler {
    catalog: Box<dyn CatalogSource>,
    pipeline: ProductPipeline,

    /// Theme keys or labels to crawl; empty means all
    theme_filter: Vec<String>,

    /// Abort on the first product that fails purification
    stop_on_purification_error: bool,
}

impl Crawler {
    #[must_use]
    pub fn new(catalog: Box<dyn CatalogSource>, pipeline: ProductPipeline) -> Self {
        Self {
            catalog,
            pipeline,
            theme_filter: Vec::new(),
            stop_on_purification_error: false,
        }
    }

    /// Restrict the run to the named themes
    #[must_use]
    pub fn with_themes(mut self, themes: Vec<String>) -> Self {
        self.theme_filter = themes;
        self
    }

    #[must_use]
    pub fn stop_on_purification_error(mut self, stop: bool) -> Self {
        self.stop_on_purification_error = stop;
        self
    }

    /// Crawl every selected theme and return the run report
    ///
    /// # Errors
    ///
    /// Catalog and directory errors end the run. A product that fails
    /// purification is recorded in the report and skipped, unless
    /// `stop_on_purification_error` is set.
    pub async fn run(&self) -> Result<RunReport> {
        let mut report = RunReport::new();

        self.pipeline.layout().ensure_root().await?;

        let themes = self.select_themes(self.catalog.themes().await?);
        tracing::info!(themes = themes.len(), "Starting crawl");

        for theme in &themes {
            self.crawl_theme(theme, &mut report).await?;
        }

        report.finish();

        tracing::info!(
            products = report.stats.products_processed,
            excluded = report.stats.products_excluded,
            failed = report.stats.products_failed,
            downloaded = report.stats.downloads_new,
            existing = report.stats.downloads_existing,
            download_errors = report.stats.downloads_failed,
            "Crawl complete"
        );

        Ok(report)
    }

    fn select_themes(&self, themes: Vec<ThemeRef>) -> Vec<ThemeRef> {
        if self.theme_filter.is_empty() {
            return themes;
        }

        for wanted in &self.theme_filter {
            if !themes.iter().any(|theme| theme.is_named(wanted)) {
                tracing::warn!(theme = %wanted, "Theme not offered by catalog");
            }
        }

        themes
            .into_iter()
            .filter(|theme| self.theme_filter.iter().any(|wanted| theme.is_named(wanted)))
            .collect()
    }

    async fn crawl_theme(&self, theme: &ThemeRef, report: &mut RunReport) -> Result<()> {
        let mut from_index = 0;
        let mut pages = 0;

        loop {
            tracing::debug!(theme = %theme.name(), from_index, "Fetching catalog page");

            let page = self.catalog.page(&theme.key, from_index).await?;

            if page.products.is_empty() {
                tracing::debug!(theme = %theme.name(), from_index, "Empty page, stopping pagination");
                break;
            }
            pages += 1;

            for raw in &page.products {
                self.process(raw, report).await?;
            }

            tracing::debug!(
                theme = %theme.name(),
                from_index,
                count = page.count,
                more_data = page.more_data,
                "Processed catalog page"
            );

            if !page.more_data || page.count == 0 {
                break;
            }
            from_index += page.count;
        }

        tracing::info!(theme = %theme.name(), pages, "Completed theme");
        Ok(())
    }

    async fn process(&self, raw: &RawProduct, report: &mut RunReport) -> Result<()> {
        match self.pipeline.process_product(raw).await {
            Ok(product_report) => {
                report.record(product_report);
                Ok(())
            }
            Err(Error::Purification(e)) if !self.stop_on_purification_error => {
                tracing::warn!(
                    product_id = %raw.product_id,
                    field = %e.field,
                    value = %e.value,
                    "Skipping product"
                );
                report.record_failure(&raw.product_id, e);
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    product_id = %raw.product_id,
                    category = e.category().as_str(),
                    error = %e,
                    "Stopping crawl"
                );
                Err(e)
            }
        }
    }
}
