//! Per-product pipeline
//!
//! Turns one raw catalog product into a [`ProductReport`]:
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌────────────┐   ┌──────────┐
//! │  Purify  │──▶│  Dedup   │──▶│ Product  │──▶│ Instruction│──▶│ Download │
//! │  fields  │   │  instr.  │   │ matcher  │   │  matcher   │   │ desired  │
//! └──────────┘   └──────────┘   └──────────┘   └────────────┘   └──────────┘
//! ```
//!
//! Matching and path resolution for every instruction happen before the
//! first download, so a product whose file name cannot be purified leaves
//! nothing on disk. Directories are created only when a file is about to be
//! fetched.
//!
//! # Example
//!
//! ```no_run
//! use brickdoc::config::Config;
//! use brickdoc::crawler::client::HttpClient;
//! use brickdoc::crawler::fetcher::DocumentFetcher;
//! use brickdoc::crawler::pipeline::ProductPipeline;
//! use brickdoc::matcher::ProductMatcher;
//! use brickdoc::models::RawProduct;
//! use brickdoc::storage::Layout;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::default();
//! let client = Arc::new(HttpClient::new(&config)?);
//! let pipeline = ProductPipeline::new(
//!     ProductMatcher::default(),
//!     Layout::new("./instructions")?,
//!     Arc::new(DocumentFetcher::new(client)),
//! );
//!
//! let raw: RawProduct = serde_json::from_str(r#"{"productId": "60215"}"#)?;
//! let report = pipeline.process_product(&raw).await?;
//! println!("{} instructions kept", report.instructions().len());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::crawler::fetcher::FileFetcher;
use crate::error::{Error, Result};
use crate::matcher::{match_instruction, ProductMatcher};
use crate::models::{
    FileInfo, InstructionRecord, MatchResult, ProductReport, PurifiedProduct, RawInstruction,
    RawProduct,
};
use crate::purify::{purify_instruction_description, purify_product};
use crate::storage::layout::{ensure_directory, Layout};

/// Tracing target of per-instruction match events
pub const AUDIT_TARGET: &str = "brickdoc::audit";

// ============================================================================
// Deduplication
// ============================================================================

/// Instructions left after deduplication, with purified descriptions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupedInstructions {
    pub kept: Vec<(String, String)>,
    pub dropped: usize,
}

/// Purify instruction descriptions, sort them and keep one instruction per
/// purified description
///
/// Sorting is by `(purified description, pdf_location)`, so among duplicates
/// the smallest location survives.
///
/// # Errors
///
/// Fails with the first description that cannot be purified.
pub fn dedup_instructions(instructions: &[RawInstruction]) -> Result<DedupedInstructions> {
    let mut purified = instructions
        .iter()
        .map(|instruction| {
            purify_instruction_description(&instruction.description)
                .map(|description| (description, instruction.pdf_location.clone()))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    purified.sort();

    let mut kept: Vec<(String, String)> = Vec::with_capacity(purified.len());
    let mut dropped = 0;

    for (description, pdf_location) in purified {
        if kept.last().is_some_and(|(previous, _)| *previous == description) {
            tracing::debug!(
                description = %description,
                pdf_location = %pdf_location,
                "Dropping duplicate instruction"
            );
            dropped += 1;
            continue;
        }

        kept.push((description, pdf_location));
    }

    Ok(DedupedInstructions { kept, dropped })
}

// ============================================================================
// Pipeline
// ============================================================================

/// Processes one product at a time
pub struct ProductPipeline {
    product_matcher: ProductMatcher,
    layout: Layout,
    fetcher: Arc<dyn FileFetcher>,
}

impl ProductPipeline {
    #[must_use]
    pub fn new(product_matcher: ProductMatcher, layout: Layout, fetcher: Arc<dyn FileFetcher>) -> Self {
        Self {
            product_matcher,
            layout,
            fetcher,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Classify a product and download its desired instructions
    ///
    /// # Errors
    ///
    /// * [`Error::Purification`] - a product field, a description or a file
    ///   name could not be purified; nothing of this product was downloaded
    /// * [`Error::Directory`] - a target directory could not be created
    ///
    /// Download failures are not errors here; they are recorded on the
    /// instruction.
    pub async fn process_product(&self, raw: &RawProduct) -> Result<ProductReport> {
        let product = purify_product(raw)?;
        let DedupedInstructions { kept, dropped } = dedup_instructions(&raw.building_instructions)?;

        let product_match = self
            .product_matcher
            .match_product(product.title(), product.theme());

        if product_match.has_match() {
            tracing::info!(
                product_id = %product.id(),
                title = %product.title(),
                rule = %rule_name(&product_match),
                "Product excluded"
            );
            let records = kept
                .into_iter()
                .map(|(description, pdf_location)| InstructionRecord::new(description, pdf_location))
                .collect();
            return Ok(ProductReport::new(product, Some(product_match), records, dropped));
        }

        let planned = self.plan(&product, kept)?;

        let mut records = Vec::with_capacity(planned.len());
        for (record, target) in planned {
            let record = match target {
                Some(path) => self.materialize(&product, record, path).await?,
                None => record,
            };
            records.push(record);
        }

        Ok(ProductReport::new(product, None, records, dropped))
    }

    /// Match every instruction and resolve targets of the desired ones
    fn plan(
        &self,
        product: &PurifiedProduct,
        instructions: Vec<(String, String)>,
    ) -> Result<Vec<(InstructionRecord, Option<PathBuf>)>> {
        let sibling_count = instructions.len();
        let mut planned = Vec::with_capacity(sibling_count);

        for (description, pdf_location) in instructions {
            let result = match_instruction(&description, product.id(), sibling_count, product.title());
            audit(product, &description, &result);

            let mut record = InstructionRecord::new(description, pdf_location).with_match(result);

            let target = if result.is_desired() {
                match self.layout.instruction_path(product, record.pdf_location()) {
                    Ok(path) => Some(path),
                    Err(Error::Download(e)) => {
                        tracing::warn!(
                            product_id = %product.id(),
                            error = %e,
                            "Cannot download instruction"
                        );
                        record = record.with_download_error(e.to_string());
                        None
                    }
                    Err(e) => return Err(e),
                }
            } else {
                None
            };

            planned.push((record, target));
        }

        Ok(planned)
    }

    /// Make sure a desired instruction exists at `path`
    async fn materialize(
        &self,
        product: &PurifiedProduct,
        record: InstructionRecord,
        path: PathBuf,
    ) -> Result<InstructionRecord> {
        // An unreadable path counts as absent; creating its directory reports the cause
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(
                product_id = %product.id(),
                path = %path.display(),
                "Already have instructions"
            );
            return Ok(record.with_file(FileInfo {
                file_path: path,
                is_new: false,
            }));
        }

        if let Some(parent) = path.parent() {
            ensure_directory(parent).await?;
        }

        match self.fetcher.fetch(record.pdf_location(), &path).await {
            Ok(()) => {
                tracing::info!(
                    product_id = %product.id(),
                    path = %display_relative(&path, self.layout.root()),
                    "Downloaded instructions"
                );
                Ok(record.with_file(FileInfo {
                    file_path: path,
                    is_new: true,
                }))
            }
            Err(e) => {
                tracing::warn!(
                    product_id = %product.id(),
                    url = %record.pdf_location(),
                    error = %e,
                    "Download failed"
                );
                Ok(record.with_download_error(e.to_string()))
            }
        }
    }
}

fn rule_name(result: &MatchResult) -> &'static str {
    result.rule().map_or("none", |rule| rule.as_str())
}

/// Emit the structured audit event for one instruction match
fn audit(product: &PurifiedProduct, description: &str, result: &MatchResult) {
    tracing::info!(
        target: AUDIT_TARGET,
        has_match = result.has_match(),
        is_desired = result.is_desired(),
        product_id = %product.id(),
        description = %description,
        rule = rule_name(result),
        "Instruction matched"
    );
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(description: &str, pdf_location: &str) -> RawInstruction {
        RawInstruction::new(description, pdf_location)
    }

    #[test]
    fn test_dedup_keeps_smallest_location() {
        let deduped = dedup_instructions(&[
            raw("Book 1", "/a/2.pdf"),
            raw("Book 1", "/a/1.pdf"),
        ])
        .unwrap();

        assert_eq!(deduped.kept, vec![("Book 1".to_string(), "/a/1.pdf".to_string())]);
        assert_eq!(deduped.dropped, 1);
    }

    #[test]
    fn test_dedup_compares_purified_descriptions() {
        let deduped = dedup_instructions(&[
            raw("Book 1.", "https://x/a.pdf"),
            raw("Book 1", "https://x/b.pdf"),
        ])
        .unwrap();

        assert_eq!(deduped.kept, vec![("Book 1".to_string(), "https://x/a.pdf".to_string())]);
        assert_eq!(deduped.dropped, 1);
    }

    #[test]
    fn test_dedup_groups_duplicates_split_by_raw_order() {
        // Raw order puts "Book 10" between the two spellings of "Book 1"
        let deduped = dedup_instructions(&[
            raw("Book 1", "https://x/1.pdf"),
            raw("Book 10", "https://x/2.pdf"),
            raw("Book-1", "https://x/3.pdf"),
        ])
        .unwrap();

        assert_eq!(
            deduped.kept,
            vec![
                ("Book 1".to_string(), "https://x/1.pdf".to_string()),
                ("Book 10".to_string(), "https://x/2.pdf".to_string()),
            ]
        );
        assert_eq!(deduped.dropped, 1);
    }

    #[test]
    fn test_dedup_output_is_sorted() {
        let deduped = dedup_instructions(&[
            raw("V39", "https://x/3.pdf"),
            raw("Book 2", "https://x/2.pdf"),
            raw("Book 1", "https://x/1.pdf"),
        ])
        .unwrap();

        let descriptions: Vec<&str> = deduped.kept.iter().map(|(d, _)| d.as_str()).collect();
        assert_eq!(descriptions, vec!["Book 1", "Book 2", "V39"]);
        assert_eq!(deduped.dropped, 0);
    }

    #[test]
    fn test_dedup_fails_on_unpurifiable_description() {
        let err = dedup_instructions(&[raw("???", "https://x/1.pdf")]).unwrap_err();
        assert!(matches!(err, Error::Purification(_)));
    }

    #[test]
    fn test_display_relative() {
        let root = Path::new("/data");
        assert_eq!(display_relative(Path::new("/data/City/a.pdf"), root), "City/a.pdf");
        assert_eq!(display_relative(Path::new("/other/a.pdf"), root), "/other/a.pdf");
    }
}
