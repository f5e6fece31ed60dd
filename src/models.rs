// Core data structures for the brickdoc crawler

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::utils::error::PurificationError;

/// Accept a JSON string, number or null where a string is expected
///
/// Catalog payloads carry `productId` and `launchYear` as numbers in some
/// responses and as strings in others.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Product record as delivered by the catalog (untrusted)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProduct {
    #[serde(deserialize_with = "lenient_string")]
    pub product_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub product_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub theme_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub launch_year: String,
    pub building_instructions: Vec<RawInstruction>,
}

/// Instruction variant as delivered by the catalog (untrusted)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawInstruction {
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "lenient_string")]
    pub pdf_location: String,
}

impl RawInstruction {
    pub fn new(description: impl Into<String>, pdf_location: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            pdf_location: pdf_location.into(),
        }
    }
}

/// Product fields that passed purification
///
/// Only [`purify_product`](crate::purify::purify_product) constructs this
/// type, so every field satisfies its validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurifiedProduct {
    theme: String,
    year: String,
    id: String,
    title: String,
}

impl PurifiedProduct {
    pub(crate) fn new(theme: String, year: String, id: String, title: String) -> Self {
        Self {
            theme,
            year,
            id,
            title,
        }
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Directory name for this product: `{id} - {title}`
    pub fn directory_name(&self) -> String {
        format!("{} - {}", self.id, self.title)
    }
}

/// Identifier of the rule that decided a match
///
/// Serialized with the same name the audit log uses, see [`MatchRule::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchRule {
    /// Product theme is on the exclusion list
    ExcludedTheme,
    /// Product title names a co-pack
    CoPack,
    /// Product title names a value pack
    ValuePack,
    /// `v39` / `V 39` / ` 39` spellings
    Version39,
    /// `NA39` / `nam39` spellings
    RegionalVersion39,
    /// Trailing ` US` token
    RegionUs,
    /// `NA` / `nam` regional marker
    RegionNa,
    /// `v29` / `V 29` / ` 29` spellings
    Version29,
    /// `IN29` spelling
    RegionalVersion29,
    /// `IN` regional marker
    RegionIn,
    /// Description contains the product id
    ProductIdPresent,
    /// Only instruction of the product and equal to its title
    SoleInstructionTitle,
}

impl MatchRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExcludedTheme => "excluded-theme",
            Self::CoPack => "co-pack",
            Self::ValuePack => "value-pack",
            Self::Version39 => "version-39",
            Self::RegionalVersion39 => "regional-version-39",
            Self::RegionUs => "region-us",
            Self::RegionNa => "region-na",
            Self::Version29 => "version-29",
            Self::RegionalVersion29 => "regional-version-29",
            Self::RegionIn => "region-in",
            Self::ProductIdPresent => "product-id-present",
            Self::SoleInstructionTitle => "sole-instruction-title",
        }
    }
}

impl Serialize for MatchRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl std::fmt::Display for MatchRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a product or instruction match
///
/// `is_desired` implies `has_match`; the constructors are the only way to
/// build a value, which keeps that invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    has_match: bool,
    is_desired: bool,
    rule: Option<MatchRule>,
}

impl MatchResult {
    /// No rule fired
    pub const fn none() -> Self {
        Self {
            has_match: false,
            is_desired: false,
            rule: None,
        }
    }

    /// A rule fired that selects the item
    pub const fn desired(rule: MatchRule) -> Self {
        Self {
            has_match: true,
            is_desired: true,
            rule: Some(rule),
        }
    }

    /// A rule fired that rejects the item
    pub const fn rejected(rule: MatchRule) -> Self {
        Self {
            has_match: true,
            is_desired: false,
            rule: Some(rule),
        }
    }

    pub fn has_match(&self) -> bool {
        self.has_match
    }

    pub fn is_desired(&self) -> bool {
        self.is_desired
    }

    pub fn rule(&self) -> Option<MatchRule> {
        self.rule
    }
}

/// Where a desired instruction ended up on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub file_path: PathBuf,

    /// True iff the file was downloaded during this run
    pub is_new: bool,
}

/// An instruction that survived deduplication
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionRecord {
    description: String,
    pdf_location: String,
    match_result: Option<MatchResult>,
    file_info: Option<FileInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    download_error: Option<String>,
}

impl InstructionRecord {
    pub fn new(description: impl Into<String>, pdf_location: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            pdf_location: pdf_location.into(),
            match_result: None,
            file_info: None,
            download_error: None,
        }
    }

    pub(crate) fn with_match(mut self, result: MatchResult) -> Self {
        self.match_result = Some(result);
        self
    }

    pub(crate) fn with_file(mut self, info: FileInfo) -> Self {
        self.file_info = Some(info);
        self
    }

    pub(crate) fn with_download_error(mut self, error: impl Into<String>) -> Self {
        self.download_error = Some(error.into());
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn pdf_location(&self) -> &str {
        &self.pdf_location
    }

    pub fn match_result(&self) -> Option<&MatchResult> {
        self.match_result.as_ref()
    }

    pub fn file_info(&self) -> Option<&FileInfo> {
        self.file_info.as_ref()
    }

    pub fn download_error(&self) -> Option<&str> {
        self.download_error.as_deref()
    }
}

/// Per-product result of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReport {
    #[serde(flatten)]
    product: PurifiedProduct,

    /// Present only when the whole product was excluded
    match_result: Option<MatchResult>,

    instructions: Vec<InstructionRecord>,

    duplicates_dropped: usize,
}

impl ProductReport {
    pub(crate) fn new(
        product: PurifiedProduct,
        match_result: Option<MatchResult>,
        instructions: Vec<InstructionRecord>,
        duplicates_dropped: usize,
    ) -> Self {
        Self {
            product,
            match_result,
            instructions,
            duplicates_dropped,
        }
    }

    pub fn product(&self) -> &PurifiedProduct {
        &self.product
    }

    pub fn match_result(&self) -> Option<&MatchResult> {
        self.match_result.as_ref()
    }

    pub fn instructions(&self) -> &[InstructionRecord] {
        &self.instructions
    }

    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }

    /// True when the product matcher excluded this product
    pub fn is_excluded(&self) -> bool {
        self.match_result.is_some_and(|m| m.has_match())
    }
}

/// A product that was skipped because a field could not be purified
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFailure {
    /// Raw product id as delivered by the catalog
    pub product_id: String,
    pub error: PurificationError,
}

/// Aggregate counters for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub products_processed: u32,
    pub products_excluded: u32,
    pub products_failed: u32,
    pub instructions_kept: u32,
    pub duplicates_dropped: u32,
    pub instructions_desired: u32,
    pub downloads_new: u32,
    pub downloads_existing: u32,
    pub downloads_failed: u32,
}

impl RunStats {
    /// Fold one product report into the counters
    pub fn record(&mut self, report: &ProductReport) {
        self.products_processed += 1;
        if report.is_excluded() {
            self.products_excluded += 1;
        }
        self.duplicates_dropped += report.duplicates_dropped() as u32;

        for instruction in report.instructions() {
            self.instructions_kept += 1;
            if instruction.match_result().is_some_and(|m| m.is_desired()) {
                self.instructions_desired += 1;
            }
            match (instruction.file_info(), instruction.download_error()) {
                (Some(info), _) if info.is_new => self.downloads_new += 1,
                (Some(_), _) => self.downloads_existing += 1,
                (None, Some(_)) => self.downloads_failed += 1,
                (None, None) => {}
            }
        }
    }

    /// Record a product that failed purification
    pub fn record_failure(&mut self) {
        self.products_failed += 1;
    }
}

/// Structured document emitted at the end of a run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub stats: RunStats,
    pub products: Vec<ProductReport>,
    pub failures: Vec<ProductFailure>,
}

impl RunReport {
    /// Create an empty report stamped with the current time
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            stats: RunStats::default(),
            products: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Append a processed product
    pub fn record(&mut self, report: ProductReport) {
        self.stats.record(&report);
        self.products.push(report);
    }

    /// Append a product that failed purification
    pub fn record_failure(&mut self, product_id: &str, error: PurificationError) {
        self.stats.record_failure();
        self.failures.push(ProductFailure {
            product_id: product_id.to_string(),
            error,
        });
    }

    /// Stamp the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Save the report as pretty JSON
    ///
    /// The document is written to a temporary file first and renamed into
    /// place, so a crash never leaves a truncated report behind.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] when the file cannot be written, [`Error::Json`] when the
    /// report cannot be serialized.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Atomic write using temp file
        let temp_path = path.with_extension("tmp");
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&temp_path, content)?;
        std::fs::rename(temp_path, path)?;
        Ok(())
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::purify::Field;

    fn sample_product() -> PurifiedProduct {
        PurifiedProduct::new(
            "City".to_string(),
            "2019".to_string(),
            "60215".to_string(),
            "Fire Station".to_string(),
        )
    }

    #[test]
    fn test_raw_product_numeric_fields() {
        let json = r#"{
            "productId": 60215,
            "productName": "Fire Station",
            "themeName": "City",
            "launchYear": 2019,
            "buildingInstructions": [
                {"description": "BI 3004/64", "pdfLocation": "https://example.com/6186035.pdf"}
            ]
        }"#;
        let raw: RawProduct = serde_json::from_str(json).unwrap();
        assert_eq!(raw.product_id, "60215");
        assert_eq!(raw.launch_year, "2019");
        assert_eq!(raw.building_instructions.len(), 1);
        assert_eq!(
            raw.building_instructions[0].pdf_location,
            "https://example.com/6186035.pdf"
        );
    }

    #[test]
    fn test_raw_product_missing_fields_default() {
        let raw: RawProduct = serde_json::from_str(r#"{"productId": "1", "launchYear": null}"#).unwrap();
        assert_eq!(raw.product_id, "1");
        assert!(raw.product_name.is_empty());
        assert!(raw.launch_year.is_empty());
        assert!(raw.building_instructions.is_empty());
    }

    #[test]
    fn test_raw_product_rejects_object_id() {
        let result: Result<RawProduct, _> = serde_json::from_str(r#"{"productId": {"x": 1}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_match_result_invariant() {
        let none = MatchResult::none();
        assert!(!none.has_match() && !none.is_desired());
        assert_eq!(none.rule(), None);

        let desired = MatchResult::desired(MatchRule::Version39);
        assert!(desired.has_match() && desired.is_desired());

        let rejected = MatchResult::rejected(MatchRule::CoPack);
        assert!(rejected.has_match() && !rejected.is_desired());
    }

    #[test]
    fn test_match_result_serialization() {
        let json = serde_json::to_value(MatchResult::desired(MatchRule::Version39)).unwrap();
        assert_eq!(json["hasMatch"], true);
        assert_eq!(json["isDesired"], true);
        assert_eq!(json["rule"], "version-39");
    }

    #[test]
    fn test_rule_serializes_as_audit_name() {
        for rule in [
            MatchRule::Version39,
            MatchRule::RegionalVersion39,
            MatchRule::Version29,
            MatchRule::RegionalVersion29,
            MatchRule::SoleInstructionTitle,
        ] {
            assert_eq!(serde_json::to_value(rule).unwrap(), rule.as_str());
        }
    }

    #[test]
    fn test_product_report_flattens_product() {
        let report = ProductReport::new(sample_product(), None, Vec::new(), 0);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["theme"], "City");
        assert_eq!(json["id"], "60215");
        assert!(json["matchResult"].is_null());
    }

    #[test]
    fn test_directory_name() {
        assert_eq!(sample_product().directory_name(), "60215 - Fire Station");
    }

    #[test]
    fn test_stats_record() {
        let instructions = vec![
            InstructionRecord::new("V39", "a")
                .with_match(MatchResult::desired(MatchRule::Version39))
                .with_file(FileInfo {
                    file_path: PathBuf::from("/tmp/a.pdf"),
                    is_new: true,
                }),
            InstructionRecord::new("V29", "b").with_match(MatchResult::rejected(MatchRule::Version29)),
            InstructionRecord::new("US", "c")
                .with_match(MatchResult::desired(MatchRule::RegionUs))
                .with_download_error("404"),
        ];
        let report = ProductReport::new(sample_product(), None, instructions, 2);

        let mut stats = RunStats::default();
        stats.record(&report);

        assert_eq!(stats.products_processed, 1);
        assert_eq!(stats.products_excluded, 0);
        assert_eq!(stats.instructions_kept, 3);
        assert_eq!(stats.instructions_desired, 2);
        assert_eq!(stats.downloads_new, 1);
        assert_eq!(stats.downloads_failed, 1);
        assert_eq!(stats.duplicates_dropped, 2);
    }

    #[test]
    fn test_run_report_failure() {
        let mut report = RunReport::new();
        report.record_failure("x1", PurificationError::new(Field::ProductId, "x1"));
        assert_eq!(report.stats.products_failed, 1);
        assert_eq!(report.failures[0].product_id, "x1");
    }

    #[test]
    fn test_run_report_save() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("report.json");

        let mut report = RunReport::new();
        report.record(ProductReport::new(sample_product(), None, Vec::new(), 0));
        report.finish();
        report.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["products"][0]["title"], "Fire Station");
        assert_eq!(json["stats"]["productsProcessed"], 1);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_run_report_save_into_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        let err = RunReport::new().save(&blocker.join("report.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
