//! Whole-product exclusion
//!
//! Co-packs and value packs bundle instructions for products that are also
//! listed on their own, and some themes carry no building instructions in
//! the sense this crawler collects. Such products are skipped entirely.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::{MatchResult, MatchRule};

static CO_PACK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bco-?packs?\b").unwrap());

static VALUE_PACK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bvalue packs?\b").unwrap());

/// Themes excluded when no list is configured
pub const DEFAULT_EXCLUDED_THEMES: &[&str] = &["Duplo"];

/// Decides whether a product is excluded before any instruction is looked at
#[derive(Debug, Clone)]
pub struct ProductMatcher {
    /// Lowercased theme names
    excluded_themes: Vec<String>,
}

impl ProductMatcher {
    /// Create a matcher with an explicit theme exclusion list
    pub fn new<I, S>(excluded_themes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            excluded_themes: excluded_themes
                .into_iter()
                .map(|theme| theme.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Run the exclusion cascade on purified title and theme
    ///
    /// The first rule that fires wins: excluded theme, co-pack, value pack.
    /// A fired rule always means "exclude"; no rule means the product goes on
    /// to per-instruction matching.
    pub fn match_product(&self, title: &str, theme: &str) -> MatchResult {
        let theme = theme.to_lowercase();
        if self.excluded_themes.iter().any(|excluded| *excluded == theme) {
            return MatchResult::rejected(MatchRule::ExcludedTheme);
        }

        if CO_PACK_REGEX.is_match(title) {
            return MatchResult::rejected(MatchRule::CoPack);
        }

        if VALUE_PACK_REGEX.is_match(title) {
            return MatchResult::rejected(MatchRule::ValuePack);
        }

        MatchResult::none()
    }
}

impl Default for ProductMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_THEMES)
    }
}
