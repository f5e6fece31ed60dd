//! Per-instruction selection
//!
//! The catalog mixes region and revision codes freely in instruction
//! descriptions. Revision 39 (and the North American markers) is the one to
//! keep, revision 29 and the `IN` marker are superseded. When no marker is
//! present the product id in the description, or a lone instruction named
//! after the product, still establishes the document to keep.
//!
//! Word classes in the patterns are ASCII: descriptions are
//! purified before matching, so anything else is already gone.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::{MatchResult, MatchRule};

/// Patterns that select the instruction, checked in order
static DESIRED_PATTERNS: LazyLock<Vec<(MatchRule, Regex)>> = LazyLock::new(|| {
    vec![
        (
            MatchRule::Version39,
            Regex::new(r"(?:^|[^A-Za-z_])[vV] ?39(?:[^0-9]|$)| 39(?:[0-9A-Za-z_ ]|$)|[0-9A-Za-z_]V39")
                .unwrap(),
        ),
        (
            MatchRule::RegionalVersion39,
            Regex::new(r"(?:^|[^0-9A-Za-z_])(?:[nNaA][aAmM]|[nN][aA][mM])39(?:[^0-9A-Za-z_]|$)")
                .unwrap(),
        ),
        (MatchRule::RegionUs, Regex::new(r" US(?: |$)").unwrap()),
        (
            MatchRule::RegionNa,
            Regex::new(r"(?:^|[^A-Za-z_])(?:[nN][aA][mM]|[nNaA][aAmM])(?:[^A-Za-z_]|$)").unwrap(),
        ),
    ]
});

/// Patterns that reject the instruction, checked only when none of the
/// desired patterns fired
static REJECTED_PATTERNS: LazyLock<Vec<(MatchRule, Regex)>> = LazyLock::new(|| {
    vec![
        (
            MatchRule::Version29,
            Regex::new(r"(?:^|[^A-Za-z_])[vV] ?29(?:[^0-9]|$)| 29(?:[0-9A-Za-z_ ]|$)|[0-9A-Za-z_]V29")
                .unwrap(),
        ),
        (
            MatchRule::RegionalVersion29,
            Regex::new(r"(?:^|[^0-9A-Za-z_])[iI][nN]29(?:[^0-9A-Za-z_]|$)").unwrap(),
        ),
        (
            MatchRule::RegionIn,
            Regex::new(r"(?:^|[^A-Za-z_])[iI][nN](?:[^A-Za-z_]|$)").unwrap(),
        ),
    ]
});

/// Decide whether an instruction variant is the one to download
///
/// # Arguments
///
/// * `description` - Purified instruction description
/// * `product_id` - Purified product id
/// * `sibling_count` - Number of instructions the product has after deduplication
/// * `product_title` - Purified product title
///
/// # Examples
///
/// ```
/// use brickdoc::matcher::match_instruction;
///
/// let result = match_instruction("V39 Manual", "60215", 2, "Fire Station");
/// assert!(result.is_desired());
///
/// let result = match_instruction("BI 3004 64 V29", "60215", 2, "Fire Station");
/// assert!(result.has_match() && !result.is_desired());
/// ```
pub fn match_instruction(
    description: &str,
    product_id: &str,
    sibling_count: usize,
    product_title: &str,
) -> MatchResult {
    if let Some(rule) = first_match(&DESIRED_PATTERNS, description) {
        return MatchResult::desired(rule);
    }

    if let Some(rule) = first_match(&REJECTED_PATTERNS, description) {
        return MatchResult::rejected(rule);
    }

    if contains_product_id(description, product_id) {
        return MatchResult::desired(MatchRule::ProductIdPresent);
    }

    if sibling_count == 1 && description.to_lowercase() == product_title.to_lowercase() {
        return MatchResult::desired(MatchRule::SoleInstructionTitle);
    }

    MatchResult::none()
}

fn first_match(patterns: &[(MatchRule, Regex)], description: &str) -> Option<MatchRule> {
    patterns
        .iter()
        .find(|(_, regex)| regex.is_match(description))
        .map(|(rule, _)| *rule)
}

/// True when `product_id` appears in `description` as a whole number
///
/// The pattern is built per call; it depends on the product.
fn contains_product_id(description: &str, product_id: &str) -> bool {
    if product_id.is_empty() {
        return false;
    }

    let pattern = format!(r"(?:^|[^0-9]){}(?:[^0-9]|$)", regex::escape(product_id));
    match Regex::new(&pattern) {
        Ok(regex) => regex.is_match(description),
        Err(e) => {
            tracing::warn!(product_id, error = %e, "Invalid product id pattern");
            false
        }
    }
}
