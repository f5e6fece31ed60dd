//! Property tests for normalization and purification

use proptest::prelude::*;
use proptest::sample::select;

use brickdoc::purify::normalize::normalize;
use brickdoc::purify::validate::is_valid;
use brickdoc::purify::{purify, Field};

/// Catalog-like text: letters, digits, punctuation, trademark marks, accents
const CATALOG_TEXT: &str = "[a-zA-Z0-9 .,:'´`#/()!?+&\\-™®éèÉÆÎ\t]{0,40}";

proptest! {
    #[test]
    fn normalize_is_idempotent(raw in CATALOG_TEXT) {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_is_idempotent_with_tm_tokens(
        words in prop::collection::vec(select(vec!["City", "TM", "Star", "Wars", "™", "  "]), 0..8)
    ) {
        let raw = words.join(" ");
        let once = normalize(&raw);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_output_is_trimmed(raw in CATALOG_TEXT) {
        let normalized = normalize(&raw);
        prop_assert_eq!(normalized.trim(), normalized.as_str());
        prop_assert!(!normalized.contains("  "));
    }

    #[test]
    fn purify_never_returns_invalid(field in select(Field::all()), raw in CATALOG_TEXT) {
        match purify(field, &raw) {
            Ok(value) => prop_assert!(is_valid(field, &value), "{} -> {}", raw, value),
            Err(e) => prop_assert_eq!(e.field, field),
        }
    }

    #[test]
    fn valid_values_are_kept(field in select(Field::all()), raw in CATALOG_TEXT) {
        if is_valid(field, &raw) {
            prop_assert_eq!(purify(field, &raw).unwrap(), raw);
        }
    }
}

#[test]
fn test_theme_with_trailing_tm_fails() {
    let err = purify(Field::ProductTheme, "City TM").unwrap_err();
    assert_eq!(err.field, Field::ProductTheme);
}

#[test]
fn test_trademark_sign_is_removed() {
    assert_eq!(purify(Field::ProductTheme, "Star Wars™").unwrap(), "Star Wars");
}

#[test]
fn test_title_period_becomes_space() {
    assert_eq!(purify(Field::ProductTitle, "Example.Set").unwrap(), "Example Set");
}
