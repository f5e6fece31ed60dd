//! Per-field acceptance tests
//!
//! Every pattern is anchored at both ends and requires a non-whitespace
//! character at each boundary. Word characters are ASCII only, so a value
//! that passes is safe to use as a path component.

use regex::Regex;
use std::sync::LazyLock;

use super::Field;

static THEME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z_&'+\-][0-9A-Za-z_ &'+\-]*[0-9A-Za-z_&'+\-]$").unwrap());

static ID_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

static TITLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9A-Za-z_'\-](?:[0-9A-Za-z_ '\-]*[0-9A-Za-z_'\-])?$").unwrap()
});

static YEAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:19[0-9]{2}|2[0-9]{3})$").unwrap());

static FILENAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9A-Za-z_\-](?:[0-9A-Za-z_ \-]*[0-9A-Za-z_\-])?\.(?:pdf|jpg)[^\s/\\]?$")
        .unwrap()
});

static DESCRIPTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9A-Za-z_'](?:[0-9A-Za-z_ ']*[0-9A-Za-z_'])?$").unwrap()
});

/// Suffix a theme must never end with
const TRADEMARK_SUFFIX: &str = " TM";

/// Check a value against the acceptance test of `field`
pub fn is_valid(field: Field, value: &str) -> bool {
    match field {
        Field::ProductTheme => is_theme_valid(value),
        Field::ProductId => ID_REGEX.is_match(value),
        Field::ProductTitle => TITLE_REGEX.is_match(value),
        Field::ProductYear => YEAR_REGEX.is_match(value),
        Field::InstructionFilename => FILENAME_REGEX.is_match(value),
        Field::InstructionDescription => DESCRIPTION_REGEX.is_match(value),
    }
}

/// Theme pattern plus the trademark-suffix rule
pub fn is_theme_valid(value: &str) -> bool {
    THEME_REGEX.is_match(value) && !value.ends_with(TRADEMARK_SUFFIX)
}
