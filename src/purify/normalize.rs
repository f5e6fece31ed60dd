//! Text normalization for raw catalog strings
//!
//! Catalog records arrive with stray punctuation, trademark glyphs, curly
//! quotes and a handful of accented capitals. This module applies a fixed
//! pipeline of substitutions that turns such strings into plain ASCII-ish
//! text the field validators can accept.
//!
//! All patterns are compiled once and evaluated without any per-call state,
//! so results never depend on what was normalized before.

use regex::Regex;
use std::sync::LazyLock;

// Pre-compiled regex patterns for performance
static QUOTE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"['´`]+").unwrap());

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static SYMBOL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r##"(?:%20|[/"”“)(#™:®©+\\,–—!•·?\[\]¿¡@*\~$€£¥\&\^%=;{}|<>‘’¨«»])+"##).unwrap()
});

static TRADEMARK_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\sTM)+\s").unwrap());

static TITLE_PUNCTUATION_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.").unwrap());

static DESCRIPTION_PUNCTUATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.\-]").unwrap());

/// Accent folds applied after symbol stripping, in order
static ACCENT_FOLDS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (Regex::new("[éè]+").unwrap(), "e"),
        (Regex::new("Æ+").unwrap(), "A"),
        (Regex::new("Î+").unwrap(), "i"),
        (Regex::new("É+").unwrap(), "E"),
    ]
});

/// Normalize a raw catalog string
///
/// Applies, in order:
/// 1. Quote and backtick runs become a straight apostrophe
/// 2. Whitespace runs collapse to a single space
/// 3. Runs of stripped symbols (`%20`, slashes, parentheses, trademark marks, ...) become a space
/// 4. A lone `TM` token between whitespace becomes a space
/// 5. Whitespace runs collapse again
/// 6. Accented vowels are folded (`é`/`è` to `e`, `Æ` to `A`, `Î` to `i`, `É` to `E`)
/// 7. Leading and trailing whitespace is trimmed
///
/// # Examples
///
/// ```
/// use brickdoc::purify::normalize::normalize;
///
/// assert_eq!(normalize("Star Wars™"), "Star Wars");
/// assert_eq!(normalize("Ninjago  (Legacy)"), "Ninjago Legacy");
/// assert_eq!(normalize("Caf\u{e9} Corner"), "Cafe Corner");
/// ```
pub fn normalize(raw: &str) -> String {
    let mut result = fold_quotes(raw);

    result = collapse_whitespace(&result);
    result = strip_symbols(&result);
    result = strip_trademark_token(&result);
    result = collapse_whitespace(&result);
    result = fold_accents(&result);

    result.trim().to_string()
}

/// Replace quote and backtick runs with a single straight apostrophe
///
/// # Examples
///
/// ```
/// use brickdoc::purify::normalize::fold_quotes;
///
/// assert_eq!(fold_quotes("Rock ``n´ Roll"), "Rock 'n' Roll");
/// ```
pub fn fold_quotes(text: &str) -> String {
    QUOTE_REGEX.replace_all(text, "'").to_string()
}

/// Collapse every whitespace run into a single space
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").to_string()
}

/// Replace each run of stripped symbols with a single space
///
/// # Examples
///
/// ```
/// use brickdoc::purify::normalize::strip_symbols;
///
/// assert_eq!(strip_symbols("Friends®/Disney"), "Friends Disney");
/// assert_eq!(strip_symbols("Book%201"), "Book 1");
/// ```
pub fn strip_symbols(text: &str) -> String {
    SYMBOL_REGEX.replace_all(text, " ").to_string()
}

/// Replace a lone `TM` token surrounded by whitespace with a single space
///
/// A trailing `TM` with nothing after it is left alone; the theme validator
/// rejects that shape explicitly.
pub fn strip_trademark_token(text: &str) -> String {
    TRADEMARK_TOKEN_REGEX.replace_all(text, " ").to_string()
}

/// Fold the accented characters seen in catalog data
pub fn fold_accents(text: &str) -> String {
    ACCENT_FOLDS
        .iter()
        .fold(text.to_string(), |acc, (regex, replacement)| {
            regex.replace_all(&acc, *replacement).to_string()
        })
}

/// Title pre-pass: periods become spaces
///
/// # Examples
///
/// ```
/// use brickdoc::purify::normalize::strip_title_punctuation;
///
/// assert_eq!(strip_title_punctuation("Example.Set"), "Example Set");
/// ```
pub fn strip_title_punctuation(text: &str) -> String {
    TITLE_PUNCTUATION_REGEX.replace_all(text, " ").to_string()
}

/// Instruction description pre-pass: periods and hyphens become spaces
pub fn strip_description_punctuation(text: &str) -> String {
    DESCRIPTION_PUNCTUATION_REGEX
        .replace_all(text, " ")
        .to_string()
}
