//! Field purification: normalize-then-validate
//!
//! Each catalog field gets two chances. The raw value is accepted as-is when
//! it already validates; otherwise the field-specific pre-pass and the
//! generic [`normalize`](normalize::normalize) pipeline run and the result is
//! validated again. A value that still fails produces a
//! [`PurificationError`] carrying the field and the last attempted value.
//!
//! # Example
//!
//! ```
//! use brickdoc::purify::{purify, Field};
//!
//! assert_eq!(purify(Field::ProductTitle, "Example.Set").unwrap(), "Example Set");
//! assert!(purify(Field::ProductTheme, "City TM").is_err());
//! ```

pub mod normalize;
pub mod validate;

use serde::Serialize;
use std::borrow::Cow;
use std::str::FromStr;

use crate::models::{PurifiedProduct, RawProduct};
use crate::utils::error::{PurificationError, UnknownFieldError};

/// Fields that go through purification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    ProductTheme,
    ProductId,
    ProductTitle,
    ProductYear,
    InstructionFilename,
    InstructionDescription,
}

impl Field {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProductTheme => "productTheme",
            Self::ProductId => "productId",
            Self::ProductTitle => "productTitle",
            Self::ProductYear => "productYear",
            Self::InstructionFilename => "instructionFilename",
            Self::InstructionDescription => "instructionDescription",
        }
    }

    /// Get all fields
    pub fn all() -> Vec<Self> {
        vec![
            Self::ProductTheme,
            Self::ProductId,
            Self::ProductTitle,
            Self::ProductYear,
            Self::InstructionFilename,
            Self::InstructionDescription,
        ]
    }

    fn pre_pass<'a>(&self, value: &'a str) -> Cow<'a, str> {
        match self {
            Self::ProductTitle => Cow::Owned(normalize::strip_title_punctuation(value)),
            Self::InstructionDescription => {
                Cow::Owned(normalize::strip_description_punctuation(value))
            }
            _ => Cow::Borrowed(value),
        }
    }
}

impl FromStr for Field {
    type Err = UnknownFieldError;

    /// Accepts the camelCase name or a short alias, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "producttheme" | "theme" => Ok(Self::ProductTheme),
            "productid" | "id" => Ok(Self::ProductId),
            "producttitle" | "title" => Ok(Self::ProductTitle),
            "productyear" | "year" => Ok(Self::ProductYear),
            "instructionfilename" | "filename" => Ok(Self::InstructionFilename),
            "instructiondescription" | "description" => Ok(Self::InstructionDescription),
            _ => Err(UnknownFieldError(s.to_string())),
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Purify a raw value for `field`
///
/// # Errors
///
/// Returns [`PurificationError`] when neither the raw nor the normalized
/// value passes the field validator.
pub fn purify(field: Field, value: &str) -> Result<String, PurificationError> {
    if validate::is_valid(field, value) {
        return Ok(value.to_string());
    }

    let candidate = normalize::normalize(&field.pre_pass(value));

    if validate::is_valid(field, &candidate) {
        tracing::trace!(field = %field, raw = %value, purified = %candidate, "Normalized field");
        return Ok(candidate);
    }

    Err(PurificationError::new(field, candidate))
}

pub fn purify_theme(value: &str) -> Result<String, PurificationError> {
    purify(Field::ProductTheme, value)
}

pub fn purify_id(value: &str) -> Result<String, PurificationError> {
    purify(Field::ProductId, value)
}

pub fn purify_title(value: &str) -> Result<String, PurificationError> {
    purify(Field::ProductTitle, value)
}

pub fn purify_year(value: &str) -> Result<String, PurificationError> {
    purify(Field::ProductYear, value)
}

pub fn purify_instruction_filename(value: &str) -> Result<String, PurificationError> {
    purify(Field::InstructionFilename, value)
}

pub fn purify_instruction_description(value: &str) -> Result<String, PurificationError> {
    purify(Field::InstructionDescription, value)
}

/// Purify the product-level fields of a raw record
///
/// Fields are purified in the order id, title, theme, year; the first
/// failure is returned.
pub fn purify_product(raw: &RawProduct) -> Result<PurifiedProduct, PurificationError> {
    let id = purify_id(&raw.product_id)?;
    let title = purify_title(&raw.product_name)?;
    let theme = purify_theme(&raw.theme_name)?;
    let year = purify_year(&raw.launch_year)?;

    Ok(PurifiedProduct::new(theme, year, id, title))
}
