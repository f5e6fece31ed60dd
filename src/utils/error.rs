//! Error types for the brickdoc crawler
//!
//! This module defines the domain-specific error types used throughout the
//! application. Each one maps onto a distinct failure scope: a purification
//! failure stops the current product, a download failure stops the current
//! instruction, and a directory failure stops the whole run.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::purify::Field;

/// A raw catalog value that could not be turned into a valid field value
///
/// `value` holds the last attempted value, i.e. the normalized form when
/// normalization was tried, so that the log shows what actually failed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("purification failed for {field}: [{value}]")]
pub struct PurificationError {
    /// Field that failed validation
    pub field: Field,

    /// Last attempted value
    pub value: String,
}

impl PurificationError {
    pub fn new(field: Field, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// A field name that does not name any [`Field`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown field: {0}")]
pub struct UnknownFieldError(pub String);

/// Errors that can occur while downloading an instruction document
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP request error
    #[error("HTTP request failed for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Terminal response was not 200
    #[error("download failed: server returned code {status}. URL: {url}")]
    Status { url: String, status: u16 },

    /// Body ended before the announced content length
    #[error("incomplete transfer for {url}: received {received} of {expected} bytes")]
    Incomplete {
        url: String,
        expected: u64,
        received: u64,
    },

    /// Document location is not a usable URL
    #[error("invalid document URL: {0}")]
    InvalidUrl(String),

    /// Writing or renaming the downloaded file failed
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A destination directory could not be created
#[derive(Error, Debug)]
#[error("failed to create directory {path}: {source}")]
pub struct DirectoryError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Errors raised by a catalog source while enumerating themes and pages
#[derive(Error, Debug)]
pub enum CatalogError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server error with status code
    #[error("catalog request to {url} returned {status}")]
    Status { url: String, status: u16 },

    /// Catalog endpoint could not be built from the base URL
    #[error("invalid catalog URL: {0}")]
    Url(#[from] url::ParseError),

    /// Landing page carried no theme list
    #[error("theme data not found on catalog page")]
    MissingThemeData,

    /// Payload could not be decoded
    #[error("invalid catalog payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Offline catalog file could not be read
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
