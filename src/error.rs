//! Unified error handling for the brickdoc crate
//!
//! This module provides a unified error type that consolidates all domain-specific
//! errors into a single `Error` enum, while maintaining the ability to use
//! domain-specific errors when needed.
//!
//! # Architecture
//!
//! - [`BrickdocErrorTrait`] - Common interface implemented by all error types
//! - [`ErrorCategory`] - Classification of errors for reporting
//! - [`FailureScope`] - How much of the run an error aborts
//! - [`Error`] - Unified error enum wrapping all domain-specific errors
//!
//! # Usage
//!
//! ```rust,ignore
//! use brickdoc::error::{BrickdocErrorTrait, Error, FailureScope};
//!
//! fn handle_error(err: Error) {
//!     match err.scope() {
//!         FailureScope::Run => eprintln!("Fatal error: {err}"),
//!         _ => tracing::warn!(error = %err, "Skipping"),
//!     }
//! }
//! ```

use std::io;
use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::utils::error::{CatalogError, DirectoryError, DownloadError, PurificationError};

/// Common trait for all brickdoc error types
pub trait BrickdocErrorTrait: std::error::Error {
    /// Get the error category for reporting
    fn category(&self) -> ErrorCategory;

    /// Get the unit of work this error aborts
    fn scope(&self) -> FailureScope;

    /// Check if the run can continue after this error
    fn is_recoverable(&self) -> bool {
        self.scope() != FailureScope::Run
    }
}

/// Classification of errors for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A catalog value failed validation
    Validation,
    /// Network-related errors (HTTP, status codes, truncated bodies)
    Network,
    /// Filesystem errors
    Storage,
    /// Catalog payload errors
    Parsing,
    /// Configuration errors
    Config,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Network => "network",
            Self::Storage => "storage",
            Self::Parsing => "parsing",
            Self::Config => "config",
        }
    }
}

/// Unit of work aborted by an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureScope {
    /// Only the current instruction is skipped
    Instruction,
    /// The current product is skipped
    Product,
    /// The run stops
    Run,
}

impl BrickdocErrorTrait for PurificationError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Validation
    }

    fn scope(&self) -> FailureScope {
        FailureScope::Product
    }
}

impl BrickdocErrorTrait for DownloadError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::Io { .. } => ErrorCategory::Storage,
            Self::InvalidUrl(_) => ErrorCategory::Validation,
            Self::Http { .. } | Self::Status { .. } | Self::Incomplete { .. } => {
                ErrorCategory::Network
            }
        }
    }

    fn scope(&self) -> FailureScope {
        FailureScope::Instruction
    }
}

impl BrickdocErrorTrait for DirectoryError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Storage
    }

    fn scope(&self) -> FailureScope {
        FailureScope::Run
    }
}

impl BrickdocErrorTrait for CatalogError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::Http(_) | Self::Status { .. } => ErrorCategory::Network,
            Self::MissingThemeData | Self::Json(_) => ErrorCategory::Parsing,
            Self::Io { .. } => ErrorCategory::Storage,
            Self::Url(_) => ErrorCategory::Config,
        }
    }

    fn scope(&self) -> FailureScope {
        FailureScope::Run
    }
}

/// Unified error type for the brickdoc crate
#[derive(Error, Debug)]
pub enum Error {
    /// A product field could not be purified
    #[error("Purification error: {0}")]
    Purification(#[from] PurificationError),

    /// An instruction could not be downloaded
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    /// A destination directory could not be created
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// The catalog could not be enumerated
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The run report could not be written
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The run report could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BrickdocErrorTrait for Error {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::Purification(e) => e.category(),
            Self::Download(e) => e.category(),
            Self::Directory(e) => e.category(),
            Self::Catalog(e) => e.category(),
            Self::Io(_) => ErrorCategory::Storage,
            Self::Json(_) => ErrorCategory::Parsing,
        }
    }

    fn scope(&self) -> FailureScope {
        match self {
            Self::Purification(e) => e.scope(),
            Self::Download(e) => e.scope(),
            Self::Directory(e) => e.scope(),
            Self::Catalog(e) => e.scope(),
            Self::Io(_) | Self::Json(_) => FailureScope::Run,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
