//! On-disk layout of downloaded instructions
//!
//! ```text
//! {root}/{theme}/{year}/{id} - {title}/{id}-{filename tail}
//! ```
//!
//! Every path component comes from a purified value, so nothing here can
//! escape the root.

use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::models::PurifiedProduct;
use crate::purify::purify_instruction_filename;
use crate::utils::error::{DirectoryError, DownloadError};

/// Prefix of in-progress downloads
pub const TEMP_PREFIX: char = '~';

/// Resolves target paths below an absolute root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    /// Create a layout rooted at `root`, made absolute against the current directory
    pub fn new(root: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let root = root.as_ref();
        let root = std::path::absolute(root).map_err(|source| DirectoryError {
            path: root.to_path_buf(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root directory if needed
    pub async fn ensure_root(&self) -> Result<(), DirectoryError> {
        ensure_directory(&self.root).await
    }

    /// Directory holding all instructions of a product
    pub fn product_dir(&self, product: &PurifiedProduct) -> PathBuf {
        self.root
            .join(product.theme())
            .join(product.year())
            .join(product.directory_name())
    }

    /// Target path of one instruction document
    ///
    /// # Errors
    ///
    /// * [`Error::Download`] with [`DownloadError::InvalidUrl`] when the
    ///   location has no usable file name
    /// * [`Error::Purification`] when `{id}-{tail}` cannot be made a valid
    ///   file name
    pub fn instruction_path(
        &self,
        product: &PurifiedProduct,
        pdf_location: &str,
    ) -> Result<PathBuf, Error> {
        let tail = filename_tail(pdf_location)?;
        let filename = purify_instruction_filename(&format!("{}-{}", product.id(), tail))?;
        Ok(self.product_dir(product).join(filename))
    }
}

/// Last path segment of a document URL
///
/// The segment is returned still percent-encoded; purification turns `%20`
/// into a space.
pub fn filename_tail(pdf_location: &str) -> Result<String, DownloadError> {
    let url = url::Url::parse(pdf_location)
        .map_err(|e| DownloadError::InvalidUrl(format!("{pdf_location}: {e}")))?;

    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .ok_or_else(|| DownloadError::InvalidUrl(format!("{pdf_location}: no file name")))
}

/// Sibling path used while a download is in progress: `~{filename}`
pub fn temp_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    destination.with_file_name(format!("{TEMP_PREFIX}{name}"))
}

/// Create a directory and its parents; succeeds when it already exists
pub async fn ensure_directory(path: &Path) -> Result<(), DirectoryError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| DirectoryError {
            path: path.to_path_buf(),
            source,
        })
}
