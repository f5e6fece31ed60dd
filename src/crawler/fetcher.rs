//! Instruction document downloads
//!
//! This module provides the file fetch collaborator used by the product
//! pipeline:
//! - Redirects are followed by the shared client (bounded by configuration)
//! - The body is streamed to `~{filename}` next to the destination
//! - Only a complete 200 response is renamed into place
//! - No retries; a failure is reported on the instruction and the run goes on

use async_trait::async_trait;
use reqwest::StatusCode;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

use crate::crawler::client::HttpClient;
use crate::crawler::headers::build_download_headers;
use crate::storage::layout::temp_path;
use crate::utils::error::DownloadError;

/// Downloads a document to a destination path
///
/// Implementations must leave nothing at `destination` unless the whole
/// document was received.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<(), DownloadError>;
}

/// HTTP implementation of [`FileFetcher`]
pub struct DocumentFetcher {
    client: Arc<HttpClient>,
}

impl DocumentFetcher {
    #[must_use]
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Stream the response body into `temp`, returning the byte count
    async fn download(&self, url: &str, temp: &Path) -> Result<u64, DownloadError> {
        let headers = build_download_headers(self.client.user_agent());
        let mut response = self
            .client
            .get(url, headers)
            .await
            .map_err(|source| DownloadError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let expected = response.content_length();
        let io_error = |source| DownloadError::Io {
            path: temp.to_path_buf(),
            source,
        };

        let mut file = tokio::fs::File::create(temp).await.map_err(io_error)?;
        let mut received: u64 = 0;

        loop {
            let chunk = match response.chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(source) => {
                    return Err(match expected {
                        // The connection dropped before the declared length arrived
                        Some(expected) if received < expected => DownloadError::Incomplete {
                            url: url.to_string(),
                            expected,
                            received,
                        },
                        _ => DownloadError::Http {
                            url: url.to_string(),
                            source,
                        },
                    });
                }
            };
            file.write_all(&chunk).await.map_err(io_error)?;
            received += chunk.len() as u64;
        }
        file.flush().await.map_err(io_error)?;
        drop(file);

        if let Some(expected) = expected {
            if received < expected {
                return Err(DownloadError::Incomplete {
                    url: url.to_string(),
                    expected,
                    received,
                });
            }
        }

        Ok(received)
    }
}

#[async_trait]
impl FileFetcher for DocumentFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<(), DownloadError> {
        url::Url::parse(url).map_err(|e| DownloadError::InvalidUrl(format!("{url}: {e}")))?;

        let temp = temp_path(destination);

        let result = match self.download(url, &temp).await {
            Ok(bytes) => tokio::fs::rename(&temp, destination)
                .await
                .map(|()| bytes)
                .map_err(|source| DownloadError::Io {
                    path: destination.to_path_buf(),
                    source,
                }),
            Err(e) => Err(e),
        };

        match result {
            Ok(bytes) => {
                tracing::debug!(url, path = %destination.display(), bytes, "Download complete");
                Ok(())
            }
            Err(e) => {
                if let Err(remove_err) = tokio::fs::remove_file(&temp).await {
                    if remove_err.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(
                            path = %temp.display(),
                            error = %remove_err,
                            "Failed to remove temporary file"
                        );
                    }
                }
                Err(e)
            }
        }
    }
}
