//! Common test utilities

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use brickdoc::crawler::fetcher::FileFetcher;
use brickdoc::models::{RawInstruction, RawProduct};
use brickdoc::utils::error::DownloadError;

/// Create a raw product with the given instructions
pub fn product(
    id: &str,
    title: &str,
    theme: &str,
    instructions: Vec<RawInstruction>,
) -> RawProduct {
    RawProduct {
        product_id: id.to_string(),
        product_name: title.to_string(),
        theme_name: theme.to_string(),
        launch_year: "2019".to_string(),
        building_instructions: instructions,
    }
}

/// Create a raw instruction
pub fn instruction(description: &str, pdf_location: &str) -> RawInstruction {
    RawInstruction::new(description, pdf_location)
}

/// Fetcher that writes a stub document and records every call
#[derive(Default)]
pub struct RecordingFetcher {
    calls: Mutex<Vec<(String, PathBuf)>>,

    /// URLs answered with a 404 status error
    failing: Vec<String>,
}

#[allow(dead_code)]
impl RecordingFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(urls: &[&str]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: urls.iter().map(|u| u.to_string()).collect(),
        }
    }

    pub fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl FileFetcher for RecordingFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<(), DownloadError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), destination.to_path_buf()));

        if self.failing.iter().any(|f| f == url) {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status: 404,
            });
        }

        std::fs::write(destination, b"%PDF-1.4 test").map_err(|source| DownloadError::Io {
            path: destination.to_path_buf(),
            source,
        })
    }
}
