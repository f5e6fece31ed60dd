//! Configuration management for the brickdoc crawler
//!
//! This module handles loading and validating configuration from environment variables,
//! TOML files, and command-line arguments. Command-line flags are applied on top
//! by the binary.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::matcher::DEFAULT_EXCLUDED_THEMES;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Crawler configuration
    pub crawler: CrawlerConfig,

    /// Output locations
    pub storage: StorageConfig,

    /// Classification settings
    pub matcher: MatcherConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Crawler-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Catalog host, without trailing slash
    pub base_url: String,

    /// Locale segment of the landing page path
    pub locale: String,

    /// Rate limit (requests per second)
    pub rate_limit: f64,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Fixed user agent; a browser agent is rotated when unset
    pub user_agent: Option<String>,

    /// Maximum redirects followed per request
    pub max_redirects: usize,
}

/// Output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root of the instruction tree
    pub output_dir: PathBuf,

    /// Run report path; `{output_dir}/brickdoc-report.json` when unset
    pub report_path: Option<PathBuf>,
}

/// Classification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Themes whose products are skipped entirely
    pub excluded_themes: Vec<String>,

    /// Abort the run on the first product that fails purification
    pub stop_on_purification_error: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

/// File name of the run report inside the output directory
pub const DEFAULT_REPORT_FILE: &str = "brickdoc-report.json";

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://www.lego.com"),
            locale: String::from("en-us"),
            rate_limit: 2.0,
            request_timeout_secs: 30,
            user_agent: None,
            max_redirects: 10,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("instructions"),
            report_path: None,
        }
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            excluded_themes: DEFAULT_EXCLUDED_THEMES
                .iter()
                .map(|theme| theme.to_string())
                .collect(),
            stop_on_purification_error: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to the defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let base_url = std::env::var("BRICKDOC_BASE_URL")
            .unwrap_or(defaults.crawler.base_url)
            .trim_end_matches('/')
            .to_string();

        let locale = std::env::var("BRICKDOC_LOCALE").unwrap_or(defaults.crawler.locale);

        let rate_limit =
            env_parse::<f64>("BRICKDOC_RATE_LIMIT").unwrap_or(defaults.crawler.rate_limit);

        let request_timeout_secs = env_parse::<u64>("BRICKDOC_REQUEST_TIMEOUT")
            .unwrap_or(defaults.crawler.request_timeout_secs);

        let user_agent = std::env::var("BRICKDOC_USER_AGENT").ok();

        let max_redirects = env_parse::<usize>("BRICKDOC_MAX_REDIRECTS")
            .unwrap_or(defaults.crawler.max_redirects);

        let output_dir = std::env::var("BRICKDOC_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage.output_dir);

        let report_path = std::env::var("BRICKDOC_REPORT_PATH").ok().map(PathBuf::from);

        let excluded_themes = std::env::var("BRICKDOC_EXCLUDED_THEMES")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|theme| !theme.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or(defaults.matcher.excluded_themes);

        let stop_on_purification_error = env_parse::<bool>("BRICKDOC_STOP_ON_PURIFICATION_ERROR")
            .unwrap_or(defaults.matcher.stop_on_purification_error);

        let log_level =
            std::env::var("BRICKDOC_LOG_LEVEL").unwrap_or(defaults.logging.level);

        let log_format =
            std::env::var("BRICKDOC_LOG_FORMAT").unwrap_or(defaults.logging.format);

        Ok(Self {
            crawler: CrawlerConfig {
                base_url,
                locale,
                rate_limit,
                request_timeout_secs,
                user_agent,
                max_redirects,
            },
            storage: StorageConfig {
                output_dir,
                report_path,
            },
            matcher: MatcherConfig {
                excluded_themes,
                stop_on_purification_error,
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.crawler.rate_limit.is_nan() || self.crawler.rate_limit <= 0.0 {
            anyhow::bail!("rate_limit must be positive");
        }

        if self.crawler.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        url::Url::parse(&self.crawler.base_url)
            .with_context(|| format!("base_url is not a valid URL: {}", self.crawler.base_url))?;

        if self.crawler.locale.trim().is_empty() {
            anyhow::bail!("locale must not be empty");
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!("log format must be 'text' or 'json', got '{}'", self.logging.format);
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.crawler.request_timeout_secs)
    }

    /// Where the run report is written
    #[must_use]
    pub fn report_path(&self) -> PathBuf {
        self.storage
            .report_path
            .clone()
            .unwrap_or_else(|| self.storage.output_dir.join(DEFAULT_REPORT_FILE))
    }
}
