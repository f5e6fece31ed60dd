//! Catalog sources
//!
//! A catalog delivers the theme list once, then pages of raw products per
//! theme until it signals the end of data.
//!
//! - [`LegoCatalog`] reads the live service: the theme list is embedded as
//!   JSON in the landing page, products come from the search service.
//! - [`FileCatalog`] serves a JSON array of products from disk, for offline
//!   runs and replays.

use async_trait::async_trait;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, LazyLock};

use crate::config::CrawlerConfig;
use crate::crawler::client::HttpClient;
use crate::crawler::headers::{build_api_headers, build_page_headers};
use crate::models::RawProduct;
use crate::utils::error::CatalogError;

static THEMES_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-search-themes]").unwrap());

/// Attribute carrying the theme list on the landing page
const THEMES_ATTRIBUTE: &str = "data-search-themes";

/// Theme entry of the landing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeRef {
    /// Identifier passed to the search service
    #[serde(rename = "Key")]
    pub key: String,

    /// Display name
    #[serde(rename = "Label", default)]
    pub label: Option<String>,
}

impl ThemeRef {
    /// Label when present, key otherwise
    pub fn name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }

    /// True when `selector` names this theme by key or label, ignoring case
    pub fn is_named(&self, selector: &str) -> bool {
        self.key.eq_ignore_ascii_case(selector)
            || self
                .label
                .as_deref()
                .is_some_and(|label| label.eq_ignore_ascii_case(selector))
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogPage {
    /// False on the last page
    pub more_data: bool,

    /// Number of products on this page; the next page starts `count` further
    pub count: usize,

    pub products: Vec<RawProduct>,
}

/// Source of themes and product pages
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// All themes the catalog offers
    async fn themes(&self) -> Result<Vec<ThemeRef>, CatalogError>;

    /// Products of `theme` starting at `from_index`
    async fn page(&self, theme: &str, from_index: usize) -> Result<CatalogPage, CatalogError>;
}

/// Live catalog backed by the building-instruction service
pub struct LegoCatalog {
    client: Arc<HttpClient>,
    base_url: String,
    locale: String,
}

impl LegoCatalog {
    #[must_use]
    pub fn new(client: Arc<HttpClient>, config: &CrawlerConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            locale: config.locale.clone(),
        }
    }

    /// Landing page that embeds the theme list
    pub fn landing_url(&self) -> String {
        format!("{}/{}/service/buildinginstructions", self.base_url, self.locale)
    }

    /// Search service URL for one page of a theme
    pub fn search_url(&self, theme: &str, from_index: usize) -> Result<url::Url, CatalogError> {
        let url = url::Url::parse_with_params(
            &format!("{}/service/biservice/searchbytheme", self.base_url),
            &[
                ("fromIndex", from_index.to_string().as_str()),
                ("onlyAlternatives", "false"),
                ("theme", theme),
            ],
        )?;
        Ok(url)
    }

    async fn get_text(
        &self,
        url: &str,
        headers: reqwest::header::HeaderMap,
    ) -> Result<String, CatalogError> {
        let response = self.client.get(url, headers).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl CatalogSource for LegoCatalog {
    async fn themes(&self) -> Result<Vec<ThemeRef>, CatalogError> {
        let url = self.landing_url();
        let headers = build_page_headers(self.client.user_agent(), None);
        let html = self.get_text(&url, headers).await?;

        let themes = parse_themes(&html)?;
        tracing::info!(url = %url, themes = themes.len(), "Loaded theme list");
        Ok(themes)
    }

    async fn page(&self, theme: &str, from_index: usize) -> Result<CatalogPage, CatalogError> {
        let url = self.search_url(theme, from_index)?;
        let referer = self.landing_url();
        let headers = build_api_headers(self.client.user_agent(), Some(&referer));

        tracing::trace!(url = %url, "Fetching catalog page");

        let body = self.get_text(url.as_str(), headers).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Extract the theme list from the landing page
///
/// # Errors
///
/// [`CatalogError::MissingThemeData`] when no element carries the attribute,
/// [`CatalogError::Json`] when its value is not a theme array.
pub fn parse_themes(html: &str) -> Result<Vec<ThemeRef>, CatalogError> {
    let document = Html::parse_document(html);

    let raw = document
        .select(&THEMES_SELECTOR)
        .find_map(|element| element.value().attr(THEMES_ATTRIBUTE))
        .ok_or(CatalogError::MissingThemeData)?;

    Ok(serde_json::from_str(raw)?)
}

/// Catalog read from a JSON file holding an array of products
#[derive(Debug, Clone)]
pub struct FileCatalog {
    products: Vec<RawProduct>,
    page_size: usize,
}

impl FileCatalog {
    /// Products per page served by [`CatalogSource::page`]
    pub const DEFAULT_PAGE_SIZE: usize = 50;

    /// Load a catalog file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let products: Vec<RawProduct> = serde_json::from_str(&content)?;

        tracing::info!(path = %path.display(), products = products.len(), "Loaded catalog file");
        Ok(Self::from_products(products))
    }

    #[must_use]
    pub fn from_products(products: Vec<RawProduct>) -> Self {
        Self {
            products,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

#[async_trait]
impl CatalogSource for FileCatalog {
    /// Distinct raw theme names, in order of first appearance
    async fn themes(&self) -> Result<Vec<ThemeRef>, CatalogError> {
        let mut themes: Vec<ThemeRef> = Vec::new();
        for product in &self.products {
            if !themes.iter().any(|t| t.key == product.theme_name) {
                themes.push(ThemeRef {
                    key: product.theme_name.clone(),
                    label: None,
                });
            }
        }
        Ok(themes)
    }

    async fn page(&self, theme: &str, from_index: usize) -> Result<CatalogPage, CatalogError> {
        let matching: Vec<&RawProduct> = self
            .products
            .iter()
            .filter(|p| p.theme_name == theme)
            .collect();

        let products: Vec<RawProduct> = matching
            .iter()
            .skip(from_index)
            .take(self.page_size)
            .map(|p| (*p).clone())
            .collect();

        Ok(CatalogPage {
            more_data: from_index + products.len() < matching.len(),
            count: products.len(),
            products,
        })
    }
}
