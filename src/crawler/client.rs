//! Shared HTTP client with rate limiting
//!
//! Catalog requests and document downloads go through the same client, so a
//! single governor quota bounds the load the crawler puts on the host.

use anyhow::{Context, Result};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::{header::HeaderMap, redirect, Client, Response};
use std::time::Duration;

use crate::config::Config;
use crate::crawler::headers::random_user_agent;

/// Rate-limited HTTP client
pub struct HttpClient {
    /// HTTP client with configured timeout, redirects and compression
    client: Client,

    /// Rate limiter to control request frequency
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    /// Fixed user agent; rotated from the browser pool when `None`
    user_agent: Option<String>,
}

impl HttpClient {
    /// Create a client from the crawler configuration
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid or the HTTP client cannot be built
    pub fn new(config: &Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .redirect(redirect::Policy::limited(config.crawler.max_redirects))
            .cookie_store(true)
            .gzip(true)
            .build()
            .context("Failed to create HTTP client")?;

        // One request every 1/rate seconds; fractional rates are allowed
        let period = Duration::try_from_secs_f64(1.0 / config.crawler.rate_limit)
            .ok()
            .and_then(Quota::with_period)
            .context("Invalid rate limit value")?;
        let rate_limiter = RateLimiter::direct(period);

        Ok(Self {
            client,
            rate_limiter,
            user_agent: config.crawler.user_agent.clone(),
        })
    }

    /// User agent for the next request
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or_else(|| random_user_agent())
    }

    /// Send a GET request once the rate limiter allows it
    ///
    /// The response is returned whatever its status; callers decide what a
    /// failure is.
    pub async fn get(&self, url: &str, headers: HeaderMap) -> Result<Response, reqwest::Error> {
        self.rate_limiter.until_ready().await;

        tracing::debug!(url = %url, "Fetching URL");

        self.client.get(url).headers(headers).send().await
    }
}
