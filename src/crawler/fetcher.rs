//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with browser-like default headers
//! - Automatic retry with exponential backoff on transient 5xx responses
//! - A single manual retry with a longer timeout for every other failure
//! - The politeness pause between detail page fetches

use crate::config::FetcherConfig;
use crate::ConfigError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, REFERER, USER_AGENT};
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Raw bytes of a fetched document
pub type DocumentBytes = Vec<u8>;

/// Root cause of a failed fetch attempt
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status
    #[error("HTTP status {0}")]
    Status(u16),

    /// Timeout, connection failure, or body read failure
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
}

/// A URL that could not be fetched even after the manual retry
#[derive(Debug, Error)]
#[error("Failed to fetch {url}: {source}")]
pub struct FetchFailure {
    pub url: String,
    pub source: FetchError,
}

/// HTTP statuses retried automatically with backoff
const RETRYABLE_STATUSES: [StatusCode; 4] = [
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

/// Resilient document fetcher
///
/// All knobs come from the [`FetcherConfig`] given at construction; nothing
/// about the client can be changed per call.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    retry_limit: u32,
    backoff_base: Duration,
    timeout_short: Duration,
    timeout_long: Duration,
    manual_retry_delay: Duration,
    politeness_delay: Duration,
}

impl Fetcher {
    /// Builds a fetcher from its configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Retry, timeout and header settings
    /// * `referer` - Site origin sent as the Referer header
    ///
    /// # Example
    ///
    /// ```no_run
    /// use wiki_distill::config::FetcherConfig;
    /// use wiki_distill::crawler::Fetcher;
    ///
    /// let fetcher = Fetcher::new(&FetcherConfig::default(), "https://example.com").unwrap();
    /// ```
    pub fn new(config: &FetcherConfig, referer: &str) -> crate::Result<Self> {
        let client = build_http_client(config, referer)?;

        Ok(Self {
            client,
            retry_limit: config.retry_limit,
            backoff_base: Duration::from_millis(config.backoff_base_ms),
            timeout_short: Duration::from_millis(config.timeout_short_ms),
            timeout_long: Duration::from_millis(config.timeout_long_ms),
            manual_retry_delay: Duration::from_millis(config.manual_retry_delay_ms),
            politeness_delay: Duration::from_millis(config.politeness_delay_ms),
        })
    }

    /// Fetches a URL, retrying once manually if the first attempt fails
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 500/502/503/504 | Retry up to `retry-limit` times with backoff |
    /// | Other non-2xx status | Manual retry with the long timeout |
    /// | Timeout / connection error | Manual retry with the long timeout |
    /// | Manual retry fails | `FetchFailure` with the last root cause |
    pub async fn fetch(&self, url: &str) -> Result<DocumentBytes, FetchFailure> {
        match self.attempt(url, self.timeout_short).await {
            Ok(body) => Ok(body),
            Err(first) => {
                tracing::warn!("Connection unstable for {} ({}), retrying", url, first);
                tokio::time::sleep(self.manual_retry_delay).await;

                self.attempt(url, self.timeout_long)
                    .await
                    .map_err(|source| FetchFailure {
                        url: url.to_string(),
                        source,
                    })
            }
        }
    }

    /// Sleeps for the configured politeness delay
    pub async fn politeness_pause(&self) {
        if !self.politeness_delay.is_zero() {
            tokio::time::sleep(self.politeness_delay).await;
        }
    }

    /// One attempt with the given timeout, including automatic 5xx retries
    async fn attempt(&self, url: &str, timeout: Duration) -> Result<DocumentBytes, FetchError> {
        let mut retries = 0;

        loop {
            let response = self
                .client
                .get(url)
                .timeout(timeout)
                .send()
                .await
                .map_err(FetchError::Transport)?;

            let status = response.status();

            if is_retryable_status(status) && retries < self.retry_limit {
                retries += 1;
                let delay = backoff_delay(self.backoff_base, retries);
                tracing::debug!(
                    "HTTP {} from {}, retry {}/{} in {:?}",
                    status.as_u16(),
                    url,
                    retries,
                    self.retry_limit,
                    delay
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }

            let body = response.bytes().await.map_err(FetchError::Transport)?;
            return Ok(body.to_vec());
        }
    }
}

/// Builds an HTTP client with the fixed browser-like header set
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(DistillError)` - A header value was invalid or the client failed to build
pub fn build_http_client(config: &FetcherConfig, referer: &str) -> crate::Result<Client> {
    Ok(http_client_builder(config, referer)?.build()?)
}

/// Client settings derived from the fetcher configuration, before building
fn http_client_builder(
    config: &FetcherConfig,
    referer: &str,
) -> Result<ClientBuilder, ConfigError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, header_value("user-agent", &config.user_agent)?);
    headers.insert(ACCEPT, header_value("accept", &config.accept)?);
    headers.insert(REFERER, header_value("referer", referer)?);

    Ok(Client::builder()
        .default_headers(headers)
        .connect_timeout(Duration::from_millis(config.timeout_long_ms))
        .danger_accept_invalid_certs(!config.verify_tls)
        .gzip(true)
        .brotli(true))
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value)
        .map_err(|e| ConfigError::Validation(format!("Invalid {} header '{}': {}", name, value, e)))
}

/// Returns true if the status is a transient server-side failure
pub fn is_retryable_status(status: StatusCode) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}

/// Delay before automatic retry number `retry` (1-based): `base * 2^(retry-1)`
///
/// Saturates instead of overflowing for large retry numbers.
pub fn backoff_delay(base: Duration, retry: u32) -> Duration {
    let exponent = retry.saturating_sub(1).min(31);
    base.saturating_mul(1u32 << exponent)
}
