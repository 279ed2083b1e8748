//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building the shared HTTP client with browser-like headers
//! - Jittered delays before every request
//! - Bounded retries with a longer jittered backoff
//! - Error classification

use crate::config::{Config, FetcherConfig, UserAgentConfig};
use crate::{ConfigError, SpiderError};
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, Response, StatusCode};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Terminal failure of a page fetch, reported once all attempts are spent
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server kept answering with a non-2xx status
    #[error("HTTP {status} from {url} after {attempts} attempt(s)")]
    Status {
        url: String,
        status: u16,
        attempts: u32,
    },

    /// Transport failure (connection refused, timeout, broken body, ...)
    #[error("Network error for {url} after {attempts} attempt(s): {message}")]
    Network {
        url: String,
        message: String,
        attempts: u32,
    },
}

impl FetchError {
    /// Number of attempts made before giving up
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Status { attempts, .. } | Self::Network { attempts, .. } => *attempts,
        }
    }

    /// The URL that could not be fetched
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. } | Self::Network { url, .. } => url,
        }
    }
}

/// Failure of a single attempt
#[derive(Debug)]
enum AttemptFailure {
    Status(StatusCode),
    Network(String),
}

impl AttemptFailure {
    fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Network("Request timeout".to_string())
        } else if error.is_connect() {
            Self::Network("Connection refused".to_string())
        } else {
            Self::Network(error.to_string())
        }
    }

    fn into_fetch_error(self, url: &Url, attempts: u32) -> FetchError {
        match self {
            Self::Status(status) => FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                attempts,
            },
            Self::Network(message) => FetchError::Network {
                url: url.to_string(),
                message,
                attempts,
            },
        }
    }
}

/// Builds the HTTP client shared by page fetches and image downloads
///
/// Every request carries the configured browser User-Agent together with
/// standard `Accept` and `Accept-Language` headers.
///
/// # Example
///
/// ```no_run
/// use image_spider::config::{FetcherConfig, UserAgentConfig};
/// use image_spider::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    fetcher: &FetcherConfig,
) -> Result<Client, SpiderError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, header_value("accept", &user_agent.accept)?);
    headers.insert(
        ACCEPT_LANGUAGE,
        header_value("accept-language", &user_agent.accept_language)?,
    );

    let client = Client::builder()
        .user_agent(user_agent.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(fetcher.timeout_secs))
        .connect_timeout(Duration::from_secs(fetcher.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value)
        .map_err(|e| ConfigError::Validation(format!("Invalid {} header: {}", name, e)))
}

/// Draws a uniformly random delay between `min_ms` and `max_ms` inclusive
pub fn random_delay(min_ms: u64, max_ms: u64) -> Duration {
    if max_ms <= min_ms {
        return Duration::from_millis(min_ms);
    }
    Duration::from_millis(rand::thread_rng().gen_range(min_ms..=max_ms))
}

/// Page fetcher with jittered delays and bounded retries
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | 2xx | Return body |
/// | Non-2xx status | Retry with backoff |
/// | Transport error | Retry with backoff |
/// | Attempts exhausted | Return `FetchError` |
///
/// Each attempt is preceded by the page delay; retries additionally wait for
/// the retry backoff first.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    config: FetcherConfig,
}

impl Fetcher {
    /// Creates a fetcher around an existing client
    pub fn new(client: Client, config: FetcherConfig) -> Self {
        Self { client, config }
    }

    /// Builds the client and fetcher from the full configuration
    pub fn from_config(config: &Config) -> Result<Self, SpiderError> {
        let client = build_http_client(&config.user_agent, &config.fetcher)?;
        Ok(Self::new(client, config.fetcher.clone()))
    }

    /// The underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Fetches a URL and returns the response body decoded as text
    pub async fn fetch_text(&self, url: &Url) -> Result<String, FetchError> {
        self.fetch_with_retry(url, Response::text).await
    }

    async fn fetch_with_retry<T, F, Fut>(&self, url: &Url, read_body: F) -> Result<T, FetchError>
    where
        F: Fn(Response) -> Fut,
        Fut: Future<Output = Result<T, reqwest::Error>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let delay = random_delay(self.config.page_delay_min_ms, self.config.page_delay_max_ms);
            tokio::time::sleep(delay).await;

            tracing::trace!("GET {} (attempt {}/{})", url, attempt, max_attempts);
            let failure = match self.attempt(url, &read_body).await {
                Ok(body) => return Ok(body),
                Err(failure) => failure,
            };

            if attempt >= max_attempts {
                return Err(failure.into_fetch_error(url, attempt));
            }

            let backoff =
                random_delay(self.config.retry_delay_min_ms, self.config.retry_delay_max_ms);
            tracing::debug!(
                "Attempt {}/{} for {} failed ({:?}), retrying in {:?}",
                attempt,
                max_attempts,
                url,
                failure,
                backoff
            );
            tokio::time::sleep(backoff).await;
        }
    }

    async fn attempt<T, F, Fut>(&self, url: &Url, read_body: &F) -> Result<T, AttemptFailure>
    where
        F: Fn(Response) -> Fut,
        Fut: Future<Output = Result<T, reqwest::Error>>,
    {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AttemptFailure::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptFailure::Status(status));
        }

        read_body(response)
            .await
            .map_err(|e| AttemptFailure::from_reqwest(&e))
    }
}
