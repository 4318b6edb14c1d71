//! HTTP client with retry and bearer authentication
//!
//! Provides an ARM client that handles:
//! - Automatic retries with exponential backoff
//! - `Retry-After` on throttled responses
//! - Response body parsing
//! - Error classification for retry decisions

use super::types::{Page, PageRequest};
use crate::error::{is_retryable_status, Error, Result};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Public Azure Resource Manager endpoint
pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com";

/// Configuration for the ARM client
#[derive(Debug, Clone)]
pub struct ArmClientConfig {
    /// Resource Manager endpoint
    pub endpoint: String,
    /// Pre-acquired bearer token
    pub token: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of retries
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for ArmClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: None,
            timeout: Duration::from_secs(60),
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(60),
            user_agent: format!("azbill/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ArmClientConfig {
    /// Create a new config builder
    pub fn builder() -> ArmClientConfigBuilder {
        ArmClientConfigBuilder::default()
    }
}

/// Builder for ARM client config
#[derive(Default)]
pub struct ArmClientConfigBuilder {
    config: ArmClientConfig,
}

impl ArmClientConfigBuilder {
    /// Set the endpoint
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    /// Set the bearer token
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff bounds
    pub fn backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ArmClientConfig {
        self.config
    }
}

/// ARM client with retry
#[derive(Clone)]
pub struct ArmClient {
    client: Client,
    config: ArmClientConfig,
    endpoint: Url,
}

impl ArmClient {
    /// Create a client
    pub fn new(config: ArmClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        // A trailing slash keeps any base path when joining
        let endpoint = if config.endpoint.ends_with('/') {
            Url::parse(&config.endpoint)?
        } else {
            Url::parse(&format!("{}/", config.endpoint))?
        };
        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    /// Client configuration
    pub fn config(&self) -> &ArmClientConfig {
        &self.config
    }

    /// Resolve a page request to an absolute URL
    pub fn url_for(&self, request: &PageRequest) -> Result<Url> {
        match request {
            PageRequest::Link(link) => Ok(Url::parse(link)?),
            PageRequest::First { path, query } => {
                let mut url = self.endpoint.join(path.trim_start_matches('/'))?;
                url.query_pairs_mut().extend_pairs(query);
                Ok(url)
            }
        }
    }

    /// Fetch one page
    pub async fn get_page(&self, request: &PageRequest) -> Result<Page> {
        let url = self.url_for(request)?;
        self.get_json(url).await
    }

    /// GET a URL and parse the JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.get(url).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| Error::decode(format!("invalid response body: {e}")))
    }

    /// GET a URL, retrying throttled and transient failures
    pub async fn get(&self, url: Url) -> Result<Response> {
        let max_retries = self.config.max_retries;
        let mut attempt = 0;

        loop {
            let mut req = self.client.get(url.clone());
            if let Some(ref token) = self.config.token {
                req = req.bearer_auth(token);
            }

            match req.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = extract_retry_after(&response);
                        if attempt < max_retries {
                            let delay = retry_after
                                .map_or_else(|| self.calculate_backoff(attempt), Duration::from_secs);
                            warn!(
                                "Rate limited (429), attempt {}/{}, waiting {:?}",
                                attempt + 1,
                                max_retries + 1,
                                delay
                            );
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                            continue;
                        }
                        return Err(Error::RateLimited {
                            retry_after_seconds: retry_after.unwrap_or_default(),
                        });
                    }

                    if is_retryable_status(status.as_u16()) && attempt < max_retries {
                        let delay = self.calculate_backoff(attempt);
                        warn!(
                            "Request failed with {}, attempt {}/{}, retrying in {:?}",
                            status.as_u16(),
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    if status.is_client_error() || status.is_server_error() {
                        let body = response.text().await.unwrap_or_default();
                        return Err(Error::http_status(status.as_u16(), body));
                    }

                    debug!("Request succeeded: GET {}", url);
                    return Ok(response);
                }
                Err(e) if e.is_timeout() => {
                    if attempt < max_retries {
                        let delay = self.calculate_backoff(attempt);
                        warn!(
                            "Request timeout, attempt {}/{}, retrying in {:?}",
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    #[allow(clippy::cast_possible_truncation)]
                    return Err(Error::Timeout {
                        timeout_ms: self.config.timeout.as_millis() as u64,
                    });
                }
                Err(e) if e.is_connect() && attempt < max_retries => {
                    let delay = self.calculate_backoff(attempt);
                    warn!(
                        "Connection error, attempt {}/{}, retrying in {:?}",
                        attempt + 1,
                        max_retries + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(Error::Http(e)),
            }
        }
    }

    /// Calculate backoff delay for a given attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        std::cmp::min(
            self.config.initial_backoff.saturating_mul(factor),
            self.config.max_backoff,
        )
    }
}

impl std::fmt::Debug for ArmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArmClient")
            .field("endpoint", &self.config.endpoint)
            .field("has_token", &self.config.token.is_some())
            .field("max_retries", &self.config.max_retries)
            .finish_non_exhaustive()
    }
}

/// Seconds from a `Retry-After` header, if present
fn extract_retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}
