//! HTTP client with rate limiting for the Dizipal mirrors
//!
//! Every request goes through a shared `RateLimiter`, so successive page
//! fetches are always spaced out regardless of which collector issues them.
//! Requests are attempted exactly once; callers decide what a failure means.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use tracing::debug;

use crate::error::{DizipalError, Result};

/// Default User-Agent mimicking a modern browser
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default Accept header for HTML and XML documents
const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Default Accept-Language header for Turkish content
const DEFAULT_ACCEPT_LANGUAGE: &str = "tr-TR,tr;q=0.9,en-US;q=0.8,en;q=0.7";

/// Rate limiter to control request frequency
///
/// Ensures that requests are spaced at least `min_interval` apart
/// to avoid getting throttled or blocked by the mirror.
pub struct RateLimiter {
    /// Minimum interval between requests
    min_interval: Duration,
    /// Timestamp of the last request
    last_request: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the specified requests per second
    ///
    /// # Arguments
    /// * `requests_per_second` - Maximum number of requests allowed per second
    ///
    /// # Example
    /// ```
    /// use dizipal_core::client::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(2.0); // 2 requests per second
    /// ```
    pub fn new(requests_per_second: f64) -> Self {
        let min_interval = Duration::from_secs_f64(1.0 / requests_per_second);
        let now = Instant::now();
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(now.checked_sub(min_interval).unwrap_or(now))),
        }
    }

    /// Acquire permission to make a request
    ///
    /// This method will wait if necessary to ensure the minimum interval
    /// between requests is respected.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();

        if elapsed < self.min_interval {
            let wait_time = self.min_interval - elapsed;
            sleep(wait_time).await;
        }

        *last = Instant::now();
    }

    /// Get the minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Maximum requests per second (default: 2.0)
    pub requests_per_second: f64,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// User-Agent sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 2.0,
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Result of a single fetch as seen by the crawl paths.
///
/// `Empty` means the server answered but there is nothing to read
/// (blank body or 404). `Failed` carries everything else.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Non-empty response body
    Body(String),
    /// Nothing at this address
    Empty,
    /// Network error, timeout or unexpected status
    Failed(DizipalError),
}

impl FetchOutcome {
    /// Convert a fetch result into an outcome.
    pub fn from_result(result: Result<String>) -> Self {
        match result {
            Ok(body) if body.trim().is_empty() => FetchOutcome::Empty,
            Ok(body) => FetchOutcome::Body(body),
            Err(DizipalError::NotFound(_)) => FetchOutcome::Empty,
            Err(err) => FetchOutcome::Failed(err),
        }
    }

    /// The body, if there is one.
    pub fn into_body(self) -> Option<String> {
        match self {
            FetchOutcome::Body(body) => Some(body),
            _ => None,
        }
    }
}

/// HTTP client for the Dizipal mirrors with rate limiting
///
/// This client automatically:
/// - Limits request rate to stay polite towards the mirror
/// - Applies a per-request timeout
/// - Sets browser-like headers for Turkish content
pub struct DizipalClient {
    /// Underlying HTTP client
    client: reqwest::Client,
    /// Rate limiter for request throttling
    rate_limiter: RateLimiter,
}

impl DizipalClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE));

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .default_headers(headers)
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let rate_limiter = RateLimiter::new(config.requests_per_second);

        Ok(Self {
            client,
            rate_limiter,
        })
    }

    /// Fetch a document by absolute URL.
    ///
    /// # Errors
    /// - `DizipalError::HttpError` - Network error, timeout or non-2xx status
    /// - `DizipalError::RateLimited` - Server returned 429
    /// - `DizipalError::NotFound` - Server returned 404
    pub async fn fetch(&self, url: &str) -> Result<String> {
        self.get(url, None, None).await
    }

    /// Fetch a document with an explicit `Referer`, as player frames expect.
    pub async fn fetch_with_referer(&self, url: &str, referer: &str) -> Result<String> {
        self.get(url, Some(referer), None).await
    }

    /// Fetch a document with a timeout shorter than the client default.
    pub async fn fetch_with_timeout(&self, url: &str, timeout: Duration) -> Result<String> {
        self.get(url, None, Some(timeout)).await
    }

    /// Fetch a document and fold the result into a `FetchOutcome`.
    pub async fn fetch_outcome(&self, url: &str) -> FetchOutcome {
        FetchOutcome::from_result(self.fetch(url).await)
    }

    async fn get(&self, url: &str, referer: Option<&str>, timeout: Option<Duration>) -> Result<String> {
        self.rate_limiter.acquire().await;
        debug!(url, "GET");

        let mut request = self.client.get(url);
        if let Some(referer) = referer {
            request = request.header(REFERER, referer);
        }
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.text().await?);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DizipalError::NotFound(url.to_string()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DizipalError::RateLimited);
        }

        Err(response
            .error_for_status()
            .map(|_| DizipalError::ParseError(format!("unexpected status {} for {}", status, url)))
            .unwrap_or_else(DizipalError::HttpError))
    }

    /// Get a reference to the rate limiter (for testing)
    #[cfg(test)]
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_creation() {
        let limiter = RateLimiter::new(2.0);
        assert_eq!(limiter.min_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_rate_limiter_different_rates() {
        let limiter = RateLimiter::new(1.0);
        assert_eq!(limiter.min_interval(), Duration::from_secs(1));

        let limiter = RateLimiter::new(4.0);
        assert_eq!(limiter.min_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.requests_per_second, 2.0);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_client_creation() {
        let client = DizipalClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_with_custom_config() {
        let config = ClientConfig {
            requests_per_second: 1.0,
            timeout_secs: 60,
            ..ClientConfig::default()
        };
        let client = DizipalClient::with_config(config).unwrap();
        assert_eq!(client.rate_limiter().min_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_fetch_outcome_classification() {
        assert!(matches!(
            FetchOutcome::from_result(Ok("<urlset/>".to_string())),
            FetchOutcome::Body(_)
        ));
        assert!(matches!(
            FetchOutcome::from_result(Ok("  \n".to_string())),
            FetchOutcome::Empty
        ));
        assert!(matches!(
            FetchOutcome::from_result(Err(DizipalError::NotFound("x".to_string()))),
            FetchOutcome::Empty
        ));
        assert!(matches!(
            FetchOutcome::from_result(Err(DizipalError::RateLimited)),
            FetchOutcome::Failed(DizipalError::RateLimited)
        ));
    }

    #[tokio::test]
    async fn test_rate_limiter_acquire() {
        let limiter = RateLimiter::new(10.0); // 100ms interval

        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(100));
    }
}
