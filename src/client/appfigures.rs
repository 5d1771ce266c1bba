//! Appfigures client module
//!
//! Provides `AppFiguresClient` for making authenticated requests against the
//! Appfigures REST API, retrying failures classified as retriable.

use super::{ApiError, ApiTransport, Auth, classify_status};
use eyre::{Context, Result};
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Default Appfigures API base URL
pub const DEFAULT_API_URL: &str = "https://api.appfigures.com/v2";

/// How often and how patiently retriable failures are retried
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per request, including the first
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Send every request exactly once
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before the attempt following attempt number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Appfigures client for making API requests.
///
/// # Example
/// ```no_run
/// use tap_appfigures::client::{AppFiguresClient, ApiTransport, Auth};
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let url = Url::parse("https://api.appfigures.com/v2")?;
/// let client = AppFiguresClient::try_new(url, Auth::Bearer("pat".into()), "tap-appfigures")?;
///
/// let products = client.get_json("/products/mine", &[]).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct AppFiguresClient {
    client: Client,
    url: Url,
    retry: RetryPolicy,
}

impl AppFiguresClient {
    /// Create a new client from a base URL, auth and User-Agent.
    ///
    /// # Errors
    /// Returns an error if the headers are invalid or the HTTP client cannot be built
    pub fn try_new(url: Url, auth: Auth, user_agent: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            user_agent
                .parse()
                .with_context(|| format!("Invalid User-Agent: {}", user_agent))?,
        );
        if let Some((name, value)) = auth.header()? {
            headers.insert(name, value);
        }
        log::debug!("Using {} auth against {}", auth, url);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url,
            retry: RetryPolicy::default(),
        })
    }

    /// Replace the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Get the base URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Resolve an API path against the base URL, keeping any base path segment (e.g. `/v2`)
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut base = self.url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        let path_stripped = path.strip_prefix('/').unwrap_or(path);
        base.join(path_stripped)
            .with_context(|| format!("Invalid API path: {}", path))
    }

    /// Send a GET request, retrying retriable failures per the retry policy.
    ///
    /// # Errors
    /// Returns the final [`ApiError`] when the request is fatal or retries are exhausted
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<reqwest::Response> {
        let url = self.endpoint(path)?;
        log::debug!("GET {} {:?}", url, query);

        let mut attempt = 1;
        loop {
            match self.send_once(url.clone(), path, query).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retriable() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.backoff(attempt);
                    log::warn!(
                        "{} (attempt {}/{}), retrying in {:?}",
                        e,
                        attempt,
                        self.retry.max_attempts,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    log::error!("{} (attempt {}/{})", e, attempt, self.retry.max_attempts);
                    return Err(e.into());
                }
            }
        }
    }

    async fn send_once(
        &self,
        url: Url,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, ApiError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        classify_status(
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            path,
        )?;
        Ok(response)
    }
}

impl ApiTransport for AppFiguresClient {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let response = self.get(path, query).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }
}

impl std::fmt::Display for AppFiguresClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> AppFiguresClient {
        let url = Url::parse(base).unwrap();
        AppFiguresClient::try_new(url, Auth::None, "tap-appfigures/test").unwrap()
    }

    #[test]
    fn test_endpoint_keeps_version_segment() {
        let client = client("https://api.appfigures.com/v2");
        assert_eq!(
            client.endpoint("/products/mine").unwrap().as_str(),
            "https://api.appfigures.com/v2/products/mine"
        );
        assert_eq!(
            client.endpoint("reports/subscriptions").unwrap().as_str(),
            "https://api.appfigures.com/v2/reports/subscriptions"
        );
    }

    #[test]
    fn test_endpoint_trailing_slash_base() {
        let client = client("http://localhost:8080/");
        assert_eq!(
            client.endpoint("/products/mine").unwrap().as_str(),
            "http://localhost:8080/products/mine"
        );
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(1000),
        };
        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(4), Duration::from_millis(800));
        assert_eq!(policy.backoff(5), Duration::from_millis(1000));
        assert_eq!(policy.backoff(64), Duration::from_millis(1000));
    }

    #[test]
    fn test_default_policy() {
        let client = client(DEFAULT_API_URL);
        assert_eq!(client.retry_policy().max_attempts, 5);
        let client = client.with_retry_policy(RetryPolicy::none());
        assert_eq!(client.retry_policy().max_attempts, 1);
    }

    #[test]
    fn test_invalid_user_agent() {
        let url = Url::parse(DEFAULT_API_URL).unwrap();
        assert!(AppFiguresClient::try_new(url, Auth::None, "bad\nagent").is_err());
    }
}
