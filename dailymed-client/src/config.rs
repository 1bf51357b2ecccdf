//! Client configuration.

use std::time::Duration;

use crate::retry::RetryConfig;

/// Base URL of the public DailyMed service.
pub const DEFAULT_BASE_URL: &str = "https://dailymed.nlm.nih.gov/dailymed";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`DailyMedClient`](crate::DailyMedClient).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use dailymed_client::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_timeout(Duration::from_secs(10))
///     .with_user_agent("label-mirror/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Custom base URL; `None` selects the public DailyMed service
    pub base_url: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Custom user agent string
    pub user_agent: Option<String>,
    /// Backoff policy for transient request failures
    pub retry_config: RetryConfig,
}

impl ClientConfig {
    /// Create a configuration with the public base URL, a 30 second
    /// timeout, and the default retry policy.
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            retry_config: RetryConfig::default(),
        }
    }

    /// Override the service base URL (e.g. for a mock server in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        self.base_url = Some(base_url);
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the user agent sent with every request.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Override the retry policy.
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    /// Base URL requests are issued against.
    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// User agent sent with every request.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("dailymed-client/{}", env!("CARGO_PKG_VERSION")))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
