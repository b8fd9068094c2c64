//! Client configuration.

use std::time::Duration;

use kms_client::KmsError;
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Connection limit used when none is configured.
pub const DEFAULT_MAX_CONNECTIONS: usize = kms_client::DEFAULT_POOL_SIZE;

/// Request timeout used when none is configured, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Connect timeout used when none is configured, in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

/// Configuration of the HTTP transport.
///
/// Every field has a default, so a partial document deserializes:
///
/// ```
/// use kms_http::ClientConfig;
///
/// let config: ClientConfig = serde_json::from_str(r#"{ "region": "eu-west-3" }"#).unwrap();
/// assert_eq!(config.endpoint_url(), "https://kms.eu-west-3.amazonaws.com");
/// assert_eq!(config.max_connections, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Region the service endpoint is derived from.
    pub region: String,
    /// Endpoint overriding the regional one, e.g. a local stub.
    pub endpoint: Option<String>,
    /// Overall timeout of one request, in milliseconds.
    pub timeout_ms: u64,
    /// Timeout of establishing a connection, in milliseconds.
    pub connect_timeout_ms: u64,
    /// Maximum idle connections kept open; also sizes the async worker pool.
    pub max_connections: usize,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Proxy all requests go through.
    pub proxy: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            user_agent: concat!("kms-http/", env!("CARGO_PKG_VERSION")).to_string(),
            proxy: None,
        }
    }
}

impl ClientConfig {
    /// Creates a configuration for `region` with default settings.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Self::default()
        }
    }

    /// Sends requests to `endpoint` instead of the regional endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the request timeout, at millisecond precision.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = duration_millis(timeout);
        self
    }

    /// Sets the connect timeout, at millisecond precision.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = duration_millis(timeout);
        self
    }

    /// Sets the connection limit.
    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Sets the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Routes requests through `proxy`.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// The URL requests are posted to.
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://kms.{}.amazonaws.com", self.region),
        }
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Connect timeout.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Checks the configuration for values no client can be built from.
    ///
    /// # Errors
    ///
    /// Returns [`KmsError::Configuration`] describing the first invalid value.
    pub fn validate(&self) -> Result<(), KmsError> {
        if self.region.trim().is_empty() {
            return Err(KmsError::Configuration("region must not be empty".to_string()));
        }
        if self.max_connections == 0 {
            return Err(KmsError::Configuration(
                "max_connections must be at least 1".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(KmsError::Configuration("timeout must be at least 1ms".to_string()));
        }
        if self.connect_timeout_ms == 0 {
            return Err(KmsError::Configuration(
                "connect timeout must be at least 1ms".to_string(),
            ));
        }

        let endpoint = self.endpoint_url();
        let url = Url::parse(&endpoint)
            .map_err(|e| KmsError::Configuration(format!("invalid endpoint '{endpoint}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(KmsError::Configuration(format!(
                "endpoint '{endpoint}' must use http or https"
            )));
        }

        Ok(())
    }
}

// A sub-millisecond timeout rounds up so it never reads as zero.
fn duration_millis(duration: Duration) -> u64 {
    let millis = duration.as_millis();
    let millis = if duration.subsec_nanos() % 1_000_000 != 0 {
        millis + 1
    } else {
        millis
    };
    u64::try_from(millis).unwrap_or(u64::MAX)
}
