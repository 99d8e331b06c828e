/// Client configuration: where the server lives and how requests are sent

use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// `http` or `https`
    pub scheme: String,

    /// Host and optional port, e.g. `localhost:8080`
    pub host: String,

    /// Path prefix of the REST and query surfaces
    pub api_root: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// Retry policy applied by the HTTP transport. Defaults to no retries.
    pub retry: RetryPolicy,

    /// Host written into reference beacons
    pub beacon_host: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "localhost:8080".to_string(),
            api_root: "/v1".to_string(),
            timeout_ms: 30_000,
            retry: RetryPolicy::no_retry(),
            beacon_host: "localhost".to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration for `scheme://host` with default settings
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            ..Self::default()
        }
    }

    /// Set the API path prefix
    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into();
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the transport retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the host embedded in beacons
    pub fn with_beacon_host(mut self, host: impl Into<String>) -> Self {
        self.beacon_host = host.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// `scheme://host/api_root`, without a trailing slash
    pub fn base_url(&self) -> String {
        let root = self.api_root.trim_end_matches('/');
        format!("{}://{}{}", self.scheme, self.host, root)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.scheme != "http" && self.scheme != "https" {
            return Err(format!("scheme must be http or https, got '{}'", self.scheme));
        }

        if self.host.is_empty() {
            return Err("host must not be empty".to_string());
        }

        if !self.api_root.is_empty() && !self.api_root.starts_with('/') {
            return Err("api_root must start with '/'".to_string());
        }

        if self.timeout_ms == 0 {
            return Err("timeout_ms must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), "http://localhost:8080/v1");
        assert_eq!(config.retry, RetryPolicy::no_retry());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::new("https", "demo.example.com")
            .with_api_root("/v1/")
            .with_timeout(Duration::from_secs(5))
            .with_retry(RetryPolicy::fast())
            .with_beacon_host("demo");

        assert_eq!(config.base_url(), "https://demo.example.com/v1");
        assert_eq!(config.timeout_ms, 5000);
        assert_eq!(config.retry.retries, 3);
        assert_eq!(config.beacon_host, "demo");
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::new("ftp", "x").validate().is_err());
        assert!(ClientConfig::new("http", "").validate().is_err());
        assert!(ClientConfig::default().with_api_root("v1").validate().is_err());

        let mut config = ClientConfig::default();
        config.timeout_ms = 0;
        assert_eq!(
            config.validate().unwrap_err(),
            "timeout_ms must be greater than 0"
        );
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"scheme": "https", "host": "db:443"}"#).unwrap();
        assert_eq!(config.base_url(), "https://db:443/v1");
        assert_eq!(config.timeout_ms, 30_000);
    }
}
