//! HTTP client configuration shared by the network providers.

use std::time::Duration;

use crate::error::{LlmError, Result};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Shared HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// User agent string.
    pub user_agent: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            user_agent: Some(concat!("tripline/", env!("CARGO_PKG_VERSION")).to_owned()),
        }
    }
}

impl HttpClientConfig {
    /// Set the request timeout in seconds.
    #[must_use]
    pub const fn with_timeout_secs(mut self, timeout: u64) -> Self {
        self.timeout_secs = Some(timeout);
        self
    }

    /// Build a reqwest client with this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend or resolver cannot be initialized.
    pub fn build_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        if let Some(ref user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        builder
            .build()
            .map_err(|e| LlmError::invalid_request(format!("Failed to build HTTP client: {e}")).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_config_default() {
        let config = HttpClientConfig::default();
        assert_eq!(config.timeout_secs, Some(DEFAULT_TIMEOUT_SECS));
        assert!(config.user_agent.as_deref().is_some_and(|ua| ua.starts_with("tripline/")));
    }

    #[test]
    fn test_build_client_with_timeout() {
        let config = HttpClientConfig::default().with_timeout_secs(5);
        assert_eq!(config.timeout_secs, Some(5));
        assert!(config.build_client().is_ok());
    }
}
