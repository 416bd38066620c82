//! Configuration loading.
//!
//! Resolves where the LiveChess service lives. Values come from the
//! built-in defaults, then environment overrides, then explicit CLI flags.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for the livechess client.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// `host:port` of the LiveChess service.
    pub endpoint: String,
    /// API path prefix (without leading or trailing slash).
    pub api_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: constants::DEFAULT_ENDPOINT.to_string(),
            api_path: constants::DEFAULT_API_PATH.to_string(),
        }
    }
}

impl Config {
    /// Loads the default configuration with environment variable overrides.
    ///
    /// - `LIVECHESS_ENDPOINT` - `host:port` of the service
    /// - `LIVECHESS_API_PATH` - API path prefix
    pub fn load() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var("LIVECHESS_ENDPOINT") {
            self.endpoint = endpoint;
        }

        if let Ok(api_path) = std::env::var("LIVECHESS_API_PATH") {
            self.api_path = api_path;
        }
    }

    /// Replaces the endpoint, e.g. from a `--endpoint` flag.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Base URL for REST calls, e.g. `http://localhost:1982/api/v1.0`.
    pub fn http_base(&self) -> String {
        self.url_with_scheme("http")
    }

    /// WebSocket URL for feed sessions, e.g. `ws://localhost:1982/api/v1.0`.
    pub fn ws_url(&self) -> String {
        self.url_with_scheme("ws")
    }

    fn url_with_scheme(&self, scheme: &str) -> String {
        format!(
            "{scheme}://{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.api_path.trim_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        let config = Config::default();
        assert_eq!(config.http_base(), "http://localhost:1982/api/v1.0");
        assert_eq!(config.ws_url(), "ws://localhost:1982/api/v1.0");
    }

    #[test]
    fn test_with_endpoint_overrides_host() {
        let config = Config::default().with_endpoint("10.0.0.7:2000");
        assert_eq!(config.ws_url(), "ws://10.0.0.7:2000/api/v1.0");
    }

    #[test]
    fn test_slashes_are_normalized() {
        let config = Config {
            endpoint: "board.local:1982/".to_string(),
            api_path: "/api/v1.0/".to_string(),
        };
        assert_eq!(config.http_base(), "http://board.local:1982/api/v1.0");
        assert_eq!(config.ws_url(), "ws://board.local:1982/api/v1.0");
    }
}
