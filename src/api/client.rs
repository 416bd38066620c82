//! REST client for the LiveChess HTTP API.
//!
//! This module provides the [`ApiClient`] struct which handles the one-shot
//! HTTP lookups against the LiveChess service, and the [`EBoardSource`]
//! trait that eboard selection is written against.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use super::types::EBoardResponse;
use crate::config::Config;
use crate::constants;

/// Anything that can list the eboards known to LiveChess.
#[async_trait]
pub trait EBoardSource: Send + Sync {
    /// Returns all eboards currently known to the service.
    async fn eboards(&self) -> Result<Vec<EBoardResponse>>;
}

/// API client for the LiveChess REST endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a new API client for the given base URL
    /// (e.g. `http://localhost:1982/api/v1.0`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(constants::HTTP_REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self::with_client(client, base_url))
    }

    /// Creates an API client from a loaded [`Config`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.http_base())
    }

    /// Creates an API client with a pre-configured HTTP client.
    ///
    /// Useful for testing or when custom client configuration is needed.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl EBoardSource for ApiClient {
    async fn eboards(&self) -> Result<Vec<EBoardResponse>> {
        let url = format!("{}/eboards", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to list eboards: {}", response.status());
        }

        let body = response
            .text()
            .await
            .context("failed to read eboard listing body")?;
        log::debug!("GET {} -> {}", url, body);

        let boards: Vec<EBoardResponse> =
            serde_json::from_str(&body).context("invalid eboard listing")?;
        Ok(boards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{EBoardSerial, EBoardState};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_api_client_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:1982/api/v1.0/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:1982/api/v1.0");
    }

    #[tokio::test]
    async fn test_eboards_decodes_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1.0/eboards"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"serialnr": "7425", "state": "ACTIVE", "flipped": false,
                 "board": "8/8/8/8/8/8/8/8"},
                {"serialnr": "1001", "state": null, "flipped": true}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(format!("{}/api/v1.0", server.uri())).unwrap();
        let boards = client.eboards().await.unwrap();

        assert_eq!(boards.len(), 2);
        assert_eq!(boards[0].serialnr, EBoardSerial::from("7425"));
        assert_eq!(boards[0].state, EBoardState::Active);
        assert_eq!(boards[1].state, EBoardState::NotActivated);
    }

    #[tokio::test]
    async fn test_eboards_server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1.0/eboards"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = ApiClient::new(format!("{}/api/v1.0", server.uri())).unwrap();
        let err = client.eboards().await.unwrap_err();

        assert!(err.to_string().contains("503"), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_eboards_invalid_body_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1.0/eboards"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = ApiClient::new(format!("{}/api/v1.0", server.uri())).unwrap();
        assert!(client.eboards().await.is_err());
    }
}
