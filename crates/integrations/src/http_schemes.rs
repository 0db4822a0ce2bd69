//! HTTP scheme client
//!
//! One `GET` per scheme selection against the web application's scheme JSON
//! endpoint. Any non-2xx status is a failure; nothing is retried.

use async_trait::async_trait;
use pawnshop_config::SchemeEndpointConfig;
use pawnshop_core::{SchemeError, SchemeInfo, SchemeSource};
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::wire::SchemeResponse;

/// Scheme source backed by the scheme JSON endpoint
#[derive(Debug, Clone)]
pub struct HttpSchemeClient {
    client: Client,
    endpoint: SchemeEndpointConfig,
}

impl HttpSchemeClient {
    /// Create a client for the configured endpoint
    pub fn new(endpoint: SchemeEndpointConfig) -> Result<Self, SchemeError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(endpoint.timeout_ms))
            .build()
            .map_err(|e| SchemeError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &SchemeEndpointConfig {
        &self.endpoint
    }
}

/// Scheme ids are database keys or slugs; anything else never reaches the URL
fn is_valid_scheme_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[async_trait]
impl SchemeSource for HttpSchemeClient {
    async fn fetch_scheme(&self, scheme_id: &str) -> Result<SchemeInfo, SchemeError> {
        if !is_valid_scheme_id(scheme_id) {
            return Err(SchemeError::NotFound(scheme_id.to_string()));
        }

        let url = self.endpoint.scheme_url(scheme_id);
        tracing::debug!(scheme_id = %scheme_id, url = %url, "Fetching scheme");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await
            .map_err(|e| SchemeError::Request(format!("Scheme request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SchemeError::NotFound(scheme_id.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                scheme_id = %scheme_id,
                status = status.as_u16(),
                "Scheme endpoint returned an error"
            );
            return Err(SchemeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: SchemeResponse = response
            .json()
            .await
            .map_err(|e| SchemeError::InvalidPayload(e.to_string()))?;

        let scheme = payload.into_scheme_info(scheme_id)?;
        tracing::info!(
            scheme_id = %scheme.id,
            name = %scheme.name,
            interest_rate = scheme.interest_rate,
            duration_days = scheme.loan_duration_days,
            "Scheme loaded"
        );
        Ok(scheme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_id_validation() {
        assert!(is_valid_scheme_id("42"));
        assert!(is_valid_scheme_id("gold-plus_2"));
        assert!(!is_valid_scheme_id(""));
        assert!(!is_valid_scheme_id("../admin"));
        assert!(!is_valid_scheme_id("1?x=2"));
    }

    #[tokio::test]
    async fn test_invalid_id_never_hits_network() {
        let client = HttpSchemeClient::new(SchemeEndpointConfig {
            // Nothing listens here; a request would fail with Request(..)
            base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        })
        .unwrap();

        let err = client.fetch_scheme("a/b").await.unwrap_err();
        assert_eq!(err, SchemeError::NotFound("a/b".to_string()));
    }
}
