// HTTP analytics repository implementation
use crate::application::analytics_repository::{AnalyticsRepository, Endpoint, FetchError};
use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpAnalyticsRepository {
    client: reqwest::Client,
    urls: HashMap<Endpoint, String>,
}

impl HttpAnalyticsRepository {
    pub fn new(urls: HashMap<Endpoint, String>, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, urls })
    }

    fn url(&self, endpoint: Endpoint) -> &str {
        self.urls.get(&endpoint).map(String::as_str).unwrap_or_default()
    }
}

/// Reads a JSON body; an empty body counts as `null`.
pub fn decode_body(bytes: &[u8]) -> Result<Value, FetchError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(bytes)?)
}

#[async_trait]
impl AnalyticsRepository for HttpAnalyticsRepository {
    async fn fetch(&self, endpoint: Endpoint) -> Result<Value, FetchError> {
        let url = self.url(endpoint);
        tracing::debug!(endpoint = endpoint.name(), %url, "fetching analytics");

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        decode_body(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(b"  ").unwrap(), Value::Null);
        assert_eq!(decode_body(br#"{"a":1}"#).unwrap()["a"], 1);
        assert!(matches!(decode_body(b"<html>"), Err(FetchError::Decode(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let mut urls = HashMap::new();
        urls.insert(Endpoint::Radar, "http://127.0.0.1:9/api/v1/trends/radar".to_string());
        let repo = HttpAnalyticsRepository::new(urls, 2).unwrap();
        assert!(matches!(
            repo.fetch(Endpoint::Radar).await,
            Err(FetchError::Transport(_))
        ));
    }
}
