// src/core/service_client.rs
//! HTTP client for the remote resume service

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{error, info, trace};

use crate::error::RemoteOperationError;

pub const RESUMES_ENDPOINT: &str = "/api/resumes";
pub const EXPORT_ENDPOINT: &str = "/api/resumes/export";

#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ServiceClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// POST `payload` as JSON and decode a JSON reply.
    pub async fn post_json<T, R>(
        &self,
        endpoint: &str,
        payload: &T,
    ) -> Result<R, RemoteOperationError>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self.send(endpoint, payload).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            error!("Failed to parse response from {}: {}", endpoint, e);
            RemoteOperationError::Decode(e.to_string())
        })
    }

    /// POST `payload` as JSON and return the raw reply body.
    pub async fn post_for_bytes<T>(
        &self,
        endpoint: &str,
        payload: &T,
    ) -> Result<(Option<String>, Vec<u8>), RemoteOperationError>
    where
        T: Serialize + Sync,
    {
        let response = self.send(endpoint, payload).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;
        Ok((content_type, bytes.to_vec()))
    }

    async fn send<T>(
        &self,
        endpoint: &str,
        payload: &T,
    ) -> Result<reqwest::Response, RemoteOperationError>
    where
        T: Serialize + Sync,
    {
        let url = self.url(endpoint);
        info!("Calling resume service: {}", url);

        let mut request = self.client.post(&url).json(payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        trace!("Response status: {}", status);

        if status.is_success() {
            Ok(response)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Resume service error {}: {}", status, message);
            Err(RemoteOperationError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client =
            ServiceClient::new("http://127.0.0.1:5555/", None, Duration::from_secs(1)).unwrap();
        assert_eq!(client.url(RESUMES_ENDPOINT), "http://127.0.0.1:5555/api/resumes");
        assert_eq!(
            client.url(EXPORT_ENDPOINT),
            "http://127.0.0.1:5555/api/resumes/export"
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Port 9 (discard) on localhost is closed on test machines.
        let client =
            ServiceClient::new("http://127.0.0.1:9", None, Duration::from_secs(2)).unwrap();
        let result: Result<serde_json::Value, _> =
            client.post_json(RESUMES_ENDPOINT, &serde_json::json!({})).await;
        assert!(matches!(result, Err(RemoteOperationError::Network(_))));
    }
}
