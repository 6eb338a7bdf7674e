//! HTTP client for the reporting API.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::error::{Result, ShieldError};
use crate::events::{NewSecurityEvent, SecurityEvent, SecurityMetrics, StoreSnapshot};

/// Path of the reporting endpoint.
pub const REPORTING_PATH: &str = "/api/security";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for `GET`/`POST /api/security` on a running server
#[derive(Debug, Clone)]
pub struct ReportingClient {
    base_url: String,
    client: Client,
}

impl ReportingClient {
    /// Create a client for the server at `base_url` (e.g. `http://127.0.0.1:3000`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ShieldError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Server base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}{REPORTING_PATH}", self.base_url)
    }

    /// Newest events, at most `limit`.
    pub async fn events(&self, limit: usize) -> Result<Vec<SecurityEvent>> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&[("type", "events"), ("limit", &limit.to_string())])
            .send()
            .await?;
        decode(response).await
    }

    /// Counter aggregate.
    pub async fn metrics(&self) -> Result<SecurityMetrics> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&[("type", "metrics")])
            .send()
            .await?;
        decode(response).await
    }

    /// Metrics plus the ten newest events.
    pub async fn overview(&self) -> Result<StoreSnapshot> {
        let response = self.client.get(self.endpoint()).send().await?;
        decode(response).await
    }

    /// Clear every event and counter.
    pub async fn clear(&self) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint())
            .json(&json!({ "clear": true }))
            .send()
            .await?;
        let _: serde_json::Value = decode(response).await?;
        Ok(())
    }

    /// Record an event; returns it with its assigned id and timestamp.
    pub async fn inject(&self, event: &NewSecurityEvent) -> Result<SecurityEvent> {
        let response = self
            .client
            .post(self.endpoint())
            .json(event)
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.to_string(),
    };
    if status.is_client_error() {
        Err(ShieldError::InvalidInput(message))
    } else {
        Err(ShieldError::Upstream(format!("{status}: {message}")))
    }
}
