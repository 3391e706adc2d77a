//! HTTP webhook transport backed by reqwest.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::{DispatchError, DispatchResult};
use crate::traits::webhook::WebhookTransport;

/// User-Agent announced on webhook deliveries.
pub const USER_AGENT: &str = "groupscrape/1.0";

/// Default timeout for webhook POSTs, so a stalled endpoint cannot hang a
/// dispatch indefinitely.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Webhook transport over a shared reqwest client.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Use a preconfigured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WebhookTransport for ReqwestTransport {
    async fn post_json(&self, url: &str, body: &Value) -> DispatchResult<Value> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(body)
            .send()
            .await
            .map_err(|e| DispatchError::Request(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        debug!(url = %url, status = status.as_u16(), "webhook accepted payload");

        let text = response
            .text()
            .await
            .map_err(|e| DispatchError::Request(Box::new(e)))?;
        serde_json::from_str(&text).map_err(DispatchError::InvalidResponse)
    }
}
