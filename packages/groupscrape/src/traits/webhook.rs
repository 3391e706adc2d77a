//! Webhook transport trait.
//!
//! Separates the dispatch decision logic (scheme checks, send-skip,
//! sink routing) from the mechanics of an HTTP POST, so tests can script
//! webhook outcomes without a live endpoint.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DispatchResult;

/// POSTs a JSON body to a destination and decodes the JSON reply.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// POST `body` to `url` with `Content-Type: application/json`.
    ///
    /// A non-2xx status is `DispatchError::HttpStatus`; a 2xx body that is
    /// not decodable JSON is `DispatchError::InvalidResponse`.
    async fn post_json(&self, url: &str, body: &Value) -> DispatchResult<Value>;
}
