//! Result dispatch: optional webhook forwarding plus download routing.

pub mod webhook;

pub use webhook::{ReqwestTransport, USER_AGENT};

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{DispatchError, DispatchResult, Result};
use crate::traits::sink::DownloadSink;
use crate::traits::webhook::WebhookTransport;
use crate::types::record::ScrapeResult;

/// Successful dispatch: the (possibly duration-rewritten) result and the
/// webhook's decoded reply, when one was contacted.
#[derive(Debug, Clone)]
pub struct Dispatched {
    pub data: ScrapeResult,
    pub webhook_response: Option<Value>,
}

/// Routes completed results to a webhook and a download sink.
pub struct Dispatcher {
    transport: Arc<dyn WebhookTransport>,
    sink: Arc<dyn DownloadSink>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn WebhookTransport>, sink: Arc<dyn DownloadSink>) -> Self {
        Self { transport, sink }
    }

    /// Dispatch with the default HTTP transport.
    pub fn with_reqwest(sink: Arc<dyn DownloadSink>) -> Self {
        Self::new(Arc::new(ReqwestTransport::new()), sink)
    }

    /// Dispatch one result.
    ///
    /// - Empty/absent destination: skip the network call, succeed.
    /// - `http`/`https` destination: POST the JSON-encoded result; non-2xx
    ///   fails the dispatch.
    /// - Any other scheme: treated as no destination (send-skip, success).
    ///
    /// The download sink fires exactly once in every case, webhook failure
    /// included, so the local capture is never lost to a network error. On
    /// webhook success, `scraping_duration_ms` is rewritten as the elapsed
    /// time since `started` before the result is returned.
    pub async fn dispatch(
        &self,
        result: ScrapeResult,
        destination: Option<&str>,
        started: Instant,
    ) -> Result<Dispatched> {
        let destination = destination.map(str::trim).filter(|url| !url.is_empty());

        let webhook_outcome = match destination {
            Some(url) if is_http_url(url) => Some(self.send_webhook(&result, url).await),
            Some(url) => {
                debug!(url = %url, "destination scheme not http(s), skipping webhook");
                None
            }
            None => None,
        };

        self.notify_sink(&result).await;

        match webhook_outcome {
            Some(Ok(reply)) => {
                let mut data = result;
                data.metadata.scraping_duration_ms = started.elapsed().as_millis() as u64;
                Ok(Dispatched {
                    data,
                    webhook_response: Some(reply),
                })
            }
            Some(Err(error)) => Err(error.into()),
            None => Ok(Dispatched {
                data: result,
                webhook_response: None,
            }),
        }
    }

    async fn send_webhook(&self, result: &ScrapeResult, url: &str) -> DispatchResult<Value> {
        let body = serde_json::to_value(result).map_err(DispatchError::Encode)?;
        debug!(url = %url, posts = result.metadata.total_posts, "forwarding result to webhook");
        self.transport.post_json(url, &body).await
    }

    /// Fire-and-forget: sink failures are logged, never surfaced.
    async fn notify_sink(&self, result: &ScrapeResult) {
        if let Err(error) = self.sink.deliver(result).await {
            warn!(sink = self.sink.name(), error = %error, "download sink delivery failed");
        }
    }
}

fn is_http_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
