//! Top-level request handler.
//!
//! Mirrors the host messaging boundary: a `startScraping` trigger runs one
//! extract-validate-dispatch session and always answers with a
//! `ScrapeResponse`. Every error is converted into `{success: false,
//! error}`; none propagate to the caller.

use std::sync::Arc;
use std::time::Instant;

use tracing::warn;

use crate::dispatch::{Dispatched, Dispatcher};
use crate::error::Result;
use crate::scrape::session::Scraper;
use crate::traits::progress::ProgressSink;
use crate::traits::sink::DownloadSink;
use crate::traits::source::DocumentSource;
use crate::types::message::{RuntimeMessage, ScrapeResponse};

/// Wires the scraper and dispatcher behind the messaging boundary.
pub struct ScrapeService {
    scraper: Scraper,
    dispatcher: Dispatcher,
}

impl ScrapeService {
    pub fn new(scraper: Scraper, dispatcher: Dispatcher) -> Self {
        Self {
            scraper,
            dispatcher,
        }
    }

    /// Default configuration with the HTTP webhook transport.
    pub fn with_defaults(sink: Arc<dyn DownloadSink>) -> Self {
        Self::new(Scraper::default(), Dispatcher::with_reqwest(sink))
    }

    pub fn scraper(&self) -> &Scraper {
        &self.scraper
    }

    /// Handle one trigger. Never fails: errors become failure responses.
    ///
    /// An empty `webhook_url` means "do not forward", matching the wire
    /// protocol where the trigger always carries the field.
    pub async fn handle(
        &self,
        source: &dyn DocumentSource,
        webhook_url: Option<&str>,
        progress: &dyn ProgressSink,
    ) -> ScrapeResponse {
        let started = Instant::now();

        match self.run(source, webhook_url, progress, started).await {
            Ok(dispatched) => ScrapeResponse::ok(dispatched.data, dispatched.webhook_response),
            Err(error) => {
                warn!(error = %error, "scrape request failed");
                ScrapeResponse::fail(error.to_string())
            }
        }
    }

    /// Handle a wire message. Only `startScraping` expects a response.
    pub async fn handle_message(
        &self,
        message: RuntimeMessage,
        source: &dyn DocumentSource,
        progress: &dyn ProgressSink,
    ) -> Option<ScrapeResponse> {
        match message {
            RuntimeMessage::StartScraping { webhook_url } => {
                let destination = (!webhook_url.is_empty()).then_some(webhook_url.as_str());
                Some(self.handle(source, destination, progress).await)
            }
            _ => None,
        }
    }

    async fn run(
        &self,
        source: &dyn DocumentSource,
        webhook_url: Option<&str>,
        progress: &dyn ProgressSink,
        started: Instant,
    ) -> Result<Dispatched> {
        let result = self.scraper.extract(source, progress).await?;
        self.dispatcher.dispatch(result, webhook_url, started).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::error::DispatchError;
    use crate::sources::StaticSource;
    use crate::testing::{MockTransport, RecordingSink};
    use crate::traits::progress::NullProgress;

    const GROUP_URL: &str = "https://www.facebook.com/groups/360024864273201";

    const PAGE: &str = r#"
        <h1>Rust Beginners</h1>
        <div role="article"><div dir="auto">hello</div></div>
    "#;

    fn make_service(transport: MockTransport) -> (ScrapeService, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = Dispatcher::new(Arc::new(transport), sink.clone());
        (ScrapeService::new(Scraper::default(), dispatcher), sink)
    }

    #[tokio::test]
    async fn test_success_response_carries_data() {
        let (service, sink) = make_service(MockTransport::default());
        let source = StaticSource::new(GROUP_URL, PAGE);

        let response = service.handle(&source, None, &NullProgress).await;

        assert!(response.success);
        let data = response.data.expect("data populated on success");
        assert_eq!(data.metadata.total_posts, 1);
        assert!(response.error.is_none());
        assert_eq!(sink.deliveries(), 1);
    }

    #[tokio::test]
    async fn test_failure_response_carries_error_only() {
        let (service, sink) = make_service(MockTransport::default());
        let source = StaticSource::new("https://example.com/not-a-group", PAGE);

        let response = service.handle(&source, None, &NullProgress).await;

        assert!(!response.success);
        assert!(response.data.is_none());
        assert!(response
            .error
            .as_deref()
            .unwrap()
            .contains("not on a group page"));
        // Extraction never completed, so nothing reached the sink.
        assert_eq!(sink.deliveries(), 0);
    }

    #[tokio::test]
    async fn test_webhook_failure_response_names_http_status() {
        let transport = MockTransport::default()
            .with_response(Err(DispatchError::HttpStatus { status: 500 }));
        let (service, sink) = make_service(transport);
        let source = StaticSource::new(GROUP_URL, PAGE);

        let response = service
            .handle(&source, Some("https://hooks.example.com/x"), &NullProgress)
            .await;

        assert!(!response.success);
        assert_eq!(
            response.error.as_deref(),
            Some("webhook failed: HTTP 500")
        );
        // The capture still happened exactly once.
        assert_eq!(sink.deliveries(), 1);
    }

    #[tokio::test]
    async fn test_start_message_with_empty_webhook_skips_forwarding() {
        let transport = MockTransport::default();
        let requests = transport.requests();
        let (service, sink) = make_service(transport);
        let source = StaticSource::new(GROUP_URL, PAGE);

        let response = service
            .handle_message(
                RuntimeMessage::StartScraping {
                    webhook_url: String::new(),
                },
                &source,
                &NullProgress,
            )
            .await
            .expect("startScraping expects a response");

        assert!(response.success);
        assert!(response.webhook_response.is_none());
        assert_eq!(sink.deliveries(), 1);
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_start_message_forwards_to_webhook() {
        let transport = MockTransport::default().with_response(Ok(json!({"ok": true})));
        let (service, _sink) = make_service(transport);
        let source = StaticSource::new(GROUP_URL, PAGE);

        let response = service
            .handle_message(
                RuntimeMessage::StartScraping {
                    webhook_url: "https://hooks.example.com/x".to_string(),
                },
                &source,
                &NullProgress,
            )
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.webhook_response, Some(json!({"ok": true})));
    }

    #[tokio::test]
    async fn test_non_trigger_messages_get_no_response() {
        let (service, _sink) = make_service(MockTransport::default());
        let source = StaticSource::new(GROUP_URL, PAGE);

        let response = service
            .handle_message(
                RuntimeMessage::ScrapingProgress {
                    message: "Scraping post 1/1".to_string(),
                },
                &source,
                &NullProgress,
            )
            .await;

        assert!(response.is_none());
    }
}
