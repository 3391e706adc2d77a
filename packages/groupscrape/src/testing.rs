//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the scraping library
//! without a live page or webhook endpoint.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Semaphore;

use crate::error::{DispatchResult, SinkResult, SourceResult};
use crate::traits::progress::ProgressSink;
use crate::traits::sink::DownloadSink;
use crate::traits::source::DocumentSource;
use crate::traits::webhook::WebhookTransport;
use crate::types::record::ScrapeResult;

/// A source that serves a scripted sequence of snapshots.
///
/// Each `snapshot()` call pops the next entry; when the script runs out,
/// the last entry repeats. Useful for pages that "render" content after a
/// few polls.
pub struct ScriptedSource {
    url: String,
    snapshots: Mutex<VecDeque<String>>,
    last: String,
    calls: Mutex<usize>,
}

impl ScriptedSource {
    pub fn new(url: impl Into<String>, snapshots: Vec<String>) -> Self {
        let last = snapshots.last().cloned().unwrap_or_default();
        Self {
            url: url.into(),
            snapshots: Mutex::new(snapshots.into()),
            last,
            calls: Mutex::new(0),
        }
    }

    /// Number of snapshots served so far.
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl DocumentSource for ScriptedSource {
    async fn snapshot(&self) -> SourceResult<String> {
        *self.calls.lock().unwrap() += 1;
        let next = self.snapshots.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| self.last.clone()))
    }

    fn source_url(&self) -> &str {
        &self.url
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// A source whose `snapshot()` blocks until released.
///
/// Signals entry through one semaphore and waits for a permit on another,
/// so tests can hold an extraction mid-flight deterministically (e.g. to
/// assert the single-flight guard).
pub struct GatedSource {
    url: String,
    html: String,
    entered: Arc<Semaphore>,
    release: Arc<Semaphore>,
}

impl GatedSource {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            entered: Arc::new(Semaphore::new(0)),
            release: Arc::new(Semaphore::new(0)),
        }
    }

    /// Gains a permit each time `snapshot()` is entered.
    pub fn entered(&self) -> Arc<Semaphore> {
        self.entered.clone()
    }

    /// Add permits here to let blocked `snapshot()` calls return.
    pub fn release(&self) -> Arc<Semaphore> {
        self.release.clone()
    }
}

#[async_trait]
impl DocumentSource for GatedSource {
    async fn snapshot(&self) -> SourceResult<String> {
        self.entered.add_permits(1);
        let permit = self
            .release
            .acquire()
            .await
            .expect("release semaphore closed");
        permit.forget();
        Ok(self.html.clone())
    }

    fn source_url(&self) -> &str {
        &self.url
    }

    fn name(&self) -> &str {
        "gated"
    }
}

/// Records every progress message for assertions.
#[derive(Default)]
pub struct RecordingProgress {
    messages: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingProgress {
    fn progress(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Records every delivered result for assertions.
#[derive(Default)]
pub struct RecordingSink {
    delivered: Mutex<Vec<ScrapeResult>>,
}

impl RecordingSink {
    /// Number of deliveries so far.
    pub fn deliveries(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }

    /// Most recently delivered result.
    pub fn last(&self) -> Option<ScrapeResult> {
        self.delivered.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl DownloadSink for RecordingSink {
    async fn deliver(&self, result: &ScrapeResult) -> SinkResult<()> {
        self.delivered.lock().unwrap().push(result.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// A webhook transport with scripted outcomes and request capture.
///
/// Scripted responses are consumed in order; when the script is empty, a
/// generic `{"status": "ok"}` success is returned.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<DispatchResult<Value>>>,
    requests: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MockTransport {
    /// Queue a scripted outcome.
    pub fn with_response(self, response: DispatchResult<Value>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Handle to the captured `(url, body)` pairs.
    pub fn requests(&self) -> Arc<Mutex<Vec<(String, Value)>>> {
        self.requests.clone()
    }
}

#[async_trait]
impl WebhookTransport for MockTransport {
    async fn post_json(&self, url: &str, body: &Value) -> DispatchResult<Value> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), body.clone()));

        match self.responses.lock().unwrap().pop_front() {
            Some(response) => response,
            None => Ok(json!({"status": "ok"})),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_source_pops_then_repeats() {
        let source = ScriptedSource::new(
            "https://www.facebook.com/groups/1",
            vec!["first".to_string(), "second".to_string()],
        );

        assert_eq!(source.snapshot().await.unwrap(), "first");
        assert_eq!(source.snapshot().await.unwrap(), "second");
        assert_eq!(source.snapshot().await.unwrap(), "second");
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_mock_transport_default_success() {
        let transport = MockTransport::default();
        let reply = transport
            .post_json("https://hooks.example.com/x", &json!({"posts": []}))
            .await
            .unwrap();
        assert_eq!(reply, json!({"status": "ok"}));
        assert_eq!(transport.requests().lock().unwrap().len(), 1);
    }
}
