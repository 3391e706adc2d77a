//! Progress side-channel.
//!
//! The extractor invokes the sink synchronously after each post element;
//! delivery is fire-and-forget and has no effect on correctness. The
//! caller decides whether and how to surface the messages.

use tokio::sync::mpsc::UnboundedSender;

use crate::types::message::RuntimeMessage;

/// Receiver of per-post progress notifications.
pub trait ProgressSink: Send + Sync {
    /// Called once per processed post element, in order 1..N.
    fn progress(&self, message: &str);
}

/// Discards all progress notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn progress(&self, _message: &str) {}
}

/// Surfaces progress through the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn progress(&self, message: &str) {
        tracing::info!(message = %message, "scrape progress");
    }
}

/// Emits `scrapingProgress` wire messages over a channel.
///
/// A dropped receiver is not an error; notifications are simply lost,
/// matching the fire-and-forget contract.
pub struct ChannelProgress {
    tx: UnboundedSender<RuntimeMessage>,
}

impl ChannelProgress {
    pub fn new(tx: UnboundedSender<RuntimeMessage>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgress {
    fn progress(&self, message: &str) {
        let _ = self.tx.send(RuntimeMessage::ScrapingProgress {
            message: message.to_string(),
        });
    }
}
