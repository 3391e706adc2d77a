//! Download sink trait.
//!
//! The dispatcher routes every result to a sink exactly once, regardless
//! of webhook outcome, so the local capture is never lost to a network
//! failure. Sink errors are logged by the dispatcher, never propagated.

use async_trait::async_trait;

use crate::error::SinkResult;
use crate::types::record::ScrapeResult;

/// Consumer of completed scrape results.
///
/// Implementations:
/// - `JsonFileSink` - pretty-printed JSON capture file
/// - `MessageSink` - `downloadScrapedData` over a channel
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Deliver one result. Called exactly once per dispatch.
    async fn deliver(&self, result: &ScrapeResult) -> SinkResult<()>;

    /// Sink name for logging/debugging.
    fn name(&self) -> &str {
        "unknown"
    }
}
