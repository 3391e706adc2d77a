//! Document source trait for pluggable snapshot providers.
//!
//! The extractor never touches the network or filesystem itself; it asks a
//! `DocumentSource` for the current rendered HTML of the page it is
//! scraping. Live pages render posts asynchronously, so the extractor may
//! call [`DocumentSource::snapshot`] repeatedly while waiting for content
//! to appear.

use async_trait::async_trait;

use crate::error::SourceResult;

/// Provider of HTML snapshots for one page.
///
/// Implementations:
/// - `HttpSource` - fetches the live page over HTTP
/// - `StaticSource` - serves a fixed snapshot (tests, saved files)
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Produce the current HTML snapshot of the page.
    async fn snapshot(&self) -> SourceResult<String>;

    /// URL of the page this source represents.
    fn source_url(&self) -> &str;

    /// Source name for logging/debugging.
    fn name(&self) -> &str {
        "unknown"
    }
}
