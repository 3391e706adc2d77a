//! Typed errors for the scraping library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can occur during a scrape-and-dispatch session.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Source URL does not match the configured group-page pattern
    #[error("not on a group page: {url}")]
    NotOnTargetPage { url: String },

    /// Another extraction is already running
    #[error("scraping already in progress")]
    AlreadyInProgress,

    /// Snapshots were obtained but no post containers ever matched
    #[error("no post containers found after {attempts} attempts")]
    NoContentFound { attempts: usize },

    /// The bounded content wait expired
    #[error("timed out after {waited_ms}ms waiting for post containers")]
    Timeout { waited_ms: u64, attempts: usize },

    /// Post-extraction structural check failed
    #[error("data validation failed: {}", .reasons.join(", "))]
    ValidationFailed { reasons: Vec<String> },

    /// Webhook delivery failed
    #[error("webhook failed: {0}")]
    Webhook(#[from] DispatchError),

    /// The document source could not produce a snapshot
    #[error("document source failed: {0}")]
    Source(#[from] SourceError),

    /// Catch-all for unexpected extraction failures
    #[error("unexpected scrape failure: {0}")]
    Unknown(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors that can occur while delivering a result to a webhook.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Webhook endpoint answered with a non-2xx status
    #[error("HTTP {status}")]
    HttpStatus { status: u16 },

    /// Request could not be sent or the response body not read
    #[error("request failed: {0}")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Result could not be JSON-encoded
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// 2xx response body was not decodable JSON
    #[error("invalid JSON response: {0}")]
    InvalidResponse(#[source] serde_json::Error),
}

/// Errors that can occur while obtaining a document snapshot.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Page answered with a non-2xx status
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Local snapshot could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while routing a result to a download sink.
///
/// Sinks are fire-and-forget from the dispatcher's point of view; these
/// errors are logged, never propagated to the caller.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Capture file could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Result could not be serialized
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Receiving side of a message sink is gone
    #[error("message channel closed")]
    ChannelClosed,
}

/// Errors from the settings key-value store.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid JSON
    #[error("settings format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Result type alias for scrape operations.
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for webhook dispatch.
pub type DispatchResult<T> = std::result::Result<T, DispatchError>;

/// Result type alias for document sources.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Result type alias for download sinks.
pub type SinkResult<T> = std::result::Result<T, SinkError>;
