//! Group-Page Scraping Library
//!
//! Extracts posts, comments, images, and metadata from a social-media
//! group page's rendered DOM, packages the result as structured JSON,
//! optionally forwards it to a configured webhook, and always routes it
//! to a local download sink.
//!
//! # Design Philosophy
//!
//! - Selector chains are data, not code: markup drift is fixed by
//!   shipping a new [`SelectorConfig`], never by changing logic
//! - Every collaborator is a trait seam with a mock in [`testing`]
//! - One extraction in flight at a time; a second trigger fails fast
//! - The local capture always happens, webhook failure included
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use groupscrape::{HttpSource, JsonFileSink, ScrapeService, TracingProgress};
//!
//! let service = ScrapeService::with_defaults(Arc::new(JsonFileSink::new(".")));
//! let source = HttpSource::new("https://www.facebook.com/groups/360024864273201");
//!
//! let response = service
//!     .handle(&source, Some("https://hooks.example.com/scrape"), &TracingProgress)
//!     .await;
//! assert!(response.success);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (DocumentSource, sinks, transport)
//! - [`types`] - Records, configuration, wire messages
//! - [`scrape`] - Selector-chain extraction and the scrape session
//! - [`dispatch`] - Webhook forwarding and download routing
//! - [`sources`] - Document source implementations
//! - [`sinks`] - Download sink implementations
//! - [`settings`] - Key-value settings persistence
//! - [`testing`] - Mock implementations for testing

pub mod dispatch;
pub mod error;
pub mod scrape;
pub mod service;
pub mod settings;
pub mod sinks;
pub mod sources;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{DispatchError, ScrapeError, SettingsError, SinkError, SourceError};
pub use traits::{
    progress::{ChannelProgress, NullProgress, ProgressSink, TracingProgress},
    sink::DownloadSink,
    source::DocumentSource,
    webhook::WebhookTransport,
};
pub use types::{
    config::{ScrapeConfig, SelectorConfig, WaitConfig},
    message::{RuntimeMessage, ScrapeResponse},
    record::{GroupInfo, Post, ScrapeMetadata, ScrapeResult},
};

// Re-export the session and service
pub use scrape::{content_hash_id, Scraper, SessionState};
pub use service::ScrapeService;

// Re-export dispatch components
pub use dispatch::{Dispatched, Dispatcher, ReqwestTransport};

// Re-export sources and sinks
pub use sinks::{JsonFileSink, MessageSink, DOWNLOAD_FILE_NAME};
pub use sources::{HttpSource, StaticSource};

// Re-export settings
pub use settings::{SettingsStore, WEBHOOK_URL_KEY};
