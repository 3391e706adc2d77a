//! Core trait abstractions.
//!
//! Every collaborator the scraper talks to is a seam: the document
//! provider, the progress side-channel, the download sink, and the
//! webhook transport. Mock implementations live in [`crate::testing`].

pub mod progress;
pub mod sink;
pub mod source;
pub mod webhook;

pub use progress::{ChannelProgress, NullProgress, ProgressSink, TracingProgress};
pub use sink::DownloadSink;
pub use source::DocumentSource;
pub use webhook::WebhookTransport;
