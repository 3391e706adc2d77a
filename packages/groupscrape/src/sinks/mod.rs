//! Download sink implementations.

pub mod json_file;
pub mod message;

pub use json_file::{JsonFileSink, DOWNLOAD_FILE_NAME};
pub use message::MessageSink;
