//! Post extraction from rendered group-page snapshots.
//!
//! [`dom`] holds the pure selector-chain extraction over one snapshot;
//! [`session`] owns the single-flight state and the bounded content wait.

pub(crate) mod dom;
pub mod session;

pub use dom::content_hash_id;
pub use session::{Scraper, SessionState};
