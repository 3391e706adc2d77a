//! Document source implementations.

pub mod fixed;
pub mod http;

pub use fixed::StaticSource;
pub use http::HttpSource;
