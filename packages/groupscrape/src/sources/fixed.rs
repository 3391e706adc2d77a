//! Fixed-snapshot source for saved pages and tests.

use async_trait::async_trait;

use crate::error::SourceResult;
use crate::traits::source::DocumentSource;

/// Serves the same HTML on every snapshot request.
///
/// Pair with `WaitConfig::single_attempt()`: a fixed snapshot without post
/// containers will never grow any, so polling it is pointless.
pub struct StaticSource {
    url: String,
    html: String,
}

impl StaticSource {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

#[async_trait]
impl DocumentSource for StaticSource {
    async fn snapshot(&self) -> SourceResult<String> {
        Ok(self.html.clone())
    }

    fn source_url(&self) -> &str {
        &self.url
    }

    fn name(&self) -> &str {
        "static"
    }
}
