//! Live page source over HTTP.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{SourceError, SourceResult};
use crate::traits::source::DocumentSource;

/// Fetches the page over HTTP on every snapshot request.
///
/// Sends browser-like headers; group pages serve a stripped-down document
/// to clients that do not look like a browser at all.
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        let user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .parse()
                .unwrap(),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            "en-US,en;q=0.5".parse().unwrap(),
        );

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            url: url.into(),
        }
    }

    /// Use a preconfigured client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn snapshot(&self) -> SourceResult<String> {
        debug!(url = %self.url, "fetching page snapshot");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SourceError::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| SourceError::Http(Box::new(e)))
    }

    fn source_url(&self) -> &str {
        &self.url
    }

    fn name(&self) -> &str {
        "http"
    }
}
