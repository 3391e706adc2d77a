//! Local JSON capture file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::error::SinkResult;
use crate::traits::sink::DownloadSink;
use crate::types::record::ScrapeResult;

/// File name of the local capture.
pub const DOWNLOAD_FILE_NAME: &str = "facebook-group-scrape.json";

/// Writes each result as pretty-printed JSON into a directory.
///
/// Successive deliveries overwrite the capture; the file always holds the
/// latest scrape.
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Full path of the capture file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(DOWNLOAD_FILE_NAME)
    }

    /// Directory the capture lands in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DownloadSink for JsonFileSink {
    async fn deliver(&self, result: &ScrapeResult) -> SinkResult<()> {
        let json = serde_json::to_string_pretty(result)?;

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.path(), json).await?;

        info!(path = %self.path().display(), posts = result.metadata.total_posts, "capture written");
        Ok(())
    }

    fn name(&self) -> &str {
        "json-file"
    }
}
