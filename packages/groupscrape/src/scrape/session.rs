//! Scrape session: single-flight guard, bounded content wait, validation.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{Result, ScrapeError};
use crate::scrape::dom::{self, SnapshotScrape};
use crate::traits::progress::ProgressSink;
use crate::traits::source::DocumentSource;
use crate::types::config::ScrapeConfig;
use crate::types::record::ScrapeResult;

/// Extraction session state. At most one extraction runs at a time; a
/// second start while `Running` fails immediately instead of queueing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
}

/// Extracts posts from a group page via a [`DocumentSource`].
pub struct Scraper {
    config: ScrapeConfig,
    state: Mutex<SessionState>,
}

impl Default for Scraper {
    fn default() -> Self {
        Self::new(ScrapeConfig::default())
    }
}

impl Scraper {
    pub fn new(config: ScrapeConfig) -> Self {
        Self {
            config,
            state: Mutex::new(SessionState::Idle),
        }
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one extraction against `source`.
    ///
    /// Fails with `AlreadyInProgress` when another extraction holds the
    /// session, `NotOnTargetPage` when the source URL does not look like a
    /// group page, `NoContentFound`/`Timeout` when the bounded wait gives
    /// up, and `ValidationFailed` when the assembled result is unsound.
    pub async fn extract(
        &self,
        source: &dyn DocumentSource,
        progress: &dyn ProgressSink,
    ) -> Result<ScrapeResult> {
        let _guard = self.begin()?;

        let url = source.source_url().to_string();
        if !url.contains(&self.config.group_url_pattern) {
            return Err(ScrapeError::NotOnTargetPage { url });
        }

        info!(url = %url, source = source.name(), "starting scrape");
        let started = Instant::now();

        let scrape = self.wait_for_content(source, progress).await?;
        let duration_ms = started.elapsed().as_millis() as u64;

        let result = ScrapeResult::new(url, scrape.group, scrape.posts, duration_ms);
        let reasons = result.validate(&self.config.group_url_pattern);
        if !reasons.is_empty() {
            return Err(ScrapeError::ValidationFailed { reasons });
        }

        info!(
            posts = result.metadata.total_posts,
            comments = result.metadata.total_comments,
            images = result.metadata.total_images,
            containers = scrape.containers,
            duration_ms,
            "scrape complete"
        );

        Ok(result)
    }

    /// Poll the source until a snapshot yields post containers.
    ///
    /// Bounded both ways: `NoContentFound` when the attempt budget is
    /// spent, `Timeout` when the wall-clock deadline passes first.
    async fn wait_for_content(
        &self,
        source: &dyn DocumentSource,
        progress: &dyn ProgressSink,
    ) -> Result<SnapshotScrape> {
        let wait = self.config.wait;
        let deadline = Duration::from_millis(wait.timeout_ms);
        let started = Instant::now();
        let mut attempts = 0usize;

        loop {
            let html = source.snapshot().await?;
            attempts += 1;

            if let Some(scrape) =
                dom::scrape_snapshot(&html, source.source_url(), &self.config.selectors, progress)
            {
                return Ok(scrape);
            }

            if attempts >= wait.max_attempts {
                warn!(attempts, "attempt budget spent without post containers");
                return Err(ScrapeError::NoContentFound { attempts });
            }

            let waited = started.elapsed();
            if waited >= deadline {
                warn!(
                    attempts,
                    waited_ms = waited.as_millis() as u64,
                    "gave up waiting for post containers"
                );
                return Err(ScrapeError::Timeout {
                    waited_ms: waited.as_millis() as u64,
                    attempts,
                });
            }

            debug!(attempt = attempts, "no post containers yet, polling again");
            tokio::time::sleep(Duration::from_millis(wait.poll_interval_ms)).await;
        }
    }

    /// Atomically transition `Idle -> Running`, returning a guard that
    /// transitions back on drop regardless of how the extraction ends.
    fn begin(&self) -> Result<InFlightGuard<'_>> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match *state {
            SessionState::Running => Err(ScrapeError::AlreadyInProgress),
            SessionState::Idle => {
                *state = SessionState::Running;
                Ok(InFlightGuard { state: &self.state })
            }
        }
    }
}

struct InFlightGuard<'a> {
    state: &'a Mutex<SessionState>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = SessionState::Idle;
    }
}
