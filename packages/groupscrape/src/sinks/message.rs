//! Channel-backed download sink.

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use crate::error::{SinkError, SinkResult};
use crate::traits::sink::DownloadSink;
use crate::types::message::RuntimeMessage;
use crate::types::record::ScrapeResult;

/// Forwards each result as a `downloadScrapedData` message.
///
/// The receiving side is the download collaborator (whatever writes the
/// capture for the user); this sink only crosses the messaging boundary.
pub struct MessageSink {
    tx: UnboundedSender<RuntimeMessage>,
}

impl MessageSink {
    pub fn new(tx: UnboundedSender<RuntimeMessage>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl DownloadSink for MessageSink {
    async fn deliver(&self, result: &ScrapeResult) -> SinkResult<()> {
        self.tx
            .send(RuntimeMessage::DownloadScrapedData {
                data: result.clone(),
            })
            .map_err(|_| SinkError::ChannelClosed)
    }

    fn name(&self) -> &str {
        "message"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::GroupInfo;

    #[tokio::test]
    async fn test_forwards_download_message() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let sink = MessageSink::new(tx);

        let result = ScrapeResult::new(
            "https://www.facebook.com/groups/123",
            GroupInfo::unknown(),
            vec![],
            5,
        );
        sink.deliver(&result).await.unwrap();

        match rx.try_recv().unwrap() {
            RuntimeMessage::DownloadScrapedData { data } => assert_eq!(data, result),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_closed_channel_reports_sink_error() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);

        let sink = MessageSink::new(tx);
        let result = ScrapeResult::new(
            "https://www.facebook.com/groups/123",
            GroupInfo::unknown(),
            vec![],
            5,
        );

        assert!(matches!(
            sink.deliver(&result).await,
            Err(SinkError::ChannelClosed)
        ));
    }
}
