//! Wire messages for the host messaging boundary.
//!
//! Triggers, progress notifications, and the download handoff all travel
//! as `{action: ...}`-tagged JSON; the serde representation here matches
//! that protocol exactly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::record::ScrapeResult;

/// Messages exchanged with the host environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum RuntimeMessage {
    /// Inbound trigger: start a scrape, optionally forwarding to a webhook.
    #[serde(rename_all = "camelCase")]
    StartScraping { webhook_url: String },

    /// Outbound fire-and-forget progress notification.
    ScrapingProgress { message: String },

    /// Outbound handoff to the download collaborator.
    DownloadScrapedData { data: ScrapeResult },
}

/// Response to a `startScraping` trigger.
///
/// Exactly one of `data`/`error` is populated on completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ScrapeResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_response: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeResponse {
    /// Successful completion carrying the result and any webhook reply.
    pub fn ok(data: ScrapeResult, webhook_response: Option<Value>) -> Self {
        Self {
            success: true,
            data: Some(data),
            webhook_response,
            error: None,
        }
    }

    /// Failed completion carrying a human-readable message.
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            webhook_response: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::GroupInfo;

    #[test]
    fn test_action_tags_match_protocol() {
        let start = RuntimeMessage::StartScraping {
            webhook_url: "https://hooks.example.com/x".to_string(),
        };
        let value = serde_json::to_value(&start).unwrap();
        assert_eq!(value["action"], "startScraping");
        assert_eq!(value["webhookUrl"], "https://hooks.example.com/x");

        let progress = RuntimeMessage::ScrapingProgress {
            message: "Scraping post 1/3".to_string(),
        };
        let value = serde_json::to_value(&progress).unwrap();
        assert_eq!(value["action"], "scrapingProgress");
        assert_eq!(value["message"], "Scraping post 1/3");

        let download = RuntimeMessage::DownloadScrapedData {
            data: ScrapeResult::new(
                "https://www.facebook.com/groups/123",
                GroupInfo::unknown(),
                vec![],
                0,
            ),
        };
        let value = serde_json::to_value(&download).unwrap();
        assert_eq!(value["action"], "downloadScrapedData");
        assert!(value["data"].is_object());
    }

    #[test]
    fn test_inbound_trigger_parses() {
        let json = r#"{"action":"startScraping","webhookUrl":""}"#;
        let message: RuntimeMessage = serde_json::from_str(json).unwrap();
        assert_eq!(
            message,
            RuntimeMessage::StartScraping {
                webhook_url: String::new()
            }
        );
    }

    #[test]
    fn test_response_populates_exactly_one_of_data_error() {
        let result = ScrapeResult::new(
            "https://www.facebook.com/groups/123",
            GroupInfo::unknown(),
            vec![],
            0,
        );

        let ok = ScrapeResponse::ok(result, None);
        assert!(ok.success && ok.data.is_some() && ok.error.is_none());

        let fail = ScrapeResponse::fail("scraping already in progress");
        assert!(!fail.success && fail.data.is_none() && fail.error.is_some());

        // Failure serialization omits the empty fields entirely
        let value = serde_json::to_value(&fail).unwrap();
        assert!(value.get("data").is_none());
        assert!(value.get("webhookResponse").is_none());
    }
}
