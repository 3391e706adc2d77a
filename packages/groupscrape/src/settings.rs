//! Tiny key-value settings store.
//!
//! Persists user preferences (currently just the webhook URL) as a JSON
//! object on disk. Reads and writes are synchronous; callers touch the
//! store at startup and on explicit saves, never on the scrape path.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::SettingsError;

/// Key under which the webhook destination is stored.
pub const WEBHOOK_URL_KEY: &str = "webhookUrl";

/// File-backed string-to-string settings store.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up one setting. A missing file reads as empty.
    pub fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.read_all()?.get(key).cloned())
    }

    /// Store one setting, creating the file if needed.
    pub fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        let mut settings = self.read_all()?;
        settings.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&settings)?)?;
        Ok(())
    }

    /// Stored webhook destination, if any.
    pub fn webhook_url(&self) -> Result<Option<String>, SettingsError> {
        self.get(WEBHOOK_URL_KEY)
    }

    /// Persist the webhook destination.
    pub fn set_webhook_url(&self, url: &str) -> Result<(), SettingsError> {
        self.set(WEBHOOK_URL_KEY, url)
    }

    fn read_all(&self) -> Result<HashMap<String, String>, SettingsError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        assert_eq!(store.webhook_url().unwrap(), None);
    }

    #[test]
    fn test_webhook_url_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));

        store
            .set_webhook_url("https://hooks.example.com/scrape")
            .unwrap();
        assert_eq!(
            store.webhook_url().unwrap(),
            Some("https://hooks.example.com/scrape".to_string())
        );

        // Other keys survive an overwrite of one key.
        store.set("theme", "dark").unwrap();
        store.set_webhook_url("https://hooks.example.com/v2").unwrap();
        assert_eq!(store.get("theme").unwrap(), Some("dark".to_string()));
        assert_eq!(
            store.webhook_url().unwrap(),
            Some("https://hooks.example.com/v2".to_string())
        );
    }
}
