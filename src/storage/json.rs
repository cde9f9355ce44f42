use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;

use crate::settings::StoredReminderSettings;

use super::SettingsStorage;

#[derive(Debug, Error)]
pub enum JsonSettingsError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to serialize reminder settings")]
    Serialize(#[source] serde_json::Error),
}

pub struct JsonFileSettingsStorage {
    path: PathBuf,
}

impl JsonFileSettingsStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SettingsStorage for JsonFileSettingsStorage {
    type Error = JsonSettingsError;

    async fn load(&self) -> Result<Option<StoredReminderSettings>, Self::Error> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        match serde_json::from_str(&raw) {
            Ok(stored) => Ok(Some(stored)),
            Err(error) => {
                log::warn!(
                    "[STORAGE] Settings file {} is malformed, falling back to defaults. {error}",
                    self.path.display()
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, settings: &StoredReminderSettings) -> Result<(), Self::Error> {
        let raw =
            serde_json::to_string_pretty(settings).map_err(JsonSettingsError::Serialize)?;
        fs::write(&self.path, raw).await?;

        Ok(())
    }
}
