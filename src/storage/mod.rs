mod json;

pub use json::{JsonFileSettingsStorage, JsonSettingsError};

use std::convert::Infallible;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::settings::StoredReminderSettings;

// The store holds the raw form; validation and defaulting happen on the
// way out.
#[async_trait]
pub trait SettingsStorage: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn load(&self) -> Result<Option<StoredReminderSettings>, Self::Error>;
    async fn save(&self, settings: &StoredReminderSettings) -> Result<(), Self::Error>;
}

#[derive(Default)]
pub struct InMemorySettingsStorage {
    store: RwLock<Option<StoredReminderSettings>>,
}

impl InMemorySettingsStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStorage for InMemorySettingsStorage {
    type Error = Infallible;

    async fn load(&self) -> Result<Option<StoredReminderSettings>, Self::Error> {
        Ok(self.store.read().await.clone())
    }

    async fn save(&self, settings: &StoredReminderSettings) -> Result<(), Self::Error> {
        *self.store.write().await = Some(settings.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_before_save_yields_nothing() {
        let storage = InMemorySettingsStorage::new();

        assert_eq!(storage.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_then_load_roundtrips() {
        let storage = InMemorySettingsStorage::new();
        let stored = StoredReminderSettings {
            enabled: Some(true),
            count: Some(5),
            start_time: Some("07:00".to_owned()),
            end_time: Some("21:30".to_owned()),
        };

        storage.save(&stored).await.unwrap();

        assert_eq!(storage.load().await.unwrap(), Some(stored));
    }
}
