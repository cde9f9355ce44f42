use std::sync::OnceLock;

use chrono_tz::Tz;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

fn default_storage_path() -> String {
    "wird_settings.json".to_owned()
}

fn default_timezone() -> String {
    "UTC".to_owned()
}

#[derive(Deserialize, Debug)]
pub struct AppSettings {
    #[serde(default = "default_storage_path")]
    pub storage_path: String,

    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl AppSettings {
    fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("appsettings").required(false))
            .add_source(File::with_name("appsettings.local").required(false))
            .add_source(Environment::with_prefix("WIRD"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn delivery_timezone(&self) -> Tz {
        match self.timezone.parse() {
            Ok(timezone) => timezone,
            Err(_) => {
                log::warn!(
                    "[CONFIG] Unknown timezone {:?}, falling back to UTC",
                    self.timezone
                );
                Tz::UTC
            }
        }
    }
}

pub fn get() -> &'static AppSettings {
    static APPSETTINGS: OnceLock<AppSettings> = OnceLock::new();
    APPSETTINGS.get_or_init(|| AppSettings::new().unwrap())
}
