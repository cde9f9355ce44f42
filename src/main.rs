use std::sync::Arc;

use wird::appsettings;
use wird::notify::{LocalNotificationGateway, LogNotificationSink, NotificationGateway};
use wird::scheduling::ReminderScheduler;
use wird::settings::{ReminderSettings, StoredReminderSettings};
use wird::storage::{JsonFileSettingsStorage, SettingsStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let app_settings = appsettings::get();
    let storage = JsonFileSettingsStorage::new(&app_settings.storage_path);

    let stored = storage.load().await?;
    if stored.is_none() {
        log::info!("[STARTUP] No persisted reminder settings, writing defaults");
        storage
            .save(&StoredReminderSettings::from(&ReminderSettings::default()))
            .await?;
    }
    let settings = ReminderSettings::from_stored(&stored.unwrap_or_default());

    let sink = Arc::new(LogNotificationSink);
    let gateway: Arc<dyn NotificationGateway> = Arc::new(LocalNotificationGateway::new(
        sink,
        app_settings.delivery_timezone(),
    ));
    let scheduler = ReminderScheduler::new(Arc::clone(&gateway));

    let applied = scheduler.reschedule(&settings).await?;
    log::info!(
        "[STARTUP] {} reminders scheduled, waiting for shutdown signal",
        applied.triggers.len()
    );

    tokio::signal::ctrl_c().await?;

    log::info!("[SHUTDOWN] Clearing installed triggers");
    gateway.cancel_all_daily_triggers().await?;

    Ok(())
}
