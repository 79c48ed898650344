// SmartGrind study helper
// Main entry point

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono_tz::Tz;

use smartgrind::services::ai::GeminiClient;
use smartgrind::services::icalendar::ICalendarService;
use smartgrind::services::settings::SettingsService;
use smartgrind::services::study::StudyService;
use smartgrind::web::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("smartgrind=info"))
        .init();

    log::info!("Starting SmartGrind v{}", env!("CARGO_PKG_VERSION"));

    let settings = SettingsService::new().load()?;
    log::debug!("Settings: {:?}", settings);

    let generator = GeminiClient::from_settings(&settings);
    let ai_configured = generator.has_credential();

    let timezone = settings
        .calendar
        .timezone
        .as_deref()
        .and_then(|name| name.parse::<Tz>().ok());
    let calendar = ICalendarService::with_timezone(timezone);

    let study = StudyService::new(Arc::new(generator), calendar);
    let state = AppState::new(study, settings.calendar.alarm_minutes, ai_configured);

    web::start_server(&settings.server.bind, state)
        .await
        .with_context(|| format!("Server on {} stopped", settings.server.bind))
}
