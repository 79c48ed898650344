mod service;

pub use service::{SettingsService, ADDR_ENV, API_KEY_ENV, SECRETS_ENV, SECRETS_FILE_NAME};
