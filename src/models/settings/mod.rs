// Settings module
// Startup configuration, read once from the secrets file

use serde::Deserialize;
use std::fmt;

pub const DEFAULT_BIND: &str = "127.0.0.1:8501";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ALARM_MINUTES: u32 = 30;

#[derive(Clone, Default, Deserialize)]
pub struct Settings {
    /// Credential for the text-generation API
    #[serde(rename = "GEMINI_API_KEY", default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub ai: AiSettings,
    #[serde(default)]
    pub calendar: CalendarSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiSettings {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarSettings {
    #[serde(default = "default_alarm_minutes")]
    pub alarm_minutes: u32,
    /// IANA zone name for event times; floating local time when absent
    #[serde(default)]
    pub timezone: Option<String>,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_alarm_minutes() -> u32 {
    DEFAULT_ALARM_MINUTES
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            alarm_minutes: default_alarm_minutes(),
            timezone: None,
        }
    }
}

impl Settings {
    /// The credential, if one is configured and not blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.ai.timeout_secs == 0 {
            return Err("ai.timeout_secs must be greater than zero".to_string());
        }
        if self.calendar.alarm_minutes > crate::models::request::MAX_ALARM_MINUTES {
            return Err(format!(
                "calendar.alarm_minutes must be at most {}",
                crate::models::request::MAX_ALARM_MINUTES
            ));
        }
        if let Some(tz) = &self.calendar.timezone {
            tz.parse::<chrono_tz::Tz>()
                .map_err(|_| format!("Unknown timezone '{}'", tz))?;
        }
        Ok(())
    }
}

// Keeps the key out of debug logs.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key().map(|_| "***"))
            .field("server", &self.server)
            .field("ai", &self.ai)
            .field("calendar", &self.calendar)
            .finish()
    }
}
