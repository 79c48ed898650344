use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::settings::Settings;

pub const SECRETS_FILE_NAME: &str = "secrets.toml";
pub const SECRETS_ENV: &str = "SMARTGRIND_SECRETS";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const ADDR_ENV: &str = "SMARTGRIND_ADDR";

/// Locates and loads the secrets file at startup
pub struct SettingsService {
    candidates: Vec<PathBuf>,
}

impl SettingsService {
    /// Standard lookup: `$SMARTGRIND_SECRETS`, `./secrets.toml`, then the
    /// platform config directory.
    pub fn new() -> Self {
        let mut candidates = Vec::new();
        if let Ok(path) = env::var(SECRETS_ENV) {
            if !path.trim().is_empty() {
                candidates.push(PathBuf::from(path));
            }
        }
        candidates.push(PathBuf::from(SECRETS_FILE_NAME));
        if let Some(dirs) = ProjectDirs::from("com", "SmartGrind", "SmartGrind") {
            candidates.push(dirs.config_dir().join(SECRETS_FILE_NAME));
        }
        Self { candidates }
    }

    /// Look only at the given path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            candidates: vec![path.into()],
        }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Load settings from the first existing candidate, then apply
    /// environment fallbacks. A missing file gives defaults; a malformed one
    /// is an error.
    pub fn load(&self) -> Result<Settings> {
        let mut settings = match self.candidates.iter().find(|path| path.is_file()) {
            Some(path) => {
                log::info!("Loading settings from {}", path.display());
                Self::load_file(path)?
            }
            None => {
                log::warn!(
                    "No {} found; AI features need {} to be configured",
                    SECRETS_FILE_NAME,
                    API_KEY_ENV
                );
                Settings::default()
            }
        };

        if settings.api_key().is_none() {
            if let Ok(key) = env::var(API_KEY_ENV) {
                settings.api_key = Some(key);
            }
        }

        if let Ok(addr) = env::var(ADDR_ENV) {
            if !addr.trim().is_empty() {
                settings.server.bind = addr.trim().to_string();
            }
        }

        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if settings.api_key().is_none() {
            log::warn!("No API key configured; summaries and roadmaps will fail until one is added");
        }

        Ok(settings)
    }

    fn load_file(path: &Path) -> Result<Settings> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Failed to parse settings file: {:?}", path))
    }

    pub fn parse(content: &str) -> Result<Settings> {
        let settings: Settings = toml::from_str(content)?;
        Ok(settings)
    }
}

impl Default for SettingsService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn write_secrets(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn clear_env() {
        env::remove_var(API_KEY_ENV);
        env::remove_var(ADDR_ENV);
        env::remove_var(SECRETS_ENV);
    }

    #[test]
    fn test_parse_full_file() {
        let settings = SettingsService::parse(
            r#"
GEMINI_API_KEY = "abc123"

[server]
bind = "0.0.0.0:9000"

[ai]
model = "gemini-2.5-pro"
timeout_secs = 45

[calendar]
alarm_minutes = 15
timezone = "Europe/London"
"#,
        )
        .unwrap();

        assert_eq!(settings.api_key(), Some("abc123"));
        assert_eq!(settings.server.bind, "0.0.0.0:9000");
        assert_eq!(settings.ai.model, "gemini-2.5-pro");
        assert_eq!(settings.ai.timeout_secs, 45);
        assert_eq!(settings.ai.base_url, crate::models::settings::DEFAULT_BASE_URL);
        assert_eq!(settings.calendar.alarm_minutes, 15);
        assert_eq!(settings.calendar.timezone.as_deref(), Some("Europe/London"));
    }

    #[test]
    fn test_parse_key_only() {
        let settings = SettingsService::parse("GEMINI_API_KEY = \"k\"\n").unwrap();
        assert_eq!(settings.api_key(), Some("k"));
        assert_eq!(settings.ai.model, crate::models::settings::DEFAULT_MODEL);
    }

    #[test]
    fn test_parse_malformed() {
        assert!(SettingsService::parse("GEMINI_API_KEY = ").is_err());
    }

    #[test]
    #[serial]
    fn test_load_from_file() {
        clear_env();
        let file = write_secrets("GEMINI_API_KEY = \"from-file\"\n");
        let settings = SettingsService::with_path(file.path()).load().unwrap();
        assert_eq!(settings.api_key(), Some("from-file"));
    }

    #[test]
    #[serial]
    fn test_missing_file_gives_defaults_without_key() {
        clear_env();
        let dir = tempdir().unwrap();
        let settings = SettingsService::with_path(dir.path().join("absent.toml"))
            .load()
            .unwrap();
        assert!(settings.api_key().is_none());
        assert_eq!(settings.server.bind, crate::models::settings::DEFAULT_BIND);
    }

    #[test]
    #[serial]
    fn test_env_key_used_only_as_fallback() {
        clear_env();
        env::set_var(API_KEY_ENV, "from-env");

        let dir = tempdir().unwrap();
        let settings = SettingsService::with_path(dir.path().join("absent.toml"))
            .load()
            .unwrap();
        assert_eq!(settings.api_key(), Some("from-env"));

        let file = write_secrets("GEMINI_API_KEY = \"from-file\"\n");
        let settings = SettingsService::with_path(file.path()).load().unwrap();
        assert_eq!(settings.api_key(), Some("from-file"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_addr_override() {
        clear_env();
        env::set_var(ADDR_ENV, "127.0.0.1:9999");
        let dir = tempdir().unwrap();
        let settings = SettingsService::with_path(dir.path().join("absent.toml"))
            .load()
            .unwrap();
        assert_eq!(settings.server.bind, "127.0.0.1:9999");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_timezone_fails_load() {
        clear_env();
        let file = write_secrets("[calendar]\ntimezone = \"Nowhere/Special\"\n");
        let err = SettingsService::with_path(file.path()).load().unwrap_err();
        assert!(err.to_string().contains("Unknown timezone"));
    }

    #[test]
    #[serial]
    fn test_secrets_env_is_first_candidate() {
        clear_env();
        env::set_var(SECRETS_ENV, "/tmp/custom-secrets.toml");
        let service = SettingsService::new();
        assert_eq!(
            service.candidates()[0],
            PathBuf::from("/tmp/custom-secrets.toml")
        );
        clear_env();
    }

    #[test]
    #[serial]
    fn test_malformed_file_is_error() {
        clear_env();
        let file = write_secrets("this is not toml = = =");
        assert!(SettingsService::with_path(file.path()).load().is_err());
    }
}
