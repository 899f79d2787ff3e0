// Standard library
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// 3rd party crates
use config::{Config, ConfigError, Environment, File, FileFormat};
use log::{debug, error, info};
use tokio::sync::RwLock;

// Current module imports
use super::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, CONFIG_PATH_ENV, ENV_PREFIX, ENV_SEPARATOR, LOG_LEVELS,
};
use super::errors::ValidationError;
use super::types::{ConfigManager, Settings, ValidatedSettings};

impl Settings {
    pub fn get_log_level(&self) -> String {
        self.log.level.to_lowercase()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !LOG_LEVELS.contains(&self.get_log_level().as_str()) {
            return Err(ValidationError::InvalidLogLevel(self.log.level.clone()));
        }

        let base_url = self.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://"))
            || base_url.trim_end_matches('/').ends_with(':')
        {
            return Err(ValidationError::InvalidBaseUrl(self.api.base_url.clone()));
        }

        if matches!(&self.api.api_key, Some(key) if key.trim().is_empty()) {
            return Err(ValidationError::EmptyApiKey);
        }

        Ok(())
    }
}

impl ConfigManager {
    /// Loads settings from the default locations and the environment.
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_path(Self::get_config_path())
    }

    /// Loads settings from `config_path` (if given and present) layered under
    /// the environment, then validates them.
    pub fn from_path(config_path: Option<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let settings: Settings = Self::load_settings(config_path.as_deref())?;

        let validated_settings = ValidatedSettings::new(settings).map_err(|e| {
            error!("Configuration validation failed: {}", e);
            e
        })?;

        Ok(ConfigManager {
            settings: Arc::new(RwLock::new(validated_settings.into_inner())),
        })
    }

    /// Determines the configuration file path.
    ///
    /// An explicit path from the environment wins over the user's config
    /// directory. `None` means only defaults and the environment apply.
    fn get_config_path() -> Option<PathBuf> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        let path = dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
        if path.is_none() {
            debug!("Could not determine the configuration directory");
        }
        path
    }

    /// Loads the settings from the configuration file and environment variables.
    fn load_settings(config_path: Option<&Path>) -> Result<Settings, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            let config_file: &str = path.to_str().ok_or_else(|| {
                let msg: &str = "Configuration file path contains invalid UTF-8 characters";
                error!("{}", msg);
                ConfigError::Message(msg.into())
            })?;

            if path.exists() {
                info!("Loading configuration from {:?}", path);
            }
            builder = builder.add_source(
                File::new(config_file, FileFormat::Toml).required(false),
            );
        }

        let settings: Config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Provides a read-locked reference to the current settings.
    pub async fn get_settings(&self) -> tokio::sync::RwLockReadGuard<'_, Settings> {
        self.settings.read().await
    }

    pub async fn get_log_level(&self) -> String {
        self.settings.read().await.get_log_level()
    }
}

impl ValidatedSettings {
    pub fn new(settings: Settings) -> Result<Self, ValidationError> {
        settings.validate()?;
        Ok(ValidatedSettings(settings))
    }

    pub fn into_inner(self) -> Settings {
        self.0
    }
}

impl std::ops::Deref for ValidatedSettings {
    type Target = Settings;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::constants::EXAMPLE_CONFIG;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.get_log_level(), "info");
        assert_eq!(settings.api.base_url, "https://api.bunny.net");
        assert!(settings.api.api_key.is_none());
        assert!(ValidatedSettings::new(settings).is_ok());
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut settings = Settings::default();
        settings.log.level = "verbose".to_string();
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::InvalidLogLevel(level)) if level == "verbose"
        ));
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut settings = Settings::default();
        settings.api.base_url = "ftp://api.bunny.net".to_string();
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn loads_values_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[log]\nlevel = \"DEBUG\"\n\n[api]\nbase_url = \"http://127.0.0.1:8080\"\napi_key = \"file-key\""
        )
        .unwrap();

        let manager = ConfigManager::from_path(Some(file.path().to_path_buf())).unwrap();
        let settings = manager.settings.try_read().unwrap();
        assert_eq!(settings.get_log_level(), "debug");
        assert_eq!(settings.api.base_url, "http://127.0.0.1:8080");
        assert_eq!(settings.api.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::from_path(Some(dir.path().join("absent.toml"))).unwrap();
        let settings = manager.settings.try_read().unwrap();
        assert_eq!(settings.api.base_url, "https://api.bunny.net");
    }

    #[test]
    fn example_config_is_valid() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(EXAMPLE_CONFIG.as_bytes()).unwrap();

        let manager = ConfigManager::from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(manager.settings.try_read().unwrap().get_log_level(), "info");
    }

    #[test]
    fn invalid_file_values_fail_validation() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[log]\nlevel = \"loud\"").unwrap();

        assert!(ConfigManager::from_path(Some(file.path().to_path_buf())).is_err());
    }
}
