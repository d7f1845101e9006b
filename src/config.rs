//! Configuration management module.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Log levels accepted in `[logging] level`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Embedded SQLite database settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file. Defaults to `Database/staff_tracker.db` next to the executable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Folder locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Per-user folder for `app_settings.json` and `entry_grid_state.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Folder for rolling log files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

/// Logging preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Number of daily log files kept on disk.
    #[serde(default = "default_retain_days")]
    pub retain_days: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_retain_days() -> usize {
    30
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            retain_days: default_retain_days(),
        }
    }
}

/// Directory holding the running executable.
fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl AppConfig {
    /// Get config file path (same directory as executable).
    pub fn default_path() -> PathBuf {
        exe_dir().join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "Log level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }
        if self.logging.retain_days < 1 {
            return Err(ConfigError::Validation("Log retention must be at least 1 day".to_string()));
        }
        if let Some(path) = &self.database.path
            && path.as_os_str().is_empty()
        {
            return Err(ConfigError::Validation("Database path cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolved database file location.
    pub fn database_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| exe_dir().join("Database").join("staff_tracker.db"))
    }

    /// Resolved per-user data folder.
    pub fn data_dir(&self) -> PathBuf {
        self.paths.data_dir.clone().unwrap_or_else(|| {
            ProjectDirs::from("", "", "StaffTracker")
                .map(|dirs| dirs.data_local_dir().to_path_buf())
                .unwrap_or_else(|| exe_dir().join("Data"))
        })
    }

    /// Resolved log folder.
    pub fn log_dir(&self) -> PathBuf {
        self.paths.log_dir.clone().unwrap_or_else(|| exe_dir().join("Logs"))
    }
}

impl DatabaseConfig {
    /// Build connection string for SeaORM, creating the file when missing.
    pub fn connection_string(path: &Path) -> String {
        format!("sqlite://{}?mode=rwc", path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_connection_string() {
        let path = Path::new("/var/lib/staff/staff_tracker.db");
        assert_eq!(
            DatabaseConfig::connection_string(path),
            "sqlite:///var/lib/staff/staff_tracker.db?mode=rwc"
        );
    }

    #[test]
    fn test_validation_unknown_log_level() {
        let mut config = AppConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_retention() {
        let mut config = AppConfig::default();
        config.logging.retain_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_empty_database_path() {
        let mut config = AppConfig::default();
        config.database.path = Some(PathBuf::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = toml::from_str("[paths]\ndata_dir = \"/tmp/st\"\n").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.retain_days, 30);
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/st"));
        assert!(config.database.path.is_none());
    }

    #[test]
    fn test_try_load_missing_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(matches!(AppConfig::try_load(&path), ConfigLoadResult::Missing));

        std::fs::write(&path, "[logging]\nlevel = 3\n").unwrap();
        assert!(matches!(AppConfig::try_load(&path), ConfigLoadResult::Invalid(_)));

        AppConfig::default().save(&path).unwrap();
        assert!(matches!(AppConfig::try_load(&path), ConfigLoadResult::Loaded(_)));
    }
}
