//! INI configuration file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use super::keys::ConfigKey;
use super::{config_file_path, default_cities_path};
use crate::cities::{CityColumns, DEFAULT_NEIGHBOR_COUNT};
use crate::feed::{DEFAULT_BASE_URL, DEFAULT_RESOURCE, DEFAULT_TIMEOUT_SECS};
use crate::logging::LoggingConfig;

/// Default polling interval in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 60_000;

/// Default log level filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors reading, writing or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid INI.
    #[error("Failed to parse config file: {0}")]
    Parse(String),

    /// A value is present but unusable.
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// A `section.key` name that does not exist.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),
}

impl From<ini::Error> for ConfigError {
    fn from(e: ini::Error) -> Self {
        match e {
            ini::Error::Io(io) => ConfigError::Io(io),
            ini::Error::Parse(parse) => ConfigError::Parse(parse.to_string()),
        }
    }
}

/// `[feed]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSettings {
    /// Base address the resource path is resolved against.
    pub base_url: String,
    /// Resource fetched on each poll.
    pub resource: String,
    /// Polling interval in milliseconds.
    pub poll_interval_ms: u64,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            resource: DEFAULT_RESOURCE.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[cities]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitiesSettings {
    /// City list (CSV, optionally gzipped).
    pub path: PathBuf,
    /// Nearest cities reported per event.
    pub neighbors: usize,
    /// Header of the name column.
    pub name_column: String,
    /// Header of the latitude column.
    pub latitude_column: String,
    /// Header of the longitude column.
    pub longitude_column: String,
}

impl Default for CitiesSettings {
    fn default() -> Self {
        let columns = CityColumns::default();
        Self {
            path: default_cities_path(),
            neighbors: DEFAULT_NEIGHBOR_COUNT,
            name_column: columns.name,
            latitude_column: columns.latitude,
            longitude_column: columns.longitude,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `quakewatch=debug`.
    pub level: String,
    /// Directory for rolling log files; stderr only when unset.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            directory: None,
        }
    }
}

/// Contents of `config.ini`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub feed: FeedSettings,
    pub cities: CitiesSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Loads the user's config file, or defaults if it does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Loads `path`, or defaults if it does not exist.
    ///
    /// Keys missing from the file keep their defaults; unknown keys are
    /// ignored.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(config);
        }

        let ini = Ini::load_from_file(path)?;
        for key in ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|section| section.get(key.key_name()));
            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }

        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Writes the config to the user's config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Writes the config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }
        ini.write_to_file(path)?;
        Ok(())
    }

    /// Checks values that would make the poller or index unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.poll_interval_ms == 0 {
            return Err(invalid(ConfigKey::FeedPollIntervalMs, "0", "must be positive"));
        }
        if self.feed.timeout_secs == 0 {
            return Err(invalid(ConfigKey::FeedTimeoutSecs, "0", "must be positive"));
        }
        if self.feed.base_url.trim().is_empty() {
            return Err(invalid(ConfigKey::FeedBaseUrl, "", "must not be empty"));
        }
        Ok(())
    }

    /// Polling interval as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.feed.poll_interval_ms)
    }

    /// Column names for the city loader.
    pub fn city_columns(&self) -> CityColumns {
        CityColumns {
            name: self.cities.name_column.clone(),
            latitude: self.cities.latitude_column.clone(),
            longitude: self.cities.longitude_column.clone(),
        }
    }

    /// Logging setup derived from the `[logging]` section.
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.logging.level.clone(),
            directory: self.logging.directory.clone(),
        }
    }
}

pub(super) fn invalid(key: ConfigKey, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.name(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConfigFile::default();
        assert_eq!(config.feed.resource, "all_hour.geojson");
        assert_eq!(config.feed.poll_interval_ms, 60_000);
        assert_eq!(config.cities.neighbors, 3);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.directory.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigFile::load_from(&dir.path().join("config.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(
            &path,
            "[feed]\npoll_interval_ms = 5000\n\n[cities]\nneighbors = 5\n\n[other]\nfoo = bar\n",
        )
        .unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.feed.poll_interval_ms, 5000);
        assert_eq!(config.cities.neighbors, 5);
        assert_eq!(config.feed.resource, DEFAULT_RESOURCE);
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[feed]\npoll_interval_ms = soon\n").unwrap();

        let err = ConfigFile::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "feed.poll_interval_ms"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.feed.resource = "significant_day.geojson".to_string();
        config.cities.path = PathBuf::from("/data/cities.csv");
        config.logging.directory = Some(PathBuf::from("/var/log/quakewatch"));
        config.save_to(&path).unwrap();

        let reloaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = ConfigFile::default();
        config.feed.poll_interval_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_base_url() {
        let mut config = ConfigFile::default();
        config.feed.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_city_columns_from_config() {
        let mut config = ConfigFile::default();
        config.cities.name_column = "city".to_string();
        let columns = config.city_columns();
        assert_eq!(columns.name, "city");
        assert_eq!(columns.latitude, "latitude");
    }
}
