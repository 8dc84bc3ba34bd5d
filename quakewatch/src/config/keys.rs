//! Named configuration keys for `config get/set/list`.

use std::path::PathBuf;
use std::str::FromStr;

use super::file::{invalid, ConfigError, ConfigFile};

/// A `section.key` setting in `config.ini`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    FeedBaseUrl,
    FeedResource,
    FeedPollIntervalMs,
    FeedTimeoutSecs,
    CitiesPath,
    CitiesNeighbors,
    CitiesNameColumn,
    CitiesLatitudeColumn,
    CitiesLongitudeColumn,
    LoggingLevel,
    LoggingDirectory,
}

const ALL_KEYS: [ConfigKey; 11] = [
    ConfigKey::FeedBaseUrl,
    ConfigKey::FeedResource,
    ConfigKey::FeedPollIntervalMs,
    ConfigKey::FeedTimeoutSecs,
    ConfigKey::CitiesPath,
    ConfigKey::CitiesNeighbors,
    ConfigKey::CitiesNameColumn,
    ConfigKey::CitiesLatitudeColumn,
    ConfigKey::CitiesLongitudeColumn,
    ConfigKey::LoggingLevel,
    ConfigKey::LoggingDirectory,
];

impl ConfigKey {
    /// Every key, grouped by section in file order.
    pub fn all() -> &'static [ConfigKey] {
        &ALL_KEYS
    }

    /// INI section name.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::FeedBaseUrl
            | ConfigKey::FeedResource
            | ConfigKey::FeedPollIntervalMs
            | ConfigKey::FeedTimeoutSecs => "feed",
            ConfigKey::CitiesPath
            | ConfigKey::CitiesNeighbors
            | ConfigKey::CitiesNameColumn
            | ConfigKey::CitiesLatitudeColumn
            | ConfigKey::CitiesLongitudeColumn => "cities",
            ConfigKey::LoggingLevel | ConfigKey::LoggingDirectory => "logging",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::FeedBaseUrl => "base_url",
            ConfigKey::FeedResource => "resource",
            ConfigKey::FeedPollIntervalMs => "poll_interval_ms",
            ConfigKey::FeedTimeoutSecs => "timeout_secs",
            ConfigKey::CitiesPath => "path",
            ConfigKey::CitiesNeighbors => "neighbors",
            ConfigKey::CitiesNameColumn => "name_column",
            ConfigKey::CitiesLatitudeColumn => "latitude_column",
            ConfigKey::CitiesLongitudeColumn => "longitude_column",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingDirectory => "directory",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as a string; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::FeedBaseUrl => config.feed.base_url.clone(),
            ConfigKey::FeedResource => config.feed.resource.clone(),
            ConfigKey::FeedPollIntervalMs => config.feed.poll_interval_ms.to_string(),
            ConfigKey::FeedTimeoutSecs => config.feed.timeout_secs.to_string(),
            ConfigKey::CitiesPath => config.cities.path.to_string_lossy().to_string(),
            ConfigKey::CitiesNeighbors => config.cities.neighbors.to_string(),
            ConfigKey::CitiesNameColumn => config.cities.name_column.clone(),
            ConfigKey::CitiesLatitudeColumn => config.cities.latitude_column.clone(),
            ConfigKey::CitiesLongitudeColumn => config.cities.longitude_column.clone(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingDirectory => config
                .logging
                .directory
                .as_ref()
                .map(|d| d.to_string_lossy().to_string())
                .unwrap_or_default(),
        }
    }

    /// Parses `value` and stores it in `config`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match self {
            ConfigKey::FeedBaseUrl => config.feed.base_url = value.to_string(),
            ConfigKey::FeedResource => config.feed.resource = value.to_string(),
            ConfigKey::FeedPollIntervalMs => config.feed.poll_interval_ms = self.parse(value)?,
            ConfigKey::FeedTimeoutSecs => config.feed.timeout_secs = self.parse(value)?,
            ConfigKey::CitiesPath => config.cities.path = PathBuf::from(value),
            ConfigKey::CitiesNeighbors => config.cities.neighbors = self.parse(value)?,
            ConfigKey::CitiesNameColumn => config.cities.name_column = value.to_string(),
            ConfigKey::CitiesLatitudeColumn => config.cities.latitude_column = value.to_string(),
            ConfigKey::CitiesLongitudeColumn => {
                config.cities.longitude_column = value.to_string()
            }
            ConfigKey::LoggingLevel => config.logging.level = value.to_string(),
            ConfigKey::LoggingDirectory => {
                config.logging.directory = (!value.is_empty()).then(|| PathBuf::from(value))
            }
        }
        Ok(())
    }

    fn parse<T: FromStr>(&self, value: &str) -> Result<T, ConfigError>
    where
        T::Err: std::fmt::Display,
    {
        value
            .parse()
            .map_err(|e: T::Err| invalid(*self, value, &e.to_string()))
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_KEYS
            .iter()
            .copied()
            .find(|key| key.name() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_names() {
        for key in ConfigKey::all() {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
        }
        assert!(matches!(
            "feed.nope".parse::<ConfigKey>(),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_set_and_get_number() {
        let mut config = ConfigFile::default();
        ConfigKey::CitiesNeighbors.set(&mut config, " 7 ").unwrap();
        assert_eq!(config.cities.neighbors, 7);
        assert_eq!(ConfigKey::CitiesNeighbors.get(&config), "7");
    }

    #[test]
    fn test_set_rejects_negative_neighbors() {
        let mut config = ConfigFile::default();
        let err = ConfigKey::CitiesNeighbors.set(&mut config, "-1").unwrap_err();
        assert!(err.to_string().contains("cities.neighbors"));
    }

    #[test]
    fn test_empty_directory_unsets() {
        let mut config = ConfigFile::default();
        ConfigKey::LoggingDirectory.set(&mut config, "/tmp/logs").unwrap();
        assert_eq!(config.logging.directory, Some(PathBuf::from("/tmp/logs")));

        ConfigKey::LoggingDirectory.set(&mut config, "").unwrap();
        assert_eq!(config.logging.directory, None);
        assert_eq!(ConfigKey::LoggingDirectory.get(&config), "");
    }

    #[test]
    fn test_sections_are_contiguous() {
        let sections: Vec<_> = ConfigKey::all().iter().map(|k| k.section()).collect();
        assert_eq!(sections.first(), Some(&"feed"));
        assert_eq!(sections.last(), Some(&"logging"));
        let mut seen = Vec::new();
        for section in sections {
            if seen.last() != Some(&section) {
                assert!(!seen.contains(&section), "section {} split", section);
                seen.push(section);
            }
        }
    }
}
