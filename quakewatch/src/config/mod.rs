//! Configuration file handling
//!
//! Settings live in an INI file at `<config dir>/quakewatch/config.ini`
//! (e.g. `~/.config/quakewatch/config.ini` on Linux). A missing file means
//! defaults; [`ConfigKey`] exposes each setting by its `section.key` name
//! for the CLI `config` command.

mod file;
mod keys;

use std::path::PathBuf;

pub use file::{
    CitiesSettings, ConfigError, ConfigFile, FeedSettings, LoggingSettings,
    DEFAULT_LOG_LEVEL, DEFAULT_POLL_INTERVAL_MS,
};
pub use keys::ConfigKey;

const APP_DIR: &str = "quakewatch";

/// Directory holding `config.ini`.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Path of the config file.
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.ini")
}

/// Default location of the city list.
pub fn default_cities_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("worldcities.csv.gz")
}
