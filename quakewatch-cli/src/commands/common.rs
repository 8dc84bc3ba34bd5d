//! Setup shared across CLI commands.

use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use quakewatch::cities::{load_cities_with_columns, CityColumns, NearestNeighborIndex};
use quakewatch::config::ConfigFile;
use quakewatch::logging::{init_logging, LoggingGuard};

use crate::error::CliError;

/// Validated configuration plus the logging it set up.
///
/// Every command that touches the library builds one first, so `[logging]`
/// applies to all of them. Keep it alive for the whole command; dropping it
/// flushes the log file.
pub struct CommandContext {
    pub config: ConfigFile,
    _logging: LoggingGuard,
}

impl CommandContext {
    /// Loads the user's config file and starts logging.
    pub fn load() -> Result<Self, CliError> {
        Self::from_config(ConfigFile::load()?)
    }

    /// Validates `config` and starts logging as it describes.
    pub fn from_config(config: ConfigFile) -> Result<Self, CliError> {
        config.validate()?;
        let logging = init_logging(&config.logging_config())?;
        Ok(Self {
            config,
            _logging: logging,
        })
    }
}

/// Neighbor count: CLI takes precedence, then config.
pub fn resolve_neighbors(cli: Option<usize>, config: &ConfigFile) -> usize {
    cli.unwrap_or(config.cities.neighbors)
}

/// Loads the city list behind a spinner and builds the index.
pub fn load_index(path: &Path, columns: &CityColumns) -> Result<NearestNeighborIndex, CliError> {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Loading cities from {}", path.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let cities = match load_cities_with_columns(path, columns) {
        Ok(cities) => cities,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    };

    let index = NearestNeighborIndex::new(cities)?;
    spinner.finish_with_message(format!("Loaded {} cities", index.len()));
    Ok(index)
}
