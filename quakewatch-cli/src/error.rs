//! CLI error types.

use std::fmt;

use quakewatch::cities::{CitiesError, IndexError};
use quakewatch::config::ConfigError;
use quakewatch::feed::FeedError;
use quakewatch::geo::GeoError;
use quakewatch::logging::LoggingError;
use quakewatch::poller::PollerError;

/// Errors surfaced to the user by the `quakewatch` binary.
#[derive(Debug)]
pub enum CliError {
    /// Invalid or missing configuration.
    Config(String),

    /// Reading or writing the config file failed.
    ConfigFile(ConfigError),

    /// Logging could not be set up.
    Logging(LoggingError),

    /// The city list could not be loaded.
    Cities(CitiesError),

    /// The city index could not be built.
    Index(IndexError),

    /// The HTTP client could not be created.
    Feed(FeedError),

    /// The poller rejected its settings.
    Poller(PollerError),

    /// Invalid coordinates on the command line.
    Coordinates(GeoError),

    /// The Ctrl+C handler could not be installed.
    SignalHandler(String),

    /// Failed to create the Tokio runtime.
    RuntimeCreation(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "Config file error: {}", e),
            CliError::Logging(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Cities(e) => write!(
                f,
                "Failed to load city list: {}. Set cities.path in config.ini or use --cities.",
                e
            ),
            CliError::Index(e) => write!(f, "Failed to build city index: {}", e),
            CliError::Feed(e) => write!(f, "Failed to create feed client: {}", e),
            CliError::Poller(e) => write!(f, "Failed to create poller: {}", e),
            CliError::Coordinates(e) => write!(f, "{}", e),
            CliError::SignalHandler(msg) => {
                write!(f, "Failed to set Ctrl+C handler: {}", msg)
            }
            CliError::RuntimeCreation(msg) => {
                write!(f, "Failed to create Tokio runtime: {}", msg)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Cities(e) => Some(e),
            CliError::Index(e) => Some(e),
            CliError::Feed(e) => Some(e),
            CliError::Poller(e) => Some(e),
            CliError::Coordinates(e) => Some(e),
            CliError::Config(_) | CliError::SignalHandler(_) | CliError::RuntimeCreation(_) => {
                None
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<CitiesError> for CliError {
    fn from(e: CitiesError) -> Self {
        CliError::Cities(e)
    }
}

impl From<IndexError> for CliError {
    fn from(e: IndexError) -> Self {
        CliError::Index(e)
    }
}

impl From<FeedError> for CliError {
    fn from(e: FeedError) -> Self {
        CliError::Feed(e)
    }
}

impl From<PollerError> for CliError {
    fn from(e: PollerError) -> Self {
        CliError::Poller(e)
    }
}

impl From<GeoError> for CliError {
    fn from(e: GeoError) -> Self {
        CliError::Coordinates(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error_display() {
        let err = CliError::Config("missing city list".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing city list");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_signal_handler_error_is_not_a_config_error() {
        let err = CliError::SignalHandler("handler already registered".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to set Ctrl+C handler: handler already registered"
        );
        assert!(!err.to_string().contains("Configuration"));
    }

    #[test]
    fn test_coordinates_error_has_source() {
        let err: CliError = GeoError::InvalidLatitude(91.0).into();
        assert!(err.to_string().contains("Invalid latitude"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_cities_error_mentions_config_key() {
        let err: CliError = CitiesError::Empty.into();
        assert!(err.to_string().contains("cities.path"));
    }
}
