//! QuakeWatch CLI - Command-line interface
//!
//! Watches the USGS earthquake feed and prints each new batch of events
//! with their nearest cities.

mod commands;
mod error;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::nearest::NearestArgs;
use commands::watch::WatchArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "quakewatch")]
#[command(version = quakewatch::VERSION)]
#[command(about = "Live earthquake feed annotated with the nearest population centers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the feed and print new events as they arrive
    Watch {
        /// Polling interval in milliseconds (overrides feed.poll_interval_ms)
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Feed resource to poll, e.g. all_day.geojson (overrides feed.resource)
        #[arg(long)]
        resource: Option<String>,

        /// Nearest cities listed per event (overrides cities.neighbors)
        #[arg(long, short = 'k')]
        neighbors: Option<usize>,

        /// City list CSV, optionally gzipped (overrides cities.path)
        #[arg(long)]
        cities: Option<PathBuf>,
    },

    /// Find the cities nearest to a coordinate
    Nearest {
        /// Latitude in degrees, positive north
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in degrees, positive east
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Number of cities to list (overrides cities.neighbors)
        #[arg(short = 'k', long)]
        neighbors: Option<usize>,

        /// City list CSV, optionally gzipped (overrides cities.path)
        #[arg(long)]
        cities: Option<PathBuf>,
    },

    /// View and modify configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Watch {
            interval_ms,
            resource,
            neighbors,
            cities,
        } => commands::watch::run(WatchArgs {
            interval_ms,
            resource,
            neighbors,
            cities,
        }),
        Commands::Nearest {
            lat,
            lon,
            neighbors,
            cities,
        } => commands::nearest::run(NearestArgs {
            lat,
            lon,
            neighbors,
            cities,
        }),
        Commands::Config { command } => commands::config::run(command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_nearest_with_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "quakewatch", "nearest", "--lat", "-33.87", "--lon", "-70.6", "-k", "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Nearest {
                lat, lon, neighbors, ..
            } => {
                assert_eq!(lat, -33.87);
                assert_eq!(lon, -70.6);
                assert_eq!(neighbors, Some(5));
            }
            _ => panic!("Expected nearest command"),
        }
    }

    #[test]
    fn test_parse_watch_overrides() {
        let cli = Cli::try_parse_from([
            "quakewatch",
            "watch",
            "--interval-ms",
            "5000",
            "--resource",
            "all_day.geojson",
        ])
        .unwrap();
        match cli.command {
            Commands::Watch {
                interval_ms,
                resource,
                neighbors,
                cities,
            } => {
                assert_eq!(interval_ms, Some(5000));
                assert_eq!(resource.as_deref(), Some("all_day.geojson"));
                assert_eq!(neighbors, None);
                assert_eq!(cities, None);
            }
            _ => panic!("Expected watch command"),
        }
    }
}
