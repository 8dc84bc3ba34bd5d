//! Config command - inspect and edit `config.ini`.
//!
//! Values are read through the same loader the other commands use, so a
//! malformed file is reported here rather than masked by defaults.

use std::path::Path;

use clap::Subcommand;
use quakewatch::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print one setting
    Get {
        /// Setting name as section.key, e.g. cities.neighbors
        key: String,
    },

    /// Change one setting and save the file
    Set {
        /// Setting name as section.key, e.g. feed.poll_interval_ms
        key: String,

        /// New value
        value: String,
    },

    /// Print every setting, marking those changed from the defaults
    List,

    /// Print the location of config.ini
    Path,
}

/// Run a config subcommand against the user's config file.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    run_with_file(&config_file_path(), command)
}

fn run_with_file(path: &Path, command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => {
            let key = parse_key(&key)?;
            println!("{}", display_value(&key.get(&ConfigFile::load_from(path)?)));
        }
        ConfigCommands::Set { key, value } => {
            let key = parse_key(&key)?;
            let mut config = ConfigFile::load_from(path)?;
            key.set(&mut config, &value)?;
            config.validate()?;
            config.save_to(path)?;

            println!("{} = {}", key.name(), display_value(&key.get(&config)));
            if let Some(flag) = command_line_override(key) {
                println!("(`quakewatch watch {}` still takes precedence for a single run)", flag);
            }
        }
        ConfigCommands::List => {
            let config = ConfigFile::load_from(path)?;
            println!("# {}", path.display());
            for line in listing(&config) {
                println!("{}", line);
            }
            if let Err(e) = config.validate() {
                println!();
                println!("warning: {}", e);
            }
        }
        ConfigCommands::Path => {
            if path.exists() {
                println!("{}", path.display());
            } else {
                println!("{} (not created yet, defaults in use)", path.display());
            }
        }
    }
    Ok(())
}

/// Parses a `section.key` name, pointing at `config list` when unknown.
fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown setting '{}'. Run 'quakewatch config list' for the available settings.",
            key
        ))
    })
}

/// Command-line flag that overrides `key` for one run, if any.
fn command_line_override(key: ConfigKey) -> Option<&'static str> {
    match key {
        ConfigKey::FeedResource => Some("--resource"),
        ConfigKey::FeedPollIntervalMs => Some("--interval-ms"),
        ConfigKey::CitiesPath => Some("--cities"),
        ConfigKey::CitiesNeighbors => Some("--neighbors"),
        _ => None,
    }
}

fn display_value(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}

/// INI-style listing of `config`; settings that differ from the defaults
/// carry a trailing `# default: ...` note.
fn listing(config: &ConfigFile) -> Vec<String> {
    let defaults = ConfigFile::default();
    let mut lines = Vec::new();
    let mut section = None;

    for key in ConfigKey::all() {
        if section != Some(key.section()) {
            lines.push(String::new());
            lines.push(format!("[{}]", key.section()));
            section = Some(key.section());
        }

        let value = key.get(config);
        let default = key.get(&defaults);
        let mut line = format!("{} = {}", key.key_name(), display_value(&value));
        if value != default {
            line.push_str(&format!("    # default: {}", display_value(&default)));
        }
        lines.push(line);
    }
    lines
}
