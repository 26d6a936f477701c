//! `p2pool-block-inspect` config.
use std::{fs::read_to_string, path::Path};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::constants::{CONFIG_HEADER, DEFAULT_CONFIG_FILE_NAME};

mod args;
mod tracing_config;

pub(crate) use args::Args;
use tracing_config::TracingConfig;

/// Reads the args & config file, returning the [`Config`] and the [`Args`].
///
/// Exits if the args asked for a config file that cannot be read.
pub(crate) fn read_config_and_args() -> (Config, Args) {
    let args = Args::parse();
    args.do_quick_requests();

    let config = if let Some(config_file) = &args.config_file {
        // If a config file was set in the args try to read it and exit if we can't.
        match Config::read_from_path(config_file) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to read config from file: {e:#}");
                std::process::exit(1);
            }
        }
    } else {
        // Otherwise use the config in the current directory, if there is one.
        std::env::current_dir()
            .map(|path| path.join(DEFAULT_CONFIG_FILE_NAME))
            .map_err(Into::into)
            .and_then(Config::read_from_path)
            .unwrap_or_default()
    };

    (args.apply_args(config), args)
}

/// The config for `p2pool-block-inspect`.
#[derive(Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub(crate) struct Config {
    /// Configuration for the logging system, tracing.
    pub(crate) tracing: TracingConfig,

    /// Configuration for the printed block.
    pub(crate) output: OutputConfig,
}

/// How the block is printed.
#[derive(Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub(crate) struct OutputConfig {
    /// Print indented JSON instead of a single line.
    ///
    /// Valid values | true, false
    pub(crate) pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl Config {
    /// Returns the default [`Config`] as a [`toml`] document.
    pub(crate) fn documented_config() -> String {
        let config = toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("# failed to serialize the default config: {e}\n"));

        format!("{CONFIG_HEADER}{config}")
    }

    /// Attempts to read a config file in [`toml`] format from the given [`Path`].
    ///
    /// # Errors
    ///
    /// Will return an [`Err`] if the file cannot be read or if the file is not a valid [`toml`] config.
    fn read_from_path(file: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let file_text = read_to_string(file.as_ref())?;

        Ok(toml::from_str(&file_text)
            .inspect(|_| eprintln!("Using config at: {}", file.as_ref().to_string_lossy()))?)
    }
}
