pub mod completions;
pub mod config;
pub mod rank;
pub mod session;

use std::path::Path;

use wsjf_core::{Config, ConfigError};

/// Load the config from `--config` or the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}
