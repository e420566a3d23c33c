//! CLI subcommand implementations.

pub mod get;
pub mod run;

use anyhow::Result;
use std::path::Path;

use crate::config::{self, Config};

/// Load configuration from an explicit path or the default location.
pub(crate) fn load_config(config_path: Option<&str>) -> Result<Config> {
    match config_path {
        Some(path) => config::load_from_path(Path::new(path)),
        None => config::load(),
    }
}
