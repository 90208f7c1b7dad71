//! Command implementations.

mod info;
mod replay;
mod validate;

pub use info::run_info;
pub use replay::run_replay;
pub use validate::run_validate;

use std::path::Path;

use anyhow::{Context, Result};
use contracts::LoggerConfig;
use tracing::info;

/// Load configuration from `path`, or defaults when no path is given
fn load_config(path: Option<&Path>) -> Result<LoggerConfig> {
    let Some(path) = path else {
        info!("No configuration file given, using defaults");
        return Ok(LoggerConfig::default());
    };

    if !path.exists() {
        anyhow::bail!("Configuration file not found: {}", path.display());
    }

    info!(config = %path.display(), "Loading configuration");
    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}
