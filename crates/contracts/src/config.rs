//! LoggerConfig - Config Loader output
//!
//! Output layout and optional streams for the telemetry logger.

use serde::{Deserialize, Serialize};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete logger configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Output directory layout
    #[serde(default)]
    pub output: OutputConfig,

    /// Radar detection stream
    #[serde(default)]
    pub detection: DetectionConfig,
}

/// Output directory layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Environment variable that overrides the base directory
    #[serde(default = "default_env_var")]
    pub env_var: String,

    /// Base directory used when the environment variable is unset or empty
    #[serde(default = "default_base_dir")]
    pub default_base_dir: String,

    /// Subdirectory of the base directory holding per-run files
    #[serde(default = "default_run_subdir")]
    pub run_subdir: String,

    /// File extension (without dot)
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Flush the stream after every row instead of only at close
    #[serde(default)]
    pub flush_every_row: bool,
}

fn default_env_var() -> String {
    "CM_OUTDIR".to_string()
}

fn default_base_dir() -> String {
    "SimOutput".to_string()
}

fn default_run_subdir() -> String {
    "reference_odometry_output".to_string()
}

fn default_extension() -> String {
    "txt".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            env_var: default_env_var(),
            default_base_dir: default_base_dir(),
            run_subdir: default_run_subdir(),
            extension: default_extension(),
            flush_every_row: false,
        }
    }
}

/// Radar detection stream
///
/// Only honoured by builds with the `detection-log` feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default)]
    pub enabled: bool,
}
