//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::LoggerConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    env_var: String,
    default_base_dir: String,
    run_subdir: String,
    extension: String,
    detection: bool,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", config.version),
                    env_var: config.output.env_var,
                    default_base_dir: config.output.default_base_dir,
                    run_subdir: config.output.run_subdir,
                    extension: config.output.extension,
                    detection: config.detection.enabled,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &LoggerConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.detection.enabled && !cfg!(feature = "detection-log") {
        warnings.push(
            "detection.enabled is set but this build lacks the detection-log feature".to_string(),
        );
    }

    if config.output.flush_every_row {
        warnings.push("output.flush_every_row adds a syscall per row".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Env override: {}", summary.env_var);
            println!("  Default base dir: {}", summary.default_base_dir);
            println!("  Run subdir: {}", summary.run_subdir);
            println!("  Extension: {}", summary.extension);
            println!("  Detection stream: {}", summary.detection);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_validate_missing_file() {
        let args = ValidateArgs {
            config: "does/not/exist.toml".into(),
            json: false,
        };
        let result = validate_config(&args);
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("File not found"));
    }

    #[test]
    fn test_validate_invalid_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logger.toml");
        fs::write(&path, "[output]\nextension = \".txt\"\n").unwrap();
        let result = validate_config(&ValidateArgs {
            config: path,
            json: true,
        });
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("output.extension"));
    }

    #[test]
    fn test_validate_ok_with_warning() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logger.toml");
        fs::write(&path, "[output]\nflush_every_row = true\n").unwrap();
        let result = validate_config(&ValidateArgs {
            config: path,
            json: false,
        });
        assert!(result.valid);
        assert_eq!(result.warnings.unwrap().len(), 1);
        assert_eq!(result.summary.unwrap().extension, "txt");
    }
}
