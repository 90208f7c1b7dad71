//! `info` command implementation.

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::LoggerConfig;
use serde::Serialize;
use telemetry::OutputLayout;

use super::load_config;
use crate::cli::InfoArgs;

/// Resolved layout info for JSON output
#[derive(Serialize)]
struct LayoutInfo {
    env_var: String,
    env_override: Option<String>,
    base_dir: String,
    run_dir: String,
    car_file_pattern: String,
    object_file_pattern: String,
    flush_every_row: bool,
    detection_requested: bool,
    detection_compiled: bool,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let info = build_layout_info(&config);

    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize layout info")?;
        println!("{}", json);
    } else {
        print_layout_info(&info);
        let effective = ConfigLoader::to_toml(&config).context("Failed to render configuration")?;
        println!("=== Effective Config ===\n");
        println!("{}", effective);
    }

    Ok(())
}

fn build_layout_info(config: &LoggerConfig) -> LayoutInfo {
    let layout = OutputLayout::new(&config.output);
    let placeholder = "<YYYYMMDD_HHMMSS>";

    LayoutInfo {
        env_var: config.output.env_var.clone(),
        env_override: std::env::var(&config.output.env_var)
            .ok()
            .filter(|v| !v.is_empty()),
        base_dir: layout.base_dir().display().to_string(),
        run_dir: layout.run_dir().display().to_string(),
        car_file_pattern: layout.car_file(placeholder).display().to_string(),
        object_file_pattern: layout.object_file(placeholder).display().to_string(),
        flush_every_row: config.output.flush_every_row,
        detection_requested: config.detection.enabled,
        detection_compiled: cfg!(feature = "detection-log"),
    }
}

fn print_layout_info(info: &LayoutInfo) {
    println!("\n=== Output Layout ===\n");
    match info.env_override {
        Some(ref value) => println!("  {} = {}", info.env_var, value),
        None => println!("  {} not set, using default base dir", info.env_var),
    }
    println!("  Base dir: {}", info.base_dir);
    println!("  Run dir: {}", info.run_dir);
    println!("  Vehicle table: {}", info.car_file_pattern);
    println!("  Object table: {}", info.object_file_pattern);
    println!("  Flush every row: {}", info.flush_every_row);
    println!(
        "  Detection stream: requested={} compiled={}",
        info.detection_requested, info.detection_compiled
    );
    println!();
}
