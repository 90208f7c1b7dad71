//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Odometry Logger - run-scoped vehicle and object telemetry tables
#[derive(Parser, Debug)]
#[command(
    name = "odometry-logger",
    author,
    version,
    about = "Run-scoped reference odometry logger",
    long_about = "Writes per-run ego-vehicle and object-sensor tables.\n\n\
                  The `replay` command drives the logger's lifecycle hooks from a \n\
                  recorded host trace, exactly as the simulation host would."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "ODOLOG_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "ODOLOG_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a recorded host trace through the logger
    Replay(ReplayArgs),

    /// Validate configuration file
    Validate(ValidateArgs),

    /// Display resolved configuration and output layout
    Info(InfoArgs),
}

/// Arguments for the `replay` command
#[derive(Parser, Debug, Clone)]
pub struct ReplayArgs {
    /// Recorded host trace (JSON Lines, one event per line)
    #[arg(short, long)]
    pub trace: PathBuf,

    /// Logger configuration file (TOML or JSON); defaults apply when omitted
    #[arg(short, long, env = "ODOLOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Pin the output base directory instead of resolving it from the environment
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Replay speed multiplier against simulation time (0 = as fast as possible)
    #[arg(long, default_value = "0", value_parser = parse_speed)]
    pub speed: f64,

    /// Print the replay summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "ODOLOG_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Replay speed must be a finite, non-negative multiplier
fn parse_speed(s: &str) -> Result<f64, String> {
    let speed: f64 = s.parse().map_err(|e| format!("invalid speed `{s}`: {e}"))?;
    if speed.is_finite() && speed >= 0.0 {
        Ok(speed)
    } else {
        Err(format!("speed must be a finite number >= 0, got `{s}`"))
    }
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "logger.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Logger configuration file; defaults apply when omitted
    #[arg(short, long, env = "ODOLOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_replay() {
        let cli = Cli::try_parse_from([
            "odometry-logger",
            "-v",
            "replay",
            "--trace",
            "run.jsonl",
            "--out-dir",
            "/tmp/out",
            "--speed",
            "2.0",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        let Commands::Replay(args) = cli.command else {
            panic!("expected replay command");
        };
        assert_eq!(args.trace, PathBuf::from("run.jsonl"));
        assert_eq!(args.out_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(args.speed, 2.0);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["odometry-logger", "-q", "-v", "info"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_speed_rejects_non_finite_and_negative() {
        for bad in ["--speed=-1", "--speed=NaN", "--speed=inf", "--speed=fast"] {
            let result =
                Cli::try_parse_from(["odometry-logger", "replay", "--trace", "t.jsonl", bad]);
            assert!(result.is_err(), "{bad} should be rejected");
        }
        assert_eq!(parse_speed("0"), Ok(0.0));
        assert_eq!(parse_speed("1e-3"), Ok(0.001));
    }
}
