//! `replay` command implementation.

use anyhow::{Context, Result};
use tracing::info;

use super::load_config;
use crate::cli::ReplayArgs;
use crate::replay::{read_trace, Replayer};
use telemetry::TelemetryLogger;

/// Execute the `replay` command
pub async fn run_replay(args: &ReplayArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let events = read_trace(&args.trace)?;
    info!(trace = %args.trace.display(), events = events.len(), "Trace loaded");

    let mut logger = TelemetryLogger::from_config(&config);
    if let Some(out_dir) = &args.out_dir {
        info!(out_dir = %out_dir.display(), "Overriding output base directory from CLI");
        logger = logger.with_base_dir(out_dir);
    }

    let stats = Replayer::new(logger, args.speed)
        .run(events, shutdown_signal())
        .await;

    info!(
        cycles = stats.cycles,
        cycles_written = stats.cycles_written,
        runs = stats.runs.len(),
        duration_secs = stats.duration.as_secs_f64(),
        "Replay finished"
    );

    if args.json {
        let json =
            serde_json::to_string_pretty(&stats).context("Failed to serialize replay summary")?;
        println!("{}", json);
    } else {
        stats.print_summary();
    }

    if stats.start_failures > 0 {
        anyhow::bail!(
            "{} test run(s) failed to open output files",
            stats.start_failures
        );
    }
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
