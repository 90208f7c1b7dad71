//! Replay statistics.

use std::time::Duration;

use serde::Serialize;
use telemetry::SessionSummary;

/// Statistics from a replay
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayStats {
    /// Trace events applied
    pub events: u64,

    /// Cycle events seen
    pub cycles: u64,

    /// Cycles that appended rows
    pub cycles_written: u64,

    /// Cycles skipped (not simulating, time <= 0, or no open session)
    pub cycles_skipped: u64,

    /// Object rows appended
    pub object_rows: u64,

    /// Test runs whose output files could not be opened
    pub start_failures: u64,

    /// Replay stopped early by a shutdown signal
    pub interrupted: bool,

    /// Wall-clock duration of the replay
    #[serde(serialize_with = "serialize_secs")]
    pub duration: Duration,

    /// Closed sessions, in order
    pub runs: Vec<SessionSummary>,
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

impl ReplayStats {
    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Replay Statistics ===\n");
        println!("Overview");
        println!("  Duration: {:.2}s", self.duration.as_secs_f64());
        println!("  Events: {}", self.events);
        println!("  Cycles: {}", self.cycles);
        println!("  Cycles written: {}", self.cycles_written);
        println!("  Cycles skipped: {}", self.cycles_skipped);
        println!("  Object rows: {}", self.object_rows);
        if self.start_failures > 0 {
            println!("  Start failures: {}", self.start_failures);
        }
        if self.interrupted {
            println!("  Interrupted: yes");
        }

        if !self.runs.is_empty() {
            println!("\nRuns ({}):", self.runs.len());
            for run in &self.runs {
                println!("  - {}", run.timestamp);
                println!(
                    "    {} ({} rows)",
                    run.vehicle.path.display(),
                    run.vehicle.rows
                );
                println!(
                    "    {} ({} rows)",
                    run.objects.path.display(),
                    run.objects.rows
                );
                if let Some(ref detections) = run.detections {
                    println!(
                        "    {} ({} rows)",
                        detections.path.display(),
                        detections.rows
                    );
                }
            }
        }

        println!();
    }
}
