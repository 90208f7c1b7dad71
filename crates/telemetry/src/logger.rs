//! TelemetryLogger - run-scoped ego/object logger
//!
//! Driven entirely by the host: `start` when a test run has been set up,
//! `write` once per simulation cycle, `stop` at test-run end and at cleanup.

use std::path::{Path, PathBuf};

use contracts::{CycleState, LoggerConfig, TrafficLookup};
use tracing::{debug, error, info, instrument, warn};

use crate::clock::{self, Clock, SystemClock};
use crate::metrics;
use crate::session::{RunSession, SessionOptions, SessionSummary};
use crate::{LoggerError, OutputLayout};

/// Why a cycle produced no rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Host is not in its simulating state
    NotSimulating,
    /// Simulation time has not advanced past zero
    NonPositiveTime,
    /// No session is open (never started, failed start, or stopped)
    NoSession,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotSimulating => "not_simulating",
            Self::NonPositiveTime => "non_positive_time",
            Self::NoSession => "no_session",
        }
    }
}

/// Outcome of one `write` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// One vehicle row and `objects` object rows were appended
    Written { objects: usize },
    /// Cycle skipped; not an error
    Skipped(SkipReason),
}

/// Run-scoped telemetry logger
pub struct TelemetryLogger {
    layout: OutputLayout,
    clock: Box<dyn Clock>,
    options: SessionOptions,
    session: Option<RunSession>,
}

impl TelemetryLogger {
    /// Create a logger writing under `layout`, stamped by the system clock
    pub fn new(layout: OutputLayout) -> Self {
        Self {
            layout,
            clock: Box::new(SystemClock),
            options: SessionOptions::default(),
            session: None,
        }
    }

    /// Create a logger from configuration
    pub fn from_config(config: &LoggerConfig) -> Self {
        if config.detection.enabled && !cfg!(feature = "detection-log") {
            warn!("Detection stream requested but this build lacks the detection-log feature");
        }

        Self::new(OutputLayout::new(&config.output)).with_options(SessionOptions {
            flush_every_row: config.output.flush_every_row,
            detection: config.detection.enabled,
        })
    }

    /// Replace the wall clock used for file names
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Pin the output base directory, bypassing the environment
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.layout = self.layout.with_base_dir(base_dir);
        self
    }

    /// Replace session options
    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Whether a session is open
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Vehicle and object file paths of the open session
    pub fn session_paths(&self) -> Option<(&Path, &Path)> {
        self.session
            .as_ref()
            .map(|s| (s.vehicle_path(), s.object_path()))
    }

    /// Open a new session
    ///
    /// Any open session is closed first. On failure no handle stays open and
    /// the logger is left closed; later `write`/`stop` calls are no-ops.
    ///
    /// # Errors
    /// Returns `LoggerError::OpenOutput` if either file cannot be opened
    #[instrument(name = "telemetry_start", skip(self))]
    pub fn start(&mut self) -> Result<(), LoggerError> {
        if let Some(previous) = self.session.take() {
            let summary = previous.close();
            debug!(timestamp = %summary.timestamp, "Closed previous session before start");
        }

        self.layout.ensure_dirs_exist();
        let timestamp = clock::run_timestamp(self.clock.as_ref());

        match RunSession::open(&self.layout, &timestamp, self.options) {
            Ok(session) => {
                info!(
                    timestamp = %timestamp,
                    vehicle = %session.vehicle_path().display(),
                    objects = %session.object_path().display(),
                    "Reference odometry logger started"
                );
                metrics::record_session_started();
                self.session = Some(session);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Reference odometry logger: failed to open output files");
                metrics::record_start_failure();
                Err(e)
            }
        }
    }

    /// Append the rows for one simulation cycle
    ///
    /// Skips silently unless the host is simulating, time is positive and a
    /// session is open.
    pub fn write(&mut self, cycle: &CycleState, traffic: &dyn TrafficLookup) -> WriteOutcome {
        let Some(session) = self.session.as_mut() else {
            return WriteOutcome::Skipped(SkipReason::NoSession);
        };

        if !cycle.is_loggable() {
            let reason = if cycle.state.is_simulating() {
                SkipReason::NonPositiveTime
            } else {
                SkipReason::NotSimulating
            };
            session.note_skipped();
            metrics::record_cycle_skipped(reason.as_str());
            return WriteOutcome::Skipped(reason);
        }

        let objects = session.write_cycle(cycle, traffic);
        metrics::record_cycle_written(objects);
        WriteOutcome::Written { objects }
    }

    /// Close the open session, if any
    ///
    /// Idempotent: returns `None` when nothing was open.
    #[instrument(name = "telemetry_stop", skip(self))]
    pub fn stop(&mut self) -> Option<SessionSummary> {
        let summary = self.session.take()?.close();
        info!(
            timestamp = %summary.timestamp,
            vehicle_rows = summary.vehicle.rows,
            object_rows = summary.objects.rows,
            skipped_cycles = summary.skipped_cycles,
            "Reference odometry logger stopped"
        );
        Some(summary)
    }
}

impl Default for TelemetryLogger {
    fn default() -> Self {
        Self::new(OutputLayout::default())
    }
}
