//! Replay driver - feeds trace events into the logger in host callback order.

use std::future::Future;
use std::time::{Duration, Instant};

use contracts::TrafficRegistry;
use telemetry::{TelemetryLogger, WriteOutcome};
use tracing::{debug, info, warn};

use super::{ReplayStats, TraceEvent};

/// Drives a `TelemetryLogger` the way the host does
pub struct Replayer {
    logger: TelemetryLogger,
    traffic: TrafficRegistry,
    /// Speed multiplier against simulation time (None = unpaced)
    speed: Option<f64>,
    last_time: Option<f64>,
    stats: ReplayStats,
}

impl Replayer {
    /// Create a replayer; `speed <= 0` replays as fast as possible
    pub fn new(logger: TelemetryLogger, speed: f64) -> Self {
        Self {
            logger,
            traffic: TrafficRegistry::new(),
            speed: (speed > 0.0).then_some(speed),
            last_time: None,
            stats: ReplayStats::default(),
        }
    }

    /// Apply one event
    pub fn apply(&mut self, event: TraceEvent) {
        self.stats.events += 1;
        match event {
            TraceEvent::TestrunStart => {
                self.traffic.clear();
                self.last_time = None;
                if self.logger.start().is_err() {
                    // Already reported by the logger; the run continues without output
                    self.stats.start_failures += 1;
                }
            }
            TraceEvent::TrafficSpawn { obj_id, traffic_id } => {
                self.traffic.spawn(obj_id, traffic_id);
            }
            TraceEvent::TrafficDespawn { obj_id } => {
                if self.traffic.despawn(obj_id).is_none() {
                    debug!(obj_id, "Despawn of unknown traffic object");
                }
            }
            TraceEvent::Cycle(cycle) => {
                self.stats.cycles += 1;
                self.last_time = Some(cycle.time);
                match self.logger.write(&cycle, &self.traffic) {
                    WriteOutcome::Written { objects } => {
                        self.stats.cycles_written += 1;
                        self.stats.object_rows += objects as u64;
                    }
                    WriteOutcome::Skipped(_) => self.stats.cycles_skipped += 1,
                }
            }
            TraceEvent::TestrunEnd => self.stop_run(),
        }
    }

    /// Wall-clock delay before `event` when pacing is enabled
    ///
    /// Gaps that do not fit in a `Duration` are not paced.
    fn pacing_delay(&self, event: &TraceEvent) -> Option<Duration> {
        let speed = self.speed?;
        let TraceEvent::Cycle(cycle) = event else {
            return None;
        };
        let dt = cycle.time - self.last_time?;
        if dt <= 0.0 {
            return None;
        }
        match Duration::try_from_secs_f64(dt / speed) {
            Ok(delay) => Some(delay),
            Err(e) => {
                debug!(dt, speed, error = %e, "Simulation gap too large to pace");
                None
            }
        }
    }

    fn stop_run(&mut self) {
        if let Some(summary) = self.logger.stop() {
            self.stats.runs.push(summary);
        }
    }

    /// Apply every event, honouring pacing, then run host cleanup
    ///
    /// Resolving `shutdown` stops the replay early; open files are still closed.
    pub async fn run(
        mut self,
        events: Vec<TraceEvent>,
        shutdown: impl Future<Output = ()>,
    ) -> ReplayStats {
        let start = Instant::now();
        tokio::pin!(shutdown);

        info!(events = events.len(), speed = ?self.speed, "Replay started");
        for event in events {
            let delay = self.pacing_delay(&event);
            // Shutdown is polled before every event, paced or not
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    warn!("Received shutdown signal, stopping replay...");
                    self.stats.interrupted = true;
                    break;
                }
                _ = pace(delay) => {}
            }
            self.apply(event);
        }

        // Host cleanup always closes whatever is still open
        self.stop_run();
        self.stats.duration = start.elapsed();
        self.stats
    }
}

async fn pace(delay: Option<Duration>) {
    match delay {
        Some(delay) => tokio::time::sleep(delay).await,
        None => tokio::task::yield_now().await,
    }
}
