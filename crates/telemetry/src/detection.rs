//! Radar detection stream
//!
//! Built only with the `detection-log` feature. Detections are written once
//! per radar firing: the first radar's fire time (whole milliseconds) gates
//! the stream so a scan held over several cycles is logged once.

use std::fmt;

use contracts::{CycleState, RadarDetection};
use tracing::warn;

use crate::session::{RowStream, StreamSummary};
use crate::OutputLayout;

/// Detection table header
pub const DETECTION_HEADER: &str =
    "Time_s,SensorIdx,DetIdx,Range_m,Azimuth_rad,Elevation_rad,Vel_mps,Power";

/// One row of the detection table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionSample {
    pub time: f64,
    pub sensor_idx: usize,
    pub detection_idx: usize,
    pub detection: RadarDetection,
}

impl fmt::Display for DetectionSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.detection;
        write!(
            f,
            "{:.6},{},{},{:.6},{:.6},{:.6},{:.6},{:.6}",
            self.time,
            self.sensor_idx,
            self.detection_idx,
            d.range,
            d.azimuth,
            d.elevation,
            d.velocity,
            d.power
        )
    }
}

/// Open detection table plus its firing-time gate
pub(crate) struct DetectionStream {
    stream: RowStream,
    /// Last logged fire time (ms); `None` until the first scan of the run
    last_fired_ms: Option<i64>,
}

impl DetectionStream {
    /// Open the detection table; failure is logged and leaves the stream off
    pub(crate) fn open(layout: &OutputLayout, flush_every_row: bool) -> Option<Self> {
        let path = layout.detection_file();
        match RowStream::create("detections", path.clone(), flush_every_row) {
            Ok(mut stream) => {
                stream.write_header(DETECTION_HEADER);
                Some(Self {
                    stream,
                    last_fired_ms: None,
                })
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Detection stream unavailable");
                None
            }
        }
    }

    /// Append every detection of every radar if the first radar fired since the last write
    pub(crate) fn write_cycle(&mut self, cycle: &CycleState) {
        let Some(first) = cycle.radars.first() else {
            return;
        };
        let fired_ms = (first.time_fired * 1000.0) as i64;
        if self.last_fired_ms == Some(fired_ms) {
            return;
        }

        for (sensor_idx, scan) in cycle.radars.iter().enumerate() {
            for (detection_idx, detection) in scan.detections.iter().enumerate() {
                self.stream.write_row(DetectionSample {
                    time: cycle.time,
                    sensor_idx,
                    detection_idx,
                    detection: *detection,
                });
            }
        }
        self.stream.flush();
        self.last_fired_ms = Some(fired_ms);
    }

    pub(crate) fn close(self) -> StreamSummary {
        self.stream.close()
    }
}
