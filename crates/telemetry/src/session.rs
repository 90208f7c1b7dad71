//! RunSession - the open output streams of one test run
//!
//! A session owns its file handles. Dropping it (or calling `close`) flushes
//! and releases every handle, including on early-return error paths.

use std::fmt::Display;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use contracts::{CycleState, TrafficLookup};
use serde::Serialize;
use tracing::{debug, warn};

#[cfg(feature = "detection-log")]
use crate::detection::DetectionStream;
use crate::metrics;
use crate::rows::{ObjectSample, VehicleSample, OBJECT_HEADER, VEHICLE_HEADER};
use crate::{LoggerError, OutputLayout};

/// Options applied to every stream of a session
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Flush after each row instead of only at close
    pub flush_every_row: bool,
    /// Open the radar detection stream (needs the `detection-log` feature)
    pub detection: bool,
}

/// Single delimited text file, written one complete row at a time
pub(crate) struct RowStream {
    name: &'static str,
    path: PathBuf,
    writer: BufWriter<File>,
    flush_every_row: bool,
    rows: u64,
    write_errors: u64,
}

impl RowStream {
    /// Create (or truncate) the file for reading and writing
    pub(crate) fn create(name: &'static str, path: PathBuf, flush_every_row: bool) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        Ok(Self {
            name,
            path,
            writer: BufWriter::new(file),
            flush_every_row,
            rows: 0,
            write_errors: 0,
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Write the header line (not counted as a row)
    pub(crate) fn write_header(&mut self, header: &str) {
        if let Err(e) = self.write_line(header) {
            self.report_failure(&e);
        }
    }

    /// Append one row; failures are logged and counted, never propagated
    pub(crate) fn write_row(&mut self, row: impl Display) {
        match self.write_line(row) {
            Ok(()) => self.rows += 1,
            Err(e) => self.report_failure(&e),
        }
    }

    /// Flush buffered rows without closing
    pub(crate) fn flush(&mut self) {
        if let Err(e) = self.writer.flush() {
            self.report_failure(&e);
        }
    }

    /// Flush and release the handle
    pub(crate) fn close(mut self) -> StreamSummary {
        self.flush();
        debug!(stream = self.name, path = %self.path.display(), rows = self.rows, "Stream closed");
        StreamSummary {
            path: self.path.clone(),
            rows: self.rows,
            write_errors: self.write_errors,
        }
    }

    fn write_line(&mut self, line: impl Display) -> io::Result<()> {
        // Format the whole row first so it reaches the writer in one piece
        let mut buf = line.to_string();
        buf.push('\n');
        self.writer.write_all(buf.as_bytes())?;
        if self.flush_every_row {
            self.writer.flush()?;
        }
        Ok(())
    }

    fn report_failure(&mut self, error: &io::Error) {
        self.write_errors += 1;
        metrics::record_write_failure(self.name);
        if self.write_errors == 1 {
            warn!(stream = self.name, path = %self.path.display(), error = %error, "Write failed");
        } else {
            debug!(stream = self.name, error = %error, failures = self.write_errors, "Write failed");
        }
    }
}

/// Final state of one stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamSummary {
    pub path: PathBuf,
    pub rows: u64,
    pub write_errors: u64,
}

/// Result of closing a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Run timestamp used in the file names
    pub timestamp: String,
    /// Vehicle table
    pub vehicle: StreamSummary,
    /// Object table
    pub objects: StreamSummary,
    /// Detection table, when the stream was open
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detections: Option<StreamSummary>,
    /// Cycles seen while open that produced no rows
    pub skipped_cycles: u64,
}

/// Open streams of one test run
pub(crate) struct RunSession {
    timestamp: String,
    vehicle: RowStream,
    objects: RowStream,
    #[cfg(feature = "detection-log")]
    detections: Option<DetectionStream>,
    skipped_cycles: u64,
}

impl RunSession {
    /// Open both tables and write their headers
    ///
    /// If the second file fails to open, the first is released before the
    /// error is returned.
    pub(crate) fn open(
        layout: &OutputLayout,
        timestamp: &str,
        options: SessionOptions,
    ) -> Result<Self, LoggerError> {
        let car_path = layout.car_file(timestamp);
        let mut vehicle = RowStream::create("vehicle", car_path.clone(), options.flush_every_row)
            .map_err(|e| LoggerError::open_output(car_path, e))?;

        let object_path = layout.object_file(timestamp);
        let mut objects = RowStream::create("objects", object_path.clone(), options.flush_every_row)
            .map_err(|e| LoggerError::open_output(object_path, e))?;

        vehicle.write_header(VEHICLE_HEADER);
        objects.write_header(OBJECT_HEADER);

        Ok(Self {
            timestamp: timestamp.to_string(),
            vehicle,
            objects,
            #[cfg(feature = "detection-log")]
            detections: options
                .detection
                .then(|| DetectionStream::open(layout, options.flush_every_row))
                .flatten(),
            skipped_cycles: 0,
        })
    }

    pub(crate) fn vehicle_path(&self) -> &Path {
        self.vehicle.path()
    }

    pub(crate) fn object_path(&self) -> &Path {
        self.objects.path()
    }

    pub(crate) fn note_skipped(&mut self) {
        self.skipped_cycles += 1;
    }

    /// Append the rows for one loggable cycle; returns the object row count
    pub(crate) fn write_cycle(&mut self, cycle: &CycleState, traffic: &dyn TrafficLookup) -> usize {
        let sample = VehicleSample::from_cycle(cycle);
        record_clamped_axes(cycle, &sample);
        self.vehicle.write_row(sample);

        for object in &cycle.objects {
            self.objects
                .write_row(ObjectSample::new(cycle.time, object, traffic));
        }

        #[cfg(feature = "detection-log")]
        {
            if let Some(detections) = self.detections.as_mut() {
                detections.write_cycle(cycle);
            }
        }

        cycle.objects.len()
    }

    /// Flush and release every stream
    pub(crate) fn close(self) -> SessionSummary {
        #[cfg(feature = "detection-log")]
        let detections = self.detections.map(DetectionStream::close);
        #[cfg(not(feature = "detection-log"))]
        let detections = None;

        SessionSummary {
            timestamp: self.timestamp,
            vehicle: self.vehicle.close(),
            objects: self.objects.close(),
            detections,
            skipped_cycles: self.skipped_cycles,
        }
    }
}

fn record_clamped_axes(cycle: &CycleState, sample: &VehicleSample) {
    let raw = cycle.ego.acceleration;
    let clamped = sample.acceleration;
    for (axis, before, after) in [
        ("x", raw.x, clamped.x),
        ("y", raw.y, clamped.y),
        ("z", raw.z, clamped.z),
    ] {
        if before != after {
            metrics::record_accel_clamped(axis);
        }
    }
}
