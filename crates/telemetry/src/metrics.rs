//! Logger metrics
//!
//! Thin wrappers over the `metrics` facade. Without an installed recorder
//! these are no-ops.

use metrics::counter;

/// Record a session opened by `Start`
pub fn record_session_started() {
    counter!("odometry_logger_sessions_started_total").increment(1);
}

/// Record a `Start` that failed to open its files
pub fn record_start_failure() {
    counter!("odometry_logger_start_failures_total").increment(1);
}

/// Record rows appended for one cycle
pub fn record_cycle_written(object_rows: usize) {
    counter!("odometry_logger_vehicle_rows_total").increment(1);
    if object_rows > 0 {
        counter!("odometry_logger_object_rows_total").increment(object_rows as u64);
    }
}

/// Record a cycle that produced no rows
pub fn record_cycle_skipped(reason: &'static str) {
    counter!("odometry_logger_cycles_skipped_total", "reason" => reason).increment(1);
}

/// Record an acceleration axis replaced by the clamp bound
pub fn record_accel_clamped(axis: &'static str) {
    counter!("odometry_logger_accel_clamped_total", "axis" => axis).increment(1);
}

/// Record a failed row write
pub fn record_write_failure(stream: &'static str) {
    counter!("odometry_logger_write_failures_total", "stream" => stream).increment(1);
}
