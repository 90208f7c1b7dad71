//! Wall clock used to stamp per-run file names

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local, NaiveDateTime};
use tracing::warn;

use crate::LoggerError;

/// Placeholder used in file names when the wall clock cannot be read
pub const NO_TIME: &str = "no_time";

/// File-name timestamp format, second resolution
const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Source of local wall-clock time
pub trait Clock: Send {
    /// Current local time
    ///
    /// # Errors
    /// Returns `LoggerError::Clock` if the system time cannot be represented
    fn now_local(&self) -> Result<NaiveDateTime, LoggerError>;
}

/// System wall clock in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_local(&self) -> Result<NaiveDateTime, LoggerError> {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| LoggerError::clock(format!("system time before unix epoch: {e}")))?;
        let secs = i64::try_from(since_epoch.as_secs())
            .map_err(|e| LoggerError::clock(e.to_string()))?;
        let utc = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| LoggerError::clock(format!("timestamp {secs} out of range")))?;
        Ok(utc.with_timezone(&Local).naive_local())
    }
}

/// Format a run timestamp as `YYYYMMDD_HHMMSS`, or [`NO_TIME`] if the clock fails
pub fn run_timestamp(clock: &dyn Clock) -> String {
    match clock.now_local() {
        Ok(now) => now.format(RUN_TIMESTAMP_FORMAT).to_string(),
        Err(e) => {
            warn!(error = %e, placeholder = NO_TIME, "Wall clock unavailable, using placeholder timestamp");
            NO_TIME.to_string()
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{BrokenClock, ScriptedClock};
    use super::*;

    #[test]
    fn test_run_timestamp_format() {
        let clock = ScriptedClock::new(&["2025-03-07 09:05:02"]);
        assert_eq!(run_timestamp(&clock), "20250307_090502");
    }

    #[test]
    fn test_broken_clock_placeholder() {
        assert_eq!(run_timestamp(&BrokenClock), NO_TIME);
    }

    #[test]
    fn test_system_clock_shape() {
        let ts = run_timestamp(&SystemClock);
        assert_eq!(ts.len(), 15);
        assert_eq!(&ts[8..9], "_");
        assert!(ts.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }
}
