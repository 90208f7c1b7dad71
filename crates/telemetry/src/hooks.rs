//! PluginHooks - lifecycle callbacks the host invokes on the plugin
//!
//! The host calls these unconditionally as part of its fixed callback
//! sequence; each maps onto one logger operation.

use contracts::{CycleState, TrafficLookup};

use crate::{LoggerError, TelemetryLogger};

/// Host status code for a successful hook
pub const HOOK_OK: i32 = 0;
/// Host status code for a failed hook
pub const HOOK_FAILED: i32 = -1;

/// Host lifecycle callbacks
pub trait PluginHooks {
    /// Test run fully set up (end of test-run start)
    ///
    /// # Errors
    /// Propagates session start failures
    fn testrun_start_at_end(&mut self) -> Result<(), LoggerError>;

    /// Per-cycle calculation phase
    fn calc(&mut self, cycle: &CycleState, traffic: &dyn TrafficLookup);

    /// First callback of test-run end
    fn testrun_end_first(&mut self);

    /// Host shutdown cleanup
    fn cleanup(&mut self);
}

impl PluginHooks for TelemetryLogger {
    fn testrun_start_at_end(&mut self) -> Result<(), LoggerError> {
        self.start()
    }

    fn calc(&mut self, cycle: &CycleState, traffic: &dyn TrafficLookup) {
        self.write(cycle, traffic);
    }

    fn testrun_end_first(&mut self) {
        self.stop();
    }

    fn cleanup(&mut self) {
        self.stop();
    }
}

/// Map a hook result to the host's integer status convention
pub fn host_status(result: &Result<(), LoggerError>) -> i32 {
    match result {
        Ok(()) => HOOK_OK,
        Err(_) => HOOK_FAILED,
    }
}
