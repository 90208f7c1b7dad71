//! Host trace replay.

mod driver;
mod stats;
mod trace;

pub use driver::Replayer;
pub use stats::ReplayStats;
pub use trace::{read_trace, TraceEvent};
