//! # Contracts
//!
//! Frozen interface contracts between the host simulation and the telemetry logger.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Uses the host simulation clock (seconds, f64) as the only clock for rows
//! - Wall-clock time is used solely to name per-run output files

mod config;
mod cycle;
mod error;
mod traffic;

pub use config::*;
pub use cycle::*;
pub use error::*;
pub use traffic::*;
