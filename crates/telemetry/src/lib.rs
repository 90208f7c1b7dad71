//! # Telemetry
//!
//! Run-scoped reference odometry logger.
//!
//! 负责：
//! - 每次 test run 开始时打开车辆表与目标表
//! - 每个仿真周期追加一行车辆状态及每个目标一行
//! - test run 结束 / cleanup 时关闭文件
//!
//! ```no_run
//! use contracts::{CycleState, NoTraffic};
//! use telemetry::{OutputLayout, TelemetryLogger};
//!
//! let mut logger = TelemetryLogger::new(OutputLayout::default());
//! logger.start()?;
//! logger.write(&CycleState::default(), &NoTraffic);
//! logger.stop();
//! # Ok::<(), telemetry::LoggerError>(())
//! ```

pub mod clock;
#[cfg(feature = "detection-log")]
pub mod detection;
pub mod error;
pub mod hooks;
pub mod logger;
pub mod metrics;
pub mod paths;
pub mod rows;
pub mod session;

pub use clock::{Clock, SystemClock};
pub use error::LoggerError;
pub use hooks::{host_status, PluginHooks};
pub use logger::{SkipReason, TelemetryLogger, WriteOutcome};
pub use paths::OutputLayout;
pub use session::{SessionOptions, SessionSummary, StreamSummary};
