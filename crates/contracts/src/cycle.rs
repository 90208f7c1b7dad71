//! CycleState - host snapshot handed to the logger every simulation cycle
//!
//! The host owns vehicle dynamics, sensors and traffic. Each cycle it copies
//! the values the logger needs into a `CycleState`; the logger never keeps a
//! reference to host state between calls.

use serde::{Deserialize, Serialize};

/// Host simulation state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimState {
    /// No test run loaded
    #[default]
    Idle,
    /// Test run is being prepared (parameters read, models initialised)
    Preprocessing,
    /// Actively simulating
    Simulate,
    /// Test run is ending
    Postprocessing,
    /// Host is shutting down
    Shutdown,
}

impl SimState {
    /// Whether the host is in its active "running" state
    pub fn is_simulating(self) -> bool {
        self == Self::Simulate
    }
}

/// 3D vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Orientation as Z-Y-X Euler angles (rad)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

/// Ego vehicle kinematics, in the host's inertial frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EgoState {
    /// Position (m)
    pub position: Vector3,

    /// Velocity (m/s)
    pub velocity: Vector3,

    /// Acceleration (m/s^2), unclamped as reported by the host
    pub acceleration: Vector3,

    /// Yaw rate (rad/s)
    pub yaw_rate: f64,

    /// Selected gear (negative for reverse)
    #[serde(default)]
    pub gear: i32,
}

/// Object reported by the host's object sensor
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackedObject {
    /// Host object id (also used as the classification column)
    pub obj_id: i32,

    /// Position relative to the sensor reference point (m)
    pub rel_position: Vector3,

    /// Velocity relative to the sensor reference point (m/s)
    pub rel_velocity: Vector3,

    /// Relative orientation
    pub orientation: Orientation,

    /// Height (m)
    pub height: f64,

    /// Length (m)
    pub length: f64,

    /// Width (m)
    pub width: f64,
}

/// Single radar detection point
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RadarDetection {
    /// Range (m)
    pub range: f64,

    /// Azimuth (rad)
    pub azimuth: f64,

    /// Elevation (rad)
    pub elevation: f64,

    /// Radial velocity (m/s)
    pub velocity: f64,

    /// Return power
    pub power: f64,
}

/// One radar sensor's output for the current cycle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RadarScan {
    /// Simulation time at which the sensor last fired (s)
    pub time_fired: f64,

    /// Detection points, in sensor order
    #[serde(default)]
    pub detections: Vec<RadarDetection>,
}

/// Immutable per-cycle snapshot of everything the logger reads from the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleState {
    /// Simulation time (s)
    pub time: f64,

    /// Host state machine
    pub state: SimState,

    /// Ego vehicle
    pub ego: EgoState,

    /// Currently tracked objects, in host order
    #[serde(default)]
    pub objects: Vec<TrackedObject>,

    /// Radar scans, in sensor order
    #[serde(default)]
    pub radars: Vec<RadarScan>,
}

impl CycleState {
    /// Whether this cycle should produce rows: host is simulating and the clock has advanced
    pub fn is_loggable(&self) -> bool {
        self.state.is_simulating() && self.time > 0.0
    }
}
