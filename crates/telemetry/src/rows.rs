//! Row formatting for the vehicle and object tables
//!
//! Rows are comma-and-space separated with no quoting: every field is numeric.
//! Floats use the default `Display` conversion, integers plain decimal.

use std::fmt;

use contracts::{resolve_traffic_id, CycleState, TrackedObject, TrafficLookup, Vector3};

/// Vehicle table header
pub const VEHICLE_HEADER: &str = "TimeStamp[s], pos_x[m], pos_y[m], pos_z[m], vel_x[m/s], vel_y[m/s], vel_z[m/s], a_x[m/s^2], a_y[m/s^2], a_z[m/s^2], YawRate[rad/s], GearNo[-]";

/// Object table header
pub const OBJECT_HEADER: &str = "TimeStamp[s], Classification[-], TrackingID[-], x[m], y[m], z[m], v_x[m/s], v_y[m/s], v_z[m/s], yaw[rad], pitch[rad], roll[rad], height[m], length[m], width[m]";

/// Acceleration bound of the downstream fixed-width field (m/s^2)
pub const ACCEL_LIMIT: f64 = 32.767;

/// Clamp one acceleration axis to `[-ACCEL_LIMIT, ACCEL_LIMIT]`, keeping its sign
pub fn clamp_accel(a: f64) -> f64 {
    if a.abs() > ACCEL_LIMIT {
        ACCEL_LIMIT.copysign(a)
    } else {
        a
    }
}

fn clamp_accel_vec(a: Vector3) -> Vector3 {
    Vector3::new(clamp_accel(a.x), clamp_accel(a.y), clamp_accel(a.z))
}

/// One row of the vehicle table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleSample {
    pub time: f64,
    pub position: Vector3,
    pub velocity: Vector3,
    /// Clamped acceleration
    pub acceleration: Vector3,
    pub yaw_rate: f64,
    pub gear: i32,
}

impl VehicleSample {
    /// Build the row for a cycle, clamping acceleration
    pub fn from_cycle(cycle: &CycleState) -> Self {
        let ego = &cycle.ego;
        Self {
            time: cycle.time,
            position: ego.position,
            velocity: ego.velocity,
            acceleration: clamp_accel_vec(ego.acceleration),
            yaw_rate: ego.yaw_rate,
            gear: ego.gear,
        }
    }
}

impl fmt::Display for VehicleSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (p, v, a) = (self.position, self.velocity, self.acceleration);
        write!(
            f,
            "{}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}",
            self.time, p.x, p.y, p.z, v.x, v.y, v.z, a.x, a.y, a.z, self.yaw_rate, self.gear
        )
    }
}

/// One row of the object table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectSample {
    pub time: f64,
    pub object: TrackedObject,
    /// Traffic-system id, or -1 when the object is not a traffic actor
    pub traffic_id: i32,
}

impl ObjectSample {
    /// Build the row for a tracked object, resolving its traffic id
    pub fn new(time: f64, object: &TrackedObject, traffic: &dyn TrafficLookup) -> Self {
        Self {
            time,
            object: *object,
            traffic_id: resolve_traffic_id(object.obj_id, traffic),
        }
    }
}

impl fmt::Display for ObjectSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.object;
        let (ds, dv, r) = (o.rel_position, o.rel_velocity, o.orientation);
        write!(
            f,
            "{}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}",
            self.time,
            o.obj_id,
            self.traffic_id,
            ds.x,
            ds.y,
            ds.z,
            dv.x,
            dv.y,
            dv.z,
            r.yaw,
            r.pitch,
            r.roll,
            o.height,
            o.length,
            o.width
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{EgoState, NoTraffic, Orientation, SimState, TrafficRegistry};

    fn fields(row: &str) -> Vec<&str> {
        row.split(", ").collect()
    }

    #[test]
    fn test_clamp_within_bound_unchanged() {
        for a in [0.0, 1.25, -1.25, 32.767, -32.767, 32.766_999] {
            assert_eq!(clamp_accel(a), a);
        }
    }

    #[test]
    fn test_clamp_beyond_bound() {
        assert_eq!(clamp_accel(32.768), 32.767);
        assert_eq!(clamp_accel(1e9), 32.767);
        assert_eq!(clamp_accel(-40.0), -32.767);
        assert_eq!(clamp_accel(f64::INFINITY), 32.767);
        assert_eq!(clamp_accel(f64::NEG_INFINITY), -32.767);
    }

    #[test]
    fn test_headers_column_counts() {
        assert_eq!(fields(VEHICLE_HEADER).len(), 12);
        assert_eq!(fields(OBJECT_HEADER).len(), 15);
    }

    #[test]
    fn test_vehicle_row() {
        let cycle = CycleState {
            time: 1.5,
            state: SimState::Simulate,
            ego: EgoState {
                position: Vector3::new(10.0, -2.5, 0.25),
                velocity: Vector3::new(13.9, 0.0, 0.0),
                acceleration: Vector3::new(40.0, -40.0, 10.0),
                yaw_rate: 0.02,
                gear: 3,
            },
            ..Default::default()
        };
        let row = VehicleSample::from_cycle(&cycle).to_string();
        assert_eq!(
            row,
            "1.5, 10, -2.5, 0.25, 13.9, 0, 0, 32.767, -32.767, 10, 0.02, 3"
        );
        assert_eq!(fields(&row).len(), 12);
    }

    #[test]
    fn test_object_row_traffic_actor() {
        let mut registry = TrafficRegistry::new();
        registry.spawn(16_000_002, 4);
        let object = TrackedObject {
            obj_id: 16_000_002,
            rel_position: Vector3::new(25.0, 1.5, 0.0),
            rel_velocity: Vector3::new(-3.0, 0.0, 0.0),
            orientation: Orientation {
                yaw: 0.1,
                pitch: 0.0,
                roll: 0.0,
            },
            height: 1.5,
            length: 4.5,
            width: 1.8,
        };
        let row = ObjectSample::new(2.0, &object, &registry).to_string();
        assert_eq!(
            row,
            "2, 16000002, 4, 25, 1.5, 0, -3, 0, 0, 0.1, 0, 0, 1.5, 4.5, 1.8"
        );
    }

    #[test]
    fn test_object_row_non_traffic() {
        let object = TrackedObject {
            obj_id: 12,
            ..Default::default()
        };
        let sample = ObjectSample::new(0.1, &object, &NoTraffic);
        assert_eq!(sample.traffic_id, -1);
        assert_eq!(fields(&sample.to_string())[2], "-1");
    }
}
