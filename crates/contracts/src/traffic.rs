//! TrafficLookup - host traffic subsystem interface
//!
//! Object sensor ids inside the host's reserved traffic band belong to
//! traffic actors and can be mapped to the traffic system's own id.

use std::collections::HashMap;

/// Traffic-system id reported when an object is not a traffic actor
pub const NO_TRAFFIC_ID: i32 = -1;

/// Object ids the host allocates to traffic actors: `[16_000_000, 17_000_000)`.
///
/// This band is part of the host's id allocation scheme and must not be changed.
pub const TRAFFIC_OBJ_ID_BAND: std::ops::Range<i32> = 16_000_000..17_000_000;

/// Resolve host object ids to traffic-system ids
pub trait TrafficLookup {
    /// Traffic id for `obj_id`, or `None` if the host has no such traffic object
    fn traffic_id(&self, obj_id: i32) -> Option<i32>;
}

/// Map an object id to the value logged in the `TrackingID` column
///
/// Ids outside the traffic band are never looked up.
pub fn resolve_traffic_id(obj_id: i32, lookup: &dyn TrafficLookup) -> i32 {
    if TRAFFIC_OBJ_ID_BAND.contains(&obj_id) {
        lookup.traffic_id(obj_id).unwrap_or(NO_TRAFFIC_ID)
    } else {
        NO_TRAFFIC_ID
    }
}

/// Lookup for hosts without a traffic subsystem
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTraffic;

impl TrafficLookup for NoTraffic {
    fn traffic_id(&self, _obj_id: i32) -> Option<i32> {
        None
    }
}

/// In-memory traffic registry (obj_id -> traffic id)
///
/// Used when replaying recorded host traces.
#[derive(Debug, Clone, Default)]
pub struct TrafficRegistry {
    by_obj_id: HashMap<i32, i32>,
}

impl TrafficRegistry {
    /// Create empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a traffic object
    pub fn spawn(&mut self, obj_id: i32, traffic_id: i32) {
        self.by_obj_id.insert(obj_id, traffic_id);
    }

    /// Remove a traffic object, returning its traffic id if it was known
    pub fn despawn(&mut self, obj_id: i32) -> Option<i32> {
        self.by_obj_id.remove(&obj_id)
    }

    pub fn clear(&mut self) {
        self.by_obj_id.clear();
    }
}

impl TrafficLookup for TrafficRegistry {
    fn traffic_id(&self, obj_id: i32) -> Option<i32> {
        self.by_obj_id.get(&obj_id).copied()
    }
}

impl<F> TrafficLookup for F
where
    F: Fn(i32) -> Option<i32>,
{
    fn traffic_id(&self, obj_id: i32) -> Option<i32> {
        self(obj_id)
    }
}
