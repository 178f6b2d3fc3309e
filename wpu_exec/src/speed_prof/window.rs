//! Lookahead window produced by the speed profiler

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

use crate::route::Waypoint;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The planned local trajectory published each tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanWindow {
    /// Route index of the first waypoint in the window
    pub start_index: usize,

    /// The profile used to compute the planned speeds
    pub profile: Profile,

    /// Waypoints of the window, each carrying its planned speed in `speed_ms`
    pub waypoints: Vec<Waypoint>,
}

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Profile {
    /// Reference speeds of the route
    Cruise,

    /// Braking to rest at `stop_offset`, the window-relative index of the stop point
    Braking { stop_offset: usize },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PlanWindow {
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn is_braking(&self) -> bool {
        matches!(self.profile, Profile::Braking { .. })
    }

    /// Planned speeds of the window in order.
    pub fn speeds_ms(&self) -> impl Iterator<Item = f64> + '_ {
        self.waypoints.iter().map(|wp| wp.speed_ms)
    }
}
