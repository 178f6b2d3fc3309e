//! # Route
//!
//! This module defines the static reference route followed by the vehicle. The route is an
//! ordered sequence of waypoints, each with a pose and a reference (cruise) speed. Index
//! arithmetic on the route wraps (the route is treated as a closed loop when finding the
//! waypoint ahead of the vehicle), but windows taken from it do not.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod index;
pub mod loader;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::loc::Pose;

pub use index::RouteIndex;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single point on the route.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Pose of the waypoint in the map frame
    pub pose: Pose,

    /// Target speed at this waypoint.
    ///
    /// Units: meters/second
    pub speed_ms: f64,
}

/// The static reference route.
///
/// A route always contains at least one waypoint and every waypoint position is finite.
#[derive(Debug, Clone, Serialize)]
pub struct Route {
    waypoints: Vec<Waypoint>,
}

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("Attempted to create a route with no waypoints")]
    Empty,

    #[error("Waypoint {0} has a non-finite position or speed")]
    NonFiniteWaypoint(usize),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Route {
    /// Create a new route from the given waypoints.
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, RouteError> {
        if waypoints.is_empty() {
            return Err(RouteError::Empty);
        }

        if let Some(i) = waypoints.iter().position(|wp| {
            !wp.pose.is_finite() || !wp.speed_ms.is_finite()
        }) {
            return Err(RouteError::NonFiniteWaypoint(i));
        }

        Ok(Self { waypoints })
    }

    /// Number of waypoints in the route.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false, a route cannot be empty.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Return the waypoints in `[start, end)`, truncated at the end of the route.
    ///
    /// The slice never wraps around to the start of the route.
    pub fn slice(&self, start: usize, end: usize) -> &[Waypoint] {
        let end = end.min(self.waypoints.len());
        let start = start.min(end);
        &self.waypoints[start..end]
    }
}

impl std::ops::Index<usize> for Route {
    type Output = Waypoint;

    fn index(&self, index: usize) -> &Self::Output {
        &self.waypoints[index]
    }
}
