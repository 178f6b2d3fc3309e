//! Speed profiler parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the speed profiler
#[derive(Deserialize, Debug, Clone)]
pub struct Params {

    /// Number of waypoints in the lookahead window.
    pub lookahead_wps: usize,

    /// Deceleration used to compute the braking profile. This is derated from the vehicle's
    /// real limit to keep braking comfortable.
    ///
    /// Units: meters/second^2
    pub max_decel_mss: f64,

    /// Number of waypoints short of the stop line at which the vehicle should come to rest.
    pub stop_margin_wps: usize,

    /// Braking speeds below this value are set to zero.
    ///
    /// Units: meters/second
    pub stop_speed_floor_ms: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            lookahead_wps: 50,
            max_decel_mss: 0.5,
            stop_margin_wps: 2,
            stop_speed_floor_ms: 1.0,
        }
    }
}
