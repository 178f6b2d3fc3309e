//! # Speed profiler module
//!
//! Each tick the speed profiler takes the lookahead window of the route starting at the
//! waypoint ahead of the vehicle and assigns a target speed to every waypoint in it.
//!
//! The window holds at most `lookahead_wps` waypoints and is truncated at the end of the route
//! rather than wrapping back to its start.
//!
//! With no stop line, or a stop line beyond the end of the window, the reference speeds of the
//! route are kept (the cruise profile). Otherwise a braking profile is computed which brings
//! the vehicle to rest a few waypoints short of the stop line, so that the front of the vehicle
//! stops at the line. The braking speed at each waypoint follows the constant deceleration law
//! `v = sqrt(2 * a * d)`, where `d` is the distance along the route to the stop point, plus a
//! small bias growing with the waypoint index which removes the infinite initial slope of the
//! square root. Speeds below a floor are set to zero so the vehicle never crawls towards the
//! line, and no waypoint is ever given more than its reference speed.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod params;
pub mod state;
pub mod window;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::Params;
pub use state::*;
pub use window::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur when creating the speed profiler.
#[derive(Debug, thiserror::Error)]
pub enum SpeedProfError {
    #[error("The lookahead window must contain at least one waypoint")]
    ZeroLookahead,

    #[error("Maximum deceleration must be positive and finite, found {0} m/s^2")]
    InvalidMaxDecel(f64),

    #[error("Stop speed floor must be non-negative and finite, found {0} m/s")]
    InvalidSpeedFloor(f64),
}
