//! # Waypoint updater library.
//!
//! This library allows other crates in the workspace (and the benchmarks) to access items defined
//! inside the waypoint updater crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Localisation types - the vehicle pose as delivered by the pose source
pub mod loc;

/// Route module - the static reference route and its nearest-waypoint index
pub mod route;

/// Live state - latest pose, stop line command and the once-set route
pub mod live_state;

/// Speed profiler - builds the lookahead window and its cruise or braking speed profile
pub mod speed_prof;

/// Planning loop - fixed rate scheduler which publishes a new window every tick
pub mod plan_loop;
