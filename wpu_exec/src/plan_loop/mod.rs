//! # Planning loop module
//!
//! The planning loop runs the planner at a fixed rate. On each tick the planner takes a snapshot
//! of the [`LiveState`](crate::live_state::LiveState), finds the waypoint ahead of the vehicle,
//! builds the speed profiled lookahead window and hands it to a [`PlanSink`].
//!
//! Until both a pose and a route have been received ticks are skipped without output. Once the
//! planner is ready it stays ready.
//!
//! The loop waits between ticks on a shutdown channel, so a request made through the
//! [`ShutdownHandle`] is acted on as soon as the current tick has finished. Dropping every
//! handle also stops the loop.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod params;
pub mod planner;
pub mod sink;
pub mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::Params;
pub use planner::*;
pub use sink::PlanSink;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PlanLoopError {
    #[error("Loop rate must be positive and finite, found {0} Hz")]
    InvalidRate(f64),
}
