//! # Communications interface crate.
//!
//! Provides the message shapes exchanged between the waypoint updater and the
//! rest of the vehicle software.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Input messages consumed by the planner
pub mod msg;
