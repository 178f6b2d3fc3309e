//! Planning loop parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the planning loop
#[derive(Deserialize, Debug, Clone)]
pub struct Params {
    /// Tick rate of the loop.
    ///
    /// Units: Hertz
    pub rate_hz: f64,

    /// Number of consecutive overrunning ticks after which an error is logged.
    pub overrun_warn_limit: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            rate_hz: 30.0,
            overrun_warn_limit: 30,
        }
    }
}
