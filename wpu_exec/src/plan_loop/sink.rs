//! Output boundary of the planning loop

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::{convert::Infallible, sync::mpsc};

use crate::speed_prof::PlanWindow;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Consumer of the windows produced by the planning loop.
///
/// A publish error is logged by the loop, which then carries on with the next tick.
pub trait PlanSink {
    type Error: std::error::Error;

    fn publish(&mut self, window: &PlanWindow) -> Result<(), Self::Error>;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PlanSink for mpsc::Sender<PlanWindow> {
    type Error = mpsc::SendError<PlanWindow>;

    fn publish(&mut self, window: &PlanWindow) -> Result<(), Self::Error> {
        self.send(window.clone())
    }
}

/// Collects every window, used when the caller wants the whole output in memory.
impl PlanSink for Vec<PlanWindow> {
    type Error = Infallible;

    fn publish(&mut self, window: &PlanWindow) -> Result<(), Self::Error> {
        self.push(window.clone());
        Ok(())
    }
}
