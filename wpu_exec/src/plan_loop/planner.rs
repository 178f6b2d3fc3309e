//! Single tick planner

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{info, trace};

use crate::{
    live_state::LiveState,
    speed_prof::{PlanWindow, Profile, SpeedProfiler},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Runs one planning step against the live state.
#[derive(Debug)]
pub struct Planner {
    profiler: SpeedProfiler,
    readiness: Readiness,
    braking: bool,
}

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// Pose or route still missing
    NotReady,

    /// Both inputs received, permanent
    Ready,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Planner {
    pub fn new(profiler: SpeedProfiler) -> Self {
        Self {
            profiler,
            readiness: Readiness::NotReady,
            braking: false,
        }
    }

    pub fn readiness(&self) -> Readiness {
        self.readiness
    }

    /// Plan a new window from the latest inputs.
    ///
    /// Returns `None` if the inputs are not yet ready.
    pub fn tick(&mut self, state: &LiveState) -> Option<PlanWindow> {
        let snapshot = match state.snapshot() {
            Ok(s) => s,
            Err(e) => {
                trace!("Skipping tick: {}", e);
                return None;
            }
        };

        if self.readiness == Readiness::NotReady {
            info!("Pose and route received, planner ready");
            self.readiness = Readiness::Ready;
        }

        let closest_idx = snapshot
            .route_index
            .nearest_ahead_index(&snapshot.pose.position2());

        let window = self.profiler.build_window(
            snapshot.route_index.route(),
            closest_idx,
            snapshot.stop_cmd,
        );

        trace!(
            "Window from waypoint {} ({} wps, {:?})",
            window.start_index,
            window.len(),
            window.profile
        );

        match (self.braking, window.profile) {
            (false, Profile::Braking { stop_offset }) => {
                info!(
                    "Braking engaged at waypoint {}, stopping at waypoint {}",
                    closest_idx,
                    closest_idx + stop_offset
                );
                self.braking = true;
            }
            (true, Profile::Cruise) => {
                info!("Braking released at waypoint {}", closest_idx);
                self.braking = false;
            }
            _ => (),
        }

        Some(window)
    }
}
