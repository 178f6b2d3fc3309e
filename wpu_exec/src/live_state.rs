//! # Live state
//!
//! The latest inputs to the planner. Pose and stop line handlers run on their own threads and
//! overwrite single-value cells (last writer wins, nothing is queued). The route is set once: the
//! first complete route builds the [`RouteIndex`], later deliveries are ignored.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::sync::{Mutex, PoisonError};

use conquer_once::{OnceCell, TryInitError};
use log::{debug, info};

use crate::{
    loc::Pose,
    route::{Route, RouteIndex},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Shared container for the planner inputs.
///
/// Share between the input handlers and the planning loop with an `Arc`.
pub struct LiveState {
    pose: Mutex<Option<Pose>>,
    stop_cmd: Mutex<StopCmd>,
    route_index: OnceCell<RouteIndex>,
}

/// A consistent view of the inputs, taken at the start of a tick.
pub struct Snapshot<'a> {
    pub pose: Pose,
    pub stop_cmd: StopCmd,
    pub route_index: &'a RouteIndex,
}

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

/// The stop line command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StopCmd {
    /// No active stop line
    None,

    /// Stop at the route waypoint with this index
    StopAt(usize),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LiveStateError {
    #[error("Planner inputs not ready (pose received: {pose}, route received: {route})")]
    NotReady { pose: bool, route: bool },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for StopCmd {
    fn default() -> Self {
        StopCmd::None
    }
}

impl From<i32> for StopCmd {
    /// Convert a stop line waypoint index as sent by the stop line source. `-1` means there is
    /// no stop line. Any other negative index is behind the start of the route, so the vehicle
    /// stops at once.
    fn from(wp_index: i32) -> Self {
        match wp_index {
            -1 => StopCmd::None,
            i if i < 0 => StopCmd::StopAt(0),
            i => StopCmd::StopAt(i as usize),
        }
    }
}

impl Default for LiveState {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveState {
    pub fn new() -> Self {
        Self {
            pose: Mutex::new(None),
            stop_cmd: Mutex::new(StopCmd::None),
            route_index: OnceCell::uninit(),
        }
    }

    /// Pose handler, replaces the latest pose.
    ///
    /// A pose with a non-finite component is dropped and the previous pose kept.
    pub fn set_pose(&self, pose: Pose) {
        if !pose.is_finite() {
            debug!("Ignoring non-finite pose {:?}", pose);
            return;
        }

        *self.pose.lock().unwrap_or_else(PoisonError::into_inner) = Some(pose);
    }

    /// Stop line handler, replaces the latest stop command.
    pub fn set_stop_cmd(&self, cmd: StopCmd) {
        let mut current = self.stop_cmd.lock().unwrap_or_else(PoisonError::into_inner);

        if *current != cmd {
            debug!("Stop command changed from {:?} to {:?}", *current, cmd);
        }

        *current = cmd;
    }

    /// Route handler.
    ///
    /// The first route delivered builds the route index. Any later route, including one arriving
    /// on another thread while the index is being built, is ignored. Returns `true` if this
    /// route was used.
    pub fn set_route(&self, route: Route) -> bool {
        let num_wps = route.len();

        match self.route_index.try_init_once(|| RouteIndex::new(route)) {
            Ok(()) => {
                info!("Route of {} waypoints received", num_wps);
                true
            }
            Err(TryInitError::AlreadyInit) => {
                debug!("Route already set, ignoring new route of {} waypoints", num_wps);
                false
            }
            Err(TryInitError::WouldBlock) => {
                debug!("Route index is being built, ignoring new route of {} waypoints", num_wps);
                false
            }
        }
    }

    /// Latest pose, if one has been received.
    pub fn pose(&self) -> Option<Pose> {
        *self.pose.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Latest stop command.
    pub fn stop_cmd(&self) -> StopCmd {
        *self.stop_cmd.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The route index, if the route has been received and indexed.
    pub fn route_index(&self) -> Result<&RouteIndex, LiveStateError> {
        self.route_index.get().ok_or(LiveStateError::NotReady {
            pose: self.pose().is_some(),
            route: false,
        })
    }

    /// True once both a pose and a route have been received.
    ///
    /// Inputs are never cleared, so once ready the state stays ready.
    pub fn is_ready(&self) -> bool {
        self.pose().is_some() && self.route_index.get().is_some()
    }

    /// Take a snapshot of the latest inputs.
    pub fn snapshot(&self) -> Result<Snapshot<'_>, LiveStateError> {
        let pose = self.pose();
        let route_index = self.route_index.get();

        match (pose, route_index) {
            (Some(pose), Some(route_index)) => Ok(Snapshot {
                pose,
                stop_cmd: self.stop_cmd(),
                route_index,
            }),
            (pose, route_index) => Err(LiveStateError::NotReady {
                pose: pose.is_some(),
                route: route_index.is_some(),
            }),
        }
    }
}
