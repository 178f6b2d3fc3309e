//! # Input feeder
//!
//! Stands in for the pose, stop line and route sources by replaying an input script on a
//! background thread and delivering each message to the live state.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::{
    path::PathBuf,
    sync::Arc,
    thread,
    time::Duration,
};

use log::{debug, info, warn};

use comms_if::msg::InputMsg;
use util::script_interpreter::{Pending, ScriptInterpreter};
use wpu_lib::{
    live_state::{LiveState, StopCmd},
    loc::Pose,
    plan_loop::ShutdownHandle,
    route::loader,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Time to wait when no message is due.
const IDLE_SLEEP: Duration = Duration::from_millis(5);

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Delivers input messages to the live state.
pub struct Feeder {
    live_state: Arc<LiveState>,

    /// Route file paths are relative to this directory
    sw_root: PathBuf,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Feeder {
    pub fn new(live_state: Arc<LiveState>, sw_root: PathBuf) -> Self {
        Self {
            live_state,
            sw_root,
        }
    }

    /// Start replaying the script on a background thread. Shutdown of the planning loop is
    /// requested once the script has been fully delivered.
    pub fn spawn(
        self,
        mut si: ScriptInterpreter,
        shutdown: ShutdownHandle,
    ) -> std::io::Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name("feeder".into())
            .spawn(move || {
                info!(
                    "Feeding {} messages over {:.2} s",
                    si.get_num_msgs(),
                    si.get_duration()
                );

                while !self.feed(si.get_pending()) {}

                info!("End of script, requesting shutdown");
                shutdown.request();
            })
    }

    /// Deliver pending messages. Returns `true` at the end of the script.
    pub fn feed(&self, pending: Pending) -> bool {
        match pending {
            Pending::Some(msgs) => {
                for msg in msgs {
                    self.dispatch(msg);
                }
                false
            }
            Pending::None => {
                thread::sleep(IDLE_SLEEP);
                false
            }
            Pending::EndOfScript => true,
        }
    }

    /// Deliver a single message to the matching handler.
    pub fn dispatch(&self, msg: InputMsg) {
        match msg {
            InputMsg::Pose {
                position_m,
                attitude_q,
            } => self.live_state.set_pose(Pose::from_msg(position_m, attitude_q)),
            InputMsg::StopLine { wp_index } => {
                self.live_state.set_stop_cmd(StopCmd::from(wp_index))
            }
            InputMsg::Route { path } => {
                let full_path = self.sw_root.join(&path);

                debug!("Loading route from {:?}", full_path);

                match loader::load_csv(&full_path) {
                    Ok(route) => {
                        self.live_state.set_route(route);
                    }
                    Err(e) => warn!("Could not load route {:?}: {}", path, e),
                }
            }
        }
    }
}
