//! # Archiving sink
//!
//! Output sink of the executable. Each published window is summarised as one row of
//! `plan_loop/windows.csv` in the session archive.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

use util::{
    archive::{ArchiveError, Archiver},
    session::{self, Session},
};
use wpu_lib::{
    plan_loop::PlanSink,
    speed_prof::{PlanWindow, Profile},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

pub struct ArchiveSink {
    arch: Archiver,
}

/// Archived summary of one window.
#[derive(Debug, Serialize, PartialEq)]
struct WindowRecord {
    time_s: f64,
    start_index: usize,
    num_wps: usize,
    profile: &'static str,
    stop_offset: Option<usize>,
    first_speed_ms: f64,
    min_speed_ms: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ArchiveSink {
    pub fn new(session: &Session) -> Result<Self, ArchiveError> {
        Ok(Self {
            arch: Archiver::from_path(session, "plan_loop/windows.csv")?,
        })
    }
}

impl PlanSink for ArchiveSink {
    type Error = ArchiveError;

    fn publish(&mut self, window: &PlanWindow) -> Result<(), Self::Error> {
        self.arch
            .serialise(WindowRecord::new(session::get_elapsed_seconds(), window))
    }
}

impl WindowRecord {
    fn new(time_s: f64, window: &PlanWindow) -> Self {
        let (profile, stop_offset) = match window.profile {
            Profile::Cruise => ("CRUISE", None),
            Profile::Braking { stop_offset } => ("BRAKING", Some(stop_offset)),
        };

        Self {
            time_s,
            start_index: window.start_index,
            num_wps: window.len(),
            profile,
            stop_offset,
            first_speed_ms: window.speeds_ms().next().unwrap_or(0.0),
            min_speed_ms: window.speeds_ms().fold(f64::INFINITY, f64::min),
        }
    }
}
