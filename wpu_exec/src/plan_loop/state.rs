//! Fixed rate planning loop

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::{
    sync::mpsc::{self, RecvTimeoutError, TryRecvError},
    time::{Duration, Instant},
};

use log::{error, info, warn};

use super::*;
use crate::live_state::LiveState;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Runs the [`Planner`] at a fixed rate until shutdown.
pub struct PlanLoop {
    params: Params,
    period: Duration,
    planner: Planner,
    shutdown_rx: mpsc::Receiver<()>,
}

/// Requests shutdown of a [`PlanLoop`]. Can be cloned and sent to other threads.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: mpsc::Sender<()>,
}

/// Counters accumulated over a run of the loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopStats {
    pub num_ticks: u64,
    pub num_published: u64,
    pub num_skipped: u64,
    pub num_publish_errors: u64,
    pub num_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ShutdownHandle {
    /// Ask the loop to stop after its current tick.
    pub fn request(&self) {
        // If the loop has already gone there is nothing to stop
        self.tx.send(()).ok();
    }
}

impl PlanLoop {
    /// Create a new loop and the handle used to stop it.
    pub fn new(params: Params, planner: Planner) -> Result<(Self, ShutdownHandle), PlanLoopError> {
        if !(params.rate_hz.is_finite() && params.rate_hz > 0.0) {
            return Err(PlanLoopError::InvalidRate(params.rate_hz));
        }

        let period = Duration::try_from_secs_f64(1.0 / params.rate_hz)
            .map_err(|_| PlanLoopError::InvalidRate(params.rate_hz))?;

        let (tx, shutdown_rx) = mpsc::channel();

        Ok((
            Self {
                period,
                params,
                planner,
                shutdown_rx,
            },
            ShutdownHandle { tx },
        ))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run the loop until shutdown is requested or every [`ShutdownHandle`] has been dropped.
    ///
    /// At least one tick is always executed.
    pub fn run<S: PlanSink + ?Sized>(&mut self, state: &LiveState, sink: &mut S) -> LoopStats {
        let mut stats = LoopStats::default();
        let mut num_consec_overruns = 0u64;

        info!("Planning loop started at {:.1} Hz", self.params.rate_hz);

        loop {
            let tick_start = Instant::now();

            // ---- TICK ----

            stats.num_ticks += 1;

            match self.planner.tick(state) {
                Some(window) => match sink.publish(&window) {
                    Ok(()) => stats.num_published += 1,
                    Err(e) => {
                        warn!("Could not publish the window: {}", e);
                        stats.num_publish_errors += 1;
                    }
                },
                None => stats.num_skipped += 1,
            }

            // ---- CYCLE MANAGEMENT ----

            let tick_dur = tick_start.elapsed();

            let stop = match self.period.checked_sub(tick_dur) {
                Some(remaining) => {
                    num_consec_overruns = 0;

                    match self.shutdown_rx.recv_timeout(remaining) {
                        Err(RecvTimeoutError::Timeout) => false,
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
                    }
                }
                None => {
                    warn!(
                        "Tick overran by {:.6} s",
                        (tick_dur - self.period).as_secs_f64()
                    );
                    stats.num_overruns += 1;
                    num_consec_overruns += 1;

                    if num_consec_overruns == self.params.overrun_warn_limit {
                        error!("{} consecutive tick overruns", num_consec_overruns);
                    }

                    match self.shutdown_rx.try_recv() {
                        Err(TryRecvError::Empty) => false,
                        Ok(()) | Err(TryRecvError::Disconnected) => true,
                    }
                }
            };

            if stop {
                info!("Planning loop shutdown");
                break;
            }
        }

        stats
    }
}
