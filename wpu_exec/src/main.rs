//! Main waypoint updater executable entry point.
//!
//! # Architecture
//!
//! The executable consists of:
//!
//!     - Session, logging and parameter initialisation
//!     - The live state, shared between the input handlers and the planning loop
//!     - A feeder thread replaying an input script into the live state:
//!         - Route file to load
//!         - Vehicle poses
//!         - Stop line commands
//!     - The planning loop, running on the main thread until the script ends:
//!         - Find the waypoint ahead of the vehicle
//!         - Build the speed profiled lookahead window
//!         - Archive the window
//!
//! # Usage
//!
//! ```text
//! wpu_exec <script>
//! ```

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod archive_sink;
mod feeder;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info};
use std::{env, sync::Arc};

// Internal
use archive_sink::ArchiveSink;
use feeder::Feeder;
use util::{
    host,
    logger::{logger_init, LevelFilter},
    script_interpreter::ScriptInterpreter,
    session::Session,
};
use wpu_lib::{
    live_state::LiveState,
    plan_loop::{self, PlanLoop, Planner},
    speed_prof::{self, SpeedProfiler},
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("wpu_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Waypoint Updater Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    let sw_root = host::get_wpu_sw_root().wrap_err("Failed to get the software root")?;

    // ---- LOAD PARAMETERS ----

    let speed_prof_params: speed_prof::Params =
        util::params::load("speed_prof.toml").wrap_err("Could not load speed profiler params")?;

    let plan_loop_params: plan_loop::Params =
        util::params::load("plan_loop.toml").wrap_err("Could not load planning loop params")?;

    info!("Exec parameters loaded");
    debug!("{:#?}", speed_prof_params);
    debug!("{:#?}", plan_loop_params);

    // ---- LOAD SCRIPT ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    if args.len() != 2 {
        return Err(eyre!(
            "Expected a single script path argument, found {} arguments",
            args.len() - 1
        ));
    }

    info!("Loading script from \"{}\"", &args[1]);

    let si = ScriptInterpreter::new(&args[1]).wrap_err("Failed to load script")?;

    info!(
        "Loaded script lasts {:.02} s and contains {} messages\n",
        si.get_duration(),
        si.get_num_msgs()
    );

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let profiler =
        SpeedProfiler::new(speed_prof_params).wrap_err("Failed to initialise the SpeedProfiler")?;

    let (mut plan_loop, shutdown) = PlanLoop::new(plan_loop_params, Planner::new(profiler))
        .wrap_err("Failed to initialise the PlanLoop")?;

    let mut sink = ArchiveSink::new(&session).wrap_err("Failed to initialise the ArchiveSink")?;

    let live_state = Arc::new(LiveState::new());

    info!("Module initialisation complete\n");

    // ---- START INPUTS ----

    let feeder_handle = Feeder::new(live_state.clone(), sw_root)
        .spawn(si, shutdown)
        .wrap_err("Failed to start the feeder thread")?;

    // ---- MAIN LOOP ----

    info!("Begining planning loop\n");

    let stats = plan_loop.run(&live_state, &mut sink);

    // ---- SHUTDOWN ----

    feeder_handle
        .join()
        .map_err(|_| eyre!("The feeder thread panicked"))?;

    info!(
        "Loop statistics: {} ticks, {} published, {} skipped, {} publish errors, {} overruns",
        stats.num_ticks,
        stats.num_published,
        stats.num_skipped,
        stats.num_publish_errors,
        stats.num_overruns
    );

    info!("End of execution");

    Ok(())
}
