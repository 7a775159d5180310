//! Main robot executable entry point.
//! 
//! # Architecture
//! 
//! The general execution methodology consists of:
//! 
//!     - Initialise all modules
//!     - Main loop:
//!         - Simulation step and scripted driver inputs
//!         - Exec cycle (see `bot_lib::exec`):
//!             - Input acquisition
//!             - Match phase transitions
//!             - Button processing
//!             - Routine runner processing
//!             - Lift control processing
//!             - Driver control processing
//!             - Endgame timer processing
//!             - Demands and feedback to equipment
//!     - Save a summary of the match
//! 
//! # Modules
//! 
//! All cyclic modules (e.g. `lift_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!     

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use color_eyre::{Report, eyre::WrapErr};
use structopt::StructOpt;

// Internal
use bot_lib::{
    auto_sel::{self, AutoSel},
    data_store::DataStore,
    exec,
    params::BotExecParams,
    sim::{self, SimRobot}
};
use util::{
    module::State,
    logger::{logger_init, LevelFilter},
    session::Session,
    script_interpreter::{ScriptInterpreter, PendingEvents},
    time::{Clock, ManualClock, MonotonicClock}
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Runs a simulated match with the robot control software.
#[derive(Debug, StructOpt)]
#[structopt(name = "bot_exec")]
struct Args {
    /// Input script of timed controller events to play during the match.
    #[structopt(parse(from_os_str))]
    script: Option<PathBuf>,

    /// Run as fast as possible rather than in real time.
    #[structopt(short, long)]
    fast: bool,

    /// Show debug messages in the terminal.
    #[structopt(short, long)]
    verbose: bool,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    // ---- EARLY INITIALISATION ----

    color_eyre::install()?;

    let args = Args::from_args();

    // Initialise session
    let session = Session::new(
        "bot_exec", 
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    let stdout_level = match args.verbose {
        true => LevelFilter::Debug,
        false => LevelFilter::Info
    };
    logger_init(LevelFilter::Debug, stdout_level, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Robot Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", args);

    // ---- LOAD PARAMETERS ----

    let exec_params: BotExecParams = util::params::load(
        "bot_exec.toml"
    ).wrap_err("Could not load exec params")?;

    let sim_params: sim::Params = util::params::load(
        "sim.toml"
    ).wrap_err("Could not load sim params")?;

    let auto_sel_params: auto_sel::Params = util::params::load(
        "auto_sel.toml"
    ).wrap_err("Could not load AutoSel params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE INPUT SCRIPT ----

    let mut script = match args.script {
        Some(ref path) => {
            info!("Loading input script from {:?}", path);

            let si = ScriptInterpreter::new(path)
                .wrap_err("Failed to load input script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} events\n",
                si.get_duration(),
                si.get_num_events()
            );

            Some(si)
        },
        None => {
            info!("No input script provided, the driver will do nothing\n");
            None
        }
    };

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();
    let cycle_period = exec_params.cycle_period();
    ds.params = exec_params;

    // ---- INITIALISE MODULES ----

    ds.lift_ctrl.init("lift_ctrl.toml", &session)
        .wrap_err("Failed to initialise LiftCtrl")?;
    info!("LiftCtrl init complete");

    ds.auto_exec.init("auto_exec.toml", &session)
        .wrap_err("Failed to initialise AutoExec")?;
    info!("AutoExec init complete");

    ds.auto_sel = AutoSel::new(ds.auto_exec.routine_names(), auto_sel_params);
    info!("AutoSel init complete");

    ds.drive_ctrl.init("drive_ctrl.toml", &session)
        .wrap_err("Failed to initialise DriveCtrl")?;
    info!("DriveCtrl init complete");

    ds.endgame.init("endgame.toml", &session)
        .wrap_err("Failed to initialise the endgame timer")?;
    info!("Endgame timer init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE EQUIPMENT ----

    let (sim, mut eqpt) = SimRobot::new(sim_params);
    exec::init(&mut eqpt);

    info!("Simulated equipment initialised");

    let real_clock = MonotonicClock::new();
    let fast_clock = ManualClock::default();
    let clock: &dyn Clock = match args.fast {
        true => &fast_clock,
        false => &real_clock
    };

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let mut prev_now = Duration::default();

    loop {

        // Get cycle start time
        let cycle_start_instant = Instant::now();
        let now = clock.now();

        // ---- SIMULATION ----

        sim.step(now.checked_sub(prev_now).unwrap_or_default());
        prev_now = now;

        let pending = match script {
            Some(ref mut si) => si.get_pending_events(now.as_secs_f64()),
            None => PendingEvents::None
        };

        match pending {
            PendingEvents::None => (),
            PendingEvents::Some(events) => {
                for event in events.iter() {
                    sim.apply_event(event);
                }
            },
            PendingEvents::EndOfScript => {
                info!("End of input script reached");
                script = None;
            }
        }

        // ---- EXEC ----

        exec::cycle(&mut ds, &mut eqpt, now);

        if sim.match_over() {
            info!("Match over after {} cycles", ds.num_cycles);
            break
        }

        // ---- CYCLE MANAGEMENT ----

        if args.fast {
            fast_clock.advance(cycle_period);
            continue
        }

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            },
            None => {
                warn!(
                    "Cycle overran by {:.06} s", 
                    cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }
    }

    // ---- SHUTDOWN ----

    session.save("match_summary.json", &ds.summary())
        .wrap_err("Failed to save the match summary")?;

    info!("End of execution");

    Ok(())
}
