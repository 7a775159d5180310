//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::time::Duration;
use log::{debug, info, warn};
use serde::Serialize;

// Internal
use crate::{
    auto_exec::{self, AutoExec, Routine},
    auto_sel::AutoSel,
    dems::Dems,
    drive_ctrl::{self, ControlOwner, ControlToken, DriveCtrl, TeamColor},
    endgame::EndgameTimer,
    feedback::Feedback,
    lift_ctrl::{self, LiftCtrl},
    params::BotExecParams,
};
use eqpt_if::{
    competition::MatchPhase,
    eqpt::controller::ControllerState
};

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

/// Progress of the pre-autonomous setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PreAutonState {
    /// Waiting for the inertial sensor to calibrate
    GyroSetup,

    /// Setup complete, menu shown
    Ready
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// Exec clock time at the start of this cycle
    pub now: Duration,

    /// True if this cycle is a driver control loop tick
    pub is_drive_cycle: bool,

    /// Exec parameters
    pub params: BotExecParams,

    // Match
    /// Current match phase
    pub phase: MatchPhase,

    pub pre_auton: PreAutonState,

    /// False if the inertial sensor failed, turns are then unavailable
    pub heading_available: bool,

    /// True once the menu has been shown on the brain screen
    pub menu_shown: bool,

    // Inputs
    pub controller: ControllerState,
    pub screen_pressing: bool,
    pub prev_screen_pressing: bool,
    pub intake_spinning: bool,
    pub motion_settled: bool,

    // LiftCtrl
    pub lift_ctrl: LiftCtrl,
    pub lift_ctrl_input: lift_ctrl::InputData,
    pub lift_ctrl_status_rpt: lift_ctrl::StatusReport,

    // Autonomous selection and routines
    pub auto_sel: AutoSel,
    pub auto_exec: AutoExec,
    pub auto_exec_status_rpt: auto_exec::StatusReport,

    /// Token held on behalf of the running routine
    pub routine_token: Option<ControlToken>,

    // DriveCtrl
    pub drive_ctrl: DriveCtrl,
    pub drive_ctrl_status_rpt: drive_ctrl::StatusReport,

    /// Token held while the chassis hold button is down
    pub hold_token: Option<ControlToken>,

    // Endgame
    pub endgame: EndgameTimer,

    // Outputs
    pub dems: Dems,
    pub feedback: Vec<Feedback>,

    // Monitoring Counters
    /// Number of lift moves which timed out
    pub num_lift_timeouts: u64,

    /// Number of requests for chassis control which were refused
    pub num_rejected_requests: u64,

    /// Number of motor faults found
    pub num_motor_faults: u64,

    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

/// Summary of a match, saved at the end of the session.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub num_cycles: u64,
    pub duration_s: f64,
    pub final_phase: MatchPhase,
    pub team_color: TeamColor,
    pub selected_routine: String,
    pub heading_available: bool,
    pub lift_raised: bool,
    pub num_lift_timeouts: u64,
    pub num_rejected_requests: u64,
    pub num_macros_revoked: u64,
    pub num_motor_faults: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, and sets
    /// the drive cycle flag.
    pub fn cycle_start(&mut self, now: Duration) {
        self.now = now;

        let cycles_per_tick = self.drive_ctrl.cycles_per_tick(self.params.cycle_period());
        self.is_drive_cycle = self.num_cycles % cycles_per_tick == 0;

        self.lift_ctrl_input = lift_ctrl::InputData {
            now,
            ..Default::default()
        };
        self.lift_ctrl_status_rpt = lift_ctrl::StatusReport::default();
        self.auto_exec_status_rpt = auto_exec::StatusReport::default();
        self.drive_ctrl_status_rpt = drive_ctrl::StatusReport::default();

        self.dems = Dems::default();
    }

    /// Give the chassis to `owner` and start running the routine on its
    /// behalf.
    ///
    /// Returns false if the chassis is held by someone else.
    pub fn start_routine(&mut self, owner: ControlOwner, routine: Routine) -> bool {
        match self.drive_ctrl.arbiter.request(owner, self.now) {
            Ok(token) => {
                self.routine_token = Some(token);
                self.auto_exec.start(routine);
                true
            },
            Err(e) => {
                warn!("Cannot start \"{}\" for {:?}: {}", routine.name, owner, e);
                self.num_rejected_requests += 1;
                false
            }
        }
    }

    /// Stop the running routine, if any, and give the chassis back.
    pub fn end_routine(&mut self) {
        if self.auto_exec.abort() {
            info!("Running routine stopped");
        }
        self.release_routine_token();
    }

    /// Give back the chassis held for a routine.
    pub fn release_routine_token(&mut self) {
        if let Some(token) = self.routine_token.take() {
            if let Err(e) = self.drive_ctrl.arbiter.release(token) {
                debug!("{}", e);
            }
        }
    }

    /// Give back the chassis held by the hold button.
    pub fn release_hold_token(&mut self) -> bool {
        match self.hold_token.take() {
            Some(token) => {
                if let Err(e) = self.drive_ctrl.arbiter.release(token) {
                    debug!("{}", e);
                }
                true
            },
            None => false
        }
    }

    /// Summarise the match so far.
    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            num_cycles: self.num_cycles as u64,
            duration_s: self.now.as_secs_f64(),
            final_phase: self.phase,
            team_color: self.drive_ctrl.team_color(),
            selected_routine: self.auto_sel.label().to_string(),
            heading_available: self.heading_available,
            lift_raised: self.lift_ctrl.is_raised(),
            num_lift_timeouts: self.num_lift_timeouts,
            num_rejected_requests: self.num_rejected_requests,
            num_macros_revoked: self.drive_ctrl.arbiter.num_revoked(),
            num_motor_faults: self.num_motor_faults,
        }
    }
}

impl Default for PreAutonState {
    fn default() -> Self {
        PreAutonState::GyroSetup
    }
}
