//! # Exec cycle
//!
//! One cycle of the robot executable. The executable (and the integration
//! tests) call [`cycle`] at the cycle period with the exec clock time:
//!
//! - Cycle start
//! - Input acquisition
//! - Match phase transitions
//! - Pre-autonomous setup
//! - Button processing
//! - Autonomous selection menu
//! - Routine runner processing
//! - Chassis arbitration checks
//! - Lift control processing
//! - Driver control processing
//! - Endgame timer processing
//! - Demands and feedback to equipment
//! - Cycle end

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::time::Duration;
use log::{debug, info, warn};

// Internal
use crate::{
    auto_exec,
    auto_sel::menu_feedback,
    button_processor,
    ctrl::PidStatus,
    data_store::DataStore,
    dems::{ChassisDem, IntakeDem},
    drive_ctrl::{self, ControlOwner},
    endgame::{self, ENDGAME_REMINDER_TEXT},
    feedback::{self, Feedback},
    health,
    lift_ctrl,
    pre_auton
};
use eqpt_if::{
    competition::MatchPhase,
    eqpt::{Eqpt, controller::Rumble, motor::StopMode}
};
use util::module::State;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Text shown to the driver when a macro is stopped for holding the chassis
/// too long.
pub const MACRO_TIMEOUT_TEXT: &str = "macro timeout";

/// Text shown to the driver when a lift move times out.
pub const LIFT_TIMEOUT_TEXT: &str = "lift timeout";

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Prepare the equipment before the first cycle.
///
/// The lift sensor's accumulated position is rebased to its absolute angle,
/// so that the lift setpoints are absolute.
pub fn init(eqpt: &mut Eqpt) {
    let angle_deg = eqpt.lift_sensor.angle_deg();
    eqpt.lift_sensor.set_position_deg(angle_deg);

    info!("Lift sensor rebased to {:.1} deg", angle_deg);
}

/// Execute a single cycle at exec time `now`.
pub fn cycle(ds: &mut DataStore, eqpt: &mut Eqpt, now: Duration) {

    // Clear items that need wiping at the start of the cycle
    ds.cycle_start(now);

    // ---- DATA INPUT ----

    ds.controller = eqpt.controller.state();
    ds.prev_screen_pressing = ds.screen_pressing;
    ds.screen_pressing = eqpt.brain.pressing();
    ds.intake_spinning = eqpt.intake.is_spinning();
    ds.motion_settled = eqpt.chassis.motion_settled();
    ds.lift_ctrl_input.angle_deg = eqpt.lift_sensor.position_deg();
    ds.lift_ctrl_input.proximity_in = eqpt.arm_detector.take_change();

    // ---- MATCH PHASE ----

    let phase = eqpt.competition.phase();
    if phase != ds.phase {
        phase_change(ds, eqpt, phase);
    }

    // ---- PRE-AUTONOMOUS ----

    pre_auton::proc(ds, eqpt);

    // ---- BUTTON PROCESSING ----

    let events = ds.drive_ctrl.button_events(&ds.controller);
    for event in events.iter() {
        button_processor::exec(ds, event);
    }

    // ---- MENU ----

    // The brain screen cycles the selection on release while the menu is up
    if ds.menu_shown 
        && !ds.auto_sel.exit_menu_requested()
        && ds.prev_screen_pressing 
        && !ds.screen_pressing
        && ds.auto_sel.cycle()
    {
        ds.feedback.extend(menu_feedback(&ds.auto_sel));
        ds.feedback.push(Feedback::Rumble(Rumble::Short));
    }

    // ---- ROUTINE RUNNER ----

    let auto_exec_input = auto_exec::InputData {
        now,
        motion_settled: ds.motion_settled,
        lift_moving: ds.lift_ctrl.is_moving(),
        heading_available: ds.heading_available
    };

    match ds.auto_exec.proc(&auto_exec_input) {
        Ok((o, r)) => {
            if let Some(target) = o.motion {
                ds.dems.chassis = Some(ChassisDem::Motion(target));
            }
            if let Some(i) = o.intake {
                ds.dems.intake = Some(i);
            }
            if let Some(l) = o.lift {
                ds.lift_ctrl_input.request = Some(l);
            }
            if r.finished {
                ds.release_routine_token();
            }
            ds.auto_exec_status_rpt = r;
        },
        Err(e) => {
            warn!("Error during AutoExec processing: {}", e);
            ds.end_routine();
        }
    }

    // ---- ARBITRATION ----

    if let Some(owner) = ds.drive_ctrl.arbiter.check_stale(now) {
        warn!("{:?} stopped for holding the chassis too long", owner);

        ds.auto_exec.abort();
        ds.release_routine_token();

        ds.dems.chassis = Some(ChassisDem::Stop(StopMode::Coast));
        ds.feedback.push(Feedback::ControllerPrint(MACRO_TIMEOUT_TEXT.into()));
        ds.feedback.push(Feedback::Rumble(Rumble::Alarm));
    }

    // ---- LIFT CONTROL ----

    match ds.lift_ctrl.proc(&ds.lift_ctrl_input) {
        Ok((o, r)) => {
            ds.dems.lift = o;

            if r.completed == Some(PidStatus::TimedOut) {
                ds.num_lift_timeouts += 1;
                ds.feedback.push(Feedback::ControllerPrint(LIFT_TIMEOUT_TEXT.into()));
            }

            ds.lift_ctrl_status_rpt = r;
        },
        Err(e) => {
            warn!("Error during LiftCtrl processing: {}", e);
            ds.dems.lift = lift_ctrl::OutputData::Stop(StopMode::Hold);
        }
    }

    // ---- DRIVER CONTROL ----

    let drive_ctrl_input = drive_ctrl::InputData {
        controller: ds.controller.clone(),
        is_drive_tick: ds.is_drive_cycle,
        driver_control: ds.phase == MatchPhase::DriverControl
    };

    match ds.drive_ctrl.proc(&drive_ctrl_input) {
        Ok((o, r)) => {
            // A button action this cycle takes precedence over the sticks
            if let (Some(cmd), None) = (o, ds.dems.chassis) {
                ds.dems.chassis = Some(ChassisDem::Drive(cmd));
            }
            ds.drive_ctrl_status_rpt = r;
        },
        Err(e) => warn!("Error during DriveCtrl processing: {}", e)
    }

    // ---- ENDGAME ----

    match ds.endgame.proc(&endgame::InputData { now }) {
        Ok((o, _)) => {
            if o.remind {
                ds.feedback.push(Feedback::ControllerPrint(ENDGAME_REMINDER_TEXT.into()));
                ds.feedback.push(Feedback::Rumble(Rumble::Long));
            }
            if o.health_check {
                let faults = health::check_motors(
                    &eqpt.motor_health(), 
                    ds.params.expected_motor_count, 
                    ds.params.overheat_temp_c
                );
                ds.num_motor_faults += faults.len() as u64;
                ds.feedback.extend(health::fault_feedback(&faults));
            }
        },
        Err(e) => match e {}
    }

    // ---- OUTPUT ----

    ds.dems.send(eqpt);
    feedback::flush(&mut ds.feedback, eqpt);

    ds.num_cycles += 1;
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Handle the field moving the match to a new phase.
fn phase_change(ds: &mut DataStore, eqpt: &mut Eqpt, phase: MatchPhase) {
    let prev = ds.phase;
    ds.phase = phase;

    info!("Match phase {:?} -> {:?}", prev, phase);

    match phase {
        MatchPhase::Autonomous => autonomous_start(ds),
        MatchPhase::DriverControl => driver_control_start(ds, eqpt),
        MatchPhase::Disabled => {
            ds.end_routine();
            ds.release_hold_token();
            ds.dems.chassis = Some(ChassisDem::Stop(StopMode::Coast));
            ds.dems.intake = Some(IntakeDem::Stop(StopMode::Coast));

            if prev == MatchPhase::DriverControl {
                ds.endgame.cancel();
                info!("Match over");
            }
        }
    }
}

/// Entry point of the autonomous period.
fn autonomous_start(ds: &mut DataStore) {
    // Anything run from test mode or held by the driver before the match
    // gives way
    ds.end_routine();
    if ds.release_hold_token() {
        info!("Chassis hold released for autonomous");
        ds.dems.chassis = Some(ChassisDem::Stop(StopMode::Coast));
    }

    let id = match ds.auto_sel.start_autonomous_period() {
        Some(id) => id,
        None => {
            debug!("Autonomous already started this match");
            return
        }
    };

    let routine = match ds.auto_exec.routine(id) {
        Ok(r) => r.clone(),
        Err(e) => {
            warn!("Cannot run the autonomous routine: {}", e);
            return
        }
    };

    ds.start_routine(ControlOwner::Autonomous, routine);
}

/// Entry point of driver control.
fn driver_control_start(ds: &mut DataStore, eqpt: &mut Eqpt) {
    ds.auto_sel.enter_driver_control();
    ds.end_routine();

    pre_auton::reset_chassis(ds, eqpt);

    ds.endgame.start(ds.now);
}
