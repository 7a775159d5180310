//! # Button processor module
//!
//! The button processor handles the edges of the driver's controller buttons.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};

// Internal
use crate::{
    auto_sel::menu_feedback,
    data_store::DataStore,
    dems::{ChassisDem, IntakeDem},
    drive_ctrl::{ButtonEvent, ControlOwner, Edge, MacroSlot},
    feedback::Feedback,
    lift_ctrl::LiftRequest
};
use eqpt_if::{
    competition::MatchPhase,
    eqpt::{controller::Rumble, motor::StopMode}
};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute the action bound to a button edge.
///
/// Mutates the datastore to send commands to different modules.
pub(crate) fn exec(ds: &mut DataStore, event: &ButtonEvent) {
    // The robot is under program control for the whole autonomous period
    if ds.phase == MatchPhase::Autonomous {
        debug!("{:?} {:?} ignored in autonomous", event.button, event.edge);
        return
    }

    let buttons = *ds.drive_ctrl.buttons();
    let button = event.button;

    match event.edge {
        Edge::Pressed => {
            debug!("{:?} pressed", button);

            if button == buttons.intake {
                ds.dems.intake = Some(IntakeDem::Spin { 
                    volts: ds.drive_ctrl.intake_volts() 
                });
            }
            if button == buttons.hold {
                hold_chassis(ds);
            }
            if button == buttons.lift_toggle {
                ds.lift_ctrl_input.request = Some(LiftRequest::Toggle);
            }
            if button == buttons.mode {
                mode_pressed(ds);
            }
            if button == buttons.team_color {
                team_color_pressed(ds);
            }
            if button == buttons.run_test {
                run_test(ds);
            }
        },
        Edge::Released => {
            debug!("{:?} released", button);

            if button == buttons.intake {
                ds.dems.intake = Some(IntakeDem::Stop(StopMode::Coast));
            }
            if button == buttons.hold && ds.release_hold_token() {
                ds.dems.chassis = Some(ChassisDem::Stop(StopMode::Coast));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn hold_chassis(ds: &mut DataStore) {
    if ds.hold_token.is_some() {
        return
    }

    match ds.drive_ctrl.arbiter.request(ControlOwner::HoldChassis, ds.now) {
        Ok(token) => {
            ds.hold_token = Some(token);
            ds.dems.chassis = Some(ChassisDem::Stop(StopMode::Hold));
            ds.feedback.push(Feedback::Rumble(Rumble::Short));
        },
        Err(e) => {
            debug!("Chassis hold refused: {}", e);
            ds.num_rejected_requests += 1;
        }
    }
}

fn mode_pressed(ds: &mut DataStore) {
    if ds.auto_sel.arm_test_mode(ds.now) {
        ds.feedback.push(Feedback::Rumble(Rumble::Long));
    }
    else if ds.auto_sel.is_test_mode() {
        if ds.auto_sel.cycle() {
            ds.feedback.extend(menu_feedback(&ds.auto_sel));
        }
    }
    else {
        run_macro(ds, MacroSlot::Mode);
    }
}

fn team_color_pressed(ds: &mut DataStore) {
    if ds.intake_spinning {
        let color = ds.drive_ctrl.toggle_team_color();
        ds.feedback.push(Feedback::Rumble(Rumble::Long));
        ds.feedback.push(Feedback::ControllerPrint(color.display().into()));
    }
    else {
        run_macro(ds, MacroSlot::TeamColor);
    }
}

fn run_test(ds: &mut DataStore) {
    let id = match ds.auto_sel.run_test_now() {
        Some(id) => id,
        None => return
    };

    if ds.auto_exec.is_running() {
        debug!("A routine is already running, test run ignored");
        return
    }

    let routine = match ds.auto_exec.routine(id) {
        Ok(r) => r.clone(),
        Err(e) => {
            warn!("Cannot run test: {}", e);
            return
        }
    };

    info!("Running \"{}\" in test mode", routine.name);
    ds.start_routine(ControlOwner::TestRoutine, routine);
}

fn run_macro(ds: &mut DataStore, slot: MacroSlot) {
    if ds.phase != MatchPhase::DriverControl {
        debug!("{:?} macro ignored outside driver control", slot);
        return
    }

    let routine = ds.drive_ctrl.macro_hook(slot).clone();
    if routine.is_empty() {
        return
    }

    info!("Running {:?} macro \"{}\"", slot, routine.name);
    ds.start_routine(ControlOwner::Macro(slot), routine);
}
