//! # Pre-autonomous setup
//!
//! Runs from power on until the menu is shown: waits for the inertial sensor
//! to calibrate, checks the motors, resets the chassis and then shows the
//! autonomous selection menu.
//!
//! A failed inertial sensor does not stop the robot, it continues without a
//! heading and routines skip their turns.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::time::Duration;
use log::{error, info, warn};

// Internal
use crate::{
    auto_sel::menu_feedback,
    data_store::{DataStore, PreAutonState},
    feedback::Feedback,
    health
};
use eqpt_if::eqpt::{
    Eqpt,
    controller::Rumble,
    motor::StopMode
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Text shown to the driver when the inertial sensor is missing.
pub const GYRO_FAILURE_TEXT: &str = "inertial sensor failure";

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Advance the pre-autonomous setup by one cycle.
pub(crate) fn proc(ds: &mut DataStore, eqpt: &mut Eqpt) {
    if ds.pre_auton != PreAutonState::GyroSetup {
        return
    }

    // Keep waiting while the sensor calibrates, unless it is taking too long
    let gyro_timeout = Duration::from_millis(ds.params.gyro_timeout_ms);
    if eqpt.inertial.installed() && eqpt.inertial.is_calibrating() {
        if ds.now < gyro_timeout {
            return
        }
        warn!(
            "Inertial sensor still calibrating after {:.1} s", 
            gyro_timeout.as_secs_f64()
        );
    }

    ds.heading_available = gyro_setup_result(ds, eqpt);

    let faults = health::check_motors(
        &eqpt.motor_health(), 
        ds.params.expected_motor_count, 
        ds.params.overheat_temp_c
    );
    ds.num_motor_faults += faults.len() as u64;
    ds.feedback.extend(health::fault_feedback(&faults));

    reset_chassis(ds, eqpt);

    ds.feedback.extend(menu_feedback(&ds.auto_sel));
    ds.menu_shown = true;
    ds.pre_auton = PreAutonState::Ready;

    info!("Pre-autonomous setup complete");
}

/// Reset the chassis ready for driving.
///
/// Sets the chassis heading from the inertial sensor, stops the drive motors
/// and applies the controller constants.
pub(crate) fn reset_chassis(ds: &DataStore, eqpt: &mut Eqpt) {
    if ds.heading_available {
        eqpt.chassis.set_heading(eqpt.inertial.heading_deg());
    }
    eqpt.chassis.stop(StopMode::Coast);
    eqpt.chassis.configure(ds.drive_ctrl.chassis_constants());

    info!("Chassis reset");
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Queue the driver feedback for the gyro setup, returning true if a heading
/// is available.
fn gyro_setup_result(ds: &mut DataStore, eqpt: &Eqpt) -> bool {
    if !eqpt.inertial.installed() || eqpt.inertial.is_calibrating() {
        error!("Inertial sensor failed, continuing without heading");
        ds.feedback.push(Feedback::ControllerPrint(GYRO_FAILURE_TEXT.into()));
        ds.feedback.push(Feedback::Rumble(Rumble::Alarm));
        false
    }
    else {
        info!("Inertial sensor calibrated");
        ds.feedback.push(Feedback::Rumble(Rumble::Long));
        true
    }
}
