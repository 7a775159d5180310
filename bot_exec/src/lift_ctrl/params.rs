//! Parameters structure for LiftCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use eqpt_if::eqpt::chassis::{ExitConditions, PidConstants};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Lift control.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    // ---- SETPOINTS ----

    /// Rotation sensor position of the raised lift.
    ///
    /// Units: degrees
    pub up_angle_deg: f64,

    /// Rotation sensor position of the lowered lift.
    ///
    /// Units: degrees
    pub down_angle_deg: f64,

    // ---- CONTROL ----

    /// Gains of the position loop. `max_voltage` clamps the motor demand.
    pub pid: PidConstants,

    /// Settle and timeout conditions of each move.
    pub exit: ExitConditions,

    /// Delay after a toggled move completes during which further toggles are
    /// rejected.
    ///
    /// Units: milliseconds
    pub toggle_settle_ms: u64,

    // ---- ARM DETECTION ----

    /// Arm detector distance below which the lift is raised.
    ///
    /// Units: inches
    pub proximity_trigger_in: f64,

    /// Whether the lift is raised at power on.
    pub initially_raised: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            up_angle_deg: 240.0,
            down_angle_deg: 40.0,
            pid: PidConstants {
                max_voltage: 10.0,
                k_p: 0.4,
                k_i: 0.2,
                k_d: 0.0,
                integral_start: 15.0,
            },
            exit: ExitConditions {
                settle_error: 3.0,
                settle_time_ms: 200,
                timeout_ms: 1000,
            },
            toggle_settle_ms: 200,
            proximity_trigger_in: 1.0,
            initially_raised: false,
        }
    }
}
