//! Parameters structure for DriveCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::TeamColor;
use crate::auto_exec::Routine;
use eqpt_if::eqpt::{
    chassis::{ChassisConstants, ExitConditions, PidConstants},
    controller::Button
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for driver control.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    // ---- DRIVING ----

    /// Stick to drive command mapping.
    pub drive_mode: DriveModeKind,

    /// Arcade mode shaping.
    pub arcade: ArcadeParams,

    /// Period of the driver control loop, a multiple of the exec cycle.
    ///
    /// Units: milliseconds
    pub drive_period_ms: u64,

    // ---- ACTIONS ----

    /// Intake voltage while the intake button is held.
    ///
    /// Units: volts
    pub intake_volts: f64,

    /// Alliance at power on.
    pub initial_team_color: TeamColor,

    /// A macro holding the chassis for longer than this is considered stuck
    /// and has its control revoked.
    ///
    /// Units: milliseconds
    pub macro_timeout_ms: u64,

    /// Button assignments.
    pub buttons: ButtonMap,

    /// Macro hooks, empty routines do nothing.
    #[serde(default)]
    pub macros: MacroHooks,

    // ---- CHASSIS ----

    /// Motion controller tuning applied on chassis reset.
    pub chassis: ChassisConstants,
}

/// Arcade drive shaping.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ArcadeParams {
    /// Factor applied to turn demands below `turn_scale_limit`.
    pub turn_scale: f64,

    /// Turn demands at or above this magnitude are not scaled.
    ///
    /// Units: percent
    pub turn_scale_limit: f64,

    /// Share of the turn demand removed from the inner side.
    pub steer_bias: f64,
}

/// Which button triggers which action.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ButtonMap {
    pub intake: Button,
    pub hold: Button,
    pub lift_toggle: Button,
    pub mode: Button,
    pub team_color: Button,
    pub run_test: Button,
}

/// Routines run by the macro buttons.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MacroHooks {
    #[serde(default)]
    pub mode: Routine,

    #[serde(default)]
    pub team_color: Routine,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Available drive modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveModeKind {
    Tank,
    Arcade
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            drive_mode: DriveModeKind::Arcade,
            arcade: ArcadeParams::default(),
            drive_period_ms: 20,
            intake_volts: 12.0,
            initial_team_color: TeamColor::Red,
            macro_timeout_ms: 15_000,
            buttons: ButtonMap::default(),
            macros: MacroHooks::default(),
            chassis: ChassisConstants {
                drive: PidConstants {
                    max_voltage: 10.0,
                    k_p: 1.5,
                    k_i: 0.0,
                    k_d: 10.0,
                    integral_start: 0.0
                },
                heading: PidConstants {
                    max_voltage: 6.0,
                    k_p: 0.4,
                    k_i: 0.0,
                    k_d: 1.0,
                    integral_start: 0.0
                },
                turn: PidConstants {
                    max_voltage: 10.0,
                    k_p: 0.2,
                    k_i: 0.015,
                    k_d: 1.5,
                    integral_start: 7.5
                },
                drive_exit: ExitConditions {
                    settle_error: 1.0,
                    settle_time_ms: 200,
                    timeout_ms: 2000
                },
                turn_exit: ExitConditions {
                    settle_error: 1.5,
                    settle_time_ms: 200,
                    timeout_ms: 1500
                }
            }
        }
    }
}

impl Default for ArcadeParams {
    fn default() -> Self {
        Self {
            turn_scale: 0.85,
            turn_scale_limit: 100.0,
            steer_bias: 0.5
        }
    }
}

impl Default for ButtonMap {
    fn default() -> Self {
        Self {
            intake: Button::L1,
            hold: Button::R2,
            lift_toggle: Button::R1,
            mode: Button::Right,
            team_color: Button::B,
            run_test: Button::A
        }
    }
}
