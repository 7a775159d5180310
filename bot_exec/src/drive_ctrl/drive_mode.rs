//! Drive modes
//!
//! A drive mode maps the controller sticks onto a drive command. The mode is
//! picked once from the parameters and used for the whole execution.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use eqpt_if::eqpt::{
    chassis::DriveCommand,
    controller::{Axis, ControllerState}
};

use super::{ArcadeParams, DriveModeKind, Params};

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Maps stick positions to a drive command.
pub trait DriveMode: std::fmt::Debug {
    fn command(&self, sticks: &ControllerState) -> DriveCommand;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Left stick drives the left side, right stick the right side.
#[derive(Debug, Default, Clone, Copy)]
pub struct TankDrive;

/// Right stick vertical drives forward, left stick horizontal turns.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArcadeDrive {
    params: ArcadeParams
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveMode for TankDrive {
    fn command(&self, sticks: &ControllerState) -> DriveCommand {
        DriveCommand::Tank {
            left: sticks.axis(Axis::Axis3) as f64,
            right: sticks.axis(Axis::Axis2) as f64
        }
    }
}

impl ArcadeDrive {
    pub fn new(params: ArcadeParams) -> Self {
        Self { params }
    }
}

impl DriveMode for ArcadeDrive {
    fn command(&self, sticks: &ControllerState) -> DriveCommand {
        let forward = sticks.axis(Axis::Axis2) as f64;
        let mut turn = sticks.axis(Axis::Axis4) as f64;

        // Only full deflection turns are left unscaled
        if turn.abs() < self.params.turn_scale_limit {
            turn *= self.params.turn_scale;
        }

        DriveCommand::Arcade {
            forward,
            turn,
            steer_bias: self.params.steer_bias
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Build the drive mode selected in the parameters.
pub fn drive_mode_from_params(params: &Params) -> Box<dyn DriveMode> {
    match params.drive_mode {
        DriveModeKind::Tank => Box::new(TankDrive),
        DriveModeKind::Arcade => Box::new(ArcadeDrive::new(params.arcade))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
