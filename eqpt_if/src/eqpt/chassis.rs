//! Drive chassis interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

use super::motor::{MotorHealth, StopMode};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Gains and limits of one of the chassis' motion controllers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidConstants {
    /// Limit on the controller output.
    ///
    /// Units: volts
    pub max_voltage: f64,

    pub k_p: f64,
    pub k_i: f64,
    pub k_d: f64,

    /// The error is only integrated while its magnitude is below this value.
    /// Zero integrates at all errors.
    pub integral_start: f64,
}

/// Conditions under which a motion is considered complete.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExitConditions {
    /// Error magnitude below which the motion may settle.
    pub settle_error: f64,

    /// How long the error must stay below `settle_error` to settle.
    ///
    /// Units: milliseconds
    pub settle_time_ms: u64,

    /// Time after which the motion is abandoned, zero disables the timeout.
    ///
    /// Units: milliseconds
    pub timeout_ms: u64,
}

/// All tuning constants of the chassis' motion controllers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChassisConstants {
    /// Drive distance controller, errors in inches.
    pub drive: PidConstants,

    /// Heading hold controller used while driving straight, errors in degrees.
    pub heading: PidConstants,

    /// Turn to heading controller, errors in degrees.
    pub turn: PidConstants,

    pub drive_exit: ExitConditions,
    pub turn_exit: ExitConditions,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A manual drive command, produced once per driver control tick.
///
/// All values are percentages in [-100, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveCommand {
    /// Independent left and right side demands.
    Tank {
        left: f64,
        right: f64
    },

    /// Forward and turn demands, mixed by the chassis. The steer bias sets
    /// how much of the turn demand is taken off the inner side.
    Arcade {
        forward: f64,
        turn: f64,
        steer_bias: f64
    }
}

/// A closed-loop motion executed by the chassis' own controllers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MotionTarget {
    /// Drive straight by the given distance, holding the current heading.
    DriveDistance {
        distance_in: f64
    },

    /// Turn on the spot to the given absolute heading.
    TurnToHeading {
        heading_deg: f64
    }
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A differential drive chassis.
pub trait MotionPlatform {
    /// Apply a manual drive command.
    fn drive(&mut self, cmd: DriveCommand);

    /// Stop all drive motors using the given mode, cancelling any motion.
    fn stop(&mut self, mode: StopMode);

    /// Set the chassis' notion of its current heading.
    fn set_heading(&mut self, heading_deg: f64);

    /// Apply motion controller tuning.
    fn configure(&mut self, constants: &ChassisConstants);

    /// Start a closed-loop motion. Any motion in progress is replaced.
    fn start_motion(&mut self, target: MotionTarget);

    /// Whether the last motion has finished (settled or timed out). True if
    /// no motion was ever started.
    fn motion_settled(&self) -> bool;

    /// Health of the drive motors.
    fn health(&self) -> Vec<MotorHealth>;
}
