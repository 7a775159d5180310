//! Motor (actuator) interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Health of a single motor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorHealth {
    /// The smart port the motor is plugged into.
    pub port: u8,

    /// Whether the motor is currently detected on its port.
    pub installed: bool,

    /// Internal temperature of the motor.
    ///
    /// Units: degrees Celsius
    pub temperature_c: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Behaviour of a motor when it is stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopMode {
    /// Remove power and let the motor spin freely.
    Coast,

    /// Short the windings to slow the motor quickly.
    Brake,

    /// Actively hold the current position.
    Hold
}

/// Spin direction of a motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Reverse
}

/// Units of a spin magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinUnits {
    /// Volts, in the range [0, 12].
    Volt,

    /// Percentage of maximum velocity, in the range [0, 100].
    Percent
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A motor or group of motors acting together.
pub trait Actuator {
    /// Spin the motor in the given direction.
    fn spin(&mut self, direction: Direction, magnitude: f64, units: SpinUnits);

    /// Stop the motor using the given mode.
    fn stop(&mut self, mode: StopMode);

    /// Whether the motor is currently being driven.
    fn is_spinning(&self) -> bool;

    /// Health of every motor making up this actuator.
    fn health(&self) -> Vec<MotorHealth>;

    /// Spin using a signed voltage, negative voltages spin in reverse.
    fn spin_volts(&mut self, volts: f64) {
        let direction = if volts < 0.0 {
            Direction::Reverse
        } else {
            Direction::Forward
        };

        self.spin(direction, volts.abs(), SpinUnits::Volt)
    }
}
