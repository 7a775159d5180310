//! # Equipment Interface
//!
//! This module defines the traits implemented by the robot's equipment and
//! the structures passed through them.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod brain;
pub mod chassis;
pub mod controller;
pub mod motor;
pub mod sensor;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use crate::competition::MatchPhaseNotifier;
use brain::BrainScreen;
use chassis::MotionPlatform;
use controller::Controller;
use motor::{Actuator, MotorHealth};
use sensor::{HeadingSensor, PositionSensor, ProximitySensor};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// All equipment on the robot.
///
/// Constructed once at start-up and passed by reference to the exec.
pub struct Eqpt {
    /// The drive chassis, including its motion (drive/turn to target) controller.
    pub chassis: Box<dyn MotionPlatform>,

    /// The intake motor.
    pub intake: Box<dyn Actuator>,

    /// The lift motor.
    pub lift: Box<dyn Actuator>,

    /// Rotation sensor on the lift pivot.
    pub lift_sensor: Box<dyn PositionSensor>,

    /// Distance sensor used to detect the arm in front of the robot.
    pub arm_detector: Box<dyn ProximitySensor>,

    /// Inertial sensor providing the robot heading.
    pub inertial: Box<dyn HeadingSensor>,

    /// The driver's controller.
    pub controller: Box<dyn Controller>,

    /// The brain's touch screen.
    pub brain: Box<dyn BrainScreen>,

    /// The field control system.
    pub competition: Box<dyn MatchPhaseNotifier>,
}

impl Eqpt {
    /// Get the health of every motor on the robot.
    pub fn motor_health(&self) -> Vec<MotorHealth> {
        let mut health = self.chassis.health();
        health.extend(self.intake.health());
        health.extend(self.lift.health());
        health
    }
}
