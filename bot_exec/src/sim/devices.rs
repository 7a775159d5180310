//! Simulated equipment
//!
//! Each device is a thin view onto the shared [`SimState`].

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::{cell::RefCell, rc::Rc};
use log::trace;

// Internal
use super::state::{MotorSim, SimState};
use eqpt_if::{
    competition::{MatchPhase, MatchPhaseNotifier},
    eqpt::{
        brain::{BrainScreen, Font},
        chassis::{ChassisConstants, DriveCommand, MotionPlatform, MotionTarget},
        controller::{Controller, ControllerState, Rumble},
        motor::{Actuator, Direction, MotorHealth, SpinUnits, StopMode},
        sensor::{HeadingSensor, PositionSensor, ProximitySensor}
    }
};
use util::maths::rem_euclid;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

pub(crate) type Shared = Rc<RefCell<SimState>>;

pub(crate) struct SimChassis(pub Shared);

/// Which of the single motor actuators a [`SimMotor`] drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MotorId {
    Intake,
    Lift
}

pub(crate) struct SimMotor(pub Shared, pub MotorId);

pub(crate) struct SimLiftSensor(pub Shared);

pub(crate) struct SimArmDetector(pub Shared);

pub(crate) struct SimInertial(pub Shared);

pub(crate) struct SimController(pub Shared);

pub(crate) struct SimBrain(pub Shared);

pub(crate) struct SimCompetition(pub Shared);

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MotionPlatform for SimChassis {
    fn drive(&mut self, cmd: DriveCommand) {
        self.0.borrow_mut().chassis.drive(cmd);
    }

    fn stop(&mut self, mode: StopMode) {
        self.0.borrow_mut().chassis.stop(mode);
    }

    fn set_heading(&mut self, heading_deg: f64) {
        let mut state = self.0.borrow_mut();
        state.chassis.heading_offset_deg = heading_deg - state.chassis.heading_deg;
    }

    fn configure(&mut self, constants: &ChassisConstants) {
        self.0.borrow_mut().chassis.constants = *constants;
    }

    fn start_motion(&mut self, target: MotionTarget) {
        let mut state = self.0.borrow_mut();
        let now = state.time;
        state.chassis.start_motion(target, now);
    }

    fn motion_settled(&self) -> bool {
        self.0.borrow().chassis.motion.is_none()
    }

    fn health(&self) -> Vec<MotorHealth> {
        let state = self.0.borrow();
        state.motor_health(&state.params.drive_ports)
    }
}

impl SimMotor {
    fn port(&self, state: &SimState) -> u8 {
        match self.1 {
            MotorId::Intake => state.params.intake_port,
            MotorId::Lift => state.params.lift_port
        }
    }
}

impl Actuator for SimMotor {
    fn spin(&mut self, direction: Direction, magnitude: f64, units: SpinUnits) {
        let volts = match units {
            SpinUnits::Volt => magnitude,
            SpinUnits::Percent => magnitude / 100.0 * 12.0
        };
        let volts = match direction {
            Direction::Forward => volts,
            Direction::Reverse => -volts
        };

        let mut state = self.0.borrow_mut();
        let motor = motor_mut(&mut state, self.1);
        motor.volts = volts;
        motor.stop_mode = None;
    }

    fn stop(&mut self, mode: StopMode) {
        let mut state = self.0.borrow_mut();
        let motor = motor_mut(&mut state, self.1);
        motor.volts = 0.0;
        motor.stop_mode = Some(mode);
    }

    fn is_spinning(&self) -> bool {
        let state = self.0.borrow();
        let motor = match self.1 {
            MotorId::Intake => &state.intake,
            MotorId::Lift => &state.lift.motor
        };
        motor.stop_mode.is_none() && motor.volts != 0.0
    }

    fn health(&self) -> Vec<MotorHealth> {
        let state = self.0.borrow();
        state.motor_health(&[self.port(&state)])
    }
}

impl PositionSensor for SimLiftSensor {
    fn angle_deg(&self) -> f64 {
        rem_euclid(self.0.borrow().lift.angle_deg, 360.0)
    }

    fn position_deg(&self) -> f64 {
        let state = self.0.borrow();
        state.lift.angle_deg + state.lift.position_offset_deg
    }

    fn set_position_deg(&mut self, position_deg: f64) {
        let mut state = self.0.borrow_mut();
        state.lift.position_offset_deg = position_deg - state.lift.angle_deg;
    }
}

impl ProximitySensor for SimArmDetector {
    fn distance_in(&self) -> f64 {
        self.0.borrow().arm_distance_in
    }

    fn take_change(&mut self) -> Option<f64> {
        self.0.borrow_mut().arm_distance_changed.take()
    }
}

impl HeadingSensor for SimInertial {
    fn installed(&self) -> bool {
        self.0.borrow().params.gyro_installed
    }

    fn is_calibrating(&self) -> bool {
        let state = self.0.borrow();
        state.params.gyro_installed && state.gyro_calibrating()
    }

    fn heading_deg(&self) -> f64 {
        self.0.borrow().chassis.heading_deg
    }
}

impl Controller for SimController {
    fn state(&self) -> ControllerState {
        self.0.borrow().controller.clone()
    }

    fn rumble(&mut self, pattern: Rumble) {
        trace!("Controller rumble \"{}\"", pattern.pattern());
        self.0.borrow_mut().rumbles.push(pattern);
    }

    fn print(&mut self, text: &str) {
        trace!("Controller print \"{}\"", text);
        self.0.borrow_mut().controller_prints.push(text.to_string());
    }
}

impl BrainScreen for SimBrain {
    fn clear(&mut self) {
        self.0.borrow_mut().brain_prints.clear();
    }

    fn print_at(&mut self, row: u8, col: u8, text: &str) {
        trace!("Brain print at ({}, {}) \"{}\"", row, col, text);
        self.0.borrow_mut().brain_prints.push(text.to_string());
    }

    fn set_font(&mut self, font: Font) {
        self.0.borrow_mut().brain_font = font;
    }

    fn pressing(&self) -> bool {
        self.0.borrow().screen_pressing
    }
}

impl MatchPhaseNotifier for SimCompetition {
    fn phase(&self) -> MatchPhase {
        self.0.borrow().phase()
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn motor_mut(state: &mut SimState, id: MotorId) -> &mut MotorSim {
    match id {
        MotorId::Intake => &mut state.intake,
        MotorId::Lift => &mut state.lift.motor
    }
}
