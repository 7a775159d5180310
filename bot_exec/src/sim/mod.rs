//! # Simulated robot
//!
//! Provides an [`Eqpt`] backed by a simple simulation of the robot and the
//! match, used by the executable and the integration tests. All devices share
//! one simulated world, which is advanced by [`SimRobot::step`] once per exec
//! cycle.
//!
//! The simulation is crude: motors respond instantly, the lift
//! moves at a speed proportional to its voltage and the chassis runs its
//! motions with a proportional controller.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod devices;
mod params;
mod state;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use params::*;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::{cell::RefCell, rc::Rc, time::Duration};

// Internal
use devices::*;
use state::SimState;
use crate::ctrl::PidStatus;
use eqpt_if::{
    competition::MatchPhase,
    eqpt::{
        Eqpt,
        brain::Font,
        chassis::DriveCommand,
        controller::{Axis, Button, InputEvent, Rumble},
        motor::StopMode
    }
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Handle onto the simulated world, used to advance it, inject inputs and
/// inspect what the robot did.
pub struct SimRobot {
    state: Rc<RefCell<SimState>>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimRobot {
    /// Create a new simulated robot, returning the handle and the equipment
    /// to give to the exec.
    pub fn new(params: Params) -> (Self, Eqpt) {
        let state = Rc::new(RefCell::new(SimState::new(params)));

        let eqpt = Eqpt {
            chassis: Box::new(SimChassis(state.clone())),
            intake: Box::new(SimMotor(state.clone(), MotorId::Intake)),
            lift: Box::new(SimMotor(state.clone(), MotorId::Lift)),
            lift_sensor: Box::new(SimLiftSensor(state.clone())),
            arm_detector: Box::new(SimArmDetector(state.clone())),
            inertial: Box::new(SimInertial(state.clone())),
            controller: Box::new(SimController(state.clone())),
            brain: Box::new(SimBrain(state.clone())),
            competition: Box::new(SimCompetition(state.clone())),
        };

        (Self { state }, eqpt)
    }

    /// Advance the world by `dt`.
    pub fn step(&self, dt: Duration) {
        self.state.borrow_mut().step(dt);
    }

    /// Time since power on.
    pub fn time(&self) -> Duration {
        self.state.borrow().time
    }

    /// Whether the whole match has been played.
    pub fn match_over(&self) -> bool {
        self.state.borrow().match_over()
    }

    pub fn phase(&self) -> MatchPhase {
        self.state.borrow().phase()
    }

    /// Force the match phase, `None` returns to the match schedule.
    pub fn set_phase_override(&self, phase: Option<MatchPhase>) {
        self.state.borrow_mut().phase_override = phase;
    }

    // ---- INPUTS ----

    pub fn apply_event(&self, event: &InputEvent) {
        self.state.borrow_mut().apply_event(event);
    }

    pub fn press(&self, button: Button) {
        self.apply_event(&InputEvent::Press { button });
    }

    pub fn release(&self, button: Button) {
        self.apply_event(&InputEvent::Release { button });
    }

    pub fn set_axis(&self, axis: Axis, value: i32) {
        self.apply_event(&InputEvent::Axis { axis, value });
    }

    pub fn set_screen_pressing(&self, pressing: bool) {
        self.apply_event(&match pressing {
            true => InputEvent::ScreenPress,
            false => InputEvent::ScreenRelease
        });
    }

    /// Set the arm detector reading, infinite when nothing is in range.
    pub fn set_arm_distance(&self, distance_in: f64) {
        self.state.borrow_mut().set_arm_distance(distance_in);
    }

    /// Unplug or plug in the motor on a port.
    pub fn set_motor_installed(&self, port: u8, installed: bool) {
        let mut state = self.state.borrow_mut();
        for m in state.motors.iter_mut().filter(|m| m.port == port) {
            m.installed = installed;
        }
    }

    pub fn set_motor_temperature(&self, port: u8, temperature_c: f64) {
        let mut state = self.state.borrow_mut();
        for m in state.motors.iter_mut().filter(|m| m.port == port) {
            m.temperature_c = temperature_c;
        }
    }

    // ---- OUTPUTS ----

    /// Physical angle of the lift.
    pub fn lift_angle_deg(&self) -> f64 {
        self.state.borrow().lift.angle_deg
    }

    pub fn lift_stop_mode(&self) -> Option<StopMode> {
        self.state.borrow().lift.motor.stop_mode
    }

    pub fn intake_volts(&self) -> f64 {
        self.state.borrow().intake.volts
    }

    /// Distance travelled by the chassis.
    pub fn odometer_in(&self) -> f64 {
        self.state.borrow().chassis.odometer_in
    }

    /// True heading of the chassis.
    pub fn heading_deg(&self) -> f64 {
        self.state.borrow().chassis.heading_deg
    }

    pub fn last_drive(&self) -> Option<DriveCommand> {
        self.state.borrow().chassis.last_drive
    }

    pub fn chassis_stop_mode(&self) -> Option<StopMode> {
        self.state.borrow().chassis.stop_mode
    }

    /// Outcome of the last chassis motion.
    pub fn last_motion_status(&self) -> Option<PidStatus> {
        self.state.borrow().chassis.last_motion_status
    }

    pub fn rumbles(&self) -> Vec<Rumble> {
        self.state.borrow().rumbles.clone()
    }

    pub fn controller_prints(&self) -> Vec<String> {
        self.state.borrow().controller_prints.clone()
    }

    /// Text printed on the brain screen since it was last cleared.
    pub fn brain_prints(&self) -> Vec<String> {
        self.state.borrow().brain_prints.clone()
    }

    pub fn brain_font(&self) -> Font {
        self.state.borrow().brain_font
    }
}
