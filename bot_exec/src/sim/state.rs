//! Physical state of the simulated robot

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::time::Duration;
use log::{debug, trace};

// Internal
use super::Params;
use crate::{ctrl::{PidController, PidStatus}, drive_ctrl};
use eqpt_if::{
    competition::MatchPhase,
    eqpt::{
        brain::Font,
        chassis::{ChassisConstants, DriveCommand, MotionTarget, PidConstants},
        controller::{ControllerState, InputEvent, Rumble},
        motor::{MotorHealth, StopMode}
    }
};
use util::maths::{clamp, clamp_abs, rem_euclid, wrap_180};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Everything about the simulated world, shared between the devices.
#[derive(Debug)]
pub(crate) struct SimState {
    pub params: Params,

    /// Time since power on
    pub time: Duration,

    /// Forces the match phase, ignoring the match schedule
    pub phase_override: Option<MatchPhase>,

    pub chassis: ChassisSim,
    pub intake: MotorSim,
    pub lift: LiftSim,
    pub motors: Vec<MotorHealth>,

    /// Distance to whatever is in front of the arm detector
    pub arm_distance_in: f64,
    pub arm_distance_changed: Option<f64>,

    pub controller: ControllerState,
    pub rumbles: Vec<Rumble>,
    pub controller_prints: Vec<String>,

    pub screen_pressing: bool,
    pub brain_font: Font,
    pub brain_prints: Vec<String>,
}

#[derive(Debug)]
pub(crate) struct ChassisSim {
    pub constants: ChassisConstants,

    /// Side demands
    ///
    /// Units: percent
    pub left_pct: f64,
    pub right_pct: f64,

    pub stop_mode: Option<StopMode>,
    pub last_drive: Option<DriveCommand>,
    pub motion: Option<ActiveMotion>,
    pub last_motion_status: Option<PidStatus>,

    /// Distance travelled
    ///
    /// Units: inches
    pub odometer_in: f64,

    /// True heading
    ///
    /// Units: degrees
    pub heading_deg: f64,

    /// Chassis heading minus true heading, set by `set_heading`
    ///
    /// Units: degrees
    pub heading_offset_deg: f64,
}

#[derive(Debug)]
pub(crate) struct ActiveMotion {
    pub target: MotionTarget,
    pub setpoint: f64,
    pub pid: PidController
}

#[derive(Debug, Default)]
pub(crate) struct MotorSim {
    pub volts: f64,
    pub stop_mode: Option<StopMode>
}

#[derive(Debug)]
pub(crate) struct LiftSim {
    pub motor: MotorSim,

    /// Physical angle of the lift
    ///
    /// Units: degrees
    pub angle_deg: f64,

    /// Sensor position minus physical angle, set when the sensor is rebased
    ///
    /// Units: degrees
    pub position_offset_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimState {
    pub fn new(params: Params) -> Self {
        let mut ports = params.drive_ports.clone();
        ports.push(params.intake_port);
        ports.push(params.lift_port);

        let motors = ports
            .into_iter()
            .map(|port| MotorHealth { 
                port, 
                installed: true, 
                temperature_c: params.motor_temp_c 
            })
            .collect();

        Self {
            time: Duration::default(),
            phase_override: None,
            chassis: ChassisSim {
                constants: drive_ctrl::Params::default().chassis,
                left_pct: 0.0,
                right_pct: 0.0,
                stop_mode: None,
                last_drive: None,
                motion: None,
                last_motion_status: None,
                odometer_in: 0.0,
                heading_deg: params.start_heading_deg,
                heading_offset_deg: 0.0
            },
            intake: MotorSim::default(),
            lift: LiftSim {
                motor: MotorSim::default(),
                angle_deg: params.lift_start_deg,
                position_offset_deg: 0.0
            },
            motors,
            arm_distance_in: f64::INFINITY,
            arm_distance_changed: None,
            controller: ControllerState::default(),
            rumbles: vec![],
            controller_prints: vec![],
            screen_pressing: false,
            brain_font: Font::MonoMedium,
            brain_prints: vec![],
            params
        }
    }

    /// Phase of the match at the current time.
    pub fn phase(&self) -> MatchPhase {
        if let Some(p) = self.phase_override {
            return p
        }

        let t = self.time.as_secs_f64();
        let auto_start = self.params.pre_match_s;
        let driver_start = auto_start + self.params.autonomous_s;
        let match_end = driver_start + self.params.driver_control_s;

        if t < auto_start {
            MatchPhase::Disabled
        }
        else if t < driver_start {
            MatchPhase::Autonomous
        }
        else if t < match_end {
            MatchPhase::DriverControl
        }
        else {
            MatchPhase::Disabled
        }
    }

    /// Whether the whole match has been played.
    pub fn match_over(&self) -> bool {
        self.time.as_secs_f64() >= self.params.pre_match_s 
            + self.params.autonomous_s 
            + self.params.driver_control_s
    }

    pub fn gyro_calibrating(&self) -> bool {
        self.time.as_secs_f64() < self.params.gyro_calibration_s
    }

    pub fn motor_health(&self, ports: &[u8]) -> Vec<MotorHealth> {
        self.motors
            .iter()
            .filter(|m| ports.contains(&m.port))
            .copied()
            .collect()
    }

    pub fn set_arm_distance(&mut self, distance_in: f64) {
        if distance_in != self.arm_distance_in {
            self.arm_distance_in = distance_in;
            self.arm_distance_changed = Some(distance_in);
        }
    }

    /// Apply an input event from a script.
    pub fn apply_event(&mut self, event: &InputEvent) {
        trace!("Sim input: {:?}", event);

        match *event {
            InputEvent::Press { button } => {
                self.controller.pressed.insert(button);
            },
            InputEvent::Release { button } => {
                self.controller.pressed.remove(&button);
            },
            InputEvent::Axis { axis, value } => self.controller.set_axis(axis, value),
            InputEvent::ScreenPress => self.screen_pressing = true,
            InputEvent::ScreenRelease => self.screen_pressing = false,
            InputEvent::Distance { distance_in } => 
                self.set_arm_distance(distance_in.unwrap_or(f64::INFINITY))
        }
    }

    /// Advance the simulation by `dt`.
    pub fn step(&mut self, dt: Duration) {
        self.time += dt;
        let dt_s = dt.as_secs_f64();

        // Lift, held or coasting lifts don't move
        if self.lift.motor.stop_mode.is_none() {
            self.lift.angle_deg += self.lift.motor.volts 
                * self.params.lift_rate_deg_s_per_v 
                * dt_s;
        }

        self.step_motion();

        // Chassis kinematics
        let (left_pct, right_pct) = match self.chassis.stop_mode {
            Some(_) => (0.0, 0.0),
            None => (self.chassis.left_pct, self.chassis.right_pct)
        };
        let v_left = left_pct / 100.0 * self.params.max_drive_speed_in_s;
        let v_right = right_pct / 100.0 * self.params.max_drive_speed_in_s;

        self.chassis.odometer_in += 0.5 * (v_left + v_right) * dt_s;
        self.chassis.heading_deg = rem_euclid(
            self.chassis.heading_deg 
                + ((v_left - v_right) / self.params.track_width_in).to_degrees() * dt_s,
            360.0
        );
    }

    /// Run the chassis' motion controller for one step.
    fn step_motion(&mut self) {
        let now = self.time;
        let chassis_heading = self.chassis.chassis_heading_deg();
        let odometer_in = self.chassis.odometer_in;

        let motion = match self.chassis.motion.as_mut() {
            Some(m) => m,
            None => return
        };

        let (error, max_voltage) = match motion.target {
            MotionTarget::DriveDistance { .. } => (
                motion.setpoint - odometer_in,
                self.chassis.constants.drive.max_voltage
            ),
            MotionTarget::TurnToHeading { .. } => (
                wrap_180(motion.setpoint - chassis_heading),
                self.chassis.constants.turn.max_voltage
            )
        };

        let volts = clamp_abs(motion.pid.compute(error, now), max_voltage);
        let pct = clamp(volts / 12.0 * 100.0, -100.0, 100.0);

        match motion.target {
            MotionTarget::DriveDistance { .. } => {
                self.chassis.left_pct = pct;
                self.chassis.right_pct = pct;
            },
            MotionTarget::TurnToHeading { .. } => {
                self.chassis.left_pct = pct;
                self.chassis.right_pct = -pct;
            }
        }

        if motion.pid.is_done() {
            let status = motion.pid.status();
            debug!("Sim chassis {:?} finished: {:?}", motion.target, status);

            self.chassis.last_motion_status = Some(status);
            self.chassis.motion = None;
            self.chassis.left_pct = 0.0;
            self.chassis.right_pct = 0.0;
        }
    }
}

impl ChassisSim {
    /// Heading as the chassis believes it to be.
    pub fn chassis_heading_deg(&self) -> f64 {
        rem_euclid(self.heading_deg + self.heading_offset_deg, 360.0)
    }

    pub fn drive(&mut self, cmd: DriveCommand) {
        let (left, right) = match cmd {
            DriveCommand::Tank { left, right } => (left, right),
            DriveCommand::Arcade { forward, turn, steer_bias } => (
                forward + turn * (1.0 - steer_bias),
                forward - turn * steer_bias
            )
        };

        self.motion = None;
        self.stop_mode = None;
        self.left_pct = clamp(left, -100.0, 100.0);
        self.right_pct = clamp(right, -100.0, 100.0);
        self.last_drive = Some(cmd);
    }

    pub fn stop(&mut self, mode: StopMode) {
        self.motion = None;
        self.stop_mode = Some(mode);
        self.left_pct = 0.0;
        self.right_pct = 0.0;
    }

    pub fn start_motion(&mut self, target: MotionTarget, now: Duration) {
        let (setpoint, constants, exit) = match target {
            MotionTarget::DriveDistance { distance_in } => (
                self.odometer_in + distance_in,
                self.constants.drive,
                self.constants.drive_exit
            ),
            MotionTarget::TurnToHeading { heading_deg } => (
                heading_deg,
                self.constants.turn,
                self.constants.turn_exit
            )
        };

        // The simulated drivetrain responds instantly, so only the
        // proportional gain is used.
        let gains = PidConstants {
            k_i: 0.0,
            k_d: 0.0,
            ..constants
        };

        self.stop_mode = None;
        self.motion = Some(ActiveMotion {
            target,
            setpoint,
            pid: PidController::new(setpoint, &gains, &exit, now)
        });
    }
}
