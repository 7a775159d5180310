//! Implementations for the LiftCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::time::Duration;
use log::{debug, info, trace, warn};
use serde::Serialize;

// Internal
use super::{LiftCtrlError, Params};
use crate::ctrl::{PidController, PidStatus};
use eqpt_if::eqpt::motor::StopMode;
use util::{
    maths::clamp_abs,
    module::State,
    params,
    session::Session
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Lift control module state
#[derive(Default)]
pub struct LiftCtrl {
    pub(crate) params: Params,

    /// Last commanded discrete position, set when a move is commanded.
    is_raised: bool,

    motion: LiftMotion,

    report: StatusReport,
}

/// A move to one of the setpoints.
#[derive(Debug)]
struct LiftMove {
    position: LiftPosition,
    pid: PidController,
    from_toggle: bool
}

/// Input data to Lift Control.
#[derive(Debug, Default, Clone)]
pub struct InputData {
    /// Current exec time
    pub now: Duration,

    /// Current lift rotation sensor position.
    ///
    /// Units: degrees
    pub angle_deg: f64,

    /// New arm detector reading if it changed this cycle.
    ///
    /// Units: inches
    pub proximity_in: Option<f64>,

    /// Request from the driver or a routine, if any.
    pub request: Option<LiftRequest>
}

/// Status report for LiftCtrl processing.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct StatusReport {
    /// Last commanded discrete position
    pub is_raised: bool,

    /// Position currently being moved to
    pub moving_to: Option<LiftPosition>,

    /// Outcome of a move that completed this cycle
    pub completed: Option<PidStatus>,

    /// A toggle request was rejected because the lift was busy
    pub toggle_rejected: bool,

    /// The arm detector started a raise this cycle
    pub proximity_triggered: bool
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Discrete lift positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LiftPosition {
    Up,
    Down
}

/// Requests which can be made of the lift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LiftRequest {
    Raise,
    Lower,
    Toggle
}

/// Demand on the lift motor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum OutputData {
    /// Leave the motor as it is
    None,

    /// Drive the motor with the given voltage
    Spin { volts: f64 },

    /// Stop the motor
    Stop(StopMode)
}

#[derive(Debug)]
enum LiftMotion {
    Idle,
    Moving(LiftMove),
    Settling { until: Duration }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for LiftCtrl {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = LiftCtrlError;

    /// Initialise the LiftCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, _session: &Session)
        -> Result<(), Self::InitError>
    {
        *self = Self::with_params(params::load(init_data)?);

        Ok(())
    }

    /// Perform cyclic processing of Lift Control.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let now = input_data.now;

        // Clear the status report
        self.report = StatusReport::default();

        // Handle new requests
        match input_data.request {
            Some(LiftRequest::Raise) => self.raise(now),
            Some(LiftRequest::Lower) => self.lower(now),
            Some(LiftRequest::Toggle) => {
                if let Err(e) = self.toggle(now) {
                    debug!("{}", e);
                    self.report.toggle_rejected = true;
                }
            },
            None => ()
        }

        if let Some(distance_in) = input_data.proximity_in {
            self.report.proximity_triggered = self.on_proximity(distance_in, now);
        }

        // Without a position there's nothing to control against, so drop
        // the move.
        if self.is_moving() && !input_data.angle_deg.is_finite() {
            self.motion = LiftMotion::Idle;
            return Err(LiftCtrlError::InvalidAngle(input_data.angle_deg))
        }

        // Tick the position loop
        let mut next_motion = None;
        let output = match self.motion {
            LiftMotion::Moving(ref mut mv) => {
                let error = mv.pid.target() - input_data.angle_deg;
                let volts = clamp_abs(
                    mv.pid.compute(error, now), 
                    self.params.pid.max_voltage
                );

                trace!(
                    "LiftCtrl {:?}: error {:.2} deg, demand {:.2} V", 
                    mv.position, error, volts
                );

                match mv.pid.status() {
                    PidStatus::Running => OutputData::Spin { volts },
                    status => {
                        if status == PidStatus::TimedOut {
                            warn!(
                                "Lift move to {:?} timed out with {:.1} deg error, holding",
                                mv.position, error
                            );
                        }
                        else {
                            debug!("Lift settled at {:?}", mv.position);
                        }

                        self.report.completed = Some(status);

                        next_motion = Some(match mv.from_toggle {
                            true => LiftMotion::Settling { 
                                until: now + Duration::from_millis(self.params.toggle_settle_ms) 
                            },
                            false => LiftMotion::Idle
                        });

                        OutputData::Stop(StopMode::Hold)
                    }
                }
            },
            LiftMotion::Settling { until } => {
                if now >= until {
                    next_motion = Some(LiftMotion::Idle);
                }
                OutputData::None
            },
            LiftMotion::Idle => OutputData::None
        };

        if let Some(m) = next_motion {
            self.motion = m;
        }

        self.report.is_raised = self.is_raised;
        self.report.moving_to = match self.motion {
            LiftMotion::Moving(ref mv) => Some(mv.position),
            _ => None
        };

        Ok((output, self.report))
    }
}

impl LiftCtrl {
    /// Create a new lift controller from its parameters.
    pub fn with_params(params: Params) -> Self {
        Self {
            is_raised: params.initially_raised,
            params,
            motion: LiftMotion::Idle,
            report: StatusReport::default()
        }
    }

    /// Move the lift to the raised setpoint.
    pub fn raise(&mut self, now: Duration) {
        self.start_move(LiftPosition::Up, now, false);
    }

    /// Move the lift to the lowered setpoint.
    pub fn lower(&mut self, now: Duration) {
        self.start_move(LiftPosition::Down, now, false);
    }

    /// Move the lift to the opposite of its last commanded position.
    ///
    /// Rejected while a move, or the settle delay after a toggled move, is in
    /// progress.
    pub fn toggle(&mut self, now: Duration) -> Result<(), LiftCtrlError> {
        if self.is_busy() {
            return Err(LiftCtrlError::Busy)
        }

        let position = match self.is_raised {
            true => LiftPosition::Down,
            false => LiftPosition::Up
        };
        self.start_move(position, now, true);

        Ok(())
    }

    /// Handle a new arm detector reading.
    ///
    /// Returns true if the reading started a raise.
    pub fn on_proximity(&mut self, distance_in: f64, now: Duration) -> bool {
        if distance_in < self.params.proximity_trigger_in
            && !self.is_raised
            && !self.is_moving()
        {
            info!("Arm detected at {:.2} in, raising lift", distance_in);
            self.raise(now);
            true
        }
        else {
            false
        }
    }

    /// Last commanded discrete position.
    pub fn is_raised(&self) -> bool {
        self.is_raised
    }

    /// True while a move is in progress.
    pub fn is_moving(&self) -> bool {
        matches!(self.motion, LiftMotion::Moving(_))
    }

    /// True while a move or a post-toggle settle delay is in progress.
    pub fn is_busy(&self) -> bool {
        !matches!(self.motion, LiftMotion::Idle)
    }

    fn start_move(&mut self, position: LiftPosition, now: Duration, from_toggle: bool) {
        if let LiftMotion::Moving(ref mv) = self.motion {
            if mv.position == position {
                debug!("Lift already moving to {:?}", position);
                return
            }
        }

        let target = match position {
            LiftPosition::Up => self.params.up_angle_deg,
            LiftPosition::Down => self.params.down_angle_deg
        };

        debug!("Lift moving to {:?} ({:.1} deg)", position, target);

        self.is_raised = position == LiftPosition::Up;
        self.motion = LiftMotion::Moving(LiftMove {
            position,
            pid: PidController::new(target, &self.params.pid, &self.params.exit, now),
            from_toggle
        });
    }
}

impl Default for LiftMotion {
    fn default() -> Self {
        LiftMotion::Idle
    }
}

impl Default for OutputData {
    fn default() -> Self {
        OutputData::None
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
