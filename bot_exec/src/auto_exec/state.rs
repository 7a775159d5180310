//! Implementations for the AutoExec state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::time::Duration;
use log::{debug, info, warn};
use serde::Serialize;

// Internal
use super::{AutoExecError, AutoStep, Params, Routine};
use crate::{
    auto_sel::RoutineId,
    dems::IntakeDem,
    lift_ctrl::LiftRequest
};
use eqpt_if::eqpt::{chassis::MotionTarget, motor::StopMode};
use util::{
    module::State,
    params,
    session::Session
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Routine execution module state
#[derive(Debug, Default)]
pub struct AutoExec {
    pub(crate) params: Params,

    active: Option<ActiveRoutine>,

    report: StatusReport
}

#[derive(Debug)]
struct ActiveRoutine {
    routine: Routine,

    /// Index of the current step
    step_idx: usize,

    /// Whether the current step's demand has been issued
    issued: bool,

    /// Time the current step was issued
    step_started_at: Duration
}

/// Input data to AutoExec.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputData {
    /// Current exec time
    pub now: Duration,

    /// Whether the chassis has finished its last motion
    pub motion_settled: bool,

    /// Whether the lift is moving
    pub lift_moving: bool,

    /// Whether a heading sensor is available for turns
    pub heading_available: bool
}

/// Demands from the current step.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct OutputData {
    pub motion: Option<MotionTarget>,
    pub intake: Option<IntakeDem>,
    pub lift: Option<LiftRequest>
}

/// Status report for AutoExec processing.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct StatusReport {
    /// Index of the step being executed
    pub step_idx: Option<usize>,

    /// A step was skipped this cycle
    pub step_skipped: bool,

    /// The routine finished this cycle
    pub finished: bool
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for AutoExec {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = AutoExecError;

    /// Initialise the AutoExec module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, _session: &Session)
        -> Result<(), Self::InitError>
    {
        self.params = params::load(init_data)?;
        self.active = None;

        info!(
            "{} autonomous routines loaded: {:?}", 
            self.params.routines.len(), 
            self.params.routine_names()
        );

        Ok(())
    }

    /// Advance the active routine.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        self.report = StatusReport::default();
        let mut output = OutputData::default();

        let active = match self.active.as_mut() {
            Some(a) => a,
            None => return Ok((output, self.report))
        };

        // Check if the current step is complete
        if active.issued {
            let done = match active.routine.steps[active.step_idx] {
                AutoStep::Drive { .. } | AutoStep::Turn { .. } => input_data.motion_settled,
                AutoStep::Wait { ms } => input_data.now
                    .checked_sub(active.step_started_at)
                    .unwrap_or_default() >= Duration::from_millis(ms),
                AutoStep::LiftUp | AutoStep::LiftDown => !input_data.lift_moving,
                AutoStep::Intake { .. } => true
            };

            if !done {
                self.report.step_idx = Some(active.step_idx);
                return Ok((output, self.report))
            }

            active.step_idx += 1;
            active.issued = false;
        }

        // Issue the next step
        let step = match active.routine.steps.get(active.step_idx) {
            Some(s) => *s,
            None => {
                info!("Routine \"{}\" complete", active.routine.name);
                self.active = None;
                self.report.finished = true;
                return Ok((output, self.report))
            }
        };

        debug!(
            "Routine \"{}\" step {}: {:?}", 
            active.routine.name, active.step_idx, step
        );

        match step {
            AutoStep::Drive { distance_in } => {
                output.motion = Some(MotionTarget::DriveDistance { distance_in })
            },
            AutoStep::Turn { heading_deg } => {
                if !input_data.heading_available {
                    warn!(
                        "No heading sensor, skipping turn to {:.1} deg", 
                        heading_deg
                    );
                    self.report.step_skipped = true;
                    self.report.step_idx = Some(active.step_idx);
                    active.step_idx += 1;
                    return Ok((output, self.report))
                }
                output.motion = Some(MotionTarget::TurnToHeading { heading_deg })
            },
            AutoStep::Wait { .. } => (),
            AutoStep::Intake { volts } => {
                output.intake = Some(match volts {
                    v if v == 0f64 => IntakeDem::Stop(StopMode::Coast),
                    v => IntakeDem::Spin { volts: v }
                })
            },
            AutoStep::LiftUp => output.lift = Some(LiftRequest::Raise),
            AutoStep::LiftDown => output.lift = Some(LiftRequest::Lower),
        }

        active.issued = true;
        active.step_started_at = input_data.now;
        self.report.step_idx = Some(active.step_idx);

        Ok((output, self.report))
    }
}

impl AutoExec {
    /// Create a new executor from its parameters.
    pub fn with_params(params: Params) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    /// Names of the autonomous routines in menu order.
    pub fn routine_names(&self) -> Vec<String> {
        self.params.routine_names()
    }

    /// Look up a routine by its selector id.
    pub fn routine(&self, id: RoutineId) -> Result<&Routine, AutoExecError> {
        match id {
            RoutineId::CustomTest => Ok(&self.params.custom_test),
            RoutineId::Listed(i) => self.params.routines
                .get(i)
                .ok_or(AutoExecError::UnknownRoutine(i))
        }
    }

    /// Start running a routine, replacing any active one.
    pub fn start(&mut self, routine: Routine) {
        if let Some(a) = self.active.take() {
            warn!("Routine \"{}\" replaced by \"{}\"", a.routine.name, routine.name);
        }

        info!(
            "Starting routine \"{}\" ({} steps)", 
            routine.name, routine.steps.len()
        );

        self.active = Some(ActiveRoutine {
            routine,
            step_idx: 0,
            issued: false,
            step_started_at: Duration::default()
        });
    }

    /// Start running a routine by its selector id.
    pub fn start_by_id(&mut self, id: RoutineId) -> Result<(), AutoExecError> {
        let routine = self.routine(id)?.clone();
        self.start(routine);

        Ok(())
    }

    /// Stop the active routine. Returns true if one was running.
    pub fn abort(&mut self) -> bool {
        match self.active.take() {
            Some(a) => {
                warn!(
                    "Routine \"{}\" aborted at step {}", 
                    a.routine.name, a.step_idx
                );
                true
            },
            None => false
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn ms(t: u64) -> Duration {
        Duration::from_millis(t)
    }

    fn input(now: u64, motion_settled: bool, lift_moving: bool) -> InputData {
        InputData {
            now: ms(now),
            motion_settled,
            lift_moving,
            heading_available: true
        }
    }

    fn routine(steps: Vec<AutoStep>) -> Routine {
        Routine {
            name: String::from("test"),
            steps
        }
    }

    #[test]
    fn test_params_file() {
        let p: Params = util::params::load_from_path(
            concat!(env!("CARGO_MANIFEST_DIR"), "/../params/auto_exec.toml")
        ).unwrap();

        assert!(p.routines.len() > 0);
        assert_eq!(p.custom_test.name, "custom test");
        assert!(p.routine_names().iter().all(|n| n.len() > 0));
    }

    #[test]
    fn test_steps_run_in_order() {
        let mut ae = AutoExec::default();
        ae.start(routine(vec![
            AutoStep::Drive { distance_in: 24.0 },
            AutoStep::Intake { volts: 12.0 },
            AutoStep::LiftUp,
            AutoStep::Wait { ms: 100 },
            AutoStep::Intake { volts: 0.0 }
        ]));
        assert!(ae.is_running());

        // Drive issued, then waits for the chassis
        let (o, _) = ae.proc(&input(0, true, false)).unwrap();
        assert_eq!(o.motion, Some(MotionTarget::DriveDistance { distance_in: 24.0 }));
        let (o, r) = ae.proc(&input(10, false, false)).unwrap();
        assert!(o.motion.is_none());
        assert_eq!(r.step_idx, Some(0));

        // Settled, intake issued and done straight away
        let (o, _) = ae.proc(&input(20, true, false)).unwrap();
        assert_eq!(o.intake, Some(IntakeDem::Spin { volts: 12.0 }));
        let (o, _) = ae.proc(&input(30, true, false)).unwrap();
        assert_eq!(o.lift, Some(LiftRequest::Raise));

        // Waits for the lift
        let (o, r) = ae.proc(&input(40, true, true)).unwrap();
        assert!(o.lift.is_none());
        assert_eq!(r.step_idx, Some(2));

        // Wait step
        ae.proc(&input(50, true, false)).unwrap();
        let (_, r) = ae.proc(&input(140, true, false)).unwrap();
        assert_eq!(r.step_idx, Some(3));
        let (o, _) = ae.proc(&input(150, true, false)).unwrap();
        assert_eq!(o.intake, Some(IntakeDem::Stop(StopMode::Coast)));

        let (_, r) = ae.proc(&input(160, true, false)).unwrap();
        assert!(r.finished);
        assert!(!ae.is_running());
    }

    #[test]
    fn test_turn_skipped_without_heading() {
        let mut ae = AutoExec::default();
        ae.start(routine(vec![
            AutoStep::Turn { heading_deg: 90.0 },
            AutoStep::Drive { distance_in: 12.0 },
        ]));

        let mut i = input(0, true, false);
        i.heading_available = false;

        let (o, r) = ae.proc(&i).unwrap();
        assert!(r.step_skipped);
        assert!(o.motion.is_none());

        let (o, _) = ae.proc(&i).unwrap();
        assert_eq!(o.motion, Some(MotionTarget::DriveDistance { distance_in: 12.0 }));
    }

    #[test]
    fn test_empty_routine_finishes() {
        let mut ae = AutoExec::default();
        ae.start(routine(vec![]));
        let (_, r) = ae.proc(&input(0, true, false)).unwrap();
        assert!(r.finished);
        assert!(!ae.is_running());
    }

    #[test]
    fn test_abort_and_lookup() {
        let mut ae = AutoExec::with_params(Params {
            routines: vec![routine(vec![AutoStep::Wait { ms: 1000 }])],
            custom_test: Routine {
                name: String::from("custom test"),
                steps: vec![]
            }
        });

        assert!(matches!(
            ae.start_by_id(RoutineId::Listed(3)), 
            Err(AutoExecError::UnknownRoutine(3))
        ));
        assert!(!ae.is_running());

        ae.start_by_id(RoutineId::Listed(0)).unwrap();
        ae.proc(&input(0, true, false)).unwrap();
        assert!(ae.abort());
        assert!(!ae.abort());

        assert_eq!(ae.routine(RoutineId::CustomTest).unwrap().name, "custom test");
    }
}
