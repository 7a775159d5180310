//! Implementations for the DriveCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::time::Duration;
use log::{info, trace};
use serde::Serialize;

// Internal
use super::{
    drive_mode_from_params, Arbiter, ButtonEdges, ButtonEvent, ButtonMap, 
    ControlOwner, DriveCtrlError, DriveMode, MacroSlot, Params, TeamColor
};
use crate::auto_exec::Routine;
use eqpt_if::eqpt::{
    chassis::{ChassisConstants, DriveCommand},
    controller::ControllerState
};
use util::{
    module::State,
    params,
    session::Session
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Driver control module state
#[derive(Debug)]
pub struct DriveCtrl {
    pub(crate) params: Params,

    /// Stick mapping selected by the parameters
    mode: Box<dyn DriveMode>,

    edges: ButtonEdges,

    /// Chassis control arbitration
    pub arbiter: Arbiter,

    team_color: TeamColor,

    report: StatusReport
}

/// Input data to Driver Control.
#[derive(Debug, Default, Clone)]
pub struct InputData {
    /// Current controller state
    pub controller: ControllerState,

    /// Whether this cycle is a driver control loop tick
    pub is_drive_tick: bool,

    /// Whether the match is in driver control
    pub driver_control: bool
}

/// Status report for DriveCtrl processing.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct StatusReport {
    /// Owner which suppressed the driver's command this tick
    pub suppressed_by: Option<ControlOwner>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for DriveCtrl {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = Option<DriveCommand>;
    type StatusReport = StatusReport;
    type ProcError = DriveCtrlError;

    /// Initialise the DriveCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, _session: &Session)
        -> Result<(), Self::InitError>
    {
        *self = Self::with_params(params::load(init_data)?);

        info!(
            "Driving in {:?} mode, playing for {:?}", 
            self.params.drive_mode, self.team_color
        );

        Ok(())
    }

    /// Produce the driver's drive command for this tick.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        self.report = StatusReport::default();

        if !input_data.driver_control || !input_data.is_drive_tick {
            return Ok((None, self.report))
        }

        if let Some(owner) = self.arbiter.owner() {
            self.report.suppressed_by = Some(owner);
            return Ok((None, self.report))
        }

        let cmd = self.mode.command(&input_data.controller);
        trace!("Drive command: {:?}", cmd);

        Ok((Some(cmd), self.report))
    }
}

impl DriveCtrl {
    /// Create a new driver control module from its parameters.
    pub fn with_params(params: Params) -> Self {
        Self {
            mode: drive_mode_from_params(&params),
            edges: ButtonEdges::default(),
            arbiter: Arbiter::new(Duration::from_millis(params.macro_timeout_ms)),
            team_color: params.initial_team_color,
            report: StatusReport::default(),
            params
        }
    }

    /// Get the button edges since the last call.
    pub fn button_events(&mut self, state: &ControllerState) -> Vec<ButtonEvent> {
        self.edges.update(state)
    }

    pub fn buttons(&self) -> &ButtonMap {
        &self.params.buttons
    }

    pub fn team_color(&self) -> TeamColor {
        self.team_color
    }

    /// Switch alliance, returning the new one.
    pub fn toggle_team_color(&mut self) -> TeamColor {
        self.team_color = self.team_color.toggled();
        info!("Team colour is now {:?}", self.team_color);
        self.team_color
    }

    /// The routine run by a macro button.
    pub fn macro_hook(&self, slot: MacroSlot) -> &Routine {
        match slot {
            MacroSlot::Mode => &self.params.macros.mode,
            MacroSlot::TeamColor => &self.params.macros.team_color
        }
    }

    /// Replace the routine run by a macro button.
    pub fn set_macro_hook(&mut self, slot: MacroSlot, routine: Routine) {
        match slot {
            MacroSlot::Mode => self.params.macros.mode = routine,
            MacroSlot::TeamColor => self.params.macros.team_color = routine
        }
    }

    pub fn intake_volts(&self) -> f64 {
        self.params.intake_volts
    }

    pub fn chassis_constants(&self) -> &ChassisConstants {
        &self.params.chassis
    }

    /// Number of exec cycles per driver control tick, at least one.
    pub fn cycles_per_tick(&self, cycle_period: Duration) -> u128 {
        let cycle_ms = cycle_period.as_millis().max(1);
        (self.params.drive_period_ms as u128 / cycle_ms).max(1)
    }
}

impl Default for DriveCtrl {
    fn default() -> Self {
        Self::with_params(Params::default())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::drive_ctrl::DriveModeKind;
    use eqpt_if::eqpt::controller::{Axis, Button};

    fn input(is_drive_tick: bool, driver_control: bool) -> InputData {
        let mut controller = ControllerState::default();
        controller.set_axis(Axis::Axis2, 60);
        controller.set_axis(Axis::Axis4, -20);

        InputData {
            controller,
            is_drive_tick,
            driver_control
        }
    }

    #[test]
    fn test_params_file() {
        let p: Params = util::params::load_from_path(
            concat!(env!("CARGO_MANIFEST_DIR"), "/../params/drive_ctrl.toml")
        ).unwrap();

        assert_eq!(p.drive_mode, DriveModeKind::Arcade);
        assert_eq!(p.drive_period_ms, 20);
        assert_eq!(p.buttons.intake, Button::L1);
        assert_eq!(p.buttons.hold, Button::R2);
        assert_eq!(p.chassis.turn_exit.timeout_ms, 1500);
        assert!(p.macros.mode.is_empty());
    }

    #[test]
    fn test_drive_only_on_ticks_in_driver_control() {
        let mut dc = DriveCtrl::default();

        assert_eq!(dc.proc(&input(false, true)).unwrap().0, None);
        assert_eq!(dc.proc(&input(true, false)).unwrap().0, None);

        let (cmd, _) = dc.proc(&input(true, true)).unwrap();
        match cmd {
            Some(DriveCommand::Arcade { forward, turn, .. }) => {
                assert_eq!(forward, 60.0);
                assert!((turn + 17.0).abs() < 1e-9);
            },
            c => panic!("Expected an arcade command, got {:?}", c)
        }
    }

    #[test]
    fn test_suppressed_while_exclusive() {
        let mut dc = DriveCtrl::default();
        let token = dc.arbiter
            .request(ControlOwner::Macro(MacroSlot::Mode), Duration::from_secs(0))
            .unwrap();

        let (cmd, rpt) = dc.proc(&input(true, true)).unwrap();
        assert_eq!(cmd, None);
        assert_eq!(rpt.suppressed_by, Some(ControlOwner::Macro(MacroSlot::Mode)));

        dc.arbiter.release(token).unwrap();
        assert!(dc.proc(&input(true, true)).unwrap().0.is_some());
    }

    #[test]
    fn test_team_color_and_ticks() {
        let mut dc = DriveCtrl::default();
        assert_eq!(dc.team_color(), TeamColor::Red);
        assert_eq!(dc.toggle_team_color(), TeamColor::Blue);
        assert_eq!(dc.toggle_team_color().display(), "red      ");

        assert_eq!(dc.cycles_per_tick(Duration::from_millis(10)), 2);
        assert_eq!(dc.cycles_per_tick(Duration::from_millis(50)), 1);
    }
}
