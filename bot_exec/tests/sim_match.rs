//! # Simulated match tests
//!
//! Runs the exec cycle against the simulated robot.

use std::time::Duration;

use bot_lib::{
    auto_exec::{self, AutoExec, AutoStep, Routine},
    auto_sel::{self, AutoSel, SelectorState},
    data_store::{DataStore, PreAutonState},
    drive_ctrl::{self, ControlOwner, DriveCtrl, MacroSlot, TeamColor},
    endgame::{self, EndgameTimer, TimerState},
    exec,
    sim::{self, SimRobot}
};
use eqpt_if::{
    competition::MatchPhase,
    eqpt::{
        Eqpt,
        brain::Font,
        chassis::DriveCommand,
        controller::{Axis, Button, Rumble},
        motor::StopMode
    }
};

const CYCLE: Duration = Duration::from_millis(10);

struct Harness {
    ds: DataStore,
    eqpt: Eqpt,
    sim: SimRobot
}

impl Harness {
    fn new(sim_params: sim::Params) -> Self {
        let (sim, mut eqpt) = SimRobot::new(sim_params);
        exec::init(&mut eqpt);

        let mut ds = DataStore::default();
        ds.auto_exec = AutoExec::with_params(auto_exec::Params {
            routines: vec![
                Routine {
                    name: "forward".into(),
                    steps: vec![
                        AutoStep::Drive { distance_in: 24.0 },
                        AutoStep::LiftUp
                    ]
                },
                Routine {
                    name: "turn".into(),
                    steps: vec![AutoStep::Turn { heading_deg: 90.0 }]
                }
            ],
            custom_test: Routine {
                name: "custom test".into(),
                steps: vec![
                    AutoStep::LiftUp,
                    AutoStep::Wait { ms: 200 },
                    AutoStep::LiftDown
                ]
            }
        });
        ds.auto_sel = AutoSel::new(ds.auto_exec.routine_names(), auto_sel::Params::default());

        Self { ds, eqpt, sim }
    }

    /// A harness where the field puts the robot straight into driver control.
    fn driver_control() -> Self {
        let h = Self::new(sim::Params::default());
        h.sim.set_phase_override(Some(MatchPhase::DriverControl));
        h
    }

    /// Run cycles until the simulation reaches `t_s`.
    fn run_until(&mut self, t_s: f64) {
        while self.sim.time().as_secs_f64() < t_s {
            self.sim.step(CYCLE);
            let now = self.sim.time();
            exec::cycle(&mut self.ds, &mut self.eqpt, now);
        }
    }

    fn run_for(&mut self, dur_s: f64) {
        let until = self.sim.time().as_secs_f64() + dur_s;
        self.run_until(until);
    }

    fn tap(&mut self, button: Button) {
        self.sim.press(button);
        self.run_for(0.05);
        self.sim.release(button);
        self.run_for(0.05);
    }
}

#[test]
fn test_pre_auton_shows_menu() {
    let mut h = Harness::new(sim::Params::default());

    h.run_until(1.0);
    assert_eq!(h.ds.pre_auton, PreAutonState::GyroSetup);
    assert!(h.sim.brain_prints().is_empty());

    h.run_until(2.5);
    assert_eq!(h.ds.pre_auton, PreAutonState::Ready);
    assert!(h.ds.heading_available);
    assert!(h.sim.rumbles().contains(&Rumble::Long));
    assert_eq!(h.sim.brain_prints(), vec![String::from("forward")]);
    assert_eq!(h.sim.brain_font(), Font::MonoExtraLarge);
    assert_eq!(h.sim.controller_prints().last().map(|s| s.as_str()), Some("forward"));

    // Releasing the brain screen cycles the selection
    h.sim.set_screen_pressing(true);
    h.run_for(0.05);
    assert_eq!(h.ds.auto_sel.selection(), 0);
    h.sim.set_screen_pressing(false);
    h.run_for(0.05);
    assert_eq!(h.ds.auto_sel.selection(), 1);
    assert_eq!(h.sim.brain_prints(), vec![String::from("turn")]);
    assert_eq!(h.sim.rumbles().last(), Some(&Rumble::Short));
}

#[test]
fn test_gyro_failure_degrades() {
    let mut h = Harness::new(sim::Params {
        gyro_installed: false,
        ..sim::Params::default()
    });

    h.run_until(0.1);
    assert_eq!(h.ds.pre_auton, PreAutonState::Ready);
    assert!(!h.ds.heading_available);
    assert!(h.sim.controller_prints().contains(&String::from("inertial sensor failure")));
    assert!(h.sim.rumbles().contains(&Rumble::Alarm));
}

#[test]
fn test_turns_skipped_without_gyro() {
    let mut h = Harness::new(sim::Params {
        gyro_installed: false,
        ..sim::Params::default()
    });

    h.run_until(0.1);
    h.sim.set_screen_pressing(true);
    h.run_for(0.05);
    h.sim.set_screen_pressing(false);
    h.run_for(0.05);
    assert_eq!(h.ds.auto_sel.label(), "turn");

    // Autonomous starts at 6 s, the only step is a turn which is skipped
    h.run_until(6.5);
    assert!(!h.ds.auto_exec.is_running());
    assert!(h.ds.drive_ctrl.arbiter.is_manual());
    assert!(h.sim.heading_deg().abs() < 1e-9);
}

#[test]
fn test_autonomous_runs_selected_routine() {
    let mut h = Harness::new(sim::Params::default());

    // The driver's sticks do nothing in autonomous
    h.sim.set_axis(Axis::Axis2, 100);

    h.run_until(6.05);
    assert_eq!(h.ds.phase, MatchPhase::Autonomous);
    assert_eq!(h.ds.auto_sel.state(), SelectorState::Running);
    assert_eq!(h.ds.drive_ctrl.arbiter.owner(), Some(ControlOwner::Autonomous));

    h.run_until(10.0);
    assert!(!h.ds.auto_exec.is_running());
    assert!(h.ds.drive_ctrl.arbiter.is_manual());
    assert!((h.sim.odometer_in() - 24.0).abs() < 1.5);
    assert!((h.sim.lift_angle_deg() - 240.0).abs() < 5.0);
    assert!(h.ds.lift_ctrl.is_raised());
    assert_eq!(h.sim.last_drive(), None);

    // Driver control takes over at 21 s
    h.run_until(21.5);
    assert_eq!(h.ds.phase, MatchPhase::DriverControl);
    assert_eq!(h.ds.auto_sel.state(), SelectorState::Running);
    assert!(matches!(h.ds.endgame.state(), TimerState::Waiting { .. }));
    assert!(matches!(
        h.sim.last_drive(),
        Some(DriveCommand::Arcade { forward, .. }) if forward == 100.0
    ));
}

#[test]
fn test_autonomous_takes_chassis_from_held_button() {
    let mut h = Harness::new(sim::Params::default());

    // Driver holds the chassis before the match starts
    h.run_until(5.5);
    h.sim.press(Button::R2);
    h.run_for(0.1);
    assert_eq!(h.ds.drive_ctrl.arbiter.owner(), Some(ControlOwner::HoldChassis));

    // Still held when the autonomous period starts at 6 s
    h.run_until(6.05);
    assert_eq!(h.ds.phase, MatchPhase::Autonomous);
    assert_eq!(h.ds.drive_ctrl.arbiter.owner(), Some(ControlOwner::Autonomous));
    assert!(h.ds.auto_exec.is_running());
    assert_eq!(h.ds.num_rejected_requests, 0);

    // Driver buttons do nothing in autonomous
    h.sim.press(Button::L1);
    h.run_for(0.1);
    assert_eq!(h.sim.intake_volts(), 0.0);
    h.sim.release(Button::R2);
    h.run_for(0.1);
    assert_eq!(h.ds.drive_ctrl.arbiter.owner(), Some(ControlOwner::Autonomous));

    h.run_until(10.0);
    assert!(!h.ds.auto_exec.is_running());
    assert!(h.ds.drive_ctrl.arbiter.is_manual());
    assert!((h.sim.odometer_in() - 24.0).abs() < 1.5);
    assert!(h.ds.lift_ctrl.is_raised());
    assert_eq!(h.sim.intake_volts(), 0.0);
}

#[test]
fn test_driver_control_and_hold() {
    let mut h = Harness::driver_control();

    h.sim.set_axis(Axis::Axis2, 60);
    h.run_until(0.1);
    assert_eq!(
        h.sim.last_drive(),
        Some(DriveCommand::Arcade { forward: 60.0, turn: 0.0, steer_bias: 0.5 })
    );

    // Holding takes the chassis from the driver
    h.sim.press(Button::R2);
    h.run_for(0.2);
    assert_eq!(h.ds.drive_ctrl.arbiter.owner(), Some(ControlOwner::HoldChassis));
    assert_eq!(h.sim.chassis_stop_mode(), Some(StopMode::Hold));
    assert_eq!(h.sim.rumbles().last(), Some(&Rumble::Short));

    h.sim.release(Button::R2);
    h.run_for(0.1);
    assert!(h.ds.drive_ctrl.arbiter.is_manual());
    assert_eq!(h.sim.chassis_stop_mode(), None);
}

#[test]
fn test_intake_and_team_color() {
    let mut h = Harness::driver_control();
    h.run_until(0.1);

    // Without the intake running the button runs the (empty) macro
    h.tap(Button::B);
    assert_eq!(h.ds.drive_ctrl.team_color(), TeamColor::Red);
    assert!(h.ds.drive_ctrl.arbiter.is_manual());

    h.sim.press(Button::L1);
    h.run_for(0.05);
    assert_eq!(h.sim.intake_volts(), 12.0);

    h.tap(Button::B);
    assert_eq!(h.ds.drive_ctrl.team_color(), TeamColor::Blue);
    assert_eq!(h.sim.controller_prints().last().map(|s| s.as_str()), Some("blue      "));
    assert_eq!(h.sim.rumbles().last(), Some(&Rumble::Long));

    h.sim.release(Button::L1);
    h.run_for(0.05);
    assert_eq!(h.sim.intake_volts(), 0.0);
}

#[test]
fn test_lift_toggle_and_arm_detection() {
    let mut h = Harness::driver_control();
    h.run_until(0.1);

    h.tap(Button::R1);
    h.run_for(1.5);
    assert!(h.ds.lift_ctrl.is_raised());
    assert!((h.sim.lift_angle_deg() - 240.0).abs() < 5.0);
    assert_eq!(h.sim.lift_stop_mode(), Some(StopMode::Hold));

    h.tap(Button::R1);
    h.run_for(1.5);
    assert!(!h.ds.lift_ctrl.is_raised());
    assert!((h.sim.lift_angle_deg() - 40.0).abs() < 5.0);

    // Something far away does nothing, an arm in front raises the lift
    h.sim.set_arm_distance(6.0);
    h.run_for(0.5);
    assert!(!h.ds.lift_ctrl.is_raised());

    h.sim.set_arm_distance(0.5);
    h.run_for(1.5);
    assert!(h.ds.lift_ctrl.is_raised());
    assert!((h.sim.lift_angle_deg() - 240.0).abs() < 5.0);
    assert_eq!(h.ds.num_lift_timeouts, 0);
}

#[test]
fn test_lift_toggle_rejected_while_busy() {
    let mut h = Harness::driver_control();
    h.run_until(0.1);

    h.tap(Button::R1);
    h.tap(Button::R1);
    h.run_for(1.5);

    // The second toggle came mid move and was dropped
    assert!(h.ds.lift_ctrl.is_raised());
    assert!((h.sim.lift_angle_deg() - 240.0).abs() < 5.0);
}

#[test]
fn test_macro_suppresses_driver_until_revoked() {
    let mut h = Harness::driver_control();
    h.ds.drive_ctrl.set_macro_hook(MacroSlot::Mode, Routine {
        name: "stuck".into(),
        steps: vec![AutoStep::Wait { ms: 60_000 }]
    });

    h.run_until(0.5);
    h.tap(Button::Right);
    assert_eq!(
        h.ds.drive_ctrl.arbiter.owner(),
        Some(ControlOwner::Macro(MacroSlot::Mode))
    );

    // The driver's last command was made before the macro started
    h.sim.set_axis(Axis::Axis2, 50);
    h.run_until(10.0);
    assert!(matches!(
        h.sim.last_drive(),
        Some(DriveCommand::Arcade { forward, .. }) if forward == 0.0
    ));

    // Revoked after holding the chassis for 15 s
    h.run_until(16.0);
    assert!(h.ds.drive_ctrl.arbiter.is_manual());
    assert_eq!(h.ds.drive_ctrl.arbiter.num_revoked(), 1);
    assert!(!h.ds.auto_exec.is_running());
    assert!(h.sim.controller_prints().contains(&String::from("macro timeout")));
    assert!(h.sim.rumbles().contains(&Rumble::Alarm));
    assert!(matches!(
        h.sim.last_drive(),
        Some(DriveCommand::Arcade { forward, .. }) if forward == 50.0
    ));
}

#[test]
fn test_test_mode_runs_custom_test() {
    let mut h = Harness::new(sim::Params::default());
    h.ds.auto_sel = AutoSel::new(h.ds.auto_exec.routine_names(), auto_sel::Params {
        initial_selection: -1,
        ..auto_sel::Params::default()
    });

    h.run_until(1.0);
    h.tap(Button::Right);
    assert!(h.ds.auto_sel.is_test_mode());
    assert_eq!(h.sim.rumbles(), vec![Rumble::Long]);

    h.run_until(3.0);
    h.tap(Button::A);
    assert_eq!(h.ds.drive_ctrl.arbiter.owner(), Some(ControlOwner::TestRoutine));

    h.run_until(3.5);
    assert!(h.sim.lift_angle_deg() > 200.0);

    h.run_until(5.5);
    assert!(!h.ds.auto_exec.is_running());
    assert!(h.ds.drive_ctrl.arbiter.is_manual());
    assert!((h.sim.lift_angle_deg() - 40.0).abs() < 5.0);

    // Cycling in test mode moves on to the listed routines
    h.tap(Button::Right);
    assert_eq!(h.ds.auto_sel.label(), "forward");
}

#[test]
fn test_test_mode_window_closes() {
    let mut h = Harness::new(sim::Params::default());

    h.run_until(5.5);
    h.tap(Button::Right);
    assert!(!h.ds.auto_sel.is_test_mode());
    assert!(h.ds.drive_ctrl.arbiter.is_manual());
}

#[test]
fn test_endgame_reminder_and_health_checks() {
    let mut h = Harness::driver_control();
    h.ds.endgame = EndgameTimer::with_params(endgame::Params {
        reminder_ms: 3000,
        health_check_period_ms: 1000
    });

    h.run_until(2.5);
    assert_eq!(h.ds.num_motor_faults, 0);
    assert!(!h.sim.controller_prints().contains(&String::from("end game ...")));

    h.sim.set_motor_installed(3, false);
    h.run_until(3.5);
    assert!(h.sim.controller_prints().contains(&String::from("end game ...")));
    assert_eq!(h.ds.num_motor_faults, 0);

    h.run_until(4.5);
    assert_eq!(h.ds.num_motor_faults, 1);
    assert!(h.sim.controller_prints().contains(&String::from("motor 3 unplugged")));
    assert!(h.sim.rumbles().contains(&Rumble::Alarm));

    // The end of the match stops the checks
    h.sim.set_phase_override(Some(MatchPhase::Disabled));
    h.run_for(3.0);
    assert_eq!(h.ds.endgame.state(), TimerState::Cancelled);
    assert_eq!(h.ds.num_motor_faults, 1);
}

#[test]
fn test_full_match_summary() {
    let mut h = Harness::new(sim::Params {
        pre_match_s: 2.5,
        autonomous_s: 3.0,
        driver_control_s: 2.0,
        ..sim::Params::default()
    });
    h.ds.drive_ctrl = DriveCtrl::with_params(drive_ctrl::Params {
        initial_team_color: TeamColor::Blue,
        ..drive_ctrl::Params::default()
    });

    while !h.sim.match_over() {
        h.run_for(0.1);
    }
    h.run_for(0.1);

    let summary = h.ds.summary();
    assert_eq!(summary.final_phase, MatchPhase::Disabled);
    assert_eq!(summary.team_color, TeamColor::Blue);
    assert_eq!(summary.selected_routine, "forward");
    assert!(summary.heading_available);
    assert_eq!(h.ds.endgame.state(), TimerState::Cancelled);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["team_color"], "blue");
    assert_eq!(json["num_cycles"].as_u64(), Some(h.ds.num_cycles as u64));
}
