//! # Robot library.
//!
//! This library allows other crates in the workspace (and the integration
//! tests) to access items defined inside the robot crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Routine execution module - runs autonomous routines, test runs and macros step by step
pub mod auto_exec;

/// Autonomous selection module - the pre-match menu and test mode
pub mod auto_sel;

/// Controllers - the PID loop used by the lift and the simulated chassis
pub mod ctrl;

/// Global data store
pub mod data_store;

/// Equipment demands produced each cycle
pub mod dems;

/// Driver control module - drive modes, button edges and chassis arbitration
pub mod drive_ctrl;

/// Endgame timer - reminds the driver of the endgame and checks the motors
pub mod endgame;

/// Exec cycle
pub mod exec;

/// Operator feedback - rumble and text for the driver
pub mod feedback;

/// Motor health checks
pub mod health;

/// Lift control module - moves the lift between its setpoints
pub mod lift_ctrl;

/// Executable parameters
pub mod params;

/// Pre-autonomous setup - gyro calibration, motor check and chassis reset
pub mod pre_auton;

/// Simulated robot and match
pub mod sim;

mod button_processor;
