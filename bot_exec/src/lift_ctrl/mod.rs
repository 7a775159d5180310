//! Lift control module
//!
//! Drives the lift between its lowered and raised setpoints with a fresh PID
//! loop per move, and raises it automatically when the arm detector sees an
//! arm in front of the robot.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during LiftCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum LiftCtrlError {
    #[error("A lift move or settle delay is in progress, toggle ignored")]
    Busy,

    #[error("The lift rotation sensor returned an invalid angle ({0})")]
    InvalidAngle(f64),
}
