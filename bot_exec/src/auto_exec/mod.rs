//! Routine execution module
//!
//! Runs autonomous routines, the custom test routine and driver macros. A
//! routine is a list of steps executed one after the other, each step
//! waiting for the chassis, the lift or the clock before the next starts.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod routine;
mod state;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use routine::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during AutoExec operation.
#[derive(Debug, thiserror::Error)]
pub enum AutoExecError {
    #[error("No routine at menu index {0}")]
    UnknownRoutine(usize),
}
