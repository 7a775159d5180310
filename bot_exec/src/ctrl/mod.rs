//! Closed-loop controllers shared by the robot's subsystems

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod pid;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use pid::*;
