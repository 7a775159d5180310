//! Autonomous selection module
//!
//! Lets the drive team pick the autonomous routine before the match from a
//! menu on the brain screen, and run routines on demand in test mode.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod menu;
mod params;
mod state;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use menu::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Selection index of the custom test routine.
pub const CUSTOM_TEST_SELECTION: i32 = -1;

/// Menu label of the custom test routine.
pub const CUSTOM_TEST_LABEL: &str = "custom test";
