//! Driver control module
//!
//! Turns the driver's sticks into drive commands using the configured drive
//! mode, detects button edges, and arbitrates control of the chassis between
//! the driver and automatic owners (autonomous, test runs, macros, chassis
//! hold).

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod arbiter;
mod buttons;
mod drive_mode;
mod params;
mod state;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use arbiter::*;
pub use buttons::*;
pub use drive_mode::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The alliance the robot is playing for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamColor {
    Red,
    Blue
}

/// Possible errors that can occur in driver control.
#[derive(Debug, thiserror::Error)]
pub enum DriveCtrlError {
    #[error("Chassis control is held by {0:?}")]
    Busy(ControlOwner),

    #[error("The control token of {0:?} is no longer valid")]
    StaleToken(ControlOwner),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TeamColor {
    /// The other alliance.
    pub fn toggled(self) -> Self {
        match self {
            TeamColor::Red => TeamColor::Blue,
            TeamColor::Blue => TeamColor::Red
        }
    }

    /// Text shown to the driver, padded to overwrite the previous colour.
    pub fn display(self) -> &'static str {
        match self {
            TeamColor::Red => "red      ",
            TeamColor::Blue => "blue      "
        }
    }
}

impl Default for TeamColor {
    fn default() -> Self {
        TeamColor::Red
    }
}
