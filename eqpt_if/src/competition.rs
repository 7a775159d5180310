//! # Competition control interface
//!
//! The field control system tells the robot which phase of the match it is
//! in. The exec polls the notifier every cycle and calls its autonomous and
//! driver control entry points on the transitions.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The phases of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    /// Robot is powered but not allowed to move, before the match or between
    /// periods.
    Disabled,

    /// The autonomous period.
    Autonomous,

    /// The driver control period.
    DriverControl
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Source of the current match phase.
pub trait MatchPhaseNotifier {
    /// Get the phase the match is currently in.
    fn phase(&self) -> MatchPhase;
}

impl Default for MatchPhase {
    fn default() -> Self {
        MatchPhase::Disabled
    }
}
