//! Routine definitions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A named list of steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub name: String,

    #[serde(default)]
    pub steps: Vec<AutoStep>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A single step of a routine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AutoStep {
    /// Drive straight by a distance, waiting for the chassis to settle.
    Drive { distance_in: f64 },

    /// Turn to an absolute heading, waiting for the chassis to settle.
    Turn { heading_deg: f64 },

    /// Wait for a time.
    Wait { ms: u64 },

    /// Spin the intake at a voltage, zero coasts it to a stop. Does not wait.
    Intake { volts: f64 },

    /// Raise the lift, waiting for the move to finish.
    LiftUp,

    /// Lower the lift, waiting for the move to finish.
    LiftDown,
}

impl Routine {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
