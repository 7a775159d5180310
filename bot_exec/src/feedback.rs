//! # Operator feedback
//!
//! Modules queue feedback for the driver (controller rumble and text, brain
//! screen text) in the data store during a cycle, and the exec sends it all
//! to the equipment at the end of the cycle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;

// Internal
use eqpt_if::eqpt::{
    Eqpt,
    brain::Font,
    controller::Rumble
};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A single piece of operator feedback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Feedback {
    Rumble(Rumble),
    ControllerPrint(String),
    BrainClear,
    BrainFont(Font),
    BrainPrint {
        row: u8,
        col: u8,
        text: String
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Send all queued feedback to the equipment, emptying the queue.
pub fn flush(queue: &mut Vec<Feedback>, eqpt: &mut Eqpt) {
    for fb in queue.drain(..) {
        trace!("Feedback: {:?}", fb);

        match fb {
            Feedback::Rumble(r) => eqpt.controller.rumble(r),
            Feedback::ControllerPrint(t) => eqpt.controller.print(&t),
            Feedback::BrainClear => eqpt.brain.clear(),
            Feedback::BrainFont(f) => eqpt.brain.set_font(f),
            Feedback::BrainPrint { row, col, text } => eqpt.brain.print_at(row, col, &text)
        }
    }
}
