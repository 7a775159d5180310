//! Endgame timer module
//!
//! Reminds the driver when the endgame starts, then periodically checks the
//! motors for the rest of the match. Driven by the exec clock so it never
//! blocks the cycle, and cancelled at the end of the match.

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

/// Text shown on the controller when the endgame starts.
pub const ENDGAME_REMINDER_TEXT: &str = "end game ...";
