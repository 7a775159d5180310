//! Parameters structure for the endgame timer

use serde::Deserialize;

/// Parameters for the endgame timer.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Time after the start of driver control at which the reminder fires.
    ///
    /// Units: milliseconds
    pub reminder_ms: u64,

    /// Period of the motor health checks after the reminder.
    ///
    /// Units: milliseconds
    pub health_check_period_ms: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            reminder_ms: 85_000,
            health_check_period_ms: 60_000
        }
    }
}
