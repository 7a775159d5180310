//! # Robot Executable Parameters
//!
//! This module provide parameters for the robot executable itself, rather
//! than any one module.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::time::Duration;
use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct BotExecParams {

    /// Target period of one exec cycle, which is also the lift control tick.
    ///
    /// Units: milliseconds
    pub cycle_period_ms: u64,

    /// Longest the inertial sensor may spend calibrating before it is treated
    /// as failed.
    ///
    /// Units: milliseconds
    pub gyro_timeout_ms: u64,

    /// Number of motors the robot should report.
    pub expected_motor_count: usize,

    /// Motors at or above this temperature are reported to the driver.
    ///
    /// Units: degrees Celsius
    pub overheat_temp_c: f64,
}

impl BotExecParams {
    pub fn cycle_period(&self) -> Duration {
        Duration::from_millis(self.cycle_period_ms)
    }
}

impl Default for BotExecParams {
    fn default() -> Self {
        Self {
            cycle_period_ms: 10,
            gyro_timeout_ms: 3000,
            expected_motor_count: 8,
            overheat_temp_c: 55.0
        }
    }
}
