//! Parameters structure for AutoSel

use serde::Deserialize;

/// Parameters for autonomous selection.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Test mode can only be armed within this time of power on.
    ///
    /// Units: seconds
    pub test_mode_window_s: f64,

    /// Selection shown when the menu opens, -1 is the custom test routine.
    pub initial_selection: i32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            test_mode_window_s: 5.0,
            initial_selection: 0
        }
    }
}
