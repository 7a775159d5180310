//! Parameters structure for AutoExec

use serde::Deserialize;

use super::Routine;

/// Parameters for routine execution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Params {
    /// Autonomous routines in menu order.
    pub routines: Vec<Routine>,

    /// Routine run when the custom test entry is selected.
    pub custom_test: Routine,
}

impl Params {
    /// Names of the routines in menu order.
    pub fn routine_names(&self) -> Vec<String> {
        self.routines.iter().map(|r| r.name.clone()).collect()
    }
}
