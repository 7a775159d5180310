//! Autonomous selection state machine

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::time::Duration;
use log::{debug, info};
use serde::Serialize;

// Internal
use super::{Params, CUSTOM_TEST_LABEL, CUSTOM_TEST_SELECTION};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Autonomous selector.
#[derive(Debug)]
pub struct AutoSel {
    params: Params,

    /// Names of the selectable routines, in menu order.
    names: Vec<String>,

    state: SelectorState,

    /// Index into `names`, or `CUSTOM_TEST_SELECTION`.
    selection: i32,

    exit_menu_requested: bool
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// States of the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectorState {
    /// Menu closed by the start of driver control, nothing selectable.
    Idle,

    /// Pre-match menu open, the brain screen cycles the selection.
    MenuBrowsing,

    /// Test mode has just been armed.
    TestModeArmed,

    /// Test mode, the driver cycles and runs routines from the controller.
    TestModeBrowsing,

    /// The autonomous period has started with the selected routine.
    Running
}

/// Identifies a routine to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoutineId {
    /// A routine from the menu, by index.
    Listed(usize),

    /// The custom test routine.
    CustomTest
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AutoSel {
    /// Create a new selector over the given routine names.
    pub fn new(names: Vec<String>, params: Params) -> Self {
        let max = names.len() as i32 - 1;
        let selection = if params.initial_selection > max {
            max
        }
        else {
            params.initial_selection.max(CUSTOM_TEST_SELECTION)
        };

        Self {
            params,
            names,
            state: SelectorState::MenuBrowsing,
            selection,
            exit_menu_requested: false
        }
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    pub fn selection(&self) -> i32 {
        self.selection
    }

    /// True once the menu should stop reacting to the brain screen.
    pub fn exit_menu_requested(&self) -> bool {
        self.exit_menu_requested
    }

    pub fn is_test_mode(&self) -> bool {
        matches!(
            self.state, 
            SelectorState::TestModeArmed | SelectorState::TestModeBrowsing
        )
    }

    /// The routine currently selected.
    pub fn selected_routine(&self) -> RoutineId {
        if self.selection < 0 {
            RoutineId::CustomTest
        }
        else {
            RoutineId::Listed(self.selection as usize)
        }
    }

    /// The menu label of the current selection.
    pub fn label(&self) -> &str {
        match self.selected_routine() {
            RoutineId::CustomTest => CUSTOM_TEST_LABEL,
            RoutineId::Listed(i) => match self.names.get(i) {
                Some(n) => n.as_str(),
                None => CUSTOM_TEST_LABEL
            }
        }
    }

    /// Advance to the next routine, wrapping to the first.
    ///
    /// Only valid while browsing, returns true if the selection changed.
    pub fn cycle(&mut self) -> bool {
        if !matches!(
            self.state, 
            SelectorState::MenuBrowsing | SelectorState::TestModeBrowsing
        ) {
            debug!("Selection cycle ignored in {:?}", self.state);
            return false
        }

        if self.names.is_empty() {
            debug!("No routines to cycle through");
            return false
        }

        self.selection = (self.selection + 1).rem_euclid(self.names.len() as i32);
        debug!("Selected {} ({})", self.selection, self.label());

        true
    }

    /// Arm test mode.
    ///
    /// Only allowed within the test mode window after power on, from the
    /// menu. Returns true if test mode was armed.
    pub fn arm_test_mode(&mut self, now: Duration) -> bool {
        if self.state != SelectorState::MenuBrowsing {
            return false
        }
        if now.as_secs_f64() >= self.params.test_mode_window_s {
            return false
        }

        self.state = SelectorState::TestModeArmed;
        info!("Test mode armed");
        self.state = SelectorState::TestModeBrowsing;

        true
    }

    /// Start the autonomous period, closing the menu.
    ///
    /// Returns the routine to run, or `None` if autonomous has already been
    /// started.
    pub fn start_autonomous_period(&mut self) -> Option<RoutineId> {
        if self.state == SelectorState::Running {
            return None
        }

        self.state = SelectorState::Running;
        self.exit_menu_requested = true;

        info!("Autonomous period started with \"{}\"", self.label());

        Some(self.selected_routine())
    }

    /// Get the routine to run immediately in test mode.
    pub fn run_test_now(&self) -> Option<RoutineId> {
        match self.state {
            SelectorState::TestModeBrowsing => Some(self.selected_routine()),
            _ => None
        }
    }

    /// Close the menu at the start of driver control.
    ///
    /// Test mode stays active so routines can still be run during practice.
    pub fn enter_driver_control(&mut self) {
        self.exit_menu_requested = true;

        if self.state == SelectorState::MenuBrowsing {
            self.state = SelectorState::Idle;
        }
    }
}

impl Default for AutoSel {
    fn default() -> Self {
        Self::new(vec![], Params::default())
    }
}

impl Default for SelectorState {
    fn default() -> Self {
        SelectorState::MenuBrowsing
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("routine {}", i)).collect()
    }

    #[test]
    fn test_cycle_wraps() {
        let mut sel = AutoSel::new(names(3), Params::default());
        assert_eq!(sel.state(), SelectorState::MenuBrowsing);
        assert_eq!(sel.selection(), 0);

        let mut seen = vec![];
        for _ in 0..4 {
            assert!(sel.cycle());
            seen.push(sel.selection());
        }
        assert_eq!(seen, vec![1, 2, 0, 1]);
    }

    #[test]
    fn test_custom_test_entry() {
        let mut sel = AutoSel::new(names(3), Params {
            initial_selection: -1,
            ..Params::default()
        });
        assert_eq!(sel.label(), "custom test");
        assert_eq!(sel.selected_routine(), RoutineId::CustomTest);

        assert!(sel.cycle());
        assert_eq!(sel.selection(), 0);
        assert_eq!(sel.label(), "routine 0");
    }

    #[test]
    fn test_initial_selection_is_bounded() {
        let sel = AutoSel::new(names(3), Params {
            initial_selection: 7,
            ..Params::default()
        });
        assert_eq!(sel.selection(), 2);

        let sel = AutoSel::new(names(3), Params {
            initial_selection: -4,
            ..Params::default()
        });
        assert_eq!(sel.selection(), -1);
    }

    #[test]
    fn test_no_routines() {
        let mut sel = AutoSel::new(vec![], Params::default());
        assert_eq!(sel.selection(), -1);
        assert!(!sel.cycle());
        assert_eq!(sel.start_autonomous_period(), Some(RoutineId::CustomTest));
    }

    #[test]
    fn test_arm_test_mode_window() {
        let mut sel = AutoSel::new(names(3), Params::default());
        assert!(!sel.arm_test_mode(Duration::from_secs_f64(6.0)));
        assert!(!sel.arm_test_mode(Duration::from_secs_f64(5.0)));
        assert!(!sel.is_test_mode());
        assert_eq!(sel.state(), SelectorState::MenuBrowsing);

        assert!(sel.arm_test_mode(Duration::from_secs_f64(4.9)));
        assert_eq!(sel.state(), SelectorState::TestModeBrowsing);
        assert!(sel.is_test_mode());

        // Already armed
        assert!(!sel.arm_test_mode(Duration::from_secs(1)));
    }

    #[test]
    fn test_run_test_now() {
        let mut sel = AutoSel::new(names(3), Params::default());
        assert_eq!(sel.run_test_now(), None);

        sel.arm_test_mode(Duration::from_secs(1));
        sel.cycle();
        assert_eq!(sel.run_test_now(), Some(RoutineId::Listed(1)));
        assert_eq!(sel.state(), SelectorState::TestModeBrowsing);
    }

    #[test]
    fn test_autonomous_is_terminal() {
        let mut sel = AutoSel::new(names(3), Params::default());
        sel.cycle();
        assert_eq!(sel.start_autonomous_period(), Some(RoutineId::Listed(1)));
        assert_eq!(sel.state(), SelectorState::Running);
        assert!(sel.exit_menu_requested());

        assert!(!sel.cycle());
        assert!(!sel.arm_test_mode(Duration::from_secs(0)));
        assert_eq!(sel.start_autonomous_period(), None);

        sel.enter_driver_control();
        assert_eq!(sel.state(), SelectorState::Running);
    }

    #[test]
    fn test_enter_driver_control() {
        let mut sel = AutoSel::new(names(3), Params::default());
        sel.enter_driver_control();
        assert_eq!(sel.state(), SelectorState::Idle);
        assert!(sel.exit_menu_requested());
        assert!(!sel.cycle());
        assert!(!sel.arm_test_mode(Duration::from_secs(0)));

        let mut sel = AutoSel::new(names(3), Params::default());
        sel.arm_test_mode(Duration::from_secs(0));
        sel.enter_driver_control();
        assert!(sel.is_test_mode());
        assert!(sel.cycle());
    }
}
