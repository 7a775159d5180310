//! Button edge detection

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::collections::BTreeSet;
use serde::Serialize;

use eqpt_if::eqpt::controller::{Button, ControllerState};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Tracks the previous button state to turn levels into edges.
#[derive(Debug, Default, Clone)]
pub struct ButtonEdges {
    prev: BTreeSet<Button>
}

/// A button being pressed or released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ButtonEvent {
    pub button: Button,
    pub edge: Edge
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Edge {
    Pressed,
    Released
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ButtonEdges {
    /// Get the edges between the previous state and `state`, releases first.
    pub fn update(&mut self, state: &ControllerState) -> Vec<ButtonEvent> {
        let released = self.prev
            .difference(&state.pressed)
            .map(|&button| ButtonEvent { button, edge: Edge::Released });
        let pressed = state.pressed
            .difference(&self.prev)
            .map(|&button| ButtonEvent { button, edge: Edge::Pressed });

        let events = released.chain(pressed).collect();

        self.prev = state.pressed.clone();

        events
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn state(buttons: &[Button]) -> ControllerState {
        ControllerState {
            pressed: buttons.iter().cloned().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_edges() {
        let mut edges = ButtonEdges::default();

        assert_eq!(edges.update(&state(&[Button::L1])), vec![
            ButtonEvent { button: Button::L1, edge: Edge::Pressed }
        ]);

        // Held buttons produce nothing
        assert!(edges.update(&state(&[Button::L1])).is_empty());

        assert_eq!(edges.update(&state(&[Button::R2])), vec![
            ButtonEvent { button: Button::L1, edge: Edge::Released },
            ButtonEvent { button: Button::R2, edge: Edge::Pressed }
        ]);

        assert_eq!(edges.update(&state(&[])), vec![
            ButtonEvent { button: Button::R2, edge: Edge::Released }
        ]);
    }
}
