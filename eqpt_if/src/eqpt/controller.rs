//! Driver controller interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};
use serde_json;
use std::collections::BTreeSet;
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// The number of analog axes on the controller.
pub const NUM_AXES: usize = 4;

/// Maximum magnitude of an axis reading.
pub const AXIS_MAX: i32 = 100;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A snapshot of the controller's sticks and buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerState {
    /// Axis positions, indexed by `Axis`.
    ///
    /// Units: percent, [-100, 100]
    pub axes: [i32; NUM_AXES],

    /// Buttons currently held down.
    pub pressed: BTreeSet<Button>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Analog stick axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Right stick, horizontal
    Axis1,
    /// Right stick, vertical
    Axis2,
    /// Left stick, vertical
    Axis3,
    /// Left stick, horizontal
    Axis4,
}

/// Digital buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Button {
    L1, L2, R1, R2,
    Up, Down, Left, Right,
    X, B, Y, A,
}

/// Rumble patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rumble {
    /// A single short pulse, acknowledges an action.
    Short,

    /// A single long pulse, signals a state change.
    Long,

    /// Repeated long pulses, signals a fault.
    Alarm,
}

/// An input event as found in a simulation input script.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Press { button: Button },
    Release { button: Button },
    Axis { axis: Axis, value: i32 },
    ScreenPress,
    ScreenRelease,
    Distance { distance_in: Option<f64> },
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum InputEventParseError {
    #[error("Input event contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("Axis value {0} is outside [-100, 100]")]
    AxisOutOfRange(i32),
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// The driver's controller: input and operator feedback.
pub trait Controller {
    /// Current state of the sticks and buttons.
    fn state(&self) -> ControllerState;

    /// Play a rumble pattern.
    fn rumble(&mut self, pattern: Rumble);

    /// Print a line of text on the controller's screen.
    fn print(&mut self, text: &str);
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl ControllerState {
    /// Get the position of an axis.
    pub fn axis(&self, axis: Axis) -> i32 {
        self.axes[axis as usize]
    }

    /// Set the position of an axis, clamped to the valid range.
    pub fn set_axis(&mut self, axis: Axis, value: i32) {
        self.axes[axis as usize] = value.max(-AXIS_MAX).min(AXIS_MAX);
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }
}

impl Rumble {
    /// The pattern string understood by the controller, `.` is a short pulse,
    /// `-` a long one.
    pub fn pattern(&self) -> &'static str {
        match self {
            Rumble::Short => ".",
            Rumble::Long => "-",
            Rumble::Alarm => "----",
        }
    }
}

impl InputEvent {
    /// Parse a new event from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self, InputEventParseError> {
        let event: InputEvent = serde_json::from_str(json_str)
            .map_err(InputEventParseError::InvalidJson)?;

        if let InputEvent::Axis { value, .. } = event {
            if value.abs() > AXIS_MAX {
                return Err(InputEventParseError::AxisOutOfRange(value))
            }
        }

        Ok(event)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_input_event_from_json() {
        assert_eq!(
            InputEvent::from_json(r#"{"type": "press", "button": "R1"}"#).unwrap(),
            InputEvent::Press { button: Button::R1 }
        );
        assert_eq!(
            InputEvent::from_json(r#"{"type": "axis", "axis": "Axis2", "value": -40}"#).unwrap(),
            InputEvent::Axis { axis: Axis::Axis2, value: -40 }
        );
        assert_eq!(
            InputEvent::from_json(r#"{"type": "distance", "distance_in": 0.5}"#).unwrap(),
            InputEvent::Distance { distance_in: Some(0.5) }
        );
        assert!(matches!(
            InputEvent::from_json(r#"{"type": "axis", "axis": "Axis2", "value": 140}"#),
            Err(InputEventParseError::AxisOutOfRange(140))
        ));
        assert!(matches!(
            InputEvent::from_json(r#"{"type": "jump"}"#),
            Err(InputEventParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_controller_state() {
        let mut state = ControllerState::default();
        state.set_axis(Axis::Axis4, 130);
        state.pressed.insert(Button::L1);

        assert_eq!(state.axis(Axis::Axis4), 100);
        assert_eq!(state.axis(Axis::Axis1), 0);
        assert!(state.is_pressed(Button::L1));
        assert!(!state.is_pressed(Button::R1));
    }

    #[test]
    fn test_rumble_patterns() {
        assert_eq!(Rumble::Short.pattern(), ".");
        assert_eq!(Rumble::Long.pattern(), "-");
        assert_eq!(Rumble::Alarm.pattern(), "----");
    }
}
