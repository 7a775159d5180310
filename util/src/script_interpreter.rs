//! # Input script interpreter module
//!
//! This module provides an interpreter for input scripts, which play
//! controller, screen and sensor events into the simulated robot at set
//! times.
//!
//! A script is a list of `time: event;` entries, where time is in seconds
//! since the start of the exec and the event is a JSON object:
//!
//! ```text
//! 2.0: {"type": "press", "button": "Right"};
//! 2.1: {"type": "release", "button": "Right"};
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::Path;
use std::fs;
use regex::RegexBuilder;
use thiserror::Error;

// Internal
use eqpt_if::eqpt::controller::{InputEvent, InputEventParseError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An event which is scripted to occur at a specific time.
#[derive(Debug, Clone, Copy)]
pub struct ScriptedEvent {
    /// The time the event is supposed to occur at
    pub exec_time_s: f64,

    /// The event itself
    pub event: InputEvent
}

/// A script interpreter.
///
/// After initialising with the script to run use `.get_pending_events` to
/// acquire the events which are due.
#[derive(Debug, Default)]
pub struct ScriptInterpreter {
    events: VecDeque<ScriptedEvent>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error("Could not build the script parser: {0}")]
    ParserError(regex::Error),

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script timestamps must not decrease, found {1} s after {0} s")]
    OutOfOrder(f64, f64),

    #[error("Script contains an invalid event at {0} s: {1}")]
    InvalidEvent(f64, InputEventParseError)
}

pub enum PendingEvents {
    None,
    Some(Vec<InputEvent>),
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {
        // Load the script into a string
        let script = match fs::read_to_string(script_path) {
            Ok(s) => s,
            Err(e) => return Err(ScriptError::ScriptLoadError(e))
        };

        Self::from_str(&script)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_str(script: &str) -> Result<Self, ScriptError> {
        // Empty queue of events
        let mut event_queue: VecDeque<ScriptedEvent> = VecDeque::new();

        let re = RegexBuilder::
            new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .map_err(ScriptError::ParserError)?;

        for cap in re.captures_iter(script) {
            // Parse the exec time
            let exec_time_s: f64 = match cap[1].parse() {
                Ok(t) => t,
                Err(e) => return Err(
                    ScriptError::InvalidTimestamp(format!("{}", e)))
            };

            if let Some(prev) = event_queue.back() {
                if exec_time_s < prev.exec_time_s {
                    return Err(ScriptError::OutOfOrder(prev.exec_time_s, exec_time_s))
                }
            }

            let event = InputEvent::from_json(&cap[3])
                .map_err(|e| ScriptError::InvalidEvent(exec_time_s, e))?;

            event_queue.push_back(ScriptedEvent {
                exec_time_s,
                event
            });
        }

        if event_queue.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        Ok(ScriptInterpreter {
            events: event_queue
        })
    }

    /// Return the events due at `current_time_s`.
    pub fn get_pending_events(&mut self, current_time_s: f64) -> PendingEvents {

        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.events.is_empty() {
            return PendingEvents::EndOfScript
        }

        let mut event_vec: Vec<InputEvent> = vec![];

        // Pop events from the front of the queue until the head's exec time
        // is in the future.
        while let Some(head) = self.events.front() {
            if head.exec_time_s > current_time_s {
                break;
            }
            event_vec.push(head.event);
            self.events.pop_front();
        }

        if event_vec.len() > 0 {
            PendingEvents::Some(event_vec)
        }
        else {
            PendingEvents::None
        }
    }

    /// Get the number of events remaining in the script
    pub fn get_num_events(&self) -> usize {
        self.events.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.events.back() {
            Some(c) => c.exec_time_s,
            None => 0f64
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use eqpt_if::eqpt::controller::Button;

    const SCRIPT: &str = r#"
        // Arm test mode and run the custom test
        1.0: {"type": "press", "button": "Right"};
        1.1: {"type": "release", "button": "Right"};
        1.1: {"type": "screen_press"};
        3.5: {"type": "press", "button": "A"};
    "#;

    #[test]
    fn test_parse_script() {
        let si = ScriptInterpreter::from_str(SCRIPT).unwrap();
        assert_eq!(si.get_num_events(), 4);
        assert_eq!(si.get_duration(), 3.5);
    }

    #[test]
    fn test_pending_events() {
        let mut si = ScriptInterpreter::from_str(SCRIPT).unwrap();

        assert!(matches!(si.get_pending_events(0.5), PendingEvents::None));

        match si.get_pending_events(1.1) {
            PendingEvents::Some(v) => {
                assert_eq!(v.len(), 3);
                assert_eq!(v[0], InputEvent::Press { button: Button::Right });
                assert_eq!(v[2], InputEvent::ScreenPress);
            },
            _ => panic!("Expected pending events")
        }

        assert!(matches!(si.get_pending_events(2.0), PendingEvents::None));
        assert!(matches!(si.get_pending_events(4.0), PendingEvents::Some(_)));
        assert!(matches!(si.get_pending_events(5.0), PendingEvents::EndOfScript));
    }

    #[test]
    fn test_bad_scripts() {
        assert!(matches!(
            ScriptInterpreter::from_str("nothing to see here"),
            Err(ScriptError::ScriptEmpty)
        ));
        assert!(matches!(
            ScriptInterpreter::from_str("2.0: {\"type\": \"screen_press\"};\n1.0: {\"type\": \"screen_release\"};"),
            Err(ScriptError::OutOfOrder(_, _))
        ));
        assert!(matches!(
            ScriptInterpreter::from_str("1.0: {\"type\": \"fly\"};"),
            Err(ScriptError::InvalidEvent(_, _))
        ));
    }
}
