//! # Motor health checks

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::fmt;
use log::warn;
use serde::Serialize;

// Internal
use crate::feedback::Feedback;
use eqpt_if::eqpt::{controller::Rumble, motor::MotorHealth};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A problem found with the motors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum MotorFault {
    /// Fewer motors reported than the robot should have.
    Missing { expected: usize, found: usize },

    /// A motor is not detected on its port.
    Disconnected { port: u8 },

    /// A motor is at or above the overheat temperature.
    Overheated { port: u8, temperature_c: f64 }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Check the motors, returning every fault found.
pub fn check_motors(
    health: &[MotorHealth], 
    expected_count: usize, 
    overheat_temp_c: f64
) -> Vec<MotorFault> {
    let mut faults = vec![];

    if health.len() < expected_count {
        faults.push(MotorFault::Missing { 
            expected: expected_count, 
            found: health.len() 
        });
    }

    for m in health {
        if !m.installed {
            faults.push(MotorFault::Disconnected { port: m.port });
        }
        else if m.temperature_c >= overheat_temp_c {
            faults.push(MotorFault::Overheated { 
                port: m.port, 
                temperature_c: m.temperature_c 
            });
        }
    }

    for f in faults.iter() {
        warn!("Motor check: {}", f);
    }

    faults
}

/// Feedback telling the driver about motor faults, nothing if there are none.
pub fn fault_feedback(faults: &[MotorFault]) -> Vec<Feedback> {
    if faults.is_empty() {
        return vec![]
    }

    let mut fb: Vec<Feedback> = faults
        .iter()
        .map(|f| Feedback::ControllerPrint(f.to_string()))
        .collect();
    fb.push(Feedback::Rumble(Rumble::Alarm));

    fb
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl fmt::Display for MotorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorFault::Missing { expected, found } => 
                write!(f, "{}/{} motors", found, expected),
            MotorFault::Disconnected { port } => 
                write!(f, "motor {} unplugged", port),
            MotorFault::Overheated { port, temperature_c } => 
                write!(f, "motor {} hot {:.0}C", port, temperature_c)
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn motor(port: u8, installed: bool, temperature_c: f64) -> MotorHealth {
        MotorHealth { port, installed, temperature_c }
    }

    #[test]
    fn test_healthy() {
        let health: Vec<_> = (1..=8).map(|p| motor(p, true, 30.0)).collect();
        let faults = check_motors(&health, 8, 55.0);
        assert!(faults.is_empty());
        assert!(fault_feedback(&faults).is_empty());
    }

    #[test]
    fn test_faults() {
        let health = vec![
            motor(1, true, 30.0),
            motor(2, false, 0.0),
            motor(7, true, 57.4)
        ];
        let faults = check_motors(&health, 8, 55.0);

        assert_eq!(faults, vec![
            MotorFault::Missing { expected: 8, found: 3 },
            MotorFault::Disconnected { port: 2 },
            MotorFault::Overheated { port: 7, temperature_c: 57.4 }
        ]);
        assert_eq!(faults[0].to_string(), "3/8 motors");
        assert_eq!(faults[2].to_string(), "motor 7 hot 57C");

        let fb = fault_feedback(&faults);
        assert_eq!(fb.len(), 4);
        assert_eq!(fb[1], Feedback::ControllerPrint(String::from("motor 2 unplugged")));
        assert_eq!(fb[3], Feedback::Rumble(Rumble::Alarm));
    }
}
