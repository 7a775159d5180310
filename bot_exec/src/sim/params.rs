//! Parameters of the simulated robot and match

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    // ---- MATCH ----

    /// Time spent disabled before the autonomous period.
    ///
    /// Units: seconds
    pub pre_match_s: f64,

    /// Units: seconds
    pub autonomous_s: f64,

    /// Units: seconds
    pub driver_control_s: f64,

    // ---- LIFT ----

    /// Physical lift angle at power on.
    ///
    /// Units: degrees
    pub lift_start_deg: f64,

    /// Lift speed per volt applied.
    ///
    /// Units: degrees/second/volt
    pub lift_rate_deg_s_per_v: f64,

    // ---- CHASSIS ----

    /// Speed of each side at full demand.
    ///
    /// Units: inches/second
    pub max_drive_speed_in_s: f64,

    /// Distance between the left and right wheels.
    ///
    /// Units: inches
    pub track_width_in: f64,

    // ---- SENSORS ----

    pub gyro_installed: bool,

    /// Units: seconds
    pub gyro_calibration_s: f64,

    /// Heading of the robot at power on.
    ///
    /// Units: degrees
    pub start_heading_deg: f64,

    // ---- MOTORS ----

    /// Smart ports of the left and right drive motors.
    pub drive_ports: Vec<u8>,
    pub intake_port: u8,
    pub lift_port: u8,

    /// Temperature of every motor at power on.
    ///
    /// Units: degrees Celsius
    pub motor_temp_c: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            pre_match_s: 6.0,
            autonomous_s: 15.0,
            driver_control_s: 105.0,
            lift_start_deg: 40.0,
            lift_rate_deg_s_per_v: 60.0,
            max_drive_speed_in_s: 60.0,
            track_width_in: 12.0,
            gyro_installed: true,
            gyro_calibration_s: 2.0,
            start_heading_deg: 0.0,
            drive_ports: vec![1, 2, 3, 4, 5, 6],
            intake_port: 7,
            lift_port: 8,
            motor_temp_c: 35.0
        }
    }
}
