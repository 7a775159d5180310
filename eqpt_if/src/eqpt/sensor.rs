//! Sensor interfaces

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A rotation sensor.
pub trait PositionSensor {
    /// The absolute angle of the sensor within one revolution.
    ///
    /// Units: degrees, [0, 360)
    fn angle_deg(&self) -> f64;

    /// The accumulated (multi-turn) position of the sensor.
    ///
    /// Units: degrees
    fn position_deg(&self) -> f64;

    /// Re-base the accumulated position so that it reads `position_deg` now.
    fn set_position_deg(&mut self, position_deg: f64);
}

/// A distance sensor.
pub trait ProximitySensor {
    /// The latest distance reading, infinite if no object is in range.
    ///
    /// Units: inches
    fn distance_in(&self) -> f64;

    /// Change notification: returns the new reading if it has changed since
    /// the last call, or `None` if it has not.
    fn take_change(&mut self) -> Option<f64>;
}

/// An inertial sensor providing the robot's heading.
pub trait HeadingSensor {
    /// Whether the sensor is detected on its port.
    fn installed(&self) -> bool;

    /// Whether the sensor is still calibrating.
    fn is_calibrating(&self) -> bool;

    /// The current heading.
    ///
    /// Units: degrees, [0, 360)
    fn heading_deg(&self) -> f64;
}
