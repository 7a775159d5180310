//! # Equipment interface crate.
//!
//! Provides the interfaces between the control software and the robot's
//! equipment: the drive chassis, motors, sensors, the driver's controller,
//! the brain screen and the competition control system.
//!
//! Real device drivers and the simulation both implement these traits, the
//! control software only ever sees the trait objects bundled in
//! [`eqpt::Eqpt`].

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Equipment traits and the demand/sensing structures passed through them
pub mod eqpt;

/// Match phase notification
pub mod competition;
