//! # Equipment demands
//!
//! Demands produced by the modules during a cycle, sent to the equipment at
//! the end of the cycle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;

// Internal
use crate::lift_ctrl;
use eqpt_if::eqpt::{
    Eqpt,
    chassis::{DriveCommand, MotionTarget},
    motor::StopMode
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// All demands for one cycle. `None` leaves the equipment as it is.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Dems {
    pub chassis: Option<ChassisDem>,
    pub intake: Option<IntakeDem>,
    pub lift: lift_ctrl::OutputData
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Demand on the drive chassis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ChassisDem {
    Drive(DriveCommand),
    Stop(StopMode),
    Motion(MotionTarget)
}

/// Demand on the intake motor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum IntakeDem {
    Spin { volts: f64 },
    Stop(StopMode)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Dems {
    /// Send the demands to the equipment.
    pub fn send(&self, eqpt: &mut Eqpt) {
        trace!("Demands: {:?}", self);

        match self.chassis {
            Some(ChassisDem::Drive(cmd)) => eqpt.chassis.drive(cmd),
            Some(ChassisDem::Stop(mode)) => eqpt.chassis.stop(mode),
            Some(ChassisDem::Motion(target)) => eqpt.chassis.start_motion(target),
            None => ()
        }

        match self.intake {
            Some(IntakeDem::Spin { volts }) => eqpt.intake.spin_volts(volts),
            Some(IntakeDem::Stop(mode)) => eqpt.intake.stop(mode),
            None => ()
        }

        match self.lift {
            lift_ctrl::OutputData::Spin { volts } => eqpt.lift.spin_volts(volts),
            lift_ctrl::OutputData::Stop(mode) => eqpt.lift.stop(mode),
            lift_ctrl::OutputData::None => ()
        }
    }
}
