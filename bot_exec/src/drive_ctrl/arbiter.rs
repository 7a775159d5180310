//! Chassis control arbitration
//!
//! The driver has the chassis by default. Any other owner must request an
//! exclusive control token and give it back when done. Tokens cannot be
//! copied, so only the holder can release control.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::time::Duration;
use log::{debug, warn};
use serde::Serialize;

// Internal
use super::DriveCtrlError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Chassis control arbiter.
#[derive(Debug, Default)]
pub struct Arbiter {
    mode: ArbiterMode,

    /// Id of the next token to be handed out
    next_id: u64,

    /// Maximum time a macro may hold the chassis
    macro_timeout: Duration,

    /// Number of times control has been revoked from a stuck macro
    num_revoked: u64
}

/// Proof of exclusive control of the chassis.
#[derive(Debug, PartialEq, Eq)]
pub struct ControlToken {
    id: u64,
    owner: ControlOwner
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Who can take the chassis from the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControlOwner {
    Autonomous,
    TestRoutine,
    Macro(MacroSlot),
    HoldChassis
}

/// The macro buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MacroSlot {
    Mode,
    TeamColor
}

/// Who is driving the chassis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArbiterMode {
    /// The driver's sticks drive the chassis.
    Manual,

    /// An owner has exclusive control.
    Exclusive {
        owner: ControlOwner,
        token_id: u64,
        since: Duration
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Arbiter {
    pub fn new(macro_timeout: Duration) -> Self {
        Self {
            macro_timeout,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> ArbiterMode {
        self.mode
    }

    /// True if the driver has the chassis.
    pub fn is_manual(&self) -> bool {
        self.mode == ArbiterMode::Manual
    }

    /// The current exclusive owner, if any.
    pub fn owner(&self) -> Option<ControlOwner> {
        match self.mode {
            ArbiterMode::Manual => None,
            ArbiterMode::Exclusive { owner, .. } => Some(owner)
        }
    }

    /// Number of times control has been revoked from a stuck macro.
    pub fn num_revoked(&self) -> u64 {
        self.num_revoked
    }

    /// Request exclusive control of the chassis.
    pub fn request(&mut self, owner: ControlOwner, now: Duration) 
        -> Result<ControlToken, DriveCtrlError> 
    {
        if let ArbiterMode::Exclusive { owner: current, .. } = self.mode {
            return Err(DriveCtrlError::Busy(current))
        }

        let id = self.next_id;
        self.next_id += 1;

        self.mode = ArbiterMode::Exclusive {
            owner,
            token_id: id,
            since: now
        };
        debug!("Chassis control given to {:?}", owner);

        Ok(ControlToken { id, owner })
    }

    /// Give control back to the driver.
    ///
    /// Fails if the token was revoked, in which case nothing changes.
    pub fn release(&mut self, token: ControlToken) -> Result<(), DriveCtrlError> {
        match self.mode {
            ArbiterMode::Exclusive { token_id, .. } if token_id == token.id => {
                self.mode = ArbiterMode::Manual;
                debug!("Chassis control returned by {:?}", token.owner);
                Ok(())
            },
            _ => Err(DriveCtrlError::StaleToken(token.owner))
        }
    }

    /// Revoke control from a macro which has held it for too long.
    ///
    /// Returns the owner control was revoked from.
    pub fn check_stale(&mut self, now: Duration) -> Option<ControlOwner> {
        match self.mode {
            ArbiterMode::Exclusive { owner: owner @ ControlOwner::Macro(_), since, .. } 
                if now.checked_sub(since).unwrap_or_default() > self.macro_timeout => 
            {
                warn!(
                    "{:?} has held the chassis for over {:.1} s, returning control to the driver",
                    owner, self.macro_timeout.as_secs_f64()
                );
                self.mode = ArbiterMode::Manual;
                self.num_revoked += 1;
                Some(owner)
            },
            _ => None
        }
    }
}

impl ControlToken {
    pub fn owner(&self) -> ControlOwner {
        self.owner
    }
}

impl Default for ArbiterMode {
    fn default() -> Self {
        ArbiterMode::Manual
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_request_release() {
        let mut arb = Arbiter::new(secs(15));
        assert!(arb.is_manual());

        let token = arb.request(ControlOwner::HoldChassis, secs(0)).unwrap();
        assert!(!arb.is_manual());
        assert_eq!(arb.owner(), Some(ControlOwner::HoldChassis));

        // Nobody else can take it
        assert!(matches!(
            arb.request(ControlOwner::Macro(MacroSlot::Mode), secs(1)),
            Err(DriveCtrlError::Busy(ControlOwner::HoldChassis))
        ));

        arb.release(token).unwrap();
        assert!(arb.is_manual());
    }

    #[test]
    fn test_stuck_macro_is_revoked() {
        let mut arb = Arbiter::new(secs(15));
        let token = arb.request(ControlOwner::Macro(MacroSlot::TeamColor), secs(10)).unwrap();

        assert_eq!(arb.check_stale(secs(25)), None);
        assert_eq!(
            arb.check_stale(secs(26)), 
            Some(ControlOwner::Macro(MacroSlot::TeamColor))
        );
        assert!(arb.is_manual());
        assert_eq!(arb.num_revoked(), 1);

        // The old token can't release a new owner's control
        let hold = arb.request(ControlOwner::HoldChassis, secs(27)).unwrap();
        assert!(matches!(
            arb.release(token),
            Err(DriveCtrlError::StaleToken(ControlOwner::Macro(MacroSlot::TeamColor)))
        ));
        assert_eq!(arb.owner(), Some(ControlOwner::HoldChassis));
        arb.release(hold).unwrap();
    }

    #[test]
    fn test_autonomous_is_never_revoked() {
        let mut arb = Arbiter::new(secs(1));
        let _token = arb.request(ControlOwner::Autonomous, secs(0)).unwrap();
        assert_eq!(arb.check_stale(secs(60)), None);
        assert_eq!(arb.owner(), Some(ControlOwner::Autonomous));
    }
}
