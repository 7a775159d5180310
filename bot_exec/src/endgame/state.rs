//! Implementations for the endgame timer

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::time::Duration;
use log::{debug, info};
use serde::Serialize;

// Internal
use super::Params;
use util::{
    module::State,
    params,
    session::Session
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Endgame timer state
#[derive(Debug, Default)]
pub struct EndgameTimer {
    pub(crate) params: Params,

    state: TimerState
}

/// Input data to the endgame timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputData {
    pub now: Duration
}

/// Actions due this cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutputData {
    /// Show the endgame reminder
    pub remind: bool,

    /// Run a motor health check
    pub health_check: bool
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// States of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimerState {
    /// Not started yet
    Idle,

    /// Waiting for the reminder
    Waiting { started_at: Duration },

    /// Reminder given, checking the motors periodically
    Reminded { next_check: Duration },

    /// Stopped for good
    Cancelled
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for EndgameTimer {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = TimerState;
    type ProcError = std::convert::Infallible;

    /// Initialise the timer.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, _session: &Session)
        -> Result<(), Self::InitError>
    {
        *self = Self::with_params(params::load(init_data)?);
        Ok(())
    }

    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let now = input_data.now;
        let mut output = OutputData::default();

        match self.state {
            TimerState::Waiting { started_at } => {
                if now.checked_sub(started_at).unwrap_or_default() 
                    >= Duration::from_millis(self.params.reminder_ms) 
                {
                    info!("Endgame reached");
                    output.remind = true;
                    self.state = TimerState::Reminded { 
                        next_check: now + self.health_check_period() 
                    };
                }
            },
            TimerState::Reminded { next_check } => {
                if now >= next_check {
                    debug!("Periodic motor health check due");
                    output.health_check = true;
                    self.state = TimerState::Reminded { 
                        next_check: next_check + self.health_check_period() 
                    };
                }
            },
            TimerState::Idle | TimerState::Cancelled => ()
        }

        Ok((output, self.state))
    }
}

impl EndgameTimer {
    pub fn with_params(params: Params) -> Self {
        Self {
            params,
            state: TimerState::Idle
        }
    }

    /// Start timing from `now`. Ignored if already started or cancelled.
    pub fn start(&mut self, now: Duration) {
        if self.state == TimerState::Idle {
            self.state = TimerState::Waiting { started_at: now };
            debug!("Endgame timer started");
        }
    }

    /// Stop the timer for good.
    pub fn cancel(&mut self) {
        if self.state != TimerState::Cancelled {
            debug!("Endgame timer cancelled");
            self.state = TimerState::Cancelled;
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    fn health_check_period(&self) -> Duration {
        Duration::from_millis(self.params.health_check_period_ms)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        TimerState::Idle
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
