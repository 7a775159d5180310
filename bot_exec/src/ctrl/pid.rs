//! # PID controller
//!
//! A time-aware PID loop with settle and timeout detection. One controller is
//! created for every move to a new target, so the integral never carries
//! over from a previous target.
//!
//! Time deltas are in milliseconds, so the integral is in error-milliseconds
//! and the derivative in error per millisecond.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::time::Duration;
use serde::Serialize;

// Internal
use eqpt_if::eqpt::chassis::{ExitConditions, PidConstants};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PID controller
#[derive(Debug, Serialize, Clone)]
pub struct PidController {
    /// The target the controller is driving towards
    target: f64,

    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Dervative gain
    k_d: f64,

    /// The error is only integrated while its magnitude is below this value,
    /// unless it is zero.
    integral_start: f64,

    /// Error magnitude below which the loop may settle
    settle_error: f64,

    /// Time the error must stay within `settle_error` to settle
    settle_time: Duration,

    /// Time after `started_at` at which the loop gives up, if any
    timeout: Option<Duration>,

    /// Time at which the controller was created
    started_at: Duration,

    /// Time of the previous tick
    prev_time: Option<Duration>,

    /// Previous error
    prev_error: Option<f64>,

    /// The integral accumulation
    integral: f64,

    /// Time at which the error last entered the settle band
    settling_since: Option<Duration>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Completion status of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PidStatus {
    /// The target has not been reached yet.
    Running,

    /// The error stayed within the settle band for the settle time.
    Settled,

    /// The timeout elapsed before the loop settled.
    TimedOut
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidController {

    /// Create a new controller driving towards `target`, starting at
    /// `started_at` on the exec clock.
    pub fn new(
        target: f64,
        gains: &PidConstants,
        exit: &ExitConditions,
        started_at: Duration
    ) -> Self {
        Self {
            target,
            k_p: gains.k_p,
            k_i: gains.k_i,
            k_d: gains.k_d,
            integral_start: gains.integral_start,
            settle_error: exit.settle_error,
            settle_time: Duration::from_millis(exit.settle_time_ms),
            timeout: match exit.timeout_ms {
                0 => None,
                t => Some(Duration::from_millis(t))
            },
            started_at,
            prev_time: None,
            prev_error: None,
            integral: 0f64,
            settling_since: None
        }
    }

    /// The target of this controller.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// The accumulated integral.
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Get the value of the controller for the given error at time `now`.
    ///
    /// The output is not limited, callers must clamp it to the range of
    /// their actuator.
    pub fn compute(&mut self, error: f64, now: Duration) -> f64 {
        // Calculate dt in milliseconds, there is none on the first tick
        let dt = self.prev_time
            .map(|t0| duration_to_millis(now.checked_sub(t0).unwrap_or_default()));

        // Crossing the target invalidates the accumulated error
        if let Some(e) = self.prev_error {
            if (error > 0f64 && e < 0f64) || (error < 0f64 && e > 0f64) {
                self.integral = 0f64;
            }
        }

        // Accumulate the integral term.
        //
        // If there's no time difference then we don't accumulate the integral
        // as it would produce a spike compared to normal operation.
        if self.integral_start <= 0f64 || error.abs() < self.integral_start {
            self.integral += match dt {
                Some(t) => error * t,
                None => 0f64
            };
        }

        // Calculate the derivative, again zero without a time difference.
        let deriv = match (self.prev_error, dt) {
            (Some(e), Some(t)) if t > 0f64 => (error - e) / t,
            _ => 0f64
        };

        // Track how long the error has been within the settle band
        if error.abs() < self.settle_error {
            if self.settling_since.is_none() {
                self.settling_since = Some(now);
            }
        }
        else {
            self.settling_since = None;
        }

        // Calculate the output
        let out = 
            self.k_p * error 
            + self.k_i * self.integral 
            + self.k_d * deriv;
        
        // Remember the previous error and time
        self.prev_error = Some(error);
        self.prev_time = Some(now);

        out
    }

    /// Get the completion status as of the latest tick.
    ///
    /// A controller which has never been ticked is always `Running`.
    pub fn status(&self) -> PidStatus {
        let now = match self.prev_time {
            Some(t) => t,
            None => return PidStatus::Running
        };

        if let Some(since) = self.settling_since {
            if now.checked_sub(since).unwrap_or_default() >= self.settle_time {
                return PidStatus::Settled
            }
        }

        if let Some(timeout) = self.timeout {
            if now.checked_sub(self.started_at).unwrap_or_default() >= timeout {
                return PidStatus::TimedOut
            }
        }

        PidStatus::Running
    }

    /// True once the loop has settled or timed out.
    pub fn is_done(&self) -> bool {
        self.status() != PidStatus::Running
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn duration_to_millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000f64
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn gains(k_p: f64, k_i: f64, k_d: f64, integral_start: f64) -> PidConstants {
        PidConstants {
            max_voltage: 10.0,
            k_p, k_i, k_d,
            integral_start
        }
    }

    fn exit(settle_error: f64, settle_time_ms: u64, timeout_ms: u64) -> ExitConditions {
        ExitConditions {
            settle_error,
            settle_time_ms,
            timeout_ms
        }
    }

    fn ms(t: u64) -> Duration {
        Duration::from_millis(t)
    }

    #[test]
    fn test_first_tick_is_proportional_only() {
        let mut pid = PidController::new(
            240.0, &gains(0.4, 0.2, 0.0, 15.0), &exit(3.0, 200, 1000), ms(0)
        );

        let out = pid.compute(240.0, ms(0));
        assert!((out - 96.0).abs() < 1e-9);
        assert_eq!(pid.integral(), 0.0);
    }

    #[test]
    fn test_integral_and_derivative() {
        let mut pid = PidController::new(
            10.0, &gains(0.0, 1.0, 0.0, 0.0), &exit(0.0, 0, 0), ms(0)
        );
        assert_eq!(pid.compute(10.0, ms(0)), 0.0);
        assert!((pid.compute(10.0, ms(100)) - 1000.0).abs() < 1e-9);

        let mut pid = PidController::new(
            10.0, &gains(0.0, 0.0, 1.0, 0.0), &exit(0.0, 0, 0), ms(0)
        );
        assert_eq!(pid.compute(10.0, ms(0)), 0.0);
        assert!((pid.compute(5.0, ms(500)) + 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_integral_over_lift_ticks() {
        let mut pid = PidController::new(
            240.0, &gains(0.0, 0.2, 0.0, 15.0), &exit(3.0, 200, 1000), ms(0)
        );

        // A steady 5 deg error over one 10 ms tick integrates to 50 deg.ms
        assert_eq!(pid.compute(5.0, ms(0)), 0.0);
        let out = pid.compute(5.0, ms(10));
        assert!((pid.integral() - 50.0).abs() < 1e-9);
        assert!((out - 10.0).abs() < 1e-9);

        let out = pid.compute(5.0, ms(20));
        assert!((pid.integral() - 100.0).abs() < 1e-9);
        assert!((out - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_integral_start_threshold() {
        let mut pid = PidController::new(
            20.0, &gains(0.0, 1.0, 0.0, 15.0), &exit(0.0, 0, 0), ms(0)
        );
        pid.compute(20.0, ms(0));
        pid.compute(20.0, ms(1000));
        assert_eq!(pid.integral(), 0.0);

        let out = pid.compute(10.0, ms(2000));
        assert!((out - 10_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_integral_resets_on_sign_change() {
        let mut pid = PidController::new(
            0.0, &gains(0.0, 1.0, 0.0, 0.0), &exit(0.0, 0, 0), ms(0)
        );
        pid.compute(10.0, ms(0));
        pid.compute(10.0, ms(1000));
        assert!((pid.integral() - 10_000.0).abs() < 1e-9);

        pid.compute(-5.0, ms(2000));
        assert!((pid.integral() + 5000.0).abs() < 1e-9);
    }

    #[test]
    fn test_not_done_before_first_tick() {
        let pid = PidController::new(
            240.0, &gains(0.4, 0.2, 0.0, 15.0), &exit(3.0, 200, 1000), ms(5000)
        );
        assert_eq!(pid.status(), PidStatus::Running);
        assert!(!pid.is_done());
    }

    #[test]
    fn test_settles_after_settle_time() {
        let mut pid = PidController::new(
            240.0, &gains(0.4, 0.2, 0.0, 15.0), &exit(3.0, 200, 1000), ms(0)
        );

        // Out of the band
        pid.compute(50.0, ms(0));
        assert_eq!(pid.status(), PidStatus::Running);

        // Into the band at 100 ms, not settled until 300 ms
        let mut t = 100;
        while t < 300 {
            pid.compute(2.0, ms(t));
            assert_eq!(pid.status(), PidStatus::Running, "settled early at {} ms", t);
            t += 10;
        }
        pid.compute(-2.5, ms(300));
        assert_eq!(pid.status(), PidStatus::Settled);
        assert!(pid.is_done());
    }

    #[test]
    fn test_settle_band_is_exclusive() {
        let mut pid = PidController::new(
            240.0, &gains(0.4, 0.2, 0.0, 15.0), &exit(3.0, 200, 0), ms(0)
        );
        let mut t = 0;
        while t <= 500 {
            pid.compute(3.0, ms(t));
            t += 10;
        }
        assert_eq!(pid.status(), PidStatus::Running);

        pid.compute(2.99, ms(510));
        pid.compute(2.99, ms(710));
        assert_eq!(pid.status(), PidStatus::Settled);
    }

    #[test]
    fn test_leaving_band_restarts_settle_window() {
        let mut pid = PidController::new(
            240.0, &gains(0.4, 0.2, 0.0, 15.0), &exit(3.0, 200, 0), ms(0)
        );
        pid.compute(1.0, ms(0));
        pid.compute(1.0, ms(150));
        pid.compute(4.0, ms(160));
        pid.compute(1.0, ms(170));
        pid.compute(1.0, ms(360));
        assert_eq!(pid.status(), PidStatus::Running);
        pid.compute(1.0, ms(370));
        assert_eq!(pid.status(), PidStatus::Settled);
    }

    #[test]
    fn test_timeout() {
        let mut pid = PidController::new(
            240.0, &gains(0.4, 0.2, 0.0, 15.0), &exit(3.0, 200, 1000), ms(2000)
        );
        pid.compute(100.0, ms(2990));
        assert_eq!(pid.status(), PidStatus::Running);
        pid.compute(100.0, ms(3000));
        assert_eq!(pid.status(), PidStatus::TimedOut);
        assert!(pid.is_done());
    }

    #[test]
    fn test_zero_timeout_never_times_out() {
        let mut pid = PidController::new(
            240.0, &gains(0.4, 0.2, 0.0, 15.0), &exit(3.0, 200, 0), ms(0)
        );
        pid.compute(100.0, ms(0));
        pid.compute(100.0, ms(3_600_000));
        assert_eq!(pid.status(), PidStatus::Running);
    }
}
