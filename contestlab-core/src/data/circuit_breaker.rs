//! Circuit breaker for runs of broken contest days.
//!
//! Every failed fetch increments a consecutive-failure counter and every
//! successful fetch resets it. Once the counter reaches the threshold the
//! breaker trips and the collector abandons the run: that many broken days in
//! a row means the remote end is down, not that a single day is missing.

/// State of the circuit breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    /// Normal operation: fetches are allowed.
    Closed,
    /// Tripped: the run must stop.
    Open,
}

/// Consecutive-failure circuit breaker for a single collector run.
#[derive(Debug)]
pub struct CircuitBreaker {
    state: BreakerState,
    consecutive_failures: u32,
    failure_threshold: u32,
}

impl CircuitBreaker {
    /// Create a breaker that trips on the `failure_threshold`-th consecutive failure.
    ///
    /// A threshold of zero is treated as one.
    pub fn new(failure_threshold: u32) -> Self {
        Self {
            state: BreakerState::Closed,
            consecutive_failures: 0,
            failure_threshold: failure_threshold.max(1),
        }
    }

    /// Check if fetches are currently allowed.
    pub fn is_allowed(&self) -> bool {
        self.state == BreakerState::Closed
    }

    pub fn state(&self) -> BreakerState {
        self.state
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Record a successful fetch and reset the failure counter.
    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
    }

    /// Record a failure. Trips once the count reaches the threshold.
    pub fn record_failure(&mut self) {
        self.consecutive_failures += 1;
        if self.consecutive_failures >= self.failure_threshold {
            self.state = BreakerState::Open;
        }
    }
}

impl Default for CircuitBreaker {
    /// Trips after 20 consecutive failures.
    fn default() -> Self {
        Self::new(20)
    }
}
