//! Stopping conditions for the improvement loop.
//!
//! The search polls a [`SearchClock`] between passes. A deadline, an
//! iteration cap, and a caller-owned [`CancellationToken`] can each end the
//! search; whichever fires first is reported as the [`StopReason`].

use std::time::{Duration, Instant};

use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// Why the local search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The budget was zero or negative; the initial tour was returned as is.
    Skipped,
    /// Nothing to improve (fewer than two stops).
    Converged,
    /// All guided local search penalty rounds were used.
    PenaltyRoundsExhausted,
    /// The wall-clock budget elapsed.
    TimeLimit,
    /// The configured number of improvement passes was reached.
    IterationLimit,
    /// The caller cancelled the request.
    Cancelled,
}

impl StopReason {
    /// Returns `true` if the search was interrupted before it finished its
    /// schedule, so the tour may be suboptimal.
    pub fn is_partial(self) -> bool {
        matches!(
            self,
            StopReason::TimeLimit | StopReason::IterationLimit | StopReason::Cancelled
        )
    }
}

/// Limits on how long the improvement loop may run.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_route_optimizer::local_search::Termination;
///
/// let t = Termination::new()
///     .with_time_budget(Duration::from_secs(5))
///     .with_max_iterations(10_000);
/// assert!(!t.is_skipped());
/// assert!(Termination::from_seconds(0.0).is_skipped());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Termination {
    time_budget: Option<Duration>,
    max_iterations: Option<u64>,
    cancel: Option<CancellationToken>,
    skip: bool,
}

impl Termination {
    /// No limits; the penalty round cap alone ends the search.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wall-clock budget in seconds. Zero or negative skips improvement;
    /// budgets too large to represent are treated as unbounded.
    pub fn from_seconds(seconds: f64) -> Self {
        if seconds.is_nan() || seconds <= 0.0 {
            return Self {
                skip: true,
                ..Self::default()
            };
        }
        Self {
            time_budget: Duration::try_from_secs_f64(seconds).ok(),
            ..Self::default()
        }
    }

    /// Sets the wall-clock budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.skip = budget.is_zero();
        self.time_budget = Some(budget);
        self
    }

    /// Caps the number of improvement passes. Makes runs reproducible.
    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Stops the search when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns `true` if improvement should not run at all.
    pub fn is_skipped(&self) -> bool {
        self.skip
    }

    /// The wall-clock budget, if any.
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget
    }

    /// The pass cap, if any.
    pub fn max_iterations(&self) -> Option<u64> {
        self.max_iterations
    }

    /// Starts the clock.
    pub fn start(&self) -> SearchClock<'_> {
        SearchClock {
            deadline: self.time_budget.and_then(|b| Instant::now().checked_add(b)),
            max_iterations: self.max_iterations,
            iterations: 0,
            cancel: self.cancel.as_ref(),
        }
    }
}

/// A running [`Termination`], counting passes since it was started.
#[derive(Debug)]
pub struct SearchClock<'a> {
    deadline: Option<Instant>,
    max_iterations: Option<u64>,
    iterations: u64,
    cancel: Option<&'a CancellationToken>,
}

impl<'a> SearchClock<'a> {
    /// A fresh pass budget of `max_passes` that keeps this clock's deadline
    /// and cancellation token.
    pub fn follow_up(&self, max_passes: u64) -> SearchClock<'a> {
        SearchClock {
            deadline: self.deadline,
            max_iterations: Some(max_passes),
            iterations: 0,
            cancel: self.cancel,
        }
    }

    /// Returns the reason to stop, if any limit has been reached.
    pub fn check(&self) -> Result<(), StopReason> {
        if self.cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(StopReason::Cancelled);
        }
        if self.max_iterations.is_some_and(|max| self.iterations >= max) {
            return Err(StopReason::IterationLimit);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(StopReason::TimeLimit);
        }
        Ok(())
    }

    /// Records one completed pass.
    pub fn tick(&mut self) {
        self.iterations += 1;
    }

    /// Passes completed so far.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }
}
