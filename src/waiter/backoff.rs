use std::time::Duration;

/// Configuration for the polling loop's backoff schedule and budgets.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay before the first status poll.
    pub initial_delay: Duration,
    /// Upper bound for the doubling backoff delay.
    pub max_delay: Duration,
    /// Overall deadline for the wait; past this the job is abandoned.
    pub timeout_budget: Duration,
    /// Per-poll transport cap. A single status query is never allowed to
    /// stall the loop longer than this or the remaining budget, whichever
    /// is smaller.
    pub request_timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(16),
            timeout_budget: Duration::from_secs(120),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl PollConfig {
    /// Compute the delay that follows `previous` in the backoff sequence:
    /// doubling, capped at `max_delay`.
    pub fn next_delay(&self, previous: Duration) -> Duration {
        (previous * 2).min(self.max_delay)
    }

    /// Replace the overall deadline, keeping the backoff schedule.
    pub fn with_timeout_budget(mut self, budget: Duration) -> Self {
        self.timeout_budget = budget;
        self
    }
}
