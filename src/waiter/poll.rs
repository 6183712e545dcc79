use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::api::{ApiError, JobId, JobState, JobStatus, StatusSource};

use super::backoff::PollConfig;

const MISSING_FAILURE_MESSAGE: &str = "job failed without a message";

/// Terminal result of waiting on a remote job.
///
/// Produced exactly once per [`JobWaiter::run`] invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    /// The job finished and its raw prediction payload was fetched.
    Completed(serde_json::Value),
    /// The remote job reported failure; the message is surfaced verbatim.
    Failed(String),
    /// The overall budget elapsed before a terminal status was observed.
    TimedOut(Duration),
}

/// Advisory notification emitted while polling.
///
/// Events never alter control flow; they exist so an external collaborator
/// (terminal UI, metrics) can observe the wait without the core printing
/// anything itself.
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    /// The observed status differs from the previous observation.
    StatusChanged {
        from: Option<JobStatus>,
        to: JobStatus,
    },
    /// A single poll attempt failed at the transport level and will be
    /// retried under the existing backoff schedule.
    TransientError { message: String },
}

/// Consumer of [`PollEvent`]s, implemented by the UI layer.
pub trait EventSink {
    fn on_event(&self, event: &PollEvent);
}

/// Sink that discards every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn on_event(&self, _event: &PollEvent) {}
}

/// Waits for a remote job to reach a terminal status.
///
/// Drives a sequential poll loop against a [`StatusSource`]: cancellable
/// backoff sleep, one status query per iteration, budget check after every
/// non-terminal observation. Holds no state beyond a single `run` call, so
/// one waiter can serve successive jobs.
pub struct JobWaiter<'a, S> {
    oracle: &'a S,
    config: PollConfig,
    cancel: CancellationToken,
}

impl<'a, S: StatusSource> JobWaiter<'a, S> {
    pub fn new(oracle: &'a S) -> Self {
        Self::with_config(oracle, PollConfig::default())
    }

    pub fn with_config(oracle: &'a S, config: PollConfig) -> Self {
        Self {
            oracle,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that aborts the wait from outside (session teardown, Ctrl-C).
    ///
    /// `run` is also an ordinary future: dropping it abandons the wait
    /// without leaking the suspended sleep.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Poll until the job completes, fails, times out or is cancelled.
    ///
    /// Each iteration suspends exactly once (the backoff delay, clipped to
    /// the remaining budget), then issues exactly one status query. Terminal
    /// statuses return immediately and are never re-polled. Transport errors
    /// are transient: the loop keeps the backoff sequence where it was and
    /// retries until the budget runs out.
    pub async fn run(&self, job_id: &JobId, sink: &impl EventSink) -> JobOutcome {
        let started = Instant::now();
        let mut delay = self.config.initial_delay;
        let mut last_status: Option<JobStatus> = None;

        loop {
            let remaining = self
                .config
                .timeout_budget
                .saturating_sub(started.elapsed());
            tokio::select! {
                _ = tokio::time::sleep(delay.min(remaining)) => {}
                _ = self.cancel.cancelled() => {
                    let elapsed = started.elapsed();
                    tracing::info!(
                        job_id = %job_id,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "wait cancelled"
                    );
                    return JobOutcome::TimedOut(elapsed);
                }
            }

            match self.poll_once(job_id, started).await {
                Ok(state) => {
                    if last_status != Some(state.status) {
                        sink.on_event(&PollEvent::StatusChanged {
                            from: last_status,
                            to: state.status,
                        });
                        tracing::debug!(
                            job_id = %job_id,
                            from = ?last_status,
                            to = %state.status,
                            "job status changed"
                        );
                        last_status = Some(state.status);
                    }

                    match state.status {
                        JobStatus::Completed => {
                            match self.fetch_predictions(job_id, started).await {
                                Ok(payload) => {
                                    tracing::info!(
                                        job_id = %job_id,
                                        elapsed_ms = started.elapsed().as_millis() as u64,
                                        "job completed"
                                    );
                                    return JobOutcome::Completed(payload);
                                }
                                // The job stays completed; only the payload
                                // fetch failed. Retry it under the same
                                // backoff.
                                Err(err) => self.report_transient(sink, job_id, &err),
                            }
                        }
                        JobStatus::Failed => {
                            let message = failure_message(state);
                            tracing::info!(job_id = %job_id, message = %message, "job failed");
                            return JobOutcome::Failed(message);
                        }
                        JobStatus::Queued | JobStatus::Running | JobStatus::Unknown => {}
                    }
                }
                Err(err) => self.report_transient(sink, job_id, &err),
            }

            delay = self.config.next_delay(delay);
            let elapsed = started.elapsed();
            if elapsed >= self.config.timeout_budget {
                tracing::warn!(
                    job_id = %job_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = self.config.timeout_budget.as_millis() as u64,
                    "wait timed out"
                );
                return JobOutcome::TimedOut(elapsed);
            }
        }
    }

    async fn poll_once(&self, job_id: &JobId, started: Instant) -> Result<JobState, ApiError> {
        let cap = self.per_call_cap(started);
        match tokio::time::timeout(cap, self.oracle.job_state(job_id)).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::RequestTimeout {
                elapsed_ms: cap.as_millis() as u64,
            }),
        }
    }

    async fn fetch_predictions(
        &self,
        job_id: &JobId,
        started: Instant,
    ) -> Result<serde_json::Value, ApiError> {
        let cap = self.per_call_cap(started);
        match tokio::time::timeout(cap, self.oracle.predictions(job_id)).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::RequestTimeout {
                elapsed_ms: cap.as_millis() as u64,
            }),
        }
    }

    /// A single call may use the per-request cap or what is left of the
    /// overall budget, whichever is smaller.
    fn per_call_cap(&self, started: Instant) -> Duration {
        let remaining = self
            .config
            .timeout_budget
            .saturating_sub(started.elapsed());
        self.config.request_timeout.min(remaining)
    }

    fn report_transient(&self, sink: &impl EventSink, job_id: &JobId, err: &ApiError) {
        sink.on_event(&PollEvent::TransientError {
            message: err.to_string(),
        });
        tracing::warn!(job_id = %job_id, error = %err, "status poll failed, will retry");
    }
}

fn failure_message(state: JobState) -> String {
    state
        .message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| MISSING_FAILURE_MESSAGE.to_string())
}
