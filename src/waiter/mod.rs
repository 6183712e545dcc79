mod backoff;
mod poll;

pub use backoff::PollConfig;
pub use poll::{EventSink, JobOutcome, JobWaiter, NullSink, PollEvent};
