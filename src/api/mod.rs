pub mod client;
pub mod error;
pub mod types;

pub use client::{SentioClient, StatusSource};
pub use error::ApiError;
pub use types::{JobId, JobState, JobStatus, SubmitRequest};
