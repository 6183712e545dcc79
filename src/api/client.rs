use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use super::error::ApiError;
use super::types::{JobId, JobState, SubmitRequest, SubmitResponse};

const API_URL: &str = "https://api.sentio.dev/v1";

/// Read-only view of a remote job, as seen by the polling loop.
///
/// Implemented by [`SentioClient`] for the real service and by in-memory
/// mocks in waiter tests. Each call covers a single HTTP round trip and may
/// fail with a transport-level [`ApiError`].
pub trait StatusSource {
    /// Fetch the current state of a job.
    async fn job_state(&self, job_id: &JobId) -> Result<JobState, ApiError>;

    /// Fetch the raw prediction payload of a completed job.
    ///
    /// Only valid once `job_state` reported `Completed`. The payload is
    /// returned unparsed; shape validation belongs to the aggregator.
    async fn predictions(&self, job_id: &JobId) -> Result<serde_json::Value, ApiError>;
}

pub struct SentioClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl SentioClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, API_URL.to_string())
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self {
            api_key,
            client,
            base_url,
        }
    }

    /// Submit text for analysis and return the id of the created job.
    ///
    /// Submission is a single shot: the waiter retries status polls, never
    /// the submission itself.
    pub async fn submit(&self, req: &SubmitRequest) -> Result<JobId, ApiError> {
        let response = self
            .client
            .post(format!("{}/jobs", self.base_url))
            .header("x-api-key", &self.api_key)
            .json(req)
            .send()
            .await?;

        let response = check_status(response).await?;
        let body = response.json::<SubmitResponse>().await?;
        Ok(body.job_id)
    }
}

impl StatusSource for SentioClient {
    async fn job_state(&self, job_id: &JobId) -> Result<JobState, ApiError> {
        let response = self
            .client
            .get(format!("{}/jobs/{}", self.base_url, job_id))
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json::<JobState>().await?)
    }

    async fn predictions(&self, job_id: &JobId) -> Result<serde_json::Value, ApiError> {
        let response = self
            .client
            .get(format!("{}/jobs/{}/predictions", self.base_url, job_id))
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json::<serde_json::Value>().await?)
    }
}

/// Map non-2xx responses to [`ApiError`], passing successful ones through.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .map(|secs| secs * 1000)
            .unwrap_or(1000);
        return Err(ApiError::RateLimited {
            retry_after_ms: retry_after,
        });
    }

    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(ApiError::ApiError {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response)
}
