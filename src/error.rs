use thiserror::Error;

use crate::aggregate::AggregateError;
use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum SentioError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("No input text supplied. Pass TEXT or --file.")]
    NoInput,

    #[error("Analysis API error: {0}")]
    Api(#[from] ApiError),

    #[error("Aggregation error: {0}")]
    Aggregate(#[from] AggregateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
