use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Whether the request never produced a response in time.
    pub fn is_timeout(&self) -> bool {
        match self {
            ApiError::Timeout(_) => true,
            ApiError::NetworkError(e) => e.is_timeout(),
            ApiError::InvalidRequest(_) => false,
        }
    }
}
