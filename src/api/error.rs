//! Error handling for the monitoring API

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure: DNS, connection refused, TLS, etc.
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    /// The request did not complete within the client timeout.
    #[error("Request timed out")]
    Timeout,

    /// The response body was not the expected JSON.
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server answered with a non-success status.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(err)
        }
    }
}

impl ApiError {
    pub async fn from_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        ApiError::Http { status, message }
    }
}
