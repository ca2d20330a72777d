use crate::api::error::ApiError;
use crate::logging::LogLevel;

#[derive(Debug, Clone)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify_fetch_error(&self, error: &ApiError) -> LogLevel {
        match error {
            // Non-critical: the next poll will try again
            ApiError::Http { status, .. } if *status == 429 => LogLevel::Debug,
            ApiError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Warn,

            // Critical: wrong queue, wrong URL, incompatible backend
            ApiError::Http { .. } => LogLevel::Error,
            ApiError::Decode(_) => LogLevel::Error,

            // Network issues - usually temporary
            ApiError::Network(_) | ApiError::Timeout => LogLevel::Warn,
        }
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}
