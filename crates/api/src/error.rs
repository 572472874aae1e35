use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Generation failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "Network error. Check your connection.",
            ApiError::Status { .. } => "Failed to generate reply. Please try again.",
            ApiError::Validation(_) => "Please provide email content.",
            ApiError::InvalidBaseUrl(_) => "The API address is not configured correctly.",
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::ApiError;

    #[test]
    fn status_errors_expose_their_code() {
        let err = ApiError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(
            err.user_message(),
            "Failed to generate reply. Please try again."
        );
    }

    #[test]
    fn validation_errors_have_no_status() {
        let err = ApiError::Validation("email content is empty".to_string());
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("email content is empty"));
    }
}
