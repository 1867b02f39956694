use thiserror::Error;

/// Failure of a single backend call. `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("Unexpected response from server: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ApiError::Network("Request timed out".to_string());
        }
        ApiError::Network(err.to_string())
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
