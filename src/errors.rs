use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Environment variable {0} is set but empty")]
    EmptyEnv(String),
    #[error("Environment variable {0} contains invalid Unicode")]
    InvalidEnv(String),
    #[error("Environment variable {name} has an invalid value: {reason}")]
    InvalidValue { name: String, reason: String },
    #[error("Backend client error: {0}")]
    Backend(#[from] crate::api::ApiError),
    #[error("Server error: {0}")]
    Server(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
