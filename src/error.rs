use thiserror::Error;

use crate::models::Role;

pub const INVALID_TOKEN: &str = "Invalid token";
pub const NO_TOKEN_PROVIDED: &str = "No token provided";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The bearer token was rejected or missing. Handled by forcing a logout.
    #[error("{0}")]
    Authentication(String),

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to encode request body: {0}")]
    Encode(serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("This action requires the {0} role")]
    RoleRequired(Role),
}

impl ApiError {
    /// Builds the error for a failed response, classifying authentication failures.
    pub fn from_status(status: u16, message: String) -> Self {
        if message == INVALID_TOKEN || message == NO_TOKEN_PROVIDED {
            ApiError::Authentication(message)
        } else {
            ApiError::Status { status, message }
        }
    }

    pub fn missing_token() -> Self {
        ApiError::Authentication(NO_TOKEN_PROVIDED.to_string())
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Authentication(_))
    }
}
