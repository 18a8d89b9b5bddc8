// src/errors.rs

use thiserror::Error;

/// Everything that can go wrong between the terminal and the backend.
#[derive(Debug, Error)]
pub enum MedmapError {
    #[error("Server error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging setup failed: {0}")]
    Logging(#[from] flexi_logger::FlexiLoggerError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type MedmapResult<T> = Result<T, MedmapError>;

impl MedmapError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        MedmapError::Config(msg.into())
    }

    pub fn api_error(status: u16, msg: impl Into<String>) -> Self {
        MedmapError::Api {
            status,
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = MedmapError::api_error(404, "Code not found");
        assert_eq!(err.to_string(), "Server error 404: Code not found");
    }

    #[test]
    fn test_config_error_display() {
        let err = MedmapError::config_error("api_base_url is required");
        assert_eq!(
            err.to_string(),
            "Configuration error: api_base_url is required"
        );
    }
}
