//! Error type shared by every client operation.

use shared::{
    domain::SlideId,
    error::{ApiError, ErrorCode},
};
use thiserror::Error;

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned {status} ({code:?}): {message}")]
    Status {
        code: ErrorCode,
        status: u16,
        message: String,
    },
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("slide index {index} out of range for {len} slides")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown slide {0}")]
    UnknownSlide(SlideId),
}

impl ClientError {
    pub fn status(status: u16, body: &str) -> Self {
        let ApiError { code, message } = ApiError::from_response(status, body);
        Self::Status {
            code,
            status,
            message,
        }
    }

    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            Self::Status {
                code: ErrorCode::Unauthorized,
                ..
            }
        )
    }
}
