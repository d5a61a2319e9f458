use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    RateLimited,
    Internal,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            400 | 409 | 422 => Self::Validation,
            429 => Self::RateLimited,
            _ => Self::Internal,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Builds an error from a failed response. The backend answers with either
    /// `{"error": ...}` or `{"message": ...}`; anything else is kept verbatim.
    pub fn from_response(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            error: Option<String>,
            message: Option<String>,
            detail: Option<String>,
        }

        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.error.or(body.message).or(body.detail))
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    format!("request failed with status {status}")
                } else {
                    trimmed.to_string()
                }
            });

        Self::new(ErrorCode::from_status(status), message)
    }
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("slide {slide_id} has content that does not match layout `{layout_type}`: {reason}")]
    InvalidContent {
        slide_id: String,
        layout_type: String,
        reason: String,
    },
}
