// src/error.rs
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::message::ErrorBody;
use crate::services::gemini::UpstreamError;

pub const NO_MESSAGE: &str = "No message provided";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    /// Upstream answered with a non-success status.
    #[error("Gemini API failed")]
    Upstream { details: String },

    /// Upstream could not be reached or its body could not be read.
    #[error("Server error")]
    Transport { details: String },

    #[error("Something went wrong!")]
    Internal { details: String },
}

impl AppError {
    pub fn no_message() -> Self {
        AppError::BadRequest(NO_MESSAGE.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { .. } | AppError::Transport { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorBody {
        let details = match self {
            AppError::BadRequest(_) => None,
            AppError::Upstream { details }
            | AppError::Transport { details }
            | AppError::Internal { details } => Some(details.clone()),
        };
        ErrorBody { error: self.to_string(), details }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Rejected { body, .. } => AppError::Upstream { details: body },
            UpstreamError::Transport(e) => AppError::Transport { details: e.to_string() },
        }
    }
}

// A body without a JSON content type, or JSON without a usable string
// `message`, carries no message. Only unparseable JSON is a server-side failure.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) | JsonRejection::JsonDataError(_) => {
                AppError::no_message()
            }
            other => AppError::Internal { details: other.body_text() },
        }
    }
}
