//! Error kinds and the HTTP error body
//!
//! Every failure is reduced to a coarse [`ErrorKind`] that clients switch on;
//! the message is the error's display string.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::capture::CaptureError;
use crate::field::FieldError;
use crate::form::{FormError, IngestError};
use crate::recognition::RecognitionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    ServerError,
    NetworkError,
    UnknownError,
    EmptySelection,
    SourceNotReady,
    RasterizationFailed,
    SpeechUnsupported,
    EmptyDocument,
    InvalidRequest,
    NotFound,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            Self::ServerError => StatusCode::BAD_GATEWAY,
            Self::NetworkError => StatusCode::SERVICE_UNAVAILABLE,
            Self::UnknownError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::EmptySelection | Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::SourceNotReady => StatusCode::CONFLICT,
            Self::RasterizationFailed | Self::SpeechUnsupported | Self::EmptyDocument => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl From<&CaptureError> for ErrorKind {
    fn from(err: &CaptureError) -> Self {
        match err {
            CaptureError::EmptySelection => Self::EmptySelection,
            CaptureError::SourceNotReady(_) => Self::SourceNotReady,
            CaptureError::RasterizationFailed(_) => Self::RasterizationFailed,
            CaptureError::UnsupportedSource(_) => Self::InvalidRequest,
        }
    }
}

impl From<&RecognitionError> for ErrorKind {
    fn from(err: &RecognitionError) -> Self {
        match err {
            RecognitionError::Server { .. } => Self::ServerError,
            RecognitionError::Network(_) => Self::NetworkError,
            RecognitionError::Unknown(_) => Self::UnknownError,
        }
    }
}

impl From<&FormError> for ErrorKind {
    fn from(err: &FormError) -> Self {
        match err {
            FormError::RowNotFound(_) => Self::NotFound,
            FormError::NotATextColumn(_) => Self::InvalidRequest,
        }
    }
}

impl From<&IngestError> for ErrorKind {
    fn from(err: &IngestError) -> Self {
        match err {
            IngestError::Recognition(e) => e.into(),
            IngestError::EmptyDocument => Self::EmptyDocument,
            IngestError::Form(e) => e.into(),
        }
    }
}

/// Errors returned by HTTP handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Field(e) => e.kind(),
            Self::Ingest(e) => e.into(),
            Self::Form(e) => e.into(),
            Self::Capture(e) => e.into(),
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::NotFound(_) => ErrorKind::NotFound,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: ErrorKind,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = kind.status_code();

        if status.is_server_error() {
            tracing::error!(kind = ?kind, "Request failed: {}", self);
        } else {
            tracing::debug!(kind = ?kind, "Request rejected: {}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            kind,
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
