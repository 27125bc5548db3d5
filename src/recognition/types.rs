//! Recognition Types

use serde::{Deserialize, Serialize};

/// Text returned by the recognition service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecognizedText {
    pub text: String,
}

impl RecognizedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Body returned by both recognition endpoints
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecognitionResponse {
    #[serde(default)]
    pub extracted_text: Option<String>,
}

/// Error body returned on failure (`{"error": "..."}`)
#[derive(Debug, Deserialize)]
pub(crate) struct ServiceErrorBody {
    pub error: Option<String>,
}

/// Recognition errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum RecognitionError {
    /// The service answered with a non-success status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// No response was received
    #[error("Network error: {0}")]
    Network(String),

    #[error("{0}")]
    Unknown(String),
}

impl RecognitionError {
    /// Build a server error from the raw response body
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ServiceErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| body.trim().to_string());

        let message = if message.is_empty() {
            "no error details provided".to_string()
        } else {
            message
        };

        Self::Server { status, message }
    }
}
