//! Field controller types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::merge::MergePolicy;
use crate::capture::CaptureError;
use crate::error::ErrorKind;
use crate::form::{FieldId, FieldValue, FormError};
use crate::recognition::RecognitionError;

/// Message shown when the runtime has no speech recognition
pub const SPEECH_UNSUPPORTED_MESSAGE: &str = "Speech recognition not supported in this browser.";

/// Message shown after the prefix command was heard
pub const PREFIX_ARMED_MESSAGE: &str = "Next recognized value will be added as a prefix.";

/// Per-field configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Policy used when the field is not armed for a prefix
    #[serde(default)]
    pub default_policy: MergePolicy,
    /// Field holds a list of entries rather than one string
    #[serde(default)]
    pub multi_value: bool,
}

impl FieldSpec {
    pub fn multi_value(policy: MergePolicy) -> Self {
        Self {
            default_policy: policy,
            multi_value: true,
        }
    }
}

/// Result of a speech recognition session as reported by the client
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SpeechEvent {
    Result { transcript: String },
    Error { error: Option<String> },
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Dismissible message attached to one field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldNotice {
    pub level: NoticeLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl FieldNotice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            kind: None,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }

    pub fn error(err: &FieldError) -> Self {
        Self {
            level: NoticeLevel::Error,
            kind: Some(err.kind()),
            message: err.to_string(),
            raised_at: Utc::now(),
        }
    }
}

/// What a client renders for one field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldStatus {
    pub field_id: FieldId,
    pub value: FieldValue,
    pub loading: bool,
    pub armed_for_prefix: bool,
    pub notice: Option<FieldNotice>,
}

/// A value written into a field by a recognition event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldUpdate {
    pub field_id: FieldId,
    pub value: FieldValue,
    pub policy: MergePolicy,
    pub recognized: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum SpeechOutcome {
    Applied(FieldUpdate),
    PrefixArmed { notice: FieldNotice },
}

#[derive(Error, Debug)]
pub enum FieldError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Recognition(#[from] RecognitionError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("{}", SPEECH_UNSUPPORTED_MESSAGE)]
    SpeechUnsupported,

    #[error("Speech recognition error: {0}")]
    Speech(String),

    #[error("Capture task failed: {0}")]
    Task(String),
}

impl FieldError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Capture(e) => e.into(),
            Self::Recognition(e) => e.into(),
            Self::Form(e) => e.into(),
            Self::SpeechUnsupported => ErrorKind::SpeechUnsupported,
            Self::Speech(_) => ErrorKind::UnknownError,
            Self::Task(_) => ErrorKind::RasterizationFailed,
        }
    }
}
