//! Field Extraction
//!
//! Each form field gets a [`FieldExtractionController`] that turns a user
//! gesture into a merged field value:
//!
//! - region selection: capture, rasterize, recognize remotely, merge
//! - speech: prefix command check, keyword cleanup, merge
//!
//! Failures become a dismissible [`FieldNotice`] on the field that raised
//! them and never touch other fields.

mod arm;
mod controller;
mod merge;
mod registry;
mod types;

pub use arm::ArmState;
pub use controller::{CaptureSettings, FieldExtractionController};
pub use merge::MergePolicy;
pub use registry::ControllerRegistry;
pub use types::{
    FieldError, FieldNotice, FieldSpec, FieldStatus, FieldUpdate, NoticeLevel, SpeechEvent,
    SpeechOutcome, PREFIX_ARMED_MESSAGE, SPEECH_UNSUPPORTED_MESSAGE,
};

pub use crate::form::{FieldId, FieldValue};
