//! Recognition Module
//!
//! Client side of the remote OCR service. Two endpoints are consumed:
//!
//! - `POST /api/ocr-image` with a `cropped_image` part for captured regions
//! - `POST /api/extract-text` with a `file` part for whole documents
//!
//! Both answer `{ "extracted_text": "..." }`. Failures are classified as
//! server, network or unknown errors and are never retried.

mod client;
mod types;

pub use client::{HttpRecognitionClient, RecognitionService, EXTRACT_TEXT_PATH, OCR_IMAGE_PATH};
pub use types::{RecognitionError, RecognizedText};

#[cfg(test)]
pub(crate) use client::MockRecognizer;
