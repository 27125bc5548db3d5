//! Recognition Clients
//!
//! Defines the service trait and the HTTP client for the OCR backend.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use super::types::{RecognitionError, RecognitionResponse, RecognizedText};
use crate::capture::ExtractionRequest;
use crate::config::RecognitionConfig;

/// Path of the cropped-region endpoint
pub const OCR_IMAGE_PATH: &str = "/api/ocr-image";
/// Path of the whole-document endpoint
pub const EXTRACT_TEXT_PATH: &str = "/api/extract-text";

/// Remote text recognition
#[async_trait]
pub trait RecognitionService: Send + Sync {
    /// Recognize text in a captured region
    async fn recognize_region(
        &self,
        request: &ExtractionRequest,
    ) -> Result<RecognizedText, RecognitionError>;

    /// Extract all text from an uploaded document
    async fn extract_document(
        &self,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<RecognizedText, RecognitionError>;

    /// Check whether the service answers at all
    async fn is_available(&self) -> bool;
}

/// Client for the HTTP recognition backend
pub struct HttpRecognitionClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecognitionClient {
    pub fn new(config: &RecognitionConfig) -> Result<Self, RecognitionError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RecognitionError::Unknown(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post_file(&self, path: &str, form: Form) -> Result<RecognizedText, RecognitionError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_send_error)?;

        if !status.is_success() {
            tracing::warn!("Recognition service returned {} for {}", status, path);
            return Err(RecognitionError::from_response(status.as_u16(), &body));
        }

        let parsed: RecognitionResponse = serde_json::from_str(&body).map_err(|e| {
            RecognitionError::Unknown(format!("Failed to parse recognition response: {}", e))
        })?;

        Ok(RecognizedText::new(parsed.extracted_text.unwrap_or_default()))
    }
}

#[async_trait]
impl RecognitionService for HttpRecognitionClient {
    async fn recognize_region(
        &self,
        request: &ExtractionRequest,
    ) -> Result<RecognizedText, RecognitionError> {
        tracing::debug!(
            "Sending capture {} ({} bytes, {}x{}) for recognition",
            request.id,
            request.data.len(),
            request.width,
            request.height
        );

        let part = Part::bytes(request.data.clone())
            .file_name(request.file_name)
            .mime_str(request.mime_type)
            .map_err(|e| RecognitionError::Unknown(e.to_string()))?;

        self.post_file(OCR_IMAGE_PATH, Form::new().part("cropped_image", part))
            .await
    }

    async fn extract_document(
        &self,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<RecognizedText, RecognitionError> {
        tracing::debug!("Sending document '{}' ({} bytes) for extraction", file_name, data.len());

        let part = Part::bytes(data).file_name(file_name.to_string());
        self.post_file(EXTRACT_TEXT_PATH, Form::new().part("file", part))
            .await
    }

    async fn is_available(&self) -> bool {
        // Any HTTP answer means the service is reachable
        self.client.get(&self.base_url).send().await.is_ok()
    }
}

/// Anything that kept a response from arriving is a network error
fn classify_send_error(err: reqwest::Error) -> RecognitionError {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        RecognitionError::Network(format!(
            "Could not reach the recognition service: {}",
            err
        ))
    } else {
        RecognitionError::Unknown(err.to_string())
    }
}

/// Scripted recognizer for tests
#[cfg(test)]
pub(crate) struct MockRecognizer {
    responses: parking_lot::Mutex<std::collections::VecDeque<Result<RecognizedText, RecognitionError>>>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockRecognizer {
    pub fn new(responses: Vec<Result<RecognizedText, RecognitionError>>) -> Self {
        Self {
            responses: parking_lot::Mutex::new(responses.into()),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(RecognizedText::new(*t))).collect())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn next(&self) -> Result<RecognizedText, RecognitionError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(RecognitionError::Unknown("no scripted response".to_string())))
    }
}

#[cfg(test)]
#[async_trait]
impl RecognitionService for MockRecognizer {
    async fn recognize_region(
        &self,
        _request: &ExtractionRequest,
    ) -> Result<RecognizedText, RecognitionError> {
        self.next()
    }

    async fn extract_document(
        &self,
        _file_name: &str,
        _data: Vec<u8>,
    ) -> Result<RecognizedText, RecognitionError> {
        self.next()
    }

    async fn is_available(&self) -> bool {
        true
    }
}
