//! Field Extraction Controller
//!
//! Drives one field from a user gesture to a merged value:
//! region capture or speech transcript, recognition, cleanup, merge.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::arm::ArmState;
use super::merge::MergePolicy;
use super::types::{
    FieldError, FieldNotice, FieldSpec, FieldStatus, FieldUpdate, SpeechEvent, SpeechOutcome,
    PREFIX_ARMED_MESSAGE,
};
use crate::capture::{capture_with, RenderEngine, Rotation, SelectionRegion, SourceDocument};
use crate::extraction::{cleanup_spoken, is_prefix_command};
use crate::form::{FieldId, FieldValue, FormStore};
use crate::recognition::RecognitionService;

/// How regions are rasterized before recognition
#[derive(Clone, Copy)]
pub struct CaptureSettings {
    pub engine: &'static RenderEngine,
    pub jpeg_quality: u8,
}

/// Controller for a single field.
///
/// Loading flag, notice and arm state belong to this field only, so
/// controllers of different fields run independently. Two recognitions in
/// flight for the same field are not coordinated: both merge, in whichever
/// order they complete.
pub struct FieldExtractionController {
    field_id: FieldId,
    spec: FieldSpec,
    recognizer: Arc<dyn RecognitionService>,
    store: FormStore,
    settings: CaptureSettings,
    arm: Mutex<ArmState>,
    notice: Mutex<Option<FieldNotice>>,
    in_flight: AtomicUsize,
}

/// Marks the field as loading until dropped
struct LoadingGuard<'a>(&'a AtomicUsize);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FieldExtractionController {
    pub fn new(
        field_id: FieldId,
        spec: FieldSpec,
        recognizer: Arc<dyn RecognitionService>,
        store: FormStore,
        settings: CaptureSettings,
    ) -> Self {
        Self {
            field_id,
            spec,
            recognizer,
            store,
            settings,
            arm: Mutex::new(ArmState::default()),
            notice: Mutex::new(None),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn field_id(&self) -> &FieldId {
        &self.field_id
    }

    pub fn spec(&self) -> FieldSpec {
        self.spec
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn notice(&self) -> Option<FieldNotice> {
        self.notice.lock().clone()
    }

    pub fn dismiss_notice(&self) {
        *self.notice.lock() = None;
    }

    pub async fn status(&self) -> Result<FieldStatus, FieldError> {
        Ok(FieldStatus {
            field_id: self.field_id.clone(),
            value: self.store.value(&self.field_id).await?,
            loading: self.is_loading(),
            armed_for_prefix: self.arm.lock().is_armed(),
            notice: self.notice(),
        })
    }

    /// Recognize the selected region of `source` and merge the text.
    ///
    /// An empty selection fails before anything is rendered or sent.
    pub async fn on_region_confirmed(
        &self,
        source: SourceDocument,
        region: SelectionRegion,
        rotation: Rotation,
    ) -> Result<FieldUpdate, FieldError> {
        if region.is_empty() {
            return self.record(Err(crate::capture::CaptureError::EmptySelection.into()));
        }

        let _loading = self.begin();
        let result = self.recognize_region(source, region, rotation).await;
        self.record(result)
    }

    async fn recognize_region(
        &self,
        source: SourceDocument,
        region: SelectionRegion,
        rotation: Rotation,
    ) -> Result<FieldUpdate, FieldError> {
        let CaptureSettings {
            engine,
            jpeg_quality,
        } = self.settings;

        let request = tokio::task::spawn_blocking(move || {
            capture_with(engine, &source, &region, rotation, jpeg_quality)
        })
        .await
        .map_err(|e| FieldError::Task(e.to_string()))??;

        tracing::debug!(
            field = %self.field_id,
            request_id = %request.id,
            bytes = request.data.len(),
            "Sending region for recognition"
        );

        let recognized = self.recognizer.recognize_region(&request).await?;

        tracing::info!(
            field = %self.field_id,
            request_id = %request.id,
            chars = recognized.text.len(),
            "Region recognized"
        );

        self.merge(recognized.text).await
    }

    /// Apply a finished speech session to this field.
    ///
    /// The prefix command arms the field instead of writing text.
    pub async fn on_speech_result(&self, event: SpeechEvent) -> Result<SpeechOutcome, FieldError> {
        let transcript = match event {
            SpeechEvent::Unsupported => return self.record(Err(FieldError::SpeechUnsupported)),
            SpeechEvent::Error { error } => {
                let message = error.unwrap_or_else(|| "unknown error".to_string());
                return self.record(Err(FieldError::Speech(message)));
            }
            SpeechEvent::Result { transcript } => transcript,
        };

        if is_prefix_command(&transcript) {
            self.arm.lock().arm(self.field_id.clone());
            let notice = FieldNotice::info(PREFIX_ARMED_MESSAGE);
            *self.notice.lock() = Some(notice.clone());
            tracing::debug!(field = %self.field_id, "Armed for prefix");
            return Ok(SpeechOutcome::PrefixArmed { notice });
        }

        let _loading = self.begin();
        let result = self.merge(cleanup_spoken(&transcript)).await;
        self.record(result).map(SpeechOutcome::Applied)
    }

    /// Overwrite the field with typed text. Does not touch the arm state.
    pub async fn set_manual(&self, text: String) -> Result<FieldValue, FieldError> {
        let multi_value = self.spec.multi_value;
        let value = self
            .store
            .update(&self.field_id, |value| {
                MergePolicy::Replace.apply(value, &text, multi_value)
            })
            .await?;
        Ok(value)
    }

    /// Merge recognized text, consuming a pending prefix arm
    async fn merge(&self, recognized: String) -> Result<FieldUpdate, FieldError> {
        let policy = self
            .arm
            .lock()
            .consume(&self.field_id)
            .unwrap_or(self.spec.default_policy);

        let multi_value = self.spec.multi_value;
        let value = self
            .store
            .update(&self.field_id, |value| policy.apply(value, &recognized, multi_value))
            .await?;

        Ok(FieldUpdate {
            field_id: self.field_id.clone(),
            value,
            policy,
            recognized,
        })
    }

    fn begin(&self) -> LoadingGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.dismiss_notice();
        LoadingGuard(&self.in_flight)
    }

    /// Show a failure that happened outside the controller (e.g. decoding
    /// the uploaded source) on this field
    pub fn record_failure(&self, err: &FieldError) {
        tracing::warn!(field = %self.field_id, kind = ?err.kind(), "Extraction failed: {}", err);
        *self.notice.lock() = Some(FieldNotice::error(err));
    }

    fn record<T>(&self, result: Result<T, FieldError>) -> Result<T, FieldError> {
        if let Err(err) = &result {
            self.record_failure(err);
        }
        result
    }
}
