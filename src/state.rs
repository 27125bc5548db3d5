//! Application state management

use std::sync::Arc;

use crate::capture::RenderEngine;
use crate::config::Config;
use crate::field::{CaptureSettings, ControllerRegistry, FieldExtractionController, FieldId};
use crate::form::FormStore;
use crate::recognition::RecognitionService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    recognizer: Arc<dyn RecognitionService>,
    store: FormStore,
    controllers: ControllerRegistry,
    engine: &'static RenderEngine,
}

impl AppState {
    /// Create a new application state
    ///
    /// Captures use the process-wide render engine, which must be
    /// initialized separately before paginated sources can be captured.
    pub fn new(config: Config, recognizer: Arc<dyn RecognitionService>) -> Self {
        Self::with_engine(config, recognizer, RenderEngine::global())
    }

    pub fn with_engine(
        config: Config,
        recognizer: Arc<dyn RecognitionService>,
        engine: &'static RenderEngine,
    ) -> Self {
        let store = FormStore::new();
        let settings = CaptureSettings {
            engine,
            jpeg_quality: config.capture.jpeg_quality,
        };
        let controllers = ControllerRegistry::new(recognizer.clone(), store.clone(), settings);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                recognizer,
                store,
                controllers,
                engine,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the recognition service
    pub fn recognizer(&self) -> &dyn RecognitionService {
        self.inner.recognizer.as_ref()
    }

    /// Get the form store
    pub fn store(&self) -> &FormStore {
        &self.inner.store
    }

    /// Get the controller registry
    pub fn controllers(&self) -> &ControllerRegistry {
        &self.inner.controllers
    }

    /// Get the render engine used for captures
    pub fn render_engine(&self) -> &'static RenderEngine {
        self.inner.engine
    }

    /// Controller for one field
    pub fn controller(&self, field_id: &FieldId) -> Arc<FieldExtractionController> {
        self.inner.controllers.controller(field_id)
    }
}
