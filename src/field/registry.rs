//! Lazily created controllers, one per field

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::controller::{CaptureSettings, FieldExtractionController};
use super::types::FieldSpec;
use crate::form::{FieldId, FormStore};
use crate::recognition::RecognitionService;

pub struct ControllerRegistry {
    recognizer: Arc<dyn RecognitionService>,
    store: FormStore,
    settings: CaptureSettings,
    specs: RwLock<HashMap<FieldId, FieldSpec>>,
    controllers: Mutex<HashMap<FieldId, Arc<FieldExtractionController>>>,
}

impl ControllerRegistry {
    pub fn new(
        recognizer: Arc<dyn RecognitionService>,
        store: FormStore,
        settings: CaptureSettings,
    ) -> Self {
        Self {
            recognizer,
            store,
            settings,
            specs: RwLock::new(HashMap::new()),
            controllers: Mutex::new(HashMap::new()),
        }
    }

    /// Configure a field before its controller is first used.
    ///
    /// Returns false when the controller already exists and keeps its spec.
    pub fn configure(&self, field_id: FieldId, spec: FieldSpec) -> bool {
        if self.controllers.lock().contains_key(&field_id) {
            return false;
        }
        self.specs.write().insert(field_id, spec);
        true
    }

    /// Controller for `field_id`, created on first use
    pub fn controller(&self, field_id: &FieldId) -> Arc<FieldExtractionController> {
        let mut controllers = self.controllers.lock();
        if let Some(controller) = controllers.get(field_id) {
            return controller.clone();
        }

        let spec = self.specs.read().get(field_id).copied().unwrap_or_default();
        let controller = Arc::new(FieldExtractionController::new(
            field_id.clone(),
            spec,
            self.recognizer.clone(),
            self.store.clone(),
            self.settings,
        ));
        controllers.insert(field_id.clone(), controller.clone());
        controller
    }

    pub fn len(&self) -> usize {
        self.controllers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::RenderEngine;
    use crate::field::MergePolicy;
    use crate::recognition::MockRecognizer;

    fn registry() -> ControllerRegistry {
        ControllerRegistry::new(
            Arc::new(MockRecognizer::texts(&[])),
            FormStore::new(),
            CaptureSettings {
                engine: RenderEngine::global(),
                jpeg_quality: 90,
            },
        )
    }

    #[test]
    fn test_controller_reused() {
        let registry = registry();
        let a = registry.controller(&FieldId::header(0));
        let b = registry.controller(&FieldId::header(0));
        assert!(Arc::ptr_eq(&a, &b));
        registry.controller(&FieldId::header(1));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_configure_before_use() {
        let registry = registry();
        let field: FieldId = "coc-numbers".parse().unwrap();
        assert!(registry.configure(field.clone(), FieldSpec::multi_value(MergePolicy::Append)));

        let controller = registry.controller(&field);
        assert!(controller.spec().multi_value);

        assert!(!registry.configure(field.clone(), FieldSpec::default()));
        assert!(registry.controller(&field).spec().multi_value);
    }
}
