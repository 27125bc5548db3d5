//! Process-wide render engine state
//!
//! Paginated sources are rasterized by a single shared engine that is set up
//! once at startup. Captures check readiness instead of assuming the setup
//! already ran.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::OnceLock;

use super::types::CaptureError;

static GLOBAL_ENGINE: OnceLock<RenderEngine> = OnceLock::new();

/// Readiness and usage counters for the page rasterizer
#[derive(Debug, Default)]
pub struct RenderEngine {
    ready: AtomicBool,
    pages_rendered: AtomicUsize,
}

impl RenderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared engine used by [`super::capture`]
    pub fn global() -> &'static RenderEngine {
        GLOBAL_ENGINE.get_or_init(RenderEngine::new)
    }

    /// Mark the engine ready. Idempotent.
    pub fn initialize(&self) {
        if !self.ready.swap(true, Ordering::AcqRel) {
            tracing::info!(
                "Render engine initialized (pdf support: {})",
                cfg!(feature = "pdf")
            );
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn ensure_ready(&self) -> Result<(), CaptureError> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(CaptureError::SourceNotReady(
                "document renderer is not initialized yet".to_string(),
            ))
        }
    }

    pub(crate) fn record_page_render(&self) {
        self.pages_rendered.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of pages rasterized since startup
    pub fn pages_rendered(&self) -> usize {
        self.pages_rendered.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_starts_not_ready() {
        let engine = RenderEngine::new();
        assert!(!engine.is_ready());
        assert!(matches!(
            engine.ensure_ready(),
            Err(CaptureError::SourceNotReady(_))
        ));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let engine = RenderEngine::new();
        engine.initialize();
        engine.initialize();
        assert!(engine.is_ready());
        assert!(engine.ensure_ready().is_ok());
    }

    #[test]
    fn test_global_is_shared() {
        let a = RenderEngine::global() as *const RenderEngine;
        let b = RenderEngine::global() as *const RenderEngine;
        assert_eq!(a, b);
    }
}
