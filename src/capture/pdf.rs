//! MuPDF-backed page rasterizer
//!
//! MuPDF documents are not thread-safe, so the raw bytes are kept and a fresh
//! document is opened for every render, serialized behind a mutex.

use std::sync::Arc;

use image::{DynamicImage, RgbImage};
use mupdf::{Colorspace, Document, Matrix};
use parking_lot::Mutex;

use super::source::PageRasterizer;
use super::types::CaptureError;

/// Render scale applied to PDF points (72 dpi) to obtain native pixels
pub const PDF_RENDER_SCALE: f32 = 2.0;

const PDF_MIME: &str = "application/pdf";

pub struct MuPdfRasterizer {
    data: Arc<Vec<u8>>,
    page_count: usize,
    lock: Mutex<()>,
}

impl MuPdfRasterizer {
    /// Open a PDF from bytes and cache its page count
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, CaptureError> {
        let doc = Document::from_bytes(&data, PDF_MIME).map_err(to_capture_error)?;
        let page_count = doc.page_count().map_err(to_capture_error)?.max(0) as usize;

        tracing::debug!("Opened PDF source with {} pages", page_count);

        Ok(Self {
            data: Arc::new(data),
            page_count,
            lock: Mutex::new(()),
        })
    }
}

impl PageRasterizer for MuPdfRasterizer {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn render_page(&self, page_index: usize) -> Result<DynamicImage, CaptureError> {
        if page_index >= self.page_count {
            return Err(CaptureError::RasterizationFailed(format!(
                "page {} out of range (document has {} pages)",
                page_index + 1,
                self.page_count
            )));
        }

        let _guard = self.lock.lock();
        let doc = Document::from_bytes(&self.data, PDF_MIME).map_err(to_capture_error)?;
        let page = doc.load_page(page_index as i32).map_err(to_capture_error)?;

        let matrix = Matrix::new_scale(PDF_RENDER_SCALE, PDF_RENDER_SCALE);
        let colorspace = Colorspace::device_rgb();
        let pixmap = page
            .to_pixmap(&matrix, &colorspace, false, true)
            .map_err(to_capture_error)?;

        pixmap_to_image(&pixmap)
    }
}

fn pixmap_to_image(pixmap: &mupdf::Pixmap) -> Result<DynamicImage, CaptureError> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize;

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let r = samples.get(offset).copied().unwrap_or(255);
            let g = samples.get(offset + 1).copied().unwrap_or(255);
            let b = samples.get(offset + 2).copied().unwrap_or(255);
            rgb.extend_from_slice(&[r, g, b]);
        }
    }

    RgbImage::from_raw(width, height, rgb)
        .map(DynamicImage::ImageRgb8)
        .ok_or_else(|| CaptureError::RasterizationFailed("Failed to create page buffer".to_string()))
}

fn to_capture_error(err: mupdf::Error) -> CaptureError {
    CaptureError::RasterizationFailed(err.to_string())
}
