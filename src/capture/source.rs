//! Capture sources
//!
//! A source is either a decoded raster image or a paginated document that is
//! rendered one page at a time.

use image::DynamicImage;

use super::geometry::clamp_page;
use super::types::{CaptureError, DisplayGeometry};

/// Renders pages of a paginated document at native resolution
pub trait PageRasterizer: Send + Sync {
    /// Number of pages (0 while the document is still loading)
    fn page_count(&self) -> usize;

    /// Render a page (0-indexed)
    fn render_page(&self, page_index: usize) -> Result<DynamicImage, CaptureError>;
}

/// Kind of uploaded source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Image,
    Pdf,
}

impl SourceKind {
    /// Detect from MIME type
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.trim().to_ascii_lowercase();
        if mime == "application/pdf" {
            Some(Self::Pdf)
        } else if mime.starts_with("image/") {
            Some(Self::Image)
        } else {
            None
        }
    }

    /// Detect from magic bytes
    pub fn from_magic_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"%PDF") {
            return Some(Self::Pdf);
        }
        image::guess_format(bytes).ok().map(|_| Self::Image)
    }

    /// Detect using the declared content type, then the file name, then the bytes
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>, bytes: &[u8]) -> Option<Self> {
        content_type
            .filter(|ct| *ct != "application/octet-stream")
            .and_then(Self::from_mime)
            .or_else(|| {
                file_name
                    .and_then(|name| mime_guess::from_path(name).first())
                    .and_then(|mime| Self::from_mime(mime.essence_str()))
            })
            .or_else(|| Self::from_magic_bytes(bytes))
    }
}

enum SourceContent {
    Raster(DynamicImage),
    Paged {
        pages: Box<dyn PageRasterizer>,
        page_number: usize,
    },
}

/// Source image or document plus the geometry it is displayed at
pub struct SourceDocument {
    content: SourceContent,
    display: DisplayGeometry,
}

impl SourceDocument {
    /// Wrap an already decoded image
    pub fn raster(image: DynamicImage, display: DisplayGeometry) -> Self {
        Self {
            content: SourceContent::Raster(image),
            display,
        }
    }

    /// Wrap a paginated document, starting on the given 1-based page
    pub fn paged(pages: Box<dyn PageRasterizer>, page_number: usize, display: DisplayGeometry) -> Self {
        let page_number = clamp_page(page_number, pages.page_count());
        Self {
            content: SourceContent::Paged { pages, page_number },
            display,
        }
    }

    /// Build a source from uploaded bytes
    pub fn from_upload(
        data: &[u8],
        content_type: Option<&str>,
        file_name: Option<&str>,
        display: DisplayGeometry,
        page_number: Option<usize>,
    ) -> Result<Self, CaptureError> {
        match SourceKind::detect(content_type, file_name, data) {
            Some(SourceKind::Image) => {
                let image = image::load_from_memory(data).map_err(|e| {
                    CaptureError::RasterizationFailed(format!("Failed to decode image: {}", e))
                })?;
                Ok(Self::raster(image, display))
            }
            Some(SourceKind::Pdf) => Self::from_pdf(data, display, page_number.unwrap_or(1)),
            None => Err(CaptureError::UnsupportedSource(
                "Unsupported file type. Please select an image or PDF.".to_string(),
            )),
        }
    }

    #[cfg(feature = "pdf")]
    fn from_pdf(data: &[u8], display: DisplayGeometry, page_number: usize) -> Result<Self, CaptureError> {
        let pages = super::pdf::MuPdfRasterizer::from_bytes(data.to_vec())?;
        Ok(Self::paged(Box::new(pages), page_number, display))
    }

    #[cfg(not(feature = "pdf"))]
    fn from_pdf(_data: &[u8], _display: DisplayGeometry, _page_number: usize) -> Result<Self, CaptureError> {
        Err(CaptureError::UnsupportedSource(
            "PDF sources require the `pdf` feature".to_string(),
        ))
    }

    pub fn display(&self) -> DisplayGeometry {
        self.display
    }

    pub fn is_paginated(&self) -> bool {
        matches!(self.content, SourceContent::Paged { .. })
    }

    /// Current 1-based page (always 1 for raster sources)
    pub fn page_number(&self) -> usize {
        match &self.content {
            SourceContent::Raster(_) => 1,
            SourceContent::Paged { page_number, .. } => *page_number,
        }
    }

    pub fn page_count(&self) -> usize {
        match &self.content {
            SourceContent::Raster(_) => 1,
            SourceContent::Paged { pages, .. } => pages.page_count(),
        }
    }

    /// Move to another page. Returns the clamped page number.
    ///
    /// Selections are drawn per page, so callers must discard any selection
    /// made on the previous page.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        if let SourceContent::Paged { pages, page_number } = &mut self.content {
            *page_number = clamp_page(page, pages.page_count());
            *page_number
        } else {
            1
        }
    }

    /// Image of the current page at native resolution
    pub(crate) fn rasterize(&self) -> Result<std::borrow::Cow<'_, DynamicImage>, CaptureError> {
        match &self.content {
            SourceContent::Raster(image) => Ok(std::borrow::Cow::Borrowed(image)),
            SourceContent::Paged { pages, page_number } => {
                let count = pages.page_count();
                if count == 0 {
                    return Err(CaptureError::SourceNotReady(
                        "document pages are not loaded yet".to_string(),
                    ));
                }
                let index = clamp_page(*page_number, count) - 1;
                pages.render_page(index).map(std::borrow::Cow::Owned)
            }
        }
    }
}

impl std::fmt::Debug for SourceDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceDocument")
            .field("paginated", &self.is_paginated())
            .field("page_number", &self.page_number())
            .field("page_count", &self.page_count())
            .field("display", &self.display)
            .finish()
    }
}

/// Paginated source backed by pre-rendered images
#[cfg(test)]
pub(crate) struct ImagePages(pub Vec<DynamicImage>);

#[cfg(test)]
impl PageRasterizer for ImagePages {
    fn page_count(&self) -> usize {
        self.0.len()
    }

    fn render_page(&self, page_index: usize) -> Result<DynamicImage, CaptureError> {
        self.0
            .get(page_index)
            .cloned()
            .ok_or_else(|| CaptureError::RasterizationFailed(format!("no page {}", page_index)))
    }
}
