//! Region Capture Module
//!
//! Turns a user-drawn selection on a displayed image or document page into a
//! standalone JPEG at the source's native resolution.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fair_capture::capture::{capture, DisplayGeometry, Rotation, SelectionRegion, SourceDocument};
//!
//! let source = SourceDocument::from_upload(&bytes, Some("image/png"), None, DisplayGeometry::new(800.0, 600.0), None)?;
//! let request = capture(&source, &SelectionRegion::new(10.0, 10.0, 200.0, 40.0), Rotation::Deg90, 90)?;
//! assert_eq!(request.file_name, "cropped.jpg");
//! ```

mod engine;
mod geometry;
#[cfg(feature = "pdf")]
mod pdf;
mod raster;
mod source;
mod types;

pub use engine::RenderEngine;
pub use geometry::{clamp_page, scale_factors, to_native};
#[cfg(feature = "pdf")]
pub use pdf::MuPdfRasterizer;
pub use raster::{capture, capture_with, encode_jpeg, rotate};
pub use source::{PageRasterizer, SourceDocument, SourceKind};
pub use types::{
    CaptureError, DisplayGeometry, ExtractionRequest, NativeRect, Rotation, SelectionRegion,
    CAPTURE_FILE_NAME, DEFAULT_JPEG_QUALITY,
};

#[cfg(test)]
pub(crate) use source::ImagePages;
