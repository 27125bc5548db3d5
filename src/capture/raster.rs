//! Crop, rotate and encode a selected region

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use uuid::Uuid;

use super::engine::RenderEngine;
use super::geometry::to_native;
use super::source::SourceDocument;
use super::types::{
    CaptureError, ExtractionRequest, Rotation, SelectionRegion, CAPTURE_FILE_NAME,
};

/// Capture a region using the process-wide render engine
pub fn capture(
    source: &SourceDocument,
    region: &SelectionRegion,
    rotation: Rotation,
    quality: u8,
) -> Result<ExtractionRequest, CaptureError> {
    capture_with(RenderEngine::global(), source, region, rotation, quality)
}

/// Capture a region of `source` and encode it for recognition.
///
/// Validation happens before any rendering: an empty selection never reaches
/// the rasterizer, let alone the network.
pub fn capture_with(
    engine: &RenderEngine,
    source: &SourceDocument,
    region: &SelectionRegion,
    rotation: Rotation,
    quality: u8,
) -> Result<ExtractionRequest, CaptureError> {
    if region.is_empty() {
        return Err(CaptureError::EmptySelection);
    }
    if source.is_paginated() {
        engine.ensure_ready()?;
    }
    if !source.display().is_known() {
        return Err(CaptureError::SourceNotReady(
            "display size is not known yet".to_string(),
        ));
    }

    let page = source.rasterize()?;
    if source.is_paginated() {
        engine.record_page_render();
    }

    let rect = to_native(region, source.display(), page.width(), page.height())?;
    tracing::debug!(
        "Capturing native rect {:?} from page {} ({}x{}), rotation {}",
        rect,
        source.page_number(),
        page.width(),
        page.height(),
        rotation.degrees()
    );

    let cropped = page.crop_imm(rect.x, rect.y, rect.width, rect.height);
    let output = rotate(cropped, rotation);
    let data = encode_jpeg(&output, quality)?;

    Ok(ExtractionRequest {
        id: Uuid::new_v4(),
        data,
        file_name: CAPTURE_FILE_NAME,
        mime_type: "image/jpeg",
        width: output.width(),
        height: output.height(),
    })
}

/// Rotate clockwise about the image center
pub fn rotate(image: DynamicImage, rotation: Rotation) -> DynamicImage {
    match rotation {
        Rotation::Deg0 => image,
        Rotation::Deg90 => image.rotate90(),
        Rotation::Deg180 => image.rotate180(),
        Rotation::Deg270 => image.rotate270(),
    }
}

/// Encode as baseline JPEG. JPEG has no alpha channel, so the image is
/// flattened to RGB first.
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, CaptureError> {
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buffer), quality.clamp(1, 100));
    rgb.write_with_encoder(encoder)
        .map_err(|e| CaptureError::RasterizationFailed(format!("Failed to encode region: {}", e)))?;
    Ok(buffer)
}
