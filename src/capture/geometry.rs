//! Display to native coordinate mapping

use super::types::{CaptureError, DisplayGeometry, NativeRect, SelectionRegion};

/// Ratio of native pixels to displayed pixels along each axis
pub fn scale_factors(display: DisplayGeometry, native_width: u32, native_height: u32) -> (f64, f64) {
    (
        native_width as f64 / display.width,
        native_height as f64 / display.height,
    )
}

/// Map a display-space selection onto the source's native pixel grid.
///
/// Each component is scaled and rounded to the nearest pixel, then the
/// rectangle is clipped to the native bounds.
pub fn to_native(
    region: &SelectionRegion,
    display: DisplayGeometry,
    native_width: u32,
    native_height: u32,
) -> Result<NativeRect, CaptureError> {
    if region.is_empty() {
        return Err(CaptureError::EmptySelection);
    }
    if !display.is_known() {
        return Err(CaptureError::SourceNotReady(
            "display size is not known yet".to_string(),
        ));
    }

    let (scale_x, scale_y) = scale_factors(display, native_width, native_height);

    let x = round_px(region.x * scale_x).min(native_width as i64);
    let y = round_px(region.y * scale_y).min(native_height as i64);
    let width = round_px(region.width * scale_x);
    let height = round_px(region.height * scale_y);

    // Selections may start left of / above the source when dragged outward
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = x.saturating_add(width).clamp(0, native_width as i64);
    let y1 = y.saturating_add(height).clamp(0, native_height as i64);

    if x1 <= x0 || y1 <= y0 {
        return Err(CaptureError::EmptySelection);
    }

    Ok(NativeRect {
        x: x0 as u32,
        y: y0 as u32,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
    })
}

/// Clamp a 1-based page number into `[1, page_count]`
pub fn clamp_page(page: usize, page_count: usize) -> usize {
    page.clamp(1, page_count.max(1))
}

fn round_px(value: f64) -> i64 {
    value.round() as i64
}
