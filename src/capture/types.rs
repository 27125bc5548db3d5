//! Capture Types
//!
//! Display-space selections, rotations and the normalized request that is
//! sent to the recognition service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default JPEG quality for captured regions
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// File name attached to every captured region
pub const CAPTURE_FILE_NAME: &str = "cropped.jpg";

/// User-drawn rectangle in display (on-screen) pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionRegion {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A region with no area means "nothing selected"
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Size of the source as currently laid out on screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayGeometry {
    pub width: f64,
    pub height: f64,
}

impl DisplayGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Layout has happened and produced a usable size
    pub fn is_known(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Quarter-turn rotation applied to the captured region (clockwise)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Self::Deg0),
            90 => Ok(Self::Deg90),
            180 => Ok(Self::Deg180),
            270 => Ok(Self::Deg270),
            other => Err(format!(
                "rotation must be 0, 90, 180 or 270 degrees, got {}",
                other
            )),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// Pixel-based rectangle in the source's native resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NativeRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Normalized capture ready to be sent for recognition
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Correlates log lines for one capture
    pub id: Uuid,
    /// Encoded image bytes
    pub data: Vec<u8>,
    pub file_name: &'static str,
    pub mime_type: &'static str,
    /// Output width after rotation
    pub width: u32,
    /// Output height after rotation
    pub height: u32,
}

/// Region capture errors
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("No region selected")]
    EmptySelection,

    #[error("Source not ready: {0}")]
    SourceNotReady(String),

    #[error("Failed to rasterize region: {0}")]
    RasterizationFailed(String),

    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_parsing() {
        assert_eq!(Rotation::try_from(0).unwrap(), Rotation::Deg0);
        assert_eq!(Rotation::try_from(270).unwrap(), Rotation::Deg270);
        assert!(Rotation::try_from(45).is_err());
        assert!(Rotation::try_from(360).is_err());
    }

    #[test]
    fn test_rotation_serde() {
        let rotation: Rotation = serde_json::from_str("90").unwrap();
        assert_eq!(rotation, Rotation::Deg90);
        assert_eq!(serde_json::to_string(&Rotation::Deg180).unwrap(), "180");
        assert!(serde_json::from_str::<Rotation>("100").is_err());
    }

    #[test]
    fn test_empty_selection() {
        assert!(SelectionRegion::new(10.0, 10.0, 0.0, 5.0).is_empty());
        assert!(SelectionRegion::new(10.0, 10.0, 5.0, 0.0).is_empty());
        assert!(SelectionRegion::new(0.0, 0.0, f64::NAN, 5.0).is_empty());
        assert!(!SelectionRegion::new(0.0, 0.0, 1.0, 1.0).is_empty());
    }
}
