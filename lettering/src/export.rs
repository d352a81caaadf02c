//! Export: the rasterizer interface and the artifact it produces.
//!
//! The engine hands a [`Scene`] to a [`Rasterizer`] once per export click. The
//! scene never carries selection state, so selection affordances cannot leak
//! into the exported image.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use crate::placement::BubbleGeometry;
use crate::view::{CanvasSize, PageImage};

/// Errors from the rasterizer collaborator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExportError {
    /// Nothing to export: no page is loaded or the canvas has no area.
    #[error("nothing to export")]
    EmptyCanvas,

    /// The pixel ratio is not a positive finite number.
    #[error("invalid pixel ratio: {0}")]
    InvalidPixelRatio(f64),

    /// The rasterizer itself failed.
    #[error("rasterization failed: {0}")]
    Rasterize(String),
}

/// Everything visible on the page, ready to be painted.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub page: &'a PageImage,
    pub canvas: CanvasSize,
    /// Bubbles in paint order.
    pub bubbles: &'a [BubbleGeometry],
}

/// An encoded image ready to offer as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub mime_type: String,
    /// `data:` URL carrying the encoded bytes.
    pub data_url: String,
    /// Suggested download file name.
    pub file_name: String,
}

impl RasterImage {
    /// Wrap an encoded PNG data URL, naming it after `timestamp_ms`.
    #[must_use]
    pub fn png(data_url: String, timestamp_ms: u64) -> Self {
        Self { mime_type: "image/png".into(), data_url, file_name: export_file_name(timestamp_ms) }
    }
}

/// Download name for an export made at `timestamp_ms` (Unix milliseconds).
#[must_use]
pub fn export_file_name(timestamp_ms: u64) -> String {
    format!("letterboard-{timestamp_ms}.png")
}

/// Turns a painted scene into an encoded image.
pub trait Rasterizer {
    /// Rasterize `scene` at `pixel_ratio` output pixels per canvas pixel.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Rasterize`] when painting or encoding fails.
    fn rasterize(&self, scene: &Scene<'_>, pixel_ratio: f64) -> Result<RasterImage, ExportError>;
}
