//! Page image, display framing, and canvas coordinate conversions.
//!
//! Bubble positions are always percentages of the full page canvas. The view
//! transform only frames the page on screen (zoom and pixel offset), so it
//! shows up here and in pointer handling but never in a descriptor.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use serde::{Deserialize, Serialize};

/// MIME types accepted for page artwork.
pub const SUPPORTED_MIME_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/webp", "image/gif"];

/// Whether `mime` is an accepted page image type.
#[must_use]
pub fn is_supported_mime(mime: &str) -> bool {
    SUPPORTED_MIME_TYPES.contains(&mime.trim().to_ascii_lowercase().as_str())
}

/// A point in either screen or canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pixel dimensions of the page canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are positive and finite.
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Convert a position in percent to canvas pixels.
    #[must_use]
    pub fn percent_to_px(&self, x_pct: f64, y_pct: f64) -> Point {
        Point { x: x_pct / 100.0 * self.width, y: y_pct / 100.0 * self.height }
    }

    /// Convert a canvas pixel point to a position in percent, or `None` for
    /// an undrawable canvas.
    #[must_use]
    pub fn px_to_percent(&self, pt: Point) -> Option<(f64, f64)> {
        self.is_drawable()
            .then(|| (pt.x / self.width * 100.0, pt.y / self.height * 100.0))
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self { width: 0.0, height: 0.0 }
    }
}

/// Display framing for the page: zoom factor and pixel offset.
///
/// `offset_x` / `offset_y` are in screen pixels.
/// `zoom` is a scale factor (1.0 = no zoom).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewTransform {
    pub zoom: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self { zoom: 1.0, offset_x: 0.0, offset_y: 0.0 }
    }
}

impl ViewTransform {
    /// Zoom is a positive finite factor and both offsets are finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.zoom.is_finite() && self.zoom > 0.0 && self.offset_x.is_finite() && self.offset_y.is_finite()
    }

    /// Convert a screen-space point to canvas pixels.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.offset_x) / self.zoom,
            y: (screen.y - self.offset_y) / self.zoom,
        }
    }

    /// Convert a canvas pixel point to screen space.
    #[must_use]
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point {
            x: canvas.x * self.zoom + self.offset_x,
            y: canvas.y * self.zoom + self.offset_y,
        }
    }

    /// Convert a screen-space distance to canvas pixels.
    #[must_use]
    pub fn screen_dist_to_canvas(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }
}

/// The artwork being lettered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageImage {
    /// Data URL or URI of the image.
    pub source: String,
    pub mime_type: String,
    /// Display framing; not part of any bubble coordinate.
    #[serde(default)]
    pub view: ViewTransform,
}

impl PageImage {
    #[must_use]
    pub fn new(source: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self { source: source.into(), mime_type: mime_type.into(), view: ViewTransform::default() }
    }

    /// The base64 payload of a data URL source, or the whole source otherwise.
    #[must_use]
    pub fn base64_payload(&self) -> &str {
        match self.source.split_once(',') {
            Some((head, data)) if head.starts_with("data:") => data,
            _ => &self.source,
        }
    }
}
