//! Shared numeric constants for the lettering crate.

// ── Position ────────────────────────────────────────────────────

/// Lower bound for both position axes, in percent of the canvas.
pub const POSITION_MIN: f64 = 0.0;

/// Upper bound for both position axes, in percent of the canvas.
pub const POSITION_MAX: f64 = 100.0;

/// Default position for a bubble with no position given.
pub const DEFAULT_POSITION: (f64, f64) = (50.0, 50.0);

// ── Size ────────────────────────────────────────────────────────

/// Smallest bubble width, in percent of the canvas width.
pub const SCALE_MIN: f64 = 5.0;

/// Largest bubble width, in percent of the canvas width.
pub const SCALE_MAX: f64 = 98.0;

/// Bubble width used when none is given.
pub const DEFAULT_SCALE: f64 = 35.0;

/// Smallest font size in pixels.
pub const FONT_SIZE_MIN: u32 = 8;

/// Largest font size in pixels.
pub const FONT_SIZE_MAX: u32 = 96;

/// Font size used when none is given.
pub const DEFAULT_FONT_SIZE: u32 = 16;

/// Minimum rendered bubble height in pixels.
pub const MIN_BUBBLE_HEIGHT_PX: f64 = 100.0;

// ── Tail ────────────────────────────────────────────────────────

/// Longest tail in pixels.
pub const TAIL_LENGTH_MAX: f64 = 400.0;

/// Distance from the anchor to the tail base, as a fraction of the bubble box.
///
/// 0.48 of the full box puts the base just inside the inscribed oval.
pub const TAIL_BASE_FRACTION: f64 = 0.48;

/// Half of the tail's base width in pixels.
pub const TAIL_HALF_WIDTH_PX: f64 = 20.0;

/// Number of trailing dots drawn for a thought-bubble tail.
pub const TAIL_DOT_COUNT: usize = 3;

// ── Text ────────────────────────────────────────────────────────

/// Estimated glyph advance as a fraction of the font size.
pub const GLYPH_WIDTH_RATIO: f64 = 0.6;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_RATIO: f64 = 1.25;

// ── Editing ─────────────────────────────────────────────────────

/// Keyboard nudge step in percent.
pub const NUDGE_STEP: f64 = 2.0;

/// Keyboard nudge step in percent while shift is held.
pub const NUDGE_STEP_LARGE: f64 = 10.0;

/// Output pixel density used for exports unless the host asks otherwise.
pub const DEFAULT_EXPORT_PIXEL_RATIO: f64 = 3.0;
