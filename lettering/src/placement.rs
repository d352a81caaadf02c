//! Placement: where a bubble and its tail land on the canvas.
//!
//! Everything here is a pure function of a descriptor, the canvas size and a
//! text measurer. Nothing is cached between calls, so the engine recomputes
//! the whole paint list on every state change.
//!
//! Angle convention: 0° points up and angles grow clockwise in screen space
//! (y grows downward), so the unit direction for angle θ is `(sin θ, −cos θ)`.

#[cfg(test)]
#[path = "placement_test.rs"]
mod placement_test;

use crate::consts::{
    GLYPH_WIDTH_RATIO, LINE_HEIGHT_RATIO, MIN_BUBBLE_HEIGHT_PX, TAIL_BASE_FRACTION, TAIL_DOT_COUNT,
    TAIL_HALF_WIDTH_PX,
};
use crate::model::{BubbleDescriptor, BubbleId, normalize_angle};
use crate::shape::{ShapeStyle, TailStyle};
use crate::view::{CanvasSize, Point};

/// Measures rendered text width in pixels.
///
/// The browser host implements this with real glyph metrics; tests and
/// native callers use [`EstimatedMeasure`].
pub trait TextMeasure {
    /// Width of `text` set at `font_size` pixels.
    fn text_width(&self, text: &str, font_size: f64) -> f64;
}

/// Fixed-advance estimate: every character is `0.6 × font_size` wide.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedMeasure;

impl TextMeasure for EstimatedMeasure {
    #[allow(clippy::cast_precision_loss)]
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * GLYPH_WIDTH_RATIO * font_size
    }
}

/// Axis-aligned rectangle, `(x, y)` at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Rectangle of the given size centered on `center`.
    #[must_use]
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self { x: center.x - width / 2.0, y: center.y - height / 2.0, width, height }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.x + self.width && pt.y >= self.y && pt.y <= self.y + self.height
    }
}

/// One circle of a dotted (thought) tail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TailDot {
    pub center: Point,
    pub radius: f64,
}

/// Where a tail sits and which way it points.
#[derive(Debug, Clone, PartialEq)]
pub struct TailGeometry {
    /// Normalized angle in degrees.
    pub angle_deg: i32,
    /// Unit vector from the bubble anchor toward the tip.
    pub direction: Point,
    /// Midpoint of the tail's base, just inside the bubble outline.
    pub base: Point,
    /// Base corner counter-clockwise of `direction`.
    pub base_left: Point,
    /// Base corner clockwise of `direction`.
    pub base_right: Point,
    /// The far tip the tail tapers to.
    pub tip: Point,
    pub length: f64,
    pub style: TailStyle,
    /// Circles along the tail path; empty for wedge tails.
    pub dots: Vec<TailDot>,
}

/// Everything the host needs to paint one bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleGeometry {
    pub id: BubbleId,
    /// Canvas pixel point the bubble is centered on.
    pub anchor: Point,
    /// Bubble box, centered on `anchor`.
    pub bounds: Rect,
    pub style: ShapeStyle,
    /// Text broken into lines that fit the content width.
    pub lines: Vec<String>,
    pub font_size: f64,
    pub line_height: f64,
    pub tail: Option<TailGeometry>,
}

/// Compute the geometry of one bubble.
#[must_use]
pub fn place(bubble: &BubbleDescriptor, canvas: CanvasSize, measure: &dyn TextMeasure) -> BubbleGeometry {
    let style = bubble.shape_kind.style();
    let anchor = canvas.percent_to_px(bubble.position.x, bubble.position.y);
    let width = bubble.scale / 100.0 * canvas.width;

    let font_size = f64::from(bubble.font_size);
    let line_height = font_size * LINE_HEIGHT_RATIO;
    let content_width = (width - 2.0 * style.pad_x).max(font_size).min(width);
    let lines = wrap_text(&bubble.text, content_width, font_size, measure);
    // Only a lone glyph wider than the bubble can still exceed it.
    let width = lines
        .iter()
        .map(|line| measure.text_width(line, font_size))
        .fold(width, f64::max);

    #[allow(clippy::cast_precision_loss)]
    let text_height = lines.len() as f64 * line_height;
    let height = (text_height + 2.0 * style.pad_y).max(MIN_BUBBLE_HEIGHT_PX);

    let bounds = Rect::centered(anchor, width, height);
    let tail = if shows_tail(bubble, &style) { Some(place_tail(bubble, anchor, &bounds, &style)) } else { None };

    BubbleGeometry { id: bubble.id, anchor, bounds, style, lines, font_size, line_height, tail }
}

/// Compute geometry for a snapshot, preserving its paint order.
#[must_use]
pub fn place_all(snapshot: &[&BubbleDescriptor], canvas: CanvasSize, measure: &dyn TextMeasure) -> Vec<BubbleGeometry> {
    snapshot
        .iter()
        .map(|bubble| place(bubble, canvas, measure))
        .collect()
}

/// Whether a tail is drawn: the shape allows one, it is switched on, and it has length.
#[must_use]
pub fn shows_tail(bubble: &BubbleDescriptor, style: &ShapeStyle) -> bool {
    style.tail_allowed && bubble.show_tail && bubble.tail_length > 0.0
}

/// Unit direction for an angle in degrees (0 = up, clockwise).
#[must_use]
pub fn direction_for(angle_deg: i32) -> Point {
    let rad = f64::from(normalize_angle(angle_deg)).to_radians();
    Point::new(rad.sin(), -rad.cos())
}

fn place_tail(bubble: &BubbleDescriptor, anchor: Point, bounds: &Rect, style: &ShapeStyle) -> TailGeometry {
    let angle_deg = normalize_angle(bubble.tail_angle);
    let dir = direction_for(angle_deg);
    let base = Point::new(
        anchor.x + dir.x * TAIL_BASE_FRACTION * bounds.width,
        anchor.y + dir.y * TAIL_BASE_FRACTION * bounds.height,
    );
    let tip = Point::new(base.x + dir.x * bubble.tail_length, base.y + dir.y * bubble.tail_length);

    // Perpendicular, rotated 90° counter-clockwise on screen.
    let perp = Point::new(dir.y, -dir.x);
    let base_left = Point::new(base.x + perp.x * TAIL_HALF_WIDTH_PX, base.y + perp.y * TAIL_HALF_WIDTH_PX);
    let base_right = Point::new(base.x - perp.x * TAIL_HALF_WIDTH_PX, base.y - perp.y * TAIL_HALF_WIDTH_PX);

    let dots = match style.tail_style {
        TailStyle::Wedge => Vec::new(),
        TailStyle::Dots => dotted_path(base, dir, bubble.tail_length),
    };

    TailGeometry {
        angle_deg,
        direction: dir,
        base,
        base_left,
        base_right,
        tip,
        length: bubble.tail_length,
        style: style.tail_style,
        dots,
    }
}

/// Circles spaced evenly from the base to the tip, shrinking toward the tip.
#[allow(clippy::cast_precision_loss)]
fn dotted_path(base: Point, dir: Point, length: f64) -> Vec<TailDot> {
    (1..=TAIL_DOT_COUNT)
        .map(|i| {
            let t = i as f64 / TAIL_DOT_COUNT as f64;
            TailDot {
                center: Point::new(base.x + dir.x * length * t, base.y + dir.y * length * t),
                radius: TAIL_HALF_WIDTH_PX * 0.5 / i as f64,
            }
        })
        .collect()
}

/// Greedy word wrap. Explicit newlines always break. A word wider than the
/// line is split at character boundaries.
#[must_use]
pub fn wrap_text(text: &str, max_width: f64, font_size: f64, measure: &dyn TextMeasure) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if !current.is_empty() {
                let candidate = format!("{current} {word}");
                if measure.text_width(&candidate, font_size) <= max_width {
                    current = candidate;
                    continue;
                }
                lines.push(std::mem::take(&mut current));
            }
            let mut pieces = break_word(word, max_width, font_size, measure);
            current = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Pieces of `word` no wider than `max_width`. A single glyph wider than the
/// line still gets a piece to itself.
fn break_word(word: &str, max_width: f64, font_size: f64, measure: &dyn TextMeasure) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for ch in word.chars() {
        piece.push(ch);
        if piece.chars().count() > 1 && measure.text_width(&piece, font_size) > max_width {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(ch);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
