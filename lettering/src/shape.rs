//! Bubble shape kinds and the presentation table behind them.
//!
//! `ShapeKind` is what a descriptor stores. `ShapeStyle` is the lookup from a
//! kind to the outline, padding and tail rules the placement and render
//! layers need. Adding a style means adding a variant and a table row; the
//! model never looks at styles.

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::model::ModelError;

/// The visual style of a bubble.
///
/// Serialized as a lowercase string. Names outside the recognized set are
/// kept as [`ShapeKind::Other`] so suggestions and saved documents survive a
/// round trip; they render with the speech oval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ShapeKind {
    /// Plain oval speech balloon.
    #[default]
    Speech,
    /// Cloud outline with a trail of dots.
    Thought,
    /// Spiky burst for shouting.
    Scream,
    /// Rectangular caption box; never has a tail.
    Narrative,
    /// Thin oval for quiet speech.
    Whisper,
    /// Oval with a rippling edge.
    Wavy,
    /// Heavy burst for sound effects.
    Impact,
    /// Hand-drawn looking oval.
    Organic,
    /// Angular box with a pointed tail.
    Sharp,
    /// Rounded rectangle.
    Modern,
    /// A name this build does not recognize.
    Other(String),
}

static RECOGNIZED: [ShapeKind; 10] = [
    ShapeKind::Speech,
    ShapeKind::Thought,
    ShapeKind::Scream,
    ShapeKind::Narrative,
    ShapeKind::Whisper,
    ShapeKind::Wavy,
    ShapeKind::Impact,
    ShapeKind::Organic,
    ShapeKind::Sharp,
    ShapeKind::Modern,
];

impl ShapeKind {
    /// All recognized kinds, in catalog order.
    #[must_use]
    pub fn recognized() -> &'static [ShapeKind] {
        &RECOGNIZED
    }

    /// Parse a recognized kind name.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidShape`] when `name` is not one of the
    /// recognized kinds.
    pub fn parse(name: &str) -> Result<Self, ModelError> {
        match Self::from_name(name) {
            Self::Other(raw) => Err(ModelError::InvalidShape(raw)),
            kind => Ok(kind),
        }
    }

    /// Map a name onto a kind, keeping unknown names as [`ShapeKind::Other`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "speech" => Self::Speech,
            "thought" => Self::Thought,
            "scream" => Self::Scream,
            "narrative" => Self::Narrative,
            "whisper" => Self::Whisper,
            "wavy" => Self::Wavy,
            "impact" => Self::Impact,
            "organic" => Self::Organic,
            "sharp" => Self::Sharp,
            "modern" => Self::Modern,
            _ => Self::Other(name.to_string()),
        }
    }

    /// The serialized name of this kind.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Speech => "speech",
            Self::Thought => "thought",
            Self::Scream => "scream",
            Self::Narrative => "narrative",
            Self::Whisper => "whisper",
            Self::Wavy => "wavy",
            Self::Impact => "impact",
            Self::Organic => "organic",
            Self::Sharp => "sharp",
            Self::Modern => "modern",
            Self::Other(raw) => raw.as_str(),
        }
    }

    /// Whether this is one of the recognized kinds.
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// The presentation row for this kind. Unrecognized kinds get the speech oval.
    #[must_use]
    pub fn style(&self) -> ShapeStyle {
        match self {
            Self::Speech | Self::Other(_) => ShapeStyle::OVAL,
            Self::Thought => ShapeStyle {
                outline: Outline::Cloud,
                tail_style: TailStyle::Dots,
                ..ShapeStyle::OVAL
            },
            Self::Scream => ShapeStyle { outline: Outline::Burst, pad_x: 40.0, pad_y: 44.0, border_px: 5.0, ..ShapeStyle::OVAL },
            Self::Impact => ShapeStyle { outline: Outline::Burst, pad_x: 44.0, pad_y: 48.0, border_px: 6.0, ..ShapeStyle::OVAL },
            Self::Narrative => ShapeStyle {
                outline: Outline::Rect,
                pad_x: 16.0,
                pad_y: 12.0,
                border_px: 3.0,
                tail_allowed: false,
                ..ShapeStyle::OVAL
            },
            Self::Whisper => ShapeStyle { border_px: 1.5, ..ShapeStyle::OVAL },
            Self::Wavy => ShapeStyle { outline: Outline::Wave, ..ShapeStyle::OVAL },
            Self::Organic => ShapeStyle { pad_x: 28.0, pad_y: 36.0, border_px: 3.0, ..ShapeStyle::OVAL },
            Self::Sharp => ShapeStyle { outline: Outline::Rect, pad_x: 20.0, pad_y: 16.0, ..ShapeStyle::OVAL },
            Self::Modern => ShapeStyle {
                outline: Outline::RoundedRect,
                pad_x: 20.0,
                pad_y: 16.0,
                border_px: 3.0,
                ..ShapeStyle::OVAL
            },
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ShapeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ShapeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_name(&raw))
    }
}

/// Outline family used to draw a bubble body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outline {
    /// Ellipse inscribed in the bubble box.
    Ellipse,
    /// Ring of overlapping lobes.
    Cloud,
    /// Star-like spikes around an ellipse.
    Burst,
    /// Rippling ellipse.
    Wave,
    /// Plain rectangle.
    Rect,
    /// Rectangle with rounded corners.
    RoundedRect,
}

impl Outline {
    /// Whether hit-testing and tail anchoring should treat the body as an ellipse.
    #[must_use]
    pub fn is_oval(self) -> bool {
        matches!(self, Self::Ellipse | Self::Cloud | Self::Burst | Self::Wave)
    }
}

/// How a tail is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailStyle {
    /// Solid tapering triangle.
    Wedge,
    /// Shrinking circles leading away from the bubble.
    Dots,
}

/// Presentation data for one shape kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub outline: Outline,
    /// Horizontal content padding in pixels, each side.
    pub pad_x: f64,
    /// Vertical content padding in pixels, each side.
    pub pad_y: f64,
    /// Border stroke width in pixels.
    pub border_px: f64,
    /// Whether this kind may show a tail at all.
    pub tail_allowed: bool,
    pub tail_style: TailStyle,
}

impl ShapeStyle {
    /// The default oval speech balloon.
    pub const OVAL: Self = Self {
        outline: Outline::Ellipse,
        pad_x: 32.0,
        pad_y: 40.0,
        border_px: 4.0,
        tail_allowed: true,
        tail_style: TailStyle::Wedge,
    };
}
