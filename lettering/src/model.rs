//! Bubble model: descriptors, typed updates, and the in-memory store.
//!
//! This module defines what a dialogue bubble is (`BubbleDescriptor`), a
//! sparse type for creating one from whatever the caller knows
//! (`PartialBubble`), the closed set of field edits (`BubbleUpdate`), and the
//! store that owns every bubble on the page (`BubbleModel`).
//!
//! All writes go through `BubbleModel`, which clamps numeric input into range
//! instead of rejecting it. Sliders and drags can therefore call it at any
//! frequency without producing an invalid descriptor. The renderer reads from
//! the store via `snapshot` to get paint order.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{
    DEFAULT_FONT_SIZE, DEFAULT_POSITION, DEFAULT_SCALE, FONT_SIZE_MAX, FONT_SIZE_MIN, POSITION_MAX, POSITION_MIN,
    SCALE_MAX, SCALE_MIN, TAIL_LENGTH_MAX,
};
use crate::shape::ShapeKind;

/// Unique identifier for a bubble.
pub type BubbleId = Uuid;

/// Errors produced by model operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// No bubble with this id is in the collection.
    #[error("bubble not found: {0}")]
    NotFound(BubbleId),

    /// A shape name outside the recognized set.
    #[error("unrecognized shape kind: {0}")]
    InvalidShape(String),

    /// A field name the setter table does not know.
    #[error("unknown bubble field: {0}")]
    UnknownField(String),

    /// A field value of the wrong type.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

// =============================================================
// Descriptor
// =============================================================

/// A position in percent of the canvas, `(0, 0)` top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamp both axes into `[0, 100]`. A non-finite axis keeps `fallback`'s value.
    #[must_use]
    pub fn clamped_or(self, fallback: Position) -> Self {
        Self {
            x: clamp_finite(self.x, POSITION_MIN, POSITION_MAX, fallback.x),
            y: clamp_finite(self.y, POSITION_MIN, POSITION_MAX, fallback.y),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { x: DEFAULT_POSITION.0, y: DEFAULT_POSITION.1 }
    }
}

/// One dialogue or narration element on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BubbleDescriptor {
    /// Assigned by the model at creation; never changes, never reused.
    pub id: BubbleId,
    /// Dialogue text. May be empty.
    pub text: String,
    /// Center of the bubble in percent of the canvas.
    pub position: Position,
    /// Rendered width in percent of the canvas width.
    pub scale: f64,
    /// Visual style.
    pub shape_kind: ShapeKind,
    /// Font size in pixels.
    pub font_size: u32,
    /// Tail direction in degrees, normalized to `[0, 360)`. 0 points up, clockwise.
    pub tail_angle: i32,
    /// Tail length in pixels. 0 hides the tail.
    pub tail_length: f64,
    /// Tail visibility gate, independent of `tail_length`.
    pub show_tail: bool,
    /// Paint order; higher paints later. Ties fall back to insertion order.
    pub z_order: i64,
    /// Sort key used when a suggestion batch is ingested.
    pub reading_order: i64,
    /// Panel the bubble belongs to, when the suggestion source knew it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel: Option<u32>,
    /// Free-form note explaining the suggestion. Empty for manual bubbles.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
}

/// Sparse description of a new bubble. Absent fields take the model defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialBubble {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_kind: Option<ShapeKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_angle: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_tail: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// =============================================================
// Updates
// =============================================================

/// One field edit on an existing bubble.
#[derive(Debug, Clone, PartialEq)]
pub enum BubbleUpdate {
    SetText(String),
    /// Clamped into `[0, 100]` on both axes.
    SetPosition(Position),
    /// Clamped into the scale range.
    SetScale(f64),
    /// Rejected with [`ModelError::InvalidShape`] for unrecognized kinds.
    SetShape(ShapeKind),
    /// Clamped into the font size range.
    SetFontSize(u32),
    /// Normalized modulo 360.
    SetTailAngle(i32),
    /// Clamped into `[0, TAIL_LENGTH_MAX]`.
    SetTailLength(f64),
    SetShowTail(bool),
    SetZOrder(i64),
    SetReadingOrder(i64),
}

impl BubbleUpdate {
    /// Build an update from a field name and a JSON value, as sent by generic
    /// slider and text handlers.
    ///
    /// Accepts the camelCase descriptor field names plus the suggestion
    /// service's names (`suggestedDialogue`, `bubbleScale`, `bubbleType`).
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownField`] for names outside the table,
    /// [`ModelError::InvalidValue`] when the value has the wrong type, and
    /// [`ModelError::InvalidShape`] for unrecognized shape names.
    pub fn from_field(field: &str, value: &serde_json::Value) -> Result<Self, ModelError> {
        match field {
            "text" | "suggestedDialogue" => value
                .as_str()
                .map(|s| Self::SetText(s.to_string()))
                .ok_or_else(|| invalid("text", "expected a string")),
            "position" => {
                let x = value.get("x").and_then(serde_json::Value::as_f64);
                let y = value.get("y").and_then(serde_json::Value::as_f64);
                match (x, y) {
                    (Some(x), Some(y)) => Ok(Self::SetPosition(Position::new(x, y))),
                    _ => Err(invalid("position", "expected an object with numeric x and y")),
                }
            }
            "scale" | "bubbleScale" => number(value, "scale").map(Self::SetScale),
            "shapeKind" | "bubbleType" => {
                let name = value
                    .as_str()
                    .ok_or_else(|| invalid("shapeKind", "expected a string"))?;
                ShapeKind::parse(name).map(Self::SetShape)
            }
            "fontSize" => number(value, "fontSize").map(|v| Self::SetFontSize(clamp_font_size(v))),
            "tailAngle" => number(value, "tailAngle").map(|v| Self::SetTailAngle(angle_from_f64(v))),
            "tailLength" => number(value, "tailLength").map(Self::SetTailLength),
            "showTail" => value
                .as_bool()
                .map(Self::SetShowTail)
                .ok_or_else(|| invalid("showTail", "expected a boolean")),
            "zOrder" => integer(value, "zOrder").map(Self::SetZOrder),
            "readingOrder" => integer(value, "readingOrder").map(Self::SetReadingOrder),
            other => Err(ModelError::UnknownField(other.to_string())),
        }
    }
}

fn invalid(field: &'static str, reason: &str) -> ModelError {
    ModelError::InvalidValue { field, reason: reason.to_string() }
}

fn number(value: &serde_json::Value, field: &'static str) -> Result<f64, ModelError> {
    value
        .as_f64()
        .ok_or_else(|| invalid(field, "expected a number"))
}

fn integer(value: &serde_json::Value, field: &'static str) -> Result<i64, ModelError> {
    value
        .as_i64()
        .ok_or_else(|| invalid(field, "expected an integer"))
}

// =============================================================
// Clamping
// =============================================================

fn clamp_finite(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_finite() { value.clamp(min, max) } else { fallback }
}

/// Normalize an angle in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_angle(deg: i32) -> i32 {
    deg.rem_euclid(360)
}

/// Round a fractional angle and normalize it. Non-finite input maps to 0.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn angle_from_f64(deg: f64) -> i32 {
    if !deg.is_finite() {
        return 0;
    }
    // rem_euclid first keeps the value inside i32 range before the cast.
    normalize_angle(deg.round().rem_euclid(360.0) as i32)
}

/// Round and clamp a fractional font size into the valid range.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn clamp_font_size(size: f64) -> u32 {
    if !size.is_finite() {
        return DEFAULT_FONT_SIZE;
    }
    size.round()
        .clamp(f64::from(FONT_SIZE_MIN), f64::from(FONT_SIZE_MAX)) as u32
}

fn apply_update(bubble: &mut BubbleDescriptor, update: BubbleUpdate) -> Result<(), ModelError> {
    if let BubbleUpdate::SetShape(kind) = &update {
        if !kind.is_recognized() {
            return Err(ModelError::InvalidShape(kind.name().to_string()));
        }
    }
    apply_checked(bubble, update);
    Ok(())
}

/// Write one update, clamping numeric values. Shape validity is the caller's concern.
fn apply_checked(bubble: &mut BubbleDescriptor, update: BubbleUpdate) {
    match update {
        BubbleUpdate::SetText(text) => bubble.text = text,
        BubbleUpdate::SetPosition(pos) => bubble.position = pos.clamped_or(bubble.position),
        BubbleUpdate::SetScale(scale) => bubble.scale = clamp_finite(scale, SCALE_MIN, SCALE_MAX, bubble.scale),
        BubbleUpdate::SetShape(kind) => bubble.shape_kind = kind,
        BubbleUpdate::SetFontSize(size) => bubble.font_size = size.clamp(FONT_SIZE_MIN, FONT_SIZE_MAX),
        BubbleUpdate::SetTailAngle(deg) => bubble.tail_angle = normalize_angle(deg),
        BubbleUpdate::SetTailLength(len) => {
            bubble.tail_length = clamp_finite(len, 0.0, TAIL_LENGTH_MAX, bubble.tail_length);
        }
        BubbleUpdate::SetShowTail(show) => bubble.show_tail = show,
        BubbleUpdate::SetZOrder(z) => bubble.z_order = z,
        BubbleUpdate::SetReadingOrder(order) => bubble.reading_order = order,
    }
}

// =============================================================
// Store
// =============================================================

/// Owner of the page's bubble collection.
///
/// The collection is kept in insertion order; `snapshot` derives paint order
/// from `z_order` with insertion order breaking ties.
#[derive(Debug, Default)]
pub struct BubbleModel {
    bubbles: Vec<BubbleDescriptor>,
    revision: u64,
}

impl BubbleModel {
    /// Create an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new bubble, filling unset fields with defaults, and return its id.
    ///
    /// The shape is stored as given, so an unrecognized kind from ingestion
    /// survives and renders with the fallback oval.
    pub fn add(&mut self, partial: PartialBubble) -> BubbleId {
        let z_order = partial.z_order.unwrap_or_else(|| self.max_z().map_or(0, |z| z.saturating_add(1)));
        let reading_order = partial
            .reading_order
            .unwrap_or_else(|| i64::try_from(self.bubbles.len()).map_or(i64::MAX, |n| n.saturating_add(1)));

        let mut bubble = BubbleDescriptor {
            id: Uuid::new_v4(),
            text: partial.text.unwrap_or_default(),
            position: Position::default(),
            scale: DEFAULT_SCALE,
            shape_kind: partial.shape_kind.unwrap_or_default(),
            font_size: DEFAULT_FONT_SIZE,
            tail_angle: 0,
            tail_length: 0.0,
            show_tail: partial.show_tail.unwrap_or(true),
            z_order,
            reading_order,
            panel: partial.panel,
            note: partial.note.unwrap_or_default(),
        };

        let numeric = [
            partial.position.map(BubbleUpdate::SetPosition),
            partial.scale.map(BubbleUpdate::SetScale),
            partial.font_size.map(BubbleUpdate::SetFontSize),
            partial.tail_angle.map(BubbleUpdate::SetTailAngle),
            partial.tail_length.map(BubbleUpdate::SetTailLength),
        ];
        for update in numeric.into_iter().flatten() {
            apply_checked(&mut bubble, update);
        }

        let id = bubble.id;
        self.bubbles.push(bubble);
        self.bump();
        id
    }

    /// Apply one field edit to a bubble.
    ///
    /// # Errors
    ///
    /// [`ModelError::NotFound`] if `id` is absent, [`ModelError::InvalidShape`]
    /// if a shape update names an unrecognized kind. The bubble is unchanged
    /// on error.
    pub fn update(&mut self, id: BubbleId, update: BubbleUpdate) -> Result<(), ModelError> {
        let bubble = self.find_mut(id)?;
        apply_update(bubble, update)?;
        self.bump();
        Ok(())
    }

    /// Apply several field edits to one bubble.
    ///
    /// A rejected field is skipped and reported in the returned list; the
    /// remaining fields still apply. The revision moves only if one did.
    ///
    /// # Errors
    ///
    /// [`ModelError::NotFound`] if `id` is absent, in which case nothing applies.
    pub fn update_many(
        &mut self,
        id: BubbleId,
        updates: impl IntoIterator<Item = BubbleUpdate>,
    ) -> Result<Vec<ModelError>, ModelError> {
        let bubble = self.find_mut(id)?;
        let mut rejected = Vec::new();
        let mut applied = false;
        for update in updates {
            match apply_update(bubble, update) {
                Ok(()) => applied = true,
                Err(e) => rejected.push(e),
            }
        }
        if applied {
            self.bump();
        }
        Ok(rejected)
    }

    /// Move a bubble by a delta in percent, clamped the same way as `update`.
    ///
    /// Moving past an edge leaves the bubble at the edge.
    ///
    /// # Errors
    ///
    /// [`ModelError::NotFound`] if `id` is absent.
    pub fn move_by(&mut self, id: BubbleId, dx: f64, dy: f64) -> Result<(), ModelError> {
        let current = self.find(id)?.position;
        self.update(id, BubbleUpdate::SetPosition(Position::new(current.x + dx, current.y + dy)))
    }

    /// Remove a bubble and return it. Other bubbles keep their ids and z-order.
    ///
    /// # Errors
    ///
    /// [`ModelError::NotFound`] if `id` is absent.
    pub fn remove(&mut self, id: BubbleId) -> Result<BubbleDescriptor, ModelError> {
        let index = self
            .bubbles
            .iter()
            .position(|b| b.id == id)
            .ok_or(ModelError::NotFound(id))?;
        let removed = self.bubbles.remove(index);
        self.bump();
        Ok(removed)
    }

    /// Raise a bubble strictly above every other bubble.
    ///
    /// # Errors
    ///
    /// [`ModelError::NotFound`] if `id` is absent.
    pub fn bring_to_front(&mut self, id: BubbleId) -> Result<(), ModelError> {
        let current = self.find(id)?.z_order;
        let top = self.bubbles.iter().filter(|b| b.id != id).map(|b| b.z_order).max();
        match top {
            Some(top) if current <= top => self.update(id, BubbleUpdate::SetZOrder(top.saturating_add(1))),
            _ => Ok(()),
        }
    }

    /// Lower a bubble strictly below every other bubble.
    ///
    /// # Errors
    ///
    /// [`ModelError::NotFound`] if `id` is absent.
    pub fn send_to_back(&mut self, id: BubbleId) -> Result<(), ModelError> {
        let current = self.find(id)?.z_order;
        let bottom = self.bubbles.iter().filter(|b| b.id != id).map(|b| b.z_order).min();
        match bottom {
            Some(bottom) if current >= bottom => self.update(id, BubbleUpdate::SetZOrder(bottom.saturating_sub(1))),
            _ => Ok(()),
        }
    }

    /// Replace the whole collection with a suggestion batch.
    ///
    /// Every incoming bubble gets a fresh id. The batch is stably sorted by
    /// reading order (absent orders last) before it is stored, and goes
    /// through the same defaulting and clamping as `add`. Returns the new ids
    /// in stored order.
    pub fn replace_all(&mut self, mut batch: Vec<PartialBubble>) -> Vec<BubbleId> {
        batch.sort_by_key(|p| p.reading_order.unwrap_or(i64::MAX));
        self.bubbles.clear();
        let ids = batch.into_iter().map(|partial| self.add(partial)).collect();
        self.bump();
        ids
    }

    /// All bubbles in paint order: `z_order` ascending, insertion order on ties.
    #[must_use]
    pub fn snapshot(&self) -> Vec<&BubbleDescriptor> {
        let mut ordered: Vec<&BubbleDescriptor> = self.bubbles.iter().collect();
        ordered.sort_by_key(|b| b.z_order);
        ordered
    }

    /// Look up a bubble by id.
    #[must_use]
    pub fn get(&self, id: BubbleId) -> Option<&BubbleDescriptor> {
        self.bubbles.iter().find(|b| b.id == id)
    }

    /// Ids in insertion order.
    #[must_use]
    pub fn ids(&self) -> Vec<BubbleId> {
        self.bubbles.iter().map(|b| b.id).collect()
    }

    /// Number of bubbles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    /// Returns `true` if there are no bubbles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    /// Drop every bubble, as when the user starts a new page.
    pub fn clear(&mut self) {
        self.bubbles.clear();
        self.bump();
    }

    /// Counter bumped on every successful mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn max_z(&self) -> Option<i64> {
        self.bubbles.iter().map(|b| b.z_order).max()
    }

    fn find(&self, id: BubbleId) -> Result<&BubbleDescriptor, ModelError> {
        self.get(id).ok_or(ModelError::NotFound(id))
    }

    fn find_mut(&mut self, id: BubbleId) -> Result<&mut BubbleDescriptor, ModelError> {
        self.bubbles
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(ModelError::NotFound(id))
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
