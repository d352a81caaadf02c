//! Editor engine: session lifecycle, editing commands, pointer and keyboard
//! handling, and export.
//!
//! `EditorCore` holds everything that can run natively. `Engine` adds the
//! browser canvas and decoded page bitmap on top and forwards to the core.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::consts::{NUDGE_STEP, NUDGE_STEP_LARGE, TAIL_BASE_FRACTION};
use crate::export::{ExportError, RasterImage, Rasterizer, Scene};
use crate::hit::{HitPart, hit_test};
use crate::input::{Button, InputState, Key, Modifiers};
use crate::model::{
    BubbleDescriptor, BubbleId, BubbleModel, BubbleUpdate, ModelError, PartialBubble, Position, angle_from_f64,
};
use crate::placement::{BubbleGeometry, EstimatedMeasure, TextMeasure, direction_for, place, place_all};
use crate::render::{self, CanvasRasterizer, ContextMeasure};
use crate::suggest::{SceneSuggestion, SuggestionError};
use crate::view::{CanvasSize, PageImage, Point, ViewTransform};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Dialogue placed by "add bubble" so a fresh bubble is visibly editable.
pub const MANUAL_BUBBLE_TEXT: &str = "I'm ready to leave the village. After ten years of training, I feel strong.";

/// Where the page's suggestion pass stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnalysisStatus {
    /// No page loaded.
    #[default]
    Idle,
    /// Waiting on the suggestion service.
    Analyzing,
    /// Suggestions arrived and were loaded.
    Ready { count: usize },
    /// No suggestions; the user letters by hand. `reason` is set when the
    /// service failed rather than returning an empty list.
    ManualMode { reason: Option<String> },
}

/// Actions returned from handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    BubbleCreated(BubbleDescriptor),
    BubbleUpdated(BubbleDescriptor),
    BubbleDeleted { id: BubbleId },
    BubblesReplaced { count: usize },
    SelectionChanged(Option<BubbleId>),
    StatusChanged(AnalysisStatus),
    SetCursor(String),
    RenderNeeded,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// The id of the currently selected bubble, if any.
    pub selected_id: Option<BubbleId>,
    pub status: AnalysisStatus,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
#[derive(Debug, Default)]
pub struct EditorCore {
    pub model: BubbleModel,
    pub page: Option<PageImage>,
    pub canvas: CanvasSize,
    pub ui: UiState,
    pub input: InputState,
    session: u64,
}

impl EditorCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Session ---

    /// Start a new session on `page`. Any previous bubbles are discarded and
    /// the suggestion pass is marked as pending. An unusable view falls back
    /// to the identity framing.
    ///
    /// The host tags its suggestion request with [`session`](Self::session)
    /// and hands the tag back to [`finish_analysis`](Self::finish_analysis).
    pub fn open_page(&mut self, mut page: PageImage) -> Vec<Action> {
        if !page.view.is_valid() {
            page.view = ViewTransform::default();
        }
        self.session = self.session.wrapping_add(1);
        self.page = Some(page);
        self.model.clear();
        self.input = InputState::Idle;
        let mut actions = self.set_selection(None);
        actions.extend(self.set_status(AnalysisStatus::Analyzing));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Drop the page and every bubble.
    pub fn close_page(&mut self) -> Vec<Action> {
        self.session = self.session.wrapping_add(1);
        self.page = None;
        self.model.clear();
        self.input = InputState::Idle;
        let mut actions = self.set_selection(None);
        actions.extend(self.set_status(AnalysisStatus::Idle));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Record the pixel size of the page canvas.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas = CanvasSize::new(width, height);
    }

    /// Identifies the current page session. Changes on every open and close.
    #[must_use]
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Update the display framing of the current page. A zoom that is not
    /// positive and finite is ignored.
    pub fn set_view(&mut self, view: ViewTransform) -> Vec<Action> {
        if !view.is_valid() {
            return Vec::new();
        }
        match self.page.as_mut() {
            Some(page) => {
                page.view = view;
                vec![Action::RenderNeeded]
            }
            None => Vec::new(),
        }
    }

    /// Load the outcome of the suggestion call started for `session`.
    ///
    /// A failure leaves the collection as it is and switches to manual mode.
    /// A result for a session that has since been closed or replaced, or one
    /// that arrives when no analysis is pending, is dropped.
    pub fn finish_analysis(
        &mut self,
        session: u64,
        result: Result<Vec<SceneSuggestion>, SuggestionError>,
    ) -> Vec<Action> {
        if session != self.session || self.ui.status != AnalysisStatus::Analyzing {
            return Vec::new();
        }
        match result {
            Ok(suggestions) if suggestions.is_empty() => self.set_status(AnalysisStatus::ManualMode { reason: None }),
            Ok(suggestions) => {
                let batch = suggestions
                    .into_iter()
                    .map(SceneSuggestion::into_partial)
                    .collect();
                let count = self.model.replace_all(batch).len();
                let mut actions = self.set_selection(None);
                actions.push(Action::BubblesReplaced { count });
                actions.extend(self.set_status(AnalysisStatus::Ready { count }));
                actions.push(Action::RenderNeeded);
                actions
            }
            Err(e) => self.set_status(AnalysisStatus::ManualMode { reason: Some(e.to_string()) }),
        }
    }

    // --- Editing ---

    /// Add a bubble and select it.
    pub fn add_bubble(&mut self, partial: PartialBubble) -> Vec<Action> {
        let id = self.model.add(partial);
        let mut actions = Vec::new();
        if let Some(bubble) = self.model.get(id) {
            actions.push(Action::BubbleCreated(bubble.clone()));
        }
        actions.extend(self.set_selection(Some(id)));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Add the stock hand-placed bubble: upper middle of the page, tail
    /// pointing down-right.
    pub fn add_manual_bubble(&mut self) -> Vec<Action> {
        let reading_order = i64::try_from(self.model.len()).map_or(i64::MAX, |n| n.saturating_add(1));
        self.add_bubble(PartialBubble {
            text: Some(MANUAL_BUBBLE_TEXT.into()),
            position: Some(Position::new(50.0, 30.0)),
            font_size: Some(18),
            tail_angle: Some(150),
            tail_length: Some(60.0),
            reading_order: Some(reading_order),
            ..Default::default()
        })
    }

    /// Apply one field edit.
    ///
    /// An unknown id clears the selection; a rejected shape leaves the bubble as it was.
    pub fn edit(&mut self, id: BubbleId, update: BubbleUpdate) -> Vec<Action> {
        let result = self.model.update(id, update);
        self.after_edit(id, result)
    }

    /// Apply a field edit by name, as sent by generic slider/text handlers.
    pub fn edit_field(&mut self, id: BubbleId, field: &str, value: &serde_json::Value) -> Vec<Action> {
        match BubbleUpdate::from_field(field, value) {
            Ok(update) => self.edit(id, update),
            Err(_) if self.model.get(id).is_none() => self.forget(id),
            Err(_) => Vec::new(),
        }
    }

    /// Move a bubble by a delta in percent.
    pub fn nudge(&mut self, id: BubbleId, dx: f64, dy: f64) -> Vec<Action> {
        let result = self.model.move_by(id, dx, dy);
        self.after_edit(id, result)
    }

    pub fn bring_to_front(&mut self, id: BubbleId) -> Vec<Action> {
        let result = self.model.bring_to_front(id);
        self.after_edit(id, result)
    }

    pub fn send_to_back(&mut self, id: BubbleId) -> Vec<Action> {
        let result = self.model.send_to_back(id);
        self.after_edit(id, result)
    }

    /// Remove a bubble.
    pub fn delete(&mut self, id: BubbleId) -> Vec<Action> {
        match self.model.remove(id) {
            Ok(_) => {
                let mut actions = vec![Action::BubbleDeleted { id }];
                if self.ui.selected_id == Some(id) {
                    actions.extend(self.set_selection(None));
                }
                actions.push(Action::RenderNeeded);
                actions
            }
            Err(_) => self.forget(id),
        }
    }

    /// Select a bubble, or clear the selection. Selecting an unknown id clears it.
    pub fn select(&mut self, id: Option<BubbleId>) -> Vec<Action> {
        let id = id.filter(|id| self.model.get(*id).is_some());
        self.set_selection(id)
    }

    // --- Queries ---

    /// The currently selected bubble, if any.
    #[must_use]
    pub fn selection(&self) -> Option<BubbleId> {
        self.ui.selected_id
    }

    /// Look up a bubble by id.
    #[must_use]
    pub fn bubble(&self, id: BubbleId) -> Option<&BubbleDescriptor> {
        self.model.get(id)
    }

    /// Geometry for every bubble in paint order.
    #[must_use]
    pub fn geometry(&self, measure: &dyn TextMeasure) -> Vec<BubbleGeometry> {
        place_all(&self.model.snapshot(), self.canvas, measure)
    }

    // --- Input events ---

    pub fn on_pointer_down(
        &mut self,
        screen_pt: Point,
        button: Button,
        _modifiers: Modifiers,
        measure: &dyn TextMeasure,
    ) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let canvas_pt = self.screen_to_canvas(screen_pt);
        let hit = hit_test(canvas_pt, &self.geometry(measure));

        match hit {
            Some(hit) => {
                self.input = match hit.part {
                    HitPart::Body => {
                        let anchor = self.model.get(hit.bubble_id).map_or(canvas_pt, |b| {
                            self.canvas.percent_to_px(b.position.x, b.position.y)
                        });
                        InputState::DraggingBubble {
                            id: hit.bubble_id,
                            grab_offset: Point::new(anchor.x - canvas_pt.x, anchor.y - canvas_pt.y),
                        }
                    }
                    HitPart::TailTip => InputState::DraggingTail { id: hit.bubble_id },
                };
                let mut actions = self.set_selection(Some(hit.bubble_id));
                actions.push(Action::SetCursor("grabbing".into()));
                actions
            }
            None => {
                self.input = InputState::Idle;
                self.set_selection(None)
            }
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers, measure: &dyn TextMeasure) -> Vec<Action> {
        let canvas_pt = self.screen_to_canvas(screen_pt);
        match self.input.clone() {
            InputState::Idle => Vec::new(),
            InputState::DraggingBubble { id, grab_offset } => {
                let target = Point::new(canvas_pt.x + grab_offset.x, canvas_pt.y + grab_offset.y);
                match self.canvas.px_to_percent(target) {
                    Some((x, y)) => self.edit(id, BubbleUpdate::SetPosition(Position::new(x, y))),
                    None => Vec::new(),
                }
            }
            InputState::DraggingTail { id } => self.steer_tail(id, canvas_pt, measure),
        }
    }

    pub fn on_pointer_up(&mut self, _screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let was_dragging = !matches!(self.input, InputState::Idle);
        self.input = InputState::Idle;
        if was_dragging { vec![Action::SetCursor("default".into())] } else { Vec::new() }
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if key.is_escape() {
            return self.set_selection(None);
        }
        let Some(id) = self.ui.selected_id else {
            return Vec::new();
        };
        if key.is_delete() {
            return self.delete(id);
        }
        if let Some((ux, uy)) = key.arrow_direction() {
            let step = if modifiers.shift { NUDGE_STEP_LARGE } else { NUDGE_STEP };
            return self.nudge(id, ux * step, uy * step);
        }
        Vec::new()
    }

    // --- Export ---

    /// Rasterize the page with every bubble at its current geometry.
    ///
    /// The selection is cleared for the duration of the call and restored
    /// afterwards whatever the outcome. Bubble state is never touched.
    ///
    /// # Errors
    ///
    /// [`ExportError::EmptyCanvas`] without a page or canvas area,
    /// [`ExportError::InvalidPixelRatio`] for a non-positive ratio, and any
    /// error the rasterizer reports.
    pub fn export(
        &mut self,
        rasterizer: &dyn Rasterizer,
        pixel_ratio: f64,
        measure: &dyn TextMeasure,
    ) -> Result<RasterImage, ExportError> {
        if !(pixel_ratio.is_finite() && pixel_ratio > 0.0) {
            return Err(ExportError::InvalidPixelRatio(pixel_ratio));
        }
        let Some(page) = self.page.as_ref() else {
            return Err(ExportError::EmptyCanvas);
        };
        if !self.canvas.is_drawable() {
            return Err(ExportError::EmptyCanvas);
        }

        let restore = self.ui.selected_id.take();

        let bubbles = place_all(&self.model.snapshot(), self.canvas, measure);
        let scene = Scene { page, canvas: self.canvas, bubbles: &bubbles };
        let result = rasterizer.rasterize(&scene, pixel_ratio);

        self.ui.selected_id = restore;
        result
    }

    // --- Internals ---

    fn screen_to_canvas(&self, screen_pt: Point) -> Point {
        self.page
            .as_ref()
            .map_or_else(ViewTransform::default, |p| p.view)
            .screen_to_canvas(screen_pt)
    }

    /// Point the tail at `canvas_pt`, with the tip landing on it.
    fn steer_tail(&mut self, id: BubbleId, canvas_pt: Point, measure: &dyn TextMeasure) -> Vec<Action> {
        let Some(bubble) = self.model.get(id) else {
            return self.forget(id);
        };
        let geo = place(bubble, self.canvas, measure);
        let dx = canvas_pt.x - geo.anchor.x;
        let dy = canvas_pt.y - geo.anchor.y;
        if dx == 0.0 && dy == 0.0 {
            return Vec::new();
        }

        let angle = angle_from_f64(dx.atan2(-dy).to_degrees());
        let dir = direction_for(angle);
        let base = Point::new(
            geo.anchor.x + dir.x * TAIL_BASE_FRACTION * geo.bounds.width,
            geo.anchor.y + dir.y * TAIL_BASE_FRACTION * geo.bounds.height,
        );
        let length = ((canvas_pt.x - base.x) * dir.x + (canvas_pt.y - base.y) * dir.y).max(0.0);

        let result = self
            .model
            .update_many(id, [BubbleUpdate::SetTailAngle(angle), BubbleUpdate::SetTailLength(length)])
            .map(|_| ());
        self.after_edit(id, result)
    }

    fn after_edit(&mut self, id: BubbleId, result: Result<(), ModelError>) -> Vec<Action> {
        match result {
            Ok(()) => match self.model.get(id) {
                Some(bubble) => vec![Action::BubbleUpdated(bubble.clone()), Action::RenderNeeded],
                None => Vec::new(),
            },
            Err(ModelError::NotFound(_)) => self.forget(id),
            Err(_) => Vec::new(),
        }
    }

    /// `id` is gone: drop it from the selection and any gesture.
    fn forget(&mut self, id: BubbleId) -> Vec<Action> {
        let dragging = match &self.input {
            InputState::DraggingBubble { id: drag_id, .. } | InputState::DraggingTail { id: drag_id } => *drag_id == id,
            InputState::Idle => false,
        };
        if dragging {
            self.input = InputState::Idle;
        }
        if self.ui.selected_id == Some(id) { self.set_selection(None) } else { Vec::new() }
    }

    fn set_selection(&mut self, id: Option<BubbleId>) -> Vec<Action> {
        if self.ui.selected_id == id {
            return Vec::new();
        }
        self.ui.selected_id = id;
        vec![Action::SelectionChanged(id), Action::RenderNeeded]
    }

    fn set_status(&mut self, status: AnalysisStatus) -> Vec<Action> {
        if self.ui.status == status {
            return Vec::new();
        }
        self.ui.status = status.clone();
        vec![Action::StatusChanged(status)]
    }
}

/// The full editor engine. Wraps `EditorCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    bitmap: Option<HtmlImageElement>,
    pub core: EditorCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        let mut core = EditorCore::new();
        core.set_canvas_size(f64::from(canvas.width()), f64::from(canvas.height()));
        Self { canvas, bitmap: None, core }
    }

    // --- Session ---

    /// Start a session on a decoded page image.
    pub fn open_page(&mut self, page: PageImage, bitmap: HtmlImageElement) -> Vec<Action> {
        self.canvas.set_width(bitmap.natural_width());
        self.canvas.set_height(bitmap.natural_height());
        self.core
            .set_canvas_size(f64::from(bitmap.natural_width()), f64::from(bitmap.natural_height()));
        self.bitmap = Some(bitmap);
        self.core.open_page(page)
    }

    pub fn close_page(&mut self) -> Vec<Action> {
        self.bitmap = None;
        self.core.close_page()
    }

    pub fn finish_analysis(
        &mut self,
        session: u64,
        result: Result<Vec<SceneSuggestion>, SuggestionError>,
    ) -> Vec<Action> {
        self.core.finish_analysis(session, result)
    }

    #[must_use]
    pub fn session(&self) -> u64 {
        self.core.session()
    }

    // --- Delegated editing ---

    pub fn add_manual_bubble(&mut self) -> Vec<Action> {
        self.core.add_manual_bubble()
    }

    pub fn edit(&mut self, id: BubbleId, update: BubbleUpdate) -> Vec<Action> {
        self.core.edit(id, update)
    }

    pub fn edit_field(&mut self, id: BubbleId, field: &str, value: &serde_json::Value) -> Vec<Action> {
        self.core.edit_field(id, field, value)
    }

    pub fn delete(&mut self, id: BubbleId) -> Vec<Action> {
        self.core.delete(id)
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        match self.context() {
            Ok(ctx) => self
                .core
                .on_pointer_down(screen_pt, button, modifiers, &ContextMeasure::new(&ctx)),
            Err(_) => self
                .core
                .on_pointer_down(screen_pt, button, modifiers, &EstimatedMeasure),
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        match self.context() {
            Ok(ctx) => self
                .core
                .on_pointer_move(screen_pt, modifiers, &ContextMeasure::new(&ctx)),
            Err(_) => self.core.on_pointer_move(screen_pt, modifiers, &EstimatedMeasure),
        }
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt, button, modifiers)
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(key, modifiers)
    }

    // --- Render / export ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a draw call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self.context()?;
        let measure = ContextMeasure::new(&ctx);
        let bubbles = self.core.geometry(&measure);
        render::draw(&ctx, self.bitmap.as_ref(), self.core.canvas, &bubbles, self.core.selection(), 1.0)
    }

    /// Export the page as a PNG at `pixel_ratio`.
    ///
    /// # Errors
    ///
    /// See [`EditorCore::export`]. A failure leaves every bubble as it was.
    pub fn export(&mut self, pixel_ratio: f64) -> Result<RasterImage, ExportError> {
        let ctx = self
            .context()
            .map_err(|e| ExportError::Rasterize(format!("{e:?}")))?;
        let rasterizer = CanvasRasterizer::new(self.bitmap.clone());
        self.core
            .export(&rasterizer, pixel_ratio, &ContextMeasure::new(&ctx))
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<BubbleId> {
        self.core.selection()
    }

    #[must_use]
    pub fn bubble(&self, id: BubbleId) -> Option<&BubbleDescriptor> {
        self.core.bubble(id)
    }

    fn context(&self) -> Result<CanvasRenderingContext2d, JsValue> {
        self.canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)
    }
}
