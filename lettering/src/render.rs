//! Rendering: paints the page and its bubbles to a 2D context.
//!
//! This module is the only place that draws on a [`web_sys::CanvasRenderingContext2d`].
//! It receives placed geometry and produces pixels. It does not mutate any
//! application state and does no layout of its own.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level callers ([`crate::engine::Engine::render`] and
//! [`CanvasRasterizer`]) handle the result.

use std::f64::consts::{PI, TAU};

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::export::{ExportError, RasterImage, Rasterizer, Scene};
use crate::model::BubbleId;
use crate::placement::{BubbleGeometry, EstimatedMeasure, Rect, TailGeometry, TextMeasure};
use crate::shape::{Outline, TailStyle};
use crate::view::CanvasSize;

const INK: &str = "#000000";
const PAPER: &str = "#ffffff";
const SELECTION: &str = "#2563eb";

/// Selection dash segment length in pixels.
const SELECTION_DASH_PX: f64 = 6.0;

/// Lobes around a cloud outline.
const CLOUD_LOBES: usize = 12;
/// Spikes around a burst outline.
const BURST_SPIKES: usize = 16;
/// Inner radius of a burst, relative to the outer radius.
const BURST_INNER_RATIO: f64 = 0.82;
/// Ripples around a wavy outline.
const WAVE_RIPPLES: usize = 24;

/// Measures text with the context's current font.
pub struct ContextMeasure<'a> {
    ctx: &'a CanvasRenderingContext2d,
}

impl<'a> ContextMeasure<'a> {
    #[must_use]
    pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl TextMeasure for ContextMeasure<'_> {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        self.ctx.set_font(&font_for(font_size));
        match self.ctx.measure_text(text) {
            Ok(metrics) => metrics.width(),
            Err(_) => EstimatedMeasure.text_width(text, font_size),
        }
    }
}

fn font_for(font_size: f64) -> String {
    format!("900 {font_size}px 'Noto Sans JP', sans-serif")
}

/// Draw the page bitmap, every bubble in paint order, and the selection outline.
///
/// `scale` multiplies every coordinate, for high-density output.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    bitmap: Option<&HtmlImageElement>,
    canvas: CanvasSize,
    bubbles: &[BubbleGeometry],
    selected: Option<BubbleId>,
    scale: f64,
) -> Result<(), JsValue> {
    // Layer 1: paper and artwork.
    ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0)?;
    ctx.set_fill_style_str(PAPER);
    ctx.fill_rect(0.0, 0.0, canvas.width, canvas.height);
    if let Some(img) = bitmap {
        ctx.draw_image_with_html_image_element_and_dw_and_dh(img, 0.0, 0.0, canvas.width, canvas.height)?;
    }

    // Layer 2: bubbles, bottom first.
    for geo in bubbles {
        draw_bubble(ctx, geo)?;
    }

    // Layer 3: selection UI.
    if let Some(geo) = selected.and_then(|id| bubbles.iter().find(|g| g.id == id)) {
        draw_selection(ctx, &geo.bounds)?;
    }
    Ok(())
}

// =============================================================
// Bubbles
// =============================================================

fn draw_bubble(ctx: &CanvasRenderingContext2d, geo: &BubbleGeometry) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_line_width(geo.style.border_px);
    ctx.set_stroke_style_str(INK);
    ctx.set_fill_style_str(PAPER);

    // Stroke both outlines first, then fill both, so the seam where the tail
    // meets the body is painted over.
    match &geo.tail {
        Some(tail) if tail.style == TailStyle::Wedge => {
            wedge_path(ctx, tail);
            ctx.stroke();
            body_path(ctx, geo)?;
            ctx.stroke();
            ctx.fill();
            wedge_path(ctx, tail);
            ctx.fill();
        }
        Some(tail) => {
            body_path(ctx, geo)?;
            ctx.fill();
            ctx.stroke();
            draw_dots(ctx, tail)?;
        }
        None => {
            body_path(ctx, geo)?;
            ctx.fill();
            ctx.stroke();
        }
    }

    draw_text(ctx, geo)?;
    ctx.restore();
    Ok(())
}

fn body_path(ctx: &CanvasRenderingContext2d, geo: &BubbleGeometry) -> Result<(), JsValue> {
    let b = &geo.bounds;
    let c = b.center();
    let rx = b.width / 2.0;
    let ry = b.height / 2.0;

    ctx.begin_path();
    match geo.style.outline {
        Outline::Ellipse => ctx.ellipse(c.x, c.y, rx, ry, 0.0, 0.0, TAU)?,
        Outline::Cloud => scalloped_path(ctx, c.x, c.y, rx, ry, CLOUD_LOBES, 1.18, 1.18),
        Outline::Wave => scalloped_path(ctx, c.x, c.y, rx, ry, WAVE_RIPPLES, 1.06, 0.94),
        Outline::Burst => burst_path(ctx, c.x, c.y, rx, ry),
        Outline::Rect => ctx.rect(b.x, b.y, b.width, b.height),
        Outline::RoundedRect => rounded_rect_path(ctx, b, (b.height / 4.0).min(16.0))?,
    }
    ctx.close_path();
    Ok(())
}

/// Points on the ellipse joined by quadratic curves whose control points sit
/// at `odd` / `even` times the radius, alternating.
#[allow(clippy::cast_precision_loss, clippy::too_many_arguments)]
fn scalloped_path(ctx: &CanvasRenderingContext2d, cx: f64, cy: f64, rx: f64, ry: f64, count: usize, odd: f64, even: f64) {
    let step = TAU / count as f64;
    ctx.move_to(cx, cy - ry);
    for i in 0..count {
        let mid = step * (i as f64 + 0.5) - PI / 2.0;
        let end = step * (i as f64 + 1.0) - PI / 2.0;
        let k = if i % 2 == 0 { even } else { odd };
        ctx.quadratic_curve_to(cx + mid.cos() * rx * k, cy + mid.sin() * ry * k, cx + end.cos() * rx, cy + end.sin() * ry);
    }
}

#[allow(clippy::cast_precision_loss)]
fn burst_path(ctx: &CanvasRenderingContext2d, cx: f64, cy: f64, rx: f64, ry: f64) {
    let points = BURST_SPIKES * 2;
    let step = TAU / points as f64;
    for i in 0..points {
        let angle = step * i as f64 - PI / 2.0;
        let k = if i % 2 == 0 { 1.0 } else { BURST_INNER_RATIO };
        let x = cx + angle.cos() * rx * k;
        let y = cy + angle.sin() * ry * k;
        if i == 0 {
            ctx.move_to(x, y);
        } else {
            ctx.line_to(x, y);
        }
    }
}

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, b: &Rect, r: f64) -> Result<(), JsValue> {
    let (x, y, w, h) = (b.x, b.y, b.width, b.height);
    ctx.move_to(x + r, y);
    ctx.arc_to(x + w, y, x + w, y + h, r)?;
    ctx.arc_to(x + w, y + h, x, y + h, r)?;
    ctx.arc_to(x, y + h, x, y, r)?;
    ctx.arc_to(x, y, x + w, y, r)?;
    Ok(())
}

fn wedge_path(ctx: &CanvasRenderingContext2d, tail: &TailGeometry) {
    ctx.begin_path();
    ctx.move_to(tail.base_left.x, tail.base_left.y);
    ctx.line_to(tail.tip.x, tail.tip.y);
    ctx.line_to(tail.base_right.x, tail.base_right.y);
    ctx.close_path();
}

fn draw_dots(ctx: &CanvasRenderingContext2d, tail: &TailGeometry) -> Result<(), JsValue> {
    for dot in &tail.dots {
        ctx.begin_path();
        ctx.arc(dot.center.x, dot.center.y, dot.radius, 0.0, TAU)?;
        ctx.fill();
        ctx.stroke();
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn draw_text(ctx: &CanvasRenderingContext2d, geo: &BubbleGeometry) -> Result<(), JsValue> {
    if geo.lines.is_empty() {
        return Ok(());
    }
    ctx.set_fill_style_str(INK);
    ctx.set_font(&font_for(geo.font_size));
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");

    let block = geo.lines.len() as f64 * geo.line_height;
    let top = geo.anchor.y - block / 2.0 + geo.line_height / 2.0;
    for (i, line) in geo.lines.iter().enumerate() {
        ctx.fill_text(line, geo.anchor.x, top + i as f64 * geo.line_height)?;
    }
    Ok(())
}

fn draw_selection(ctx: &CanvasRenderingContext2d, bounds: &Rect) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_stroke_style_str(SELECTION);
    ctx.set_line_width(2.0);
    let dash = js_sys::Array::of2(&JsValue::from_f64(SELECTION_DASH_PX), &JsValue::from_f64(SELECTION_DASH_PX));
    ctx.set_line_dash(&dash)?;
    ctx.stroke_rect(bounds.x, bounds.y, bounds.width, bounds.height);
    ctx.restore();
    Ok(())
}

// =============================================================
// Rasterizer
// =============================================================

/// Paints a scene into an offscreen canvas and encodes it as PNG.
pub struct CanvasRasterizer {
    bitmap: Option<HtmlImageElement>,
}

impl CanvasRasterizer {
    #[must_use]
    pub fn new(bitmap: Option<HtmlImageElement>) -> Self {
        Self { bitmap }
    }

    fn paint(&self, scene: &Scene<'_>, pixel_ratio: f64) -> Result<String, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(JsValue::from)?;
        canvas.set_width(device_px(scene.canvas.width, pixel_ratio));
        canvas.set_height(device_px(scene.canvas.height, pixel_ratio));

        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;

        draw(&ctx, self.bitmap.as_ref(), scene.canvas, scene.bubbles, None, pixel_ratio)?;
        canvas.to_data_url_with_type("image/png")
    }
}

impl Rasterizer for CanvasRasterizer {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize(&self, scene: &Scene<'_>, pixel_ratio: f64) -> Result<RasterImage, ExportError> {
        let data_url = self
            .paint(scene, pixel_ratio)
            .map_err(|e| ExportError::Rasterize(format!("{e:?}")))?;
        Ok(RasterImage::png(data_url, js_sys::Date::now() as u64))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn device_px(css_px: f64, pixel_ratio: f64) -> u32 {
    (css_px * pixel_ratio).round().clamp(1.0, f64::from(u32::MAX)) as u32
}
