#![allow(clippy::float_cmp)]

use super::*;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// =============================================================
// MIME types
// =============================================================

#[test]
fn supported_mime_types() {
    assert!(is_supported_mime("image/png"));
    assert!(is_supported_mime("IMAGE/JPEG"));
    assert!(is_supported_mime(" image/webp "));
    assert!(!is_supported_mime("image/tiff"));
    assert!(!is_supported_mime("application/pdf"));
}

// =============================================================
// CanvasSize
// =============================================================

#[test]
fn canvas_default_is_not_drawable() {
    assert!(!CanvasSize::default().is_drawable());
    assert!(!CanvasSize::new(100.0, 0.0).is_drawable());
    assert!(!CanvasSize::new(f64::NAN, 10.0).is_drawable());
    assert!(CanvasSize::new(1.0, 1.0).is_drawable());
}

#[test]
fn percent_to_px_scales_by_dimensions() {
    let c = CanvasSize::new(800.0, 1200.0);
    assert_eq!(c.percent_to_px(50.0, 25.0), Point::new(400.0, 300.0));
    assert_eq!(c.percent_to_px(0.0, 100.0), Point::new(0.0, 1200.0));
}

#[test]
fn px_to_percent_inverts_percent_to_px() {
    let c = CanvasSize::new(800.0, 1200.0);
    let (x, y) = c.px_to_percent(Point::new(80.0, -60.0)).unwrap();
    assert!(approx_eq(x, 10.0));
    assert!(approx_eq(y, -5.0));
    assert_eq!(c.px_to_percent(c.percent_to_px(25.0, 75.0)), Some((25.0, 75.0)));
}

#[test]
fn px_to_percent_on_empty_canvas_is_none() {
    assert_eq!(CanvasSize::default().px_to_percent(Point::new(1.0, 1.0)), None);
}

// =============================================================
// ViewTransform
// =============================================================

#[test]
fn view_default_is_identity() {
    let v = ViewTransform::default();
    let p = Point::new(12.5, -3.0);
    assert_eq!(v.screen_to_canvas(p), p);
    assert_eq!(v.canvas_to_screen(p), p);
}

#[test]
fn view_round_trips_with_zoom_and_offset() {
    let v = ViewTransform { zoom: 2.5, offset_x: 40.0, offset_y: -15.0 };
    let p = Point::new(123.0, 456.0);
    let back = v.screen_to_canvas(v.canvas_to_screen(p));
    assert!(approx_eq(back.x, p.x));
    assert!(approx_eq(back.y, p.y));
}

#[test]
fn screen_dist_divides_by_zoom() {
    let v = ViewTransform { zoom: 4.0, ..Default::default() };
    assert_eq!(v.screen_dist_to_canvas(20.0), 5.0);
}

#[test]
fn view_validity_requires_positive_finite_zoom() {
    assert!(ViewTransform::default().is_valid());
    for zoom in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(!ViewTransform { zoom, ..Default::default() }.is_valid(), "{zoom}");
    }
    assert!(!ViewTransform { offset_x: f64::NAN, ..Default::default() }.is_valid());
}

#[test]
fn view_serializes_camel_case() {
    let v = ViewTransform { zoom: 1.5, offset_x: 2.0, offset_y: 3.0 };
    let json = serde_json::to_value(v).unwrap();
    assert_eq!(json["offsetX"], 2.0);
    assert_eq!(json["offsetY"], 3.0);
}

// =============================================================
// PageImage
// =============================================================

#[test]
fn base64_payload_strips_data_url_header() {
    let page = PageImage::new("data:image/png;base64,iVBORw0KGgo=", "image/png");
    assert_eq!(page.base64_payload(), "iVBORw0KGgo=");
}

#[test]
fn base64_payload_passes_bare_source_through() {
    let page = PageImage::new("iVBORw0KGgo=", "image/png");
    assert_eq!(page.base64_payload(), "iVBORw0KGgo=");
}

#[test]
fn base64_payload_ignores_commas_outside_data_urls() {
    let page = PageImage::new("https://example.com/a,b.png", "image/png");
    assert_eq!(page.base64_payload(), "https://example.com/a,b.png");
}

#[test]
fn page_view_defaults_when_missing() {
    let page: PageImage = serde_json::from_str(r#"{"source":"x","mimeType":"image/png"}"#).unwrap();
    assert_eq!(page.view, ViewTransform::default());
}
