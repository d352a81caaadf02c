use uuid::Uuid;

use super::*;
use crate::model::{BubbleDescriptor, Position};
use crate::placement::{EstimatedMeasure, place};
use crate::shape::ShapeKind;
use crate::view::CanvasSize;

fn canvas() -> CanvasSize {
    CanvasSize::new(1000.0, 1000.0)
}

fn bubble(x: f64, y: f64, shape: ShapeKind) -> BubbleDescriptor {
    BubbleDescriptor {
        id: Uuid::new_v4(),
        text: String::new(),
        position: Position::new(x, y),
        scale: 20.0,
        shape_kind: shape,
        font_size: 16,
        tail_angle: 180,
        tail_length: 80.0,
        show_tail: true,
        z_order: 0,
        reading_order: 1,
        panel: None,
        note: String::new(),
    }
}

fn geometry(bubbles: &[&BubbleDescriptor]) -> Vec<BubbleGeometry> {
    bubbles
        .iter()
        .map(|b| place(b, canvas(), &EstimatedMeasure))
        .collect()
}

// =============================================================
// Body
// =============================================================

#[test]
fn hit_center_is_body() {
    let b = bubble(50.0, 50.0, ShapeKind::Speech);
    let hit = hit_test(Point::new(500.0, 500.0), &geometry(&[&b])).unwrap();
    assert_eq!(hit, Hit { bubble_id: b.id, part: HitPart::Body });
}

#[test]
fn miss_on_empty_canvas() {
    assert!(hit_test(Point::new(10.0, 10.0), &[]).is_none());
}

#[test]
fn miss_far_away() {
    let b = bubble(50.0, 50.0, ShapeKind::Speech);
    assert!(hit_test(Point::new(10.0, 10.0), &geometry(&[&b])).is_none());
}

#[test]
fn oval_corner_is_a_miss() {
    // 200x100 box centered at (500, 500); the corner lies outside the ellipse.
    let b = bubble(50.0, 50.0, ShapeKind::Speech);
    assert!(hit_test(Point::new(405.0, 455.0), &geometry(&[&b])).is_none());
}

#[test]
fn rect_corner_is_a_hit() {
    let b = bubble(50.0, 50.0, ShapeKind::Narrative);
    let hit = hit_test(Point::new(405.0, 455.0), &geometry(&[&b])).unwrap();
    assert_eq!(hit.part, HitPart::Body);
}

#[test]
fn topmost_bubble_wins() {
    let below = bubble(50.0, 50.0, ShapeKind::Speech);
    let above = bubble(52.0, 50.0, ShapeKind::Speech);
    let geos = geometry(&[&below, &above]);
    assert_eq!(hit_test(Point::new(510.0, 500.0), &geos).unwrap().bubble_id, above.id);
}

// =============================================================
// Tail tip
// =============================================================

#[test]
fn tail_tip_is_grabbable() {
    let b = bubble(50.0, 50.0, ShapeKind::Speech);
    let geos = geometry(&[&b]);
    let tip = geos[0].tail.as_ref().unwrap().tip;
    let hit = hit_test(Point::new(tip.x + 3.0, tip.y - 3.0), &geos).unwrap();
    assert_eq!(hit, Hit { bubble_id: b.id, part: HitPart::TailTip });
}

#[test]
fn tail_tip_beats_body_below() {
    let pointer = bubble(50.0, 50.0, ShapeKind::Speech);
    let geos = geometry(&[&pointer]);
    let tip = geos[0].tail.as_ref().unwrap().tip;

    // A bubble painted earlier, centered right under the tip.
    let under = BubbleDescriptor { position: Position::new(tip.x / 10.0, tip.y / 10.0), ..bubble(0.0, 0.0, ShapeKind::Speech) };
    let geos = geometry(&[&under, &pointer]);
    assert_eq!(hit_test(tip, &geos).unwrap(), Hit { bubble_id: pointer.id, part: HitPart::TailTip });
}

#[test]
fn no_tail_means_no_tip_hit() {
    let b = BubbleDescriptor { show_tail: false, ..bubble(50.0, 50.0, ShapeKind::Speech) };
    let with_tail = bubble(50.0, 50.0, ShapeKind::Speech);
    let tip = geometry(&[&with_tail])[0].tail.as_ref().unwrap().tip;
    assert!(hit_test(tip, &geometry(&[&b])).is_none());
}
