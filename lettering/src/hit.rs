#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::model::BubbleId;
use crate::placement::BubbleGeometry;
use crate::view::Point;

/// Which part of a bubble was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    TailTip,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub bubble_id: BubbleId,
    pub part: HitPart,
}

/// Slop around a tail tip, in canvas pixels.
const TAIL_TIP_RADIUS_PX: f64 = 10.0;

/// Find the topmost bubble under `pt`.
///
/// `geometry` is in paint order, so it is scanned back to front. Tail tips
/// are checked before bodies so a tip poking over another bubble stays
/// grabbable.
#[must_use]
pub fn hit_test(pt: Point, geometry: &[BubbleGeometry]) -> Option<Hit> {
    for geo in geometry.iter().rev() {
        if let Some(tail) = &geo.tail {
            let dx = pt.x - tail.tip.x;
            let dy = pt.y - tail.tip.y;
            if dx.hypot(dy) <= TAIL_TIP_RADIUS_PX {
                return Some(Hit { bubble_id: geo.id, part: HitPart::TailTip });
            }
        }
        if body_contains(geo, pt) {
            return Some(Hit { bubble_id: geo.id, part: HitPart::Body });
        }
    }
    None
}

fn body_contains(geo: &BubbleGeometry, pt: Point) -> bool {
    if !geo.bounds.contains(pt) {
        return false;
    }
    if !geo.style.outline.is_oval() {
        return true;
    }
    let rx = geo.bounds.width / 2.0;
    let ry = geo.bounds.height / 2.0;
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let c = geo.bounds.center();
    let nx = (pt.x - c.x) / rx;
    let ny = (pt.y - c.y) / ry;
    nx * nx + ny * ny <= 1.0
}
