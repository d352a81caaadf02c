use super::*;

// =============================================================
// Names
// =============================================================

#[test]
fn recognized_names_round_trip() {
    for kind in ShapeKind::recognized() {
        assert_eq!(&ShapeKind::from_name(kind.name()), kind);
        assert_eq!(ShapeKind::parse(kind.name()).as_ref(), Ok(kind));
    }
}

#[test]
fn recognized_has_ten_distinct_kinds() {
    let kinds = ShapeKind::recognized();
    assert_eq!(kinds.len(), 10);
    for (i, a) in kinds.iter().enumerate() {
        for b in &kinds[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn from_name_ignores_case_and_whitespace() {
    assert_eq!(ShapeKind::from_name("  Thought "), ShapeKind::Thought);
    assert_eq!(ShapeKind::from_name("SCREAM"), ShapeKind::Scream);
}

#[test]
fn from_name_keeps_unknown_names() {
    assert_eq!(ShapeKind::from_name("hexagon"), ShapeKind::Other("hexagon".into()));
    assert!(!ShapeKind::from_name("hexagon").is_recognized());
}

#[test]
fn parse_rejects_unknown_names() {
    assert_eq!(ShapeKind::parse("hexagon"), Err(ModelError::InvalidShape("hexagon".into())));
}

#[test]
fn default_is_speech() {
    assert_eq!(ShapeKind::default(), ShapeKind::Speech);
}

#[test]
fn display_uses_name() {
    assert_eq!(ShapeKind::Whisper.to_string(), "whisper");
    assert_eq!(ShapeKind::Other("blob".into()).to_string(), "blob");
}

// =============================================================
// Serde
// =============================================================

#[test]
fn serializes_as_lowercase_string() {
    assert_eq!(serde_json::to_string(&ShapeKind::Narrative).unwrap(), "\"narrative\"");
}

#[test]
fn deserializes_unknown_as_other() {
    let kind: ShapeKind = serde_json::from_str("\"zigzag\"").unwrap();
    assert_eq!(kind, ShapeKind::Other("zigzag".into()));
    assert_eq!(serde_json::to_string(&kind).unwrap(), "\"zigzag\"");
}

#[test]
fn deserialize_rejects_non_string() {
    assert!(serde_json::from_str::<ShapeKind>("42").is_err());
}

// =============================================================
// Styles
// =============================================================

#[test]
fn unrecognized_kind_renders_as_speech() {
    assert_eq!(ShapeKind::Other("hexagon".into()).style(), ShapeKind::Speech.style());
    assert_eq!(ShapeKind::Speech.style(), ShapeStyle::OVAL);
}

#[test]
fn narrative_never_allows_tail() {
    assert!(!ShapeKind::Narrative.style().tail_allowed);
    for kind in ShapeKind::recognized().iter().filter(|k| **k != ShapeKind::Narrative) {
        assert!(kind.style().tail_allowed, "{kind} should allow a tail");
    }
}

#[test]
fn thought_uses_dotted_cloud() {
    let style = ShapeKind::Thought.style();
    assert_eq!(style.outline, Outline::Cloud);
    assert_eq!(style.tail_style, TailStyle::Dots);
}

#[test]
fn burst_kinds_use_burst_outline() {
    assert_eq!(ShapeKind::Scream.style().outline, Outline::Burst);
    assert_eq!(ShapeKind::Impact.style().outline, Outline::Burst);
}

#[test]
fn whisper_has_thin_border() {
    assert!(ShapeKind::Whisper.style().border_px < ShapeStyle::OVAL.border_px);
}

#[test]
fn outline_oval_classification() {
    assert!(Outline::Ellipse.is_oval());
    assert!(Outline::Cloud.is_oval());
    assert!(Outline::Burst.is_oval());
    assert!(Outline::Wave.is_oval());
    assert!(!Outline::Rect.is_oval());
    assert!(!Outline::RoundedRect.is_oval());
}

#[test]
fn every_style_has_positive_padding_and_border() {
    for kind in ShapeKind::recognized() {
        let style = kind.style();
        assert!(style.pad_x > 0.0 && style.pad_y > 0.0, "{kind}");
        assert!(style.border_px > 0.0, "{kind}");
    }
}
