#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

// =============================================================
// Modifiers
// =============================================================

#[test]
fn default_modifiers_are_clear() {
    let m = Modifiers::default();
    assert!(!m.shift && !m.ctrl && !m.alt && !m.meta);
    assert!(!m.additive());
}

#[test]
fn shift_or_ctrl_is_additive() {
    assert!(Modifiers { shift: true, ..Default::default() }.additive());
    assert!(Modifiers { ctrl: true, ..Default::default() }.additive());
    assert!(!Modifiers { alt: true, ..Default::default() }.additive());
}

// =============================================================
// Resize anchors
// =============================================================

#[test]
fn corner_anchors_move_two_edges() {
    assert!(ResizeAnchor::Nw.moves_left() && ResizeAnchor::Nw.moves_top());
    assert!(ResizeAnchor::Se.moves_right() && ResizeAnchor::Se.moves_bottom());
    assert!(ResizeAnchor::Ne.moves_right() && ResizeAnchor::Ne.moves_top());
    assert!(ResizeAnchor::Sw.moves_left() && ResizeAnchor::Sw.moves_bottom());
}

#[test]
fn side_anchors_move_one_edge() {
    assert!(ResizeAnchor::E.moves_right());
    assert!(!ResizeAnchor::E.moves_left());
    assert!(!ResizeAnchor::E.moves_top());
    assert!(!ResizeAnchor::E.moves_bottom());

    assert!(ResizeAnchor::N.moves_top());
    assert!(!ResizeAnchor::N.moves_bottom());
    assert!(!ResizeAnchor::N.moves_left());
    assert!(!ResizeAnchor::N.moves_right());
}

// =============================================================
// Gesture
// =============================================================

#[test]
fn default_gesture_is_idle() {
    assert!(matches!(Gesture::default(), Gesture::Idle));
}

#[test]
fn transaction_kind_per_gesture() {
    let p = Point::new(0.0, 0.0);
    assert_eq!(Gesture::Idle.transaction_kind(), None);
    assert_eq!(Gesture::Marquee { origin: p, cursor: p }.transaction_kind(), None);
    let drag = Gesture::Drag {
        anchor: p,
        cursor: p,
        pressed: uuid::Uuid::new_v4(),
        was_selected: false,
        origins: Vec::new(),
    };
    assert_eq!(drag.transaction_kind(), Some(TransactionKind::Drag));
    let resize = Gesture::Resize {
        id: uuid::Uuid::new_v4(),
        handle: ResizeAnchor::Se,
        anchor: p,
        cursor: p,
        origin: Frame::new(0.0, 0.0, 10.0, 10.0),
    };
    assert_eq!(resize.transaction_kind(), Some(TransactionKind::Resize));
    let draw = Gesture::Draw { origin: p, cursor: p };
    assert_eq!(draw.transaction_kind(), Some(TransactionKind::Insert));
}

#[test]
fn key_holds_host_name() {
    assert_eq!(Key("Escape".to_string()).0, "Escape");
}
