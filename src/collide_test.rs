#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use uuid::Uuid;

use super::*;

fn bounds() -> Size {
    Size::new(1000.0, 800.0)
}

fn obstacle(x: f64, y: f64, w: f64, h: f64) -> (EntityId, Frame) {
    (Uuid::new_v4(), Frame::new(x, y, w, h))
}

// =============================================================
// Bounds
// =============================================================

#[test]
fn inside_is_not_out_of_bounds() {
    assert!(!out_of_bounds(&Frame::new(0.0, 0.0, 1000.0, 800.0), bounds()));
}

#[test]
fn negative_origin_is_out_of_bounds() {
    assert!(out_of_bounds(&Frame::new(-1.0, 0.0, 10.0, 10.0), bounds()));
    assert!(out_of_bounds(&Frame::new(0.0, -1.0, 10.0, 10.0), bounds()));
}

#[test]
fn extent_past_edge_is_out_of_bounds() {
    assert!(out_of_bounds(&Frame::new(995.0, 0.0, 10.0, 10.0), bounds()));
    assert!(out_of_bounds(&Frame::new(0.0, 795.0, 10.0, 10.0), bounds()));
}

// =============================================================
// Overlap queries
// =============================================================

#[test]
fn overlapping_ids_reports_hits_only() {
    let a = obstacle(0.0, 0.0, 50.0, 50.0);
    let b = obstacle(200.0, 200.0, 50.0, 50.0);
    let probe = Frame::new(25.0, 25.0, 50.0, 50.0);
    assert_eq!(overlapping_ids(&probe, &[a, b]), vec![a.0]);
}

#[test]
fn edge_touch_is_not_a_hit() {
    let a = obstacle(50.0, 0.0, 50.0, 50.0);
    let probe = Frame::new(0.0, 0.0, 50.0, 50.0);
    assert!(!overlaps_any(&probe, &[a]));
}

// =============================================================
// Push-back resolution
// =============================================================

#[test]
fn clear_candidate_needs_no_push() {
    let mut frames = [Frame::new(0.0, 0.0, 50.0, 50.0)];
    let offset = push_back(&mut frames, (10.0, 0.0), &[obstacle(200.0, 0.0, 50.0, 50.0)], bounds());
    assert_eq!(offset, Some((0.0, 0.0)));
    assert_eq!(frames[0].x, 0.0);
}

#[test]
fn pushes_back_along_dominant_x() {
    // Dragged 30px right into an obstacle; resolution retreats left until
    // the edges touch.
    let mut frames = [Frame::new(80.0, 0.0, 50.0, 50.0)];
    let ob = obstacle(100.0, 0.0, 50.0, 50.0);
    let offset = push_back(&mut frames, (30.0, 5.0), &[ob], bounds());
    assert_eq!(offset, Some((-30.0, 0.0)));
    assert_eq!(frames[0].x, 50.0);
    assert!(!overlaps_any(&frames[0], &[ob]));
}

#[test]
fn pushes_back_along_dominant_y() {
    let mut frames = [Frame::new(0.0, 130.0, 50.0, 50.0)];
    let ob = obstacle(0.0, 100.0, 50.0, 50.0);
    let offset = push_back(&mut frames, (0.0, -40.0), &[ob], bounds());
    // Dragged upward; retreat is downward to the obstacle's bottom edge.
    assert_eq!(offset, Some((0.0, 20.0)));
    assert_eq!(frames[0].y, 150.0);
}

#[test]
fn push_exceeding_drag_travel_reverts() {
    // Clearing would take a 45px retreat but the pointer only travelled 10.
    let mut frames = [Frame::new(95.0, 0.0, 50.0, 50.0)];
    let ob = obstacle(100.0, 0.0, 50.0, 50.0);
    assert!(push_back(&mut frames, (10.0, 0.0), &[ob], bounds()).is_none());
}

#[test]
fn push_out_of_bounds_reverts() {
    // Retreating far enough to clear the obstacle would leave the canvas.
    let mut frames = [Frame::new(20.0, 0.0, 50.0, 50.0)];
    let ob = obstacle(30.0, 0.0, 100.0, 50.0);
    assert!(push_back(&mut frames, (60.0, 0.0), &[ob], bounds()).is_none());
}

#[test]
fn zero_travel_with_overlap_reverts() {
    let mut frames = [Frame::new(10.0, 10.0, 50.0, 50.0)];
    let ob = obstacle(0.0, 0.0, 50.0, 50.0);
    assert!(push_back(&mut frames, (0.0, 0.0), &[ob], bounds()).is_none());
}

#[test]
fn chained_obstacles_resolve_in_one_direction() {
    // Retreating clear of the near obstacle lands on the far one; the
    // frame must retreat past both.
    let mut frames = [Frame::new(140.0, 0.0, 50.0, 50.0)];
    let near = obstacle(100.0, 0.0, 50.0, 50.0);
    let far = obstacle(60.0, 0.0, 40.0, 50.0);
    let offset = push_back(&mut frames, (160.0, 0.0), &[near, far], bounds());
    assert_eq!(offset, Some((-130.0, 0.0)));
    assert_eq!(frames[0].right(), 60.0);
    assert!(!overlaps_any(&frames[0], &[near, far]));
}

#[test]
fn group_moves_by_one_shared_offset() {
    let mut frames = [
        Frame::new(80.0, 0.0, 50.0, 50.0),
        Frame::new(80.0, 100.0, 50.0, 50.0),
    ];
    let ob = obstacle(100.0, 0.0, 50.0, 50.0);
    let offset = push_back(&mut frames, (40.0, 0.0), &[ob], bounds());
    assert_eq!(offset, Some((-30.0, 0.0)));
    assert_eq!(frames[0].x, 50.0);
    assert_eq!(frames[1].x, 50.0);
}

#[test]
fn group_unresolvable_for_any_member_reverts() {
    // The second member sits over an obstacle that cannot be cleared
    // within the drag travel.
    let mut frames = [
        Frame::new(300.0, 0.0, 50.0, 50.0),
        Frame::new(98.0, 100.0, 50.0, 50.0),
    ];
    let ob = obstacle(100.0, 100.0, 400.0, 50.0);
    assert!(push_back(&mut frames, (5.0, 0.0), &[ob], bounds()).is_none());
}
