#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::section::{Section, SectionKind};

fn id() -> EntityId {
    Uuid::new_v4()
}

fn sec_at(x: f64, y: f64, w: f64, h: f64) -> Section {
    Section {
        id: id(),
        kind: SectionKind::Single,
        frame: Frame::new(x, y, w, h),
        z: 0,
        lock: false,
        parent_scope: None,
        props: json!({}),
    }
}

// =============================================================
// Set semantics
// =============================================================

#[test]
fn new_selection_is_empty() {
    let s = Selection::new();
    assert!(s.is_empty());
    assert_eq!(s.active(), None);
}

#[test]
fn replace_collapses_to_single() {
    let mut s = Selection::new();
    let (a, b) = (id(), id());
    s.replace(a);
    s.replace(b);
    assert_eq!(s.ids(), &[b]);
    assert_eq!(s.active(), Some(b));
}

#[test]
fn toggle_adds_then_removes() {
    let mut s = Selection::new();
    let a = id();
    s.toggle(a);
    assert!(s.contains(a));
    s.toggle(a);
    assert!(!s.contains(a));
}

#[test]
fn toggle_preserves_unrelated_members() {
    let mut s = Selection::new();
    let (a, b, c) = (id(), id(), id());
    s.toggle(a);
    s.toggle(b);
    s.toggle(c);
    s.toggle(b);
    assert_eq!(s.ids(), &[a, c]);
}

#[test]
fn active_is_last_inserted() {
    let mut s = Selection::new();
    let (a, b) = (id(), id());
    s.toggle(a);
    s.toggle(b);
    assert_eq!(s.active(), Some(b));
}

#[test]
fn add_moves_existing_member_to_active() {
    let mut s = Selection::new();
    let (a, b) = (id(), id());
    s.add(a);
    s.add(b);
    s.add(a);
    assert_eq!(s.len(), 2);
    assert_eq!(s.active(), Some(a));
}

#[test]
fn set_all_preserves_given_order() {
    let mut s = Selection::new();
    let (a, b, c) = (id(), id(), id());
    s.set_all(vec![c, a, b]);
    assert_eq!(s.ids(), &[c, a, b]);
    assert_eq!(s.active(), Some(b));
}

#[test]
fn clear_empties_the_set() {
    let mut s = Selection::new();
    s.toggle(id());
    s.clear();
    assert!(s.is_empty());
}

// =============================================================
// Marquee hit-testing
// =============================================================

fn pairs(sections: &[Section]) -> Vec<(&Section, Frame)> {
    sections.iter().map(|s| (s, s.frame)).collect()
}

#[test]
fn marquee_selects_intersecting_only() {
    let near = sec_at(0.0, 0.0, 50.0, 50.0);
    let far = sec_at(100.0, 100.0, 50.0, 50.0);
    let sections = vec![near.clone(), far];
    let hits = marquee_hits(&pairs(&sections), Frame::new(0.0, 0.0, 60.0, 60.0));
    assert_eq!(hits, vec![near.id]);
}

#[test]
fn marquee_spanning_both_selects_both() {
    let a = sec_at(0.0, 0.0, 50.0, 50.0);
    let b = sec_at(100.0, 100.0, 50.0, 50.0);
    let sections = vec![a.clone(), b.clone()];
    let hits = marquee_hits(&pairs(&sections), Frame::new(0.0, 0.0, 200.0, 200.0));
    assert_eq!(hits, vec![a.id, b.id]);
}

#[test]
fn marquee_partial_intersection_counts() {
    let a = sec_at(40.0, 40.0, 50.0, 50.0);
    let sections = vec![a.clone()];
    let hits = marquee_hits(&pairs(&sections), Frame::new(0.0, 0.0, 45.0, 45.0));
    assert_eq!(hits, vec![a.id]);
}

#[test]
fn marquee_touching_edge_misses() {
    let a = sec_at(50.0, 0.0, 50.0, 50.0);
    let sections = vec![a];
    let hits = marquee_hits(&pairs(&sections), Frame::new(0.0, 0.0, 50.0, 50.0));
    assert!(hits.is_empty());
}

#[test]
fn marquee_skips_locked_sections() {
    let mut locked = sec_at(0.0, 0.0, 50.0, 50.0);
    locked.lock = true;
    let free = sec_at(10.0, 10.0, 50.0, 50.0);
    let sections = vec![locked, free.clone()];
    let hits = marquee_hits(&pairs(&sections), Frame::new(0.0, 0.0, 200.0, 200.0));
    assert_eq!(hits, vec![free.id]);
}
