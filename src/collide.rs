//! Bounds and overlap policy: the gate every transaction commit passes.
//!
//! During live preview these predicates only feed warning flags; at commit
//! they decide accept, push-back, or revert. Resolution moves the dragged
//! frames only; siblings are never displaced to make room.

#[cfg(test)]
#[path = "collide_test.rs"]
mod collide_test;

use crate::entity::EntityId;
use crate::geom::{Frame, Size};

/// Whether `frame` escapes `[0, w] × [0, h]`.
#[must_use]
pub fn out_of_bounds(frame: &Frame, bounds: Size) -> bool {
    !frame.within(bounds)
}

/// Ids of `others` whose frame overlaps `frame`.
#[must_use]
pub fn overlapping_ids(frame: &Frame, others: &[(EntityId, Frame)]) -> Vec<EntityId> {
    others
        .iter()
        .filter(|(_, other)| frame.overlaps(other))
        .map(|(id, _)| *id)
        .collect()
}

/// Whether `frame` overlaps any frame in `others`.
#[must_use]
pub fn overlaps_any(frame: &Frame, others: &[(EntityId, Frame)]) -> bool {
    others.iter().any(|(_, other)| frame.overlaps(other))
}

/// Push `frames` back along the dominant drag axis until none overlaps an
/// obstacle, moving all of them by one shared offset.
///
/// `drag` is the pointer delta that produced the candidates; push-back runs
/// against its dominant axis, opposite to the drag direction, and never
/// further than the drag itself travelled on that axis. Returns the applied
/// offset on success. `None` means no valid correction exists and the
/// caller reverts.
#[must_use]
pub fn push_back(
    frames: &mut [Frame],
    drag: (f64, f64),
    obstacles: &[(EntityId, Frame)],
    bounds: Size,
) -> Option<(f64, f64)> {
    let horizontal = drag.0.abs() >= drag.1.abs();
    let travel = if horizontal { drag.0 } else { drag.1 };
    if travel == 0.0 {
        return if clear(frames, obstacles, bounds) { Some((0.0, 0.0)) } else { None };
    }
    let sign = travel.signum();
    let cap = travel.abs();

    let mut pushed = 0.0;
    // Each pass clears at least one obstacle and only retreats, so the
    // number of passes is bounded by the obstacle count.
    for _ in 0..=obstacles.len() {
        let mut step: Option<f64> = None;
        for f in frames.iter() {
            for (_, o) in obstacles.iter().filter(|(_, o)| f.overlaps(o)) {
                let c = clearance(f, o, horizontal, sign);
                step = Some(step.map_or(c, |s| s.max(c)));
            }
        }
        let Some(step) = step else { break };
        pushed += step;
        if pushed > cap {
            return None;
        }
        let (dx, dy) = if horizontal { (-sign * step, 0.0) } else { (0.0, -sign * step) };
        for f in frames.iter_mut() {
            *f = f.translated(dx, dy);
        }
    }

    let offset = if horizontal { (-sign * pushed, 0.0) } else { (0.0, -sign * pushed) };
    clear(frames, obstacles, bounds).then_some(offset)
}

/// Distance `f` must retreat (opposite to `sign` on the given axis) so it no
/// longer overlaps `o`.
fn clearance(f: &Frame, o: &Frame, horizontal: bool, sign: f64) -> f64 {
    if horizontal {
        if sign > 0.0 { f.right() - o.x } else { o.right() - f.x }
    } else if sign > 0.0 {
        f.bottom() - o.y
    } else {
        o.bottom() - f.y
    }
}

fn clear(frames: &[Frame], obstacles: &[(EntityId, Frame)], bounds: Size) -> bool {
    frames
        .iter()
        .all(|f| f.within(bounds) && !overlaps_any(f, obstacles))
}
