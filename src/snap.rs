//! Snapping: pull a candidate frame onto grid lines, sibling edges and
//! centers, or explicit guide lines.
//!
//! The two axes are independent: a frame can grid-snap on x while
//! edge-snapping on y. Each axis reports which source it hit so the host can
//! draw alignment guides. Snapping only ever translates a frame or moves the
//! dragged edge; it never flips or collapses width/height.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::SNAP_TOLERANCE;
use crate::entity::EntityId;
use crate::geom::Frame;

/// Axis of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Vertical line at a fixed x.
    X,
    /// Horizontal line at a fixed y.
    Y,
}

/// A user-placed guide line in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub id: Uuid,
    pub axis: Axis,
    pub offset: f64,
}

impl Guide {
    #[must_use]
    pub fn new(axis: Axis, offset: f64) -> Self {
        Self { id: Uuid::new_v4(), axis, offset }
    }
}

/// Which snap sources are consulted, and how strongly they pull.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapConfig {
    /// Grid pitch; `None` disables grid snapping.
    pub grid: Option<f64>,
    /// Snap against sibling edges and centers.
    pub elements: bool,
    /// Snap against explicit guide lines.
    pub guides: bool,
    /// Attraction distance in logical px.
    pub tolerance: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self { grid: None, elements: true, guides: true, tolerance: SNAP_TOLERANCE }
    }
}

/// What a snapped axis locked onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapSource {
    Grid,
    /// Edge or center of the named sibling.
    Element(EntityId),
    Guide(Uuid),
}

/// One axis of a snap result: the source hit and the coordinate the
/// candidate edge/center was pulled to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapHit {
    pub source: SnapSource,
    /// Snapped coordinate on this axis.
    pub position: f64,
}

/// A snapped frame plus per-axis hit reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapped {
    pub frame: Frame,
    pub x: Option<SnapHit>,
    pub y: Option<SnapHit>,
}

/// How a candidate value pairs with targets: edges attract edges, centers
/// attract centers, guides and the grid attract per their own rules.
#[derive(Clone, Copy, PartialEq, Eq)]
enum ValueRole {
    /// The frame's origin edge (left/top); the only grid-eligible value.
    OriginEdge,
    Center,
    FarEdge,
}

/// One candidate value on an axis.
struct AxisValue {
    value: f64,
    role: ValueRole,
}

/// Snap a whole-frame move: the best hit per axis shifts the frame.
///
/// Candidate values per axis are the frame's leading edge, center, and
/// trailing edge. Edges compare against sibling edges, the center against
/// sibling centers, and every value against guide offsets; the grid pulls
/// the origin edge only. `others` and `guides` must be in the same space as
/// `candidate`.
#[must_use]
pub fn snap_move(
    candidate: Frame,
    others: &[(EntityId, Frame)],
    guides: &[Guide],
    cfg: &SnapConfig,
) -> Snapped {
    let xs = [
        AxisValue { value: candidate.x, role: ValueRole::OriginEdge },
        AxisValue { value: candidate.center_x(), role: ValueRole::Center },
        AxisValue { value: candidate.right(), role: ValueRole::FarEdge },
    ];
    let ys = [
        AxisValue { value: candidate.y, role: ValueRole::OriginEdge },
        AxisValue { value: candidate.center_y(), role: ValueRole::Center },
        AxisValue { value: candidate.bottom(), role: ValueRole::FarEdge },
    ];

    let best_x = best_hit(&xs, Axis::X, others, guides, cfg);
    let best_y = best_hit(&ys, Axis::Y, others, guides, cfg);

    let mut frame = candidate;
    if let Some((hit, value)) = best_x {
        frame.x += hit.position - value;
    }
    if let Some((hit, value)) = best_y {
        frame.y += hit.position - value;
    }
    Snapped {
        frame,
        x: best_x.map(|(hit, _)| hit),
        y: best_y.map(|(hit, _)| hit),
    }
}

/// Snap a resize: only the dragged edges are candidates, and a hit moves
/// that edge while the opposite edge stays fixed.
///
/// A hit that would drive the extent to zero or below is discarded.
#[must_use]
pub fn snap_edges(
    candidate: Frame,
    left: bool,
    right: bool,
    top: bool,
    bottom: bool,
    others: &[(EntityId, Frame)],
    guides: &[Guide],
    cfg: &SnapConfig,
) -> Snapped {
    let mut frame = candidate;
    let mut x_hit = None;
    let mut y_hit = None;

    if left || right {
        let edge = if left { candidate.x } else { candidate.right() };
        let values = [AxisValue { value: edge, role: ValueRole::OriginEdge }];
        if let Some((hit, value)) = best_hit(&values, Axis::X, others, guides, cfg) {
            let delta = hit.position - value;
            let (x, width) = if left {
                (frame.x + delta, frame.width - delta)
            } else {
                (frame.x, frame.width + delta)
            };
            if width > 0.0 {
                frame.x = x;
                frame.width = width;
                x_hit = Some(hit);
            }
        }
    }

    if top || bottom {
        let edge = if top { candidate.y } else { candidate.bottom() };
        let values = [AxisValue { value: edge, role: ValueRole::OriginEdge }];
        if let Some((hit, value)) = best_hit(&values, Axis::Y, others, guides, cfg) {
            let delta = hit.position - value;
            let (y, height) = if top {
                (frame.y + delta, frame.height - delta)
            } else {
                (frame.y, frame.height + delta)
            };
            if height > 0.0 {
                frame.y = y;
                frame.height = height;
                y_hit = Some(hit);
            }
        }
    }

    Snapped { frame, x: x_hit, y: y_hit }
}

/// Closest in-tolerance target for any of `values` on `axis`.
///
/// Elements win ties over guides, guides over grid, by evaluation order.
fn best_hit(
    values: &[AxisValue],
    axis: Axis,
    others: &[(EntityId, Frame)],
    guides: &[Guide],
    cfg: &SnapConfig,
) -> Option<(SnapHit, f64)> {
    let mut best: Option<(SnapHit, f64, f64)> = None;

    let mut consider = |source: SnapSource, target: f64, value: f64| {
        let dist = (target - value).abs();
        if dist > cfg.tolerance {
            return;
        }
        if best.as_ref().is_none_or(|(_, _, d)| dist < *d) {
            best = Some((SnapHit { source, position: target }, value, dist));
        }
    };

    for v in values {
        if cfg.elements {
            for (id, other) in others {
                for target in axis_targets(other, axis, v.role) {
                    consider(SnapSource::Element(*id), target, v.value);
                }
            }
        }
        if cfg.guides {
            for g in guides.iter().filter(|g| g.axis == axis) {
                consider(SnapSource::Guide(g.id), g.offset, v.value);
            }
        }
        if let Some(grid) = cfg.grid {
            if v.role == ValueRole::OriginEdge && grid > 0.0 {
                consider(SnapSource::Grid, (v.value / grid).round() * grid, v.value);
            }
        }
    }

    best.map(|(hit, value, _)| (hit, value))
}

/// Sibling targets matching the candidate value's role: edges for edge
/// values, the center for the center value.
fn axis_targets(frame: &Frame, axis: Axis, role: ValueRole) -> Vec<f64> {
    match (axis, role) {
        (Axis::X, ValueRole::Center) => vec![frame.center_x()],
        (Axis::X, _) => vec![frame.x, frame.right()],
        (Axis::Y, ValueRole::Center) => vec![frame.center_y()],
        (Axis::Y, _) => vec![frame.y, frame.bottom()],
    }
}
