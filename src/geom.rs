//! Points, frames, and the AABB math every other module leans on.
//!
//! All local/world offset arithmetic lives here: scope re-rooting is
//! [`Frame::to_local`] / [`Frame::to_world`] and nothing else in the crate
//! re-derives offsets by hand.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point in screen, logical, or scope-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Canvas dimensions in logical px.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle with an optional carried rotation.
///
/// `rotate` is preserved through transforms and serialization but ignored by
/// the AABB predicates; hit and overlap policy treats every frame as its
/// upright bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees around the frame center.
    #[serde(default)]
    pub rotate: f64,
}

impl Frame {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height, rotate: 0.0 }
    }

    /// Right edge (`x + width`).
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Horizontal center.
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Vertical center.
    #[must_use]
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Whether `p` lies inside the frame, boundary included.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// AABB overlap test. Frames that merely touch along an edge do not
    /// overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.right() <= other.x
            || other.right() <= self.x
            || self.bottom() <= other.y
            || other.bottom() <= self.y)
    }

    /// Whether the frame, extent included, lies within `[0, w] × [0, h]`.
    #[must_use]
    pub fn within(&self, bounds: Size) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.right() <= bounds.width
            && self.bottom() <= bounds.height
    }

    /// The frame shifted by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy, ..*self }
    }

    /// Re-root a world frame into the local space anchored at `origin`.
    #[must_use]
    pub fn to_local(&self, origin: Point) -> Self {
        self.translated(-origin.x, -origin.y)
    }

    /// Re-root a local frame back into world space.
    #[must_use]
    pub fn to_world(&self, origin: Point) -> Self {
        self.translated(origin.x, origin.y)
    }

    /// Intersect the frame with `[0, w] × [0, h]`.
    ///
    /// The result may have zero or negative extent when the frame lies
    /// entirely outside the bounds; callers reject such frames.
    #[must_use]
    pub fn clamped(&self, bounds: Size) -> Self {
        let x = self.x.max(0.0);
        let y = self.y.max(0.0);
        Self {
            x,
            y,
            width: self.right().min(bounds.width) - x,
            height: self.bottom().min(bounds.height) - y,
            rotate: self.rotate,
        }
    }

    /// The axis-aligned rectangle spanned by two corner points.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::new(a.x.min(b.x), a.y.min(b.y), (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    /// Smallest frame covering every frame in `frames`. `None` when empty.
    #[must_use]
    pub fn union_of(frames: &[Self]) -> Option<Self> {
        let first = frames.first()?;
        let mut left = first.x;
        let mut top = first.y;
        let mut right = first.right();
        let mut bottom = first.bottom();
        for f in &frames[1..] {
            left = left.min(f.x);
            top = top.min(f.y);
            right = right.max(f.right());
            bottom = bottom.max(f.bottom());
        }
        Some(Self::new(left, top, right - left, bottom - top))
    }
}
