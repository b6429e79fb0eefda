//! Input model: buttons, modifier keys, and the gesture state machine.
//!
//! A gesture is the pointer activity between pointer-down and pointer-up.
//! Each active variant carries the context needed to recompute candidate
//! frames on every move and to commit or revert on release. Coordinates in
//! gesture state are scope-local logical px.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::entity::EntityId;
use crate::geom::{Frame, Point};

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Whether the additive-selection modifier (shift or ctrl) is held.
    #[must_use]
    pub fn additive(&self) -> bool {
        self.shift || self.ctrl
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key, holding the key name as reported by the host
/// (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Wheel / trackpad scroll delta in screen px.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    pub dx: f64,
    /// Positive = down.
    pub dy: f64,
}

/// Which resize handle is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    /// Whether dragging this handle moves the left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::Nw | Self::W | Self::Sw)
    }

    /// Whether dragging this handle moves the right edge.
    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::Ne | Self::E | Self::Se)
    }

    /// Whether dragging this handle moves the top edge.
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::Nw | Self::N | Self::Ne)
    }

    /// Whether dragging this handle moves the bottom edge.
    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::Sw | Self::S | Self::Se)
    }
}

/// The kind of geometry transaction in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Drag,
    Resize,
    Insert,
}

/// The active pointer gesture.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Drag-selecting over the background.
    Marquee {
        /// Press position.
        origin: Point,
        /// Current pointer position.
        cursor: Point,
    },
    /// Moving the selected sections.
    Drag {
        /// Press position; deltas are measured from here.
        anchor: Point,
        /// Current pointer position.
        cursor: Point,
        /// The section under the press, for click-collapse on release.
        pressed: EntityId,
        /// Whether `pressed` was already selected before the press.
        was_selected: bool,
        /// Participants with their pre-transaction local frames, in
        /// selection order.
        origins: Vec<(EntityId, Frame)>,
    },
    /// Resizing one section by a handle.
    Resize {
        id: EntityId,
        handle: ResizeAnchor,
        /// Press position.
        anchor: Point,
        /// Current pointer position.
        cursor: Point,
        /// Pre-transaction local frame.
        origin: Frame,
    },
    /// Freehand-drawing a new section in insert mode.
    Draw {
        /// Press corner.
        origin: Point,
        /// Current pointer position.
        cursor: Point,
    },
}

impl Gesture {
    /// The transaction kind this gesture commits as, if any. Marquee is a
    /// selection gesture, not a geometry transaction.
    #[must_use]
    pub fn transaction_kind(&self) -> Option<TransactionKind> {
        match self {
            Self::Drag { .. } => Some(TransactionKind::Drag),
            Self::Resize { .. } => Some(TransactionKind::Resize),
            Self::Draw { .. } => Some(TransactionKind::Insert),
            Self::Idle | Self::Marquee { .. } => None,
        }
    }
}
