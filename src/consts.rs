//! Shared numeric constants for the layout engine.

// ── Viewport ────────────────────────────────────────────────────

/// Minimum zoom factor (25%).
pub const ZOOM_MIN: f64 = 0.25;

/// Maximum zoom factor (200%).
pub const ZOOM_MAX: f64 = 2.0;

/// Multiplicative zoom step applied per wheel notch.
pub const ZOOM_WHEEL_STEP: f64 = 1.1;

// ── Gestures ────────────────────────────────────────────────────

/// Pointer travel in logical px below which a press-release is a click,
/// not a marquee or a freehand draw.
pub const DRAG_THRESHOLD: f64 = 3.0;

/// Smallest width/height a section may have after resize or insertion.
pub const MIN_SECTION_SIZE: f64 = 8.0;

/// Offset applied to duplicated sections so the clone is visibly apart
/// from its source.
pub const DUPLICATE_OFFSET: f64 = 16.0;

// ── Snapping ────────────────────────────────────────────────────

/// Distance in logical px within which an edge, center, grid line, or
/// guide attracts a candidate frame.
pub const SNAP_TOLERANCE: f64 = 4.0;

/// Default grid pitch in logical px when grid snapping is enabled.
pub const GRID_SIZE: f64 = 8.0;
