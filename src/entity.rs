//! The entity-shape seam shared by every editor variant.
//!
//! The screen editor and the frame-template editor manipulate different
//! concrete section types but identical geometry: a rectangle with identity,
//! stacking order, a lock flag, and an owning scope. [`LayoutEntity`] is that
//! shape; the whole engine is generic over it. [`EntityFactory`] is the
//! default-factory contract each call site supplies for creating and
//! duplicating its own entity type.

use uuid::Uuid;

use crate::geom::Frame;

/// Unique identifier for a layout entity.
pub type EntityId = Uuid;

/// The geometric shape of an entity as the engine sees it.
///
/// Frames returned by [`frame`](Self::frame) are always in world
/// coordinates; scope-local views are derived by the engine, never stored.
pub trait LayoutEntity: Clone {
    fn id(&self) -> EntityId;

    /// World-space frame.
    fn frame(&self) -> Frame;

    /// Replace the world-space frame. Called only from transaction commits
    /// and snapshot adoption.
    fn set_frame(&mut self, frame: Frame);

    /// Stacking order among siblings sharing the same scope.
    fn z(&self) -> i64;

    fn set_z(&mut self, z: i64);

    /// Locked entities ignore click selection, marquee, drag, and resize,
    /// but remain selectable by explicit id.
    fn locked(&self) -> bool;

    /// The container whose local space this entity belongs to; `None` for
    /// the root canvas.
    fn parent_scope(&self) -> Option<EntityId>;

    /// Whether this entity can itself become a scope (host children).
    fn scopeable(&self) -> bool;
}

/// Default factory supplied by the content subsystem.
///
/// The engine knows nothing about what a section displays; the factory maps
/// an opaque kind to an initial size and payload, and clones entities with
/// fresh identity for duplication.
pub trait EntityFactory {
    type Entity: LayoutEntity;
    type Kind: Copy;

    /// Create a new entity of `kind` with the given world frame, owned by
    /// `scope`. The caller assigns the final z.
    fn create(&self, kind: Self::Kind, frame: Frame, scope: Option<EntityId>) -> Self::Entity;

    /// Initial `(width, height)` for point-insertion of `kind`.
    fn default_size(&self, kind: Self::Kind) -> (f64, f64);

    /// Clone `source` under a fresh id. The caller offsets the frame and
    /// assigns the final z.
    fn duplicate(&self, source: &Self::Entity) -> Self::Entity;
}
