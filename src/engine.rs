//! The layout engine: command surface, gesture handling, and the
//! propose → preview → commit-or-revert transaction protocol.
//!
//! One `Engine` is constructed per editor session and owns all mutable
//! state: the geometry store, viewport, selection, active scope, guides,
//! and the in-flight gesture. Hosts feed it pointer/key/wheel events or
//! call the command methods directly; every handler returns the
//! [`Action`]s the host must process. The store is written only on commit;
//! live previews exist solely in [`Preview`] until the pointer is released.
//!
//! All scope-local ↔ world conversion happens here, at commit time and when
//! building local views for snapping and collision; the store itself is
//! world-space throughout.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::HashSet;

use crate::camera::Viewport;
use crate::collide::{out_of_bounds, overlapping_ids, overlaps_any, push_back};
use crate::consts::{DRAG_THRESHOLD, DUPLICATE_OFFSET, MIN_SECTION_SIZE, ZOOM_WHEEL_STEP};
use crate::entity::{EntityFactory, EntityId, LayoutEntity};
use crate::geom::{Frame, Point, Size};
use crate::input::{Button, Gesture, Key, Modifiers, ResizeAnchor, TransactionKind, WheelDelta};
use crate::selection::{Selection, marquee_hits};
use crate::snap::{Axis, Guide, SnapConfig, SnapHit, Snapped, snap_edges, snap_move};
use crate::store::{SnapshotError, Store};
use crate::zorder::{self, StackOp};

/// Farthest multiple of [`DUPLICATE_OFFSET`] tried when placing a clone.
const DUPLICATE_TRIES: u32 = 8;

/// Durable outcomes handed back to the host for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A new entity was committed into the store.
    Created(EntityId),
    /// Existing entities changed geometry or stacking order.
    Updated(Vec<EntityId>),
    /// Entities were removed.
    Deleted(Vec<EntityId>),
    SelectionChanged,
    ScopeChanged,
    ViewportChanged,
    /// Visual state (preview, highlight, marquee) changed.
    RenderNeeded,
}

/// Live transaction state for the renderer: candidate frames and warning
/// flags. Coordinates are scope-local. The canonical store is untouched
/// while a preview exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub kind: TransactionKind,
    /// Candidate frames for drag/resize participants.
    pub frames: Vec<(EntityId, Frame)>,
    /// The rectangle being drawn in an insert transaction.
    pub draft: Option<Frame>,
    /// Any candidate escapes the scope bounds.
    pub out_of_bounds: bool,
    /// Siblings the candidates currently overlap.
    pub overlapping: Vec<EntityId>,
    pub snap_x: Option<SnapHit>,
    pub snap_y: Option<SnapHit>,
}

/// The 2D layout and transform engine.
///
/// Generic over the entity factory so the screen editor and the
/// frame-template editor share one implementation, each supplying its own
/// entity type and defaults.
pub struct Engine<F: EntityFactory> {
    factory: F,
    store: Store<F::Entity>,
    canvas: Size,
    viewport: Viewport,
    selection: Selection,
    scope: Option<EntityId>,
    guides: Vec<Guide>,
    snap_cfg: SnapConfig,
    insert_kind: Option<F::Kind>,
    gesture: Gesture,
    preview: Option<Preview>,
    version: u64,
}

impl<F: EntityFactory> Engine<F> {
    #[must_use]
    pub fn new(factory: F, canvas: Size) -> Self {
        Self {
            factory,
            store: Store::new(),
            canvas,
            viewport: Viewport::default(),
            selection: Selection::new(),
            scope: None,
            guides: Vec::new(),
            snap_cfg: SnapConfig::default(),
            insert_kind: None,
            gesture: Gesture::Idle,
            preview: None,
            version: 0,
        }
    }

    // --- Persistence boundary ---

    /// Adopt a restored canvas size and entity list.
    ///
    /// Selection, scope, and any in-flight gesture are reset; the viewport
    /// is left alone, as it is not part of persisted state.
    ///
    /// # Errors
    ///
    /// Returns the structural validation failure, listing offending ids,
    /// without adopting anything.
    pub fn load_snapshot(
        &mut self,
        canvas: Size,
        entities: Vec<F::Entity>,
    ) -> Result<(), SnapshotError> {
        self.store.load_snapshot(entities)?;
        self.canvas = canvas;
        self.selection.clear();
        self.scope = None;
        self.gesture = Gesture::Idle;
        self.preview = None;
        self.insert_kind = None;
        self.version += 1;
        Ok(())
    }

    /// The persistable state: canvas size plus every entity in draw order.
    /// Viewport, selection, and scope are ephemeral and excluded.
    #[must_use]
    pub fn snapshot(&self) -> (Size, Vec<F::Entity>) {
        (self.canvas, self.store.snapshot())
    }

    // --- Read accessors ---

    #[must_use]
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Monotonic counter bumped once per durable commit. Preview updates
    /// and reverted transactions leave it untouched.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn get(&self, id: &EntityId) -> Option<&F::Entity> {
        self.store.get(id)
    }

    /// Frame of `id` re-rooted into the active scope's space when the
    /// entity is a sibling of that scope; its world frame otherwise.
    #[must_use]
    pub fn local_frame(&self, id: &EntityId) -> Option<Frame> {
        let e = self.store.get(id)?;
        if e.parent_scope() == self.scope {
            Some(e.frame().to_local(self.scope_origin()))
        } else {
            Some(e.frame())
        }
    }

    /// Every entity in draw order (per-scope z ascending, root first).
    #[must_use]
    pub fn entities(&self) -> Vec<&F::Entity> {
        self.store.all()
    }

    /// Siblings of the active scope, z ascending.
    #[must_use]
    pub fn scope_entities(&self) -> Vec<&F::Entity> {
        self.store.siblings(self.scope)
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn scope(&self) -> Option<EntityId> {
        self.scope
    }

    #[must_use]
    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    #[must_use]
    pub fn snap_config(&self) -> SnapConfig {
        self.snap_cfg
    }

    pub fn set_snap_config(&mut self, cfg: SnapConfig) {
        self.snap_cfg = cfg;
    }

    #[must_use]
    pub fn insert_kind(&self) -> Option<F::Kind> {
        self.insert_kind
    }

    /// Live preview of the in-flight transaction, if any.
    #[must_use]
    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    /// The marquee rectangle while a marquee drag is in progress.
    #[must_use]
    pub fn marquee(&self) -> Option<Frame> {
        match self.gesture {
            Gesture::Marquee { origin, cursor } => Some(Frame::from_corners(origin, cursor)),
            _ => None,
        }
    }

    /// The kind of geometry transaction in flight, if any.
    #[must_use]
    pub fn transaction_kind(&self) -> Option<TransactionKind> {
        self.gesture.transaction_kind()
    }

    /// Scope-local bounding box of the selection, for group handle
    /// rendering. `None` when nothing is selected.
    #[must_use]
    pub fn selection_bounds(&self) -> Option<Frame> {
        let origin = self.scope_origin();
        let frames: Vec<Frame> = self
            .selection
            .ids()
            .iter()
            .filter_map(|id| self.store.get(id))
            .map(|e| e.frame().to_local(origin))
            .collect();
        Frame::union_of(&frames)
    }

    // --- Viewport ---

    pub fn set_viewport(&mut self, zoom: f64, pan_x: f64, pan_y: f64) -> Vec<Action> {
        self.viewport.set_zoom(zoom);
        self.viewport.set_pan(pan_x, pan_y);
        vec![Action::ViewportChanged, Action::RenderNeeded]
    }

    /// Resize the root canvas. The request is grown as needed so no root
    /// entity ends up out of bounds; the canvas never shrinks past its
    /// content extent.
    pub fn set_canvas_size(&mut self, size: Size) -> Vec<Action> {
        let mut width = size.width;
        let mut height = size.height;
        for e in self.store.siblings(None) {
            width = width.max(e.frame().right());
            height = height.max(e.frame().bottom());
        }
        self.canvas = Size::new(width, height);
        self.version += 1;
        vec![Action::RenderNeeded]
    }

    // --- Selection commands ---

    /// Programmatic selection by explicit ids; locked entities are allowed
    /// here, unlike click selection. Unknown ids are dropped.
    pub fn select(&mut self, ids: &[EntityId], additive: bool) -> Vec<Action> {
        let known: Vec<EntityId> =
            ids.iter().copied().filter(|id| self.store.contains(id)).collect();
        if additive {
            for id in known {
                self.selection.add(id);
            }
        } else {
            self.selection.set_all(known);
        }
        vec![Action::SelectionChanged, Action::RenderNeeded]
    }

    pub fn clear_selection(&mut self) -> Vec<Action> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        self.selection.clear();
        vec![Action::SelectionChanged, Action::RenderNeeded]
    }

    // --- Scope / drill-down ---

    /// Enter a container scope, or return to root with `None`. Entering or
    /// leaving a scope clears the selection and abandons any gesture.
    pub fn set_scope(&mut self, scope: Option<EntityId>) -> Vec<Action> {
        if let Some(id) = scope {
            let valid = self.store.get(&id).is_some_and(LayoutEntity::scopeable);
            if !valid {
                return Vec::new();
            }
        }
        if scope == self.scope {
            return Vec::new();
        }
        self.scope = scope;
        self.selection.clear();
        self.gesture = Gesture::Idle;
        self.preview = None;
        vec![Action::ScopeChanged, Action::SelectionChanged, Action::RenderNeeded]
    }

    // --- Guides ---

    /// Place a guide line in world coordinates, returning its id.
    pub fn add_guide(&mut self, axis: Axis, offset: f64) -> EntityId {
        let guide = Guide::new(axis, offset);
        let id = guide.id;
        self.guides.push(guide);
        id
    }

    /// Remove a guide by id. Returns whether it existed.
    pub fn remove_guide(&mut self, id: EntityId) -> bool {
        let before = self.guides.len();
        self.guides.retain(|g| g.id != id);
        self.guides.len() != before
    }

    // --- Z-order ---

    /// Restack the selection. Selected ids are grouped by owning scope and
    /// restacked within it.
    pub fn restack_selected(&mut self, op: StackOp) -> Vec<Action> {
        let ids: Vec<EntityId> = self
            .selection
            .ids()
            .iter()
            .copied()
            .filter(|id| self.store.contains(id))
            .collect();
        if ids.is_empty() {
            return Vec::new();
        }
        let mut scopes: Vec<Option<EntityId>> = Vec::new();
        for id in &ids {
            if let Some(e) = self.store.get(id) {
                let scope = e.parent_scope();
                if !scopes.contains(&scope) {
                    scopes.push(scope);
                }
            }
        }
        for scope in scopes {
            zorder::restack(&mut self.store, scope, &ids, op);
        }
        self.version += 1;
        vec![Action::Updated(ids), Action::RenderNeeded]
    }

    // --- Structural commands ---

    /// Delete the selected entities, cascading into scoped children of any
    /// deleted container. The active scope container itself is never
    /// deleted from inside.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let targets: Vec<EntityId> = self
            .selection
            .ids()
            .iter()
            .copied()
            .filter(|id| Some(*id) != self.scope && self.store.contains(id))
            .collect();
        if targets.is_empty() {
            return Vec::new();
        }

        let mut removed: Vec<EntityId> = Vec::new();
        let mut seen: HashSet<EntityId> = HashSet::new();
        for id in targets {
            if seen.insert(id) {
                removed.push(id);
            }
            for child in self.store.descendants(id) {
                if seen.insert(child) {
                    removed.push(child);
                }
            }
        }

        let mut scopes: Vec<Option<EntityId>> = Vec::new();
        for id in &removed {
            if let Some(e) = self.store.get(id) {
                let scope = e.parent_scope();
                if !scopes.contains(&scope) {
                    scopes.push(scope);
                }
            }
        }
        for id in &removed {
            self.store.remove(id);
        }
        for scope in scopes {
            let alive = scope.is_none_or(|id| self.store.contains(&id));
            if alive {
                zorder::normalize(&mut self.store, scope);
            }
        }

        self.selection.clear();
        self.version += 1;
        tracing::debug!(count = removed.len(), "sections deleted");
        vec![Action::Deleted(removed), Action::SelectionChanged, Action::RenderNeeded]
    }

    /// Duplicate the selected entities: fresh ids, top of their scope's
    /// stack, offset from the source so the clone lands clear of it.
    ///
    /// A source whose scope has no overlap-free spot within
    /// [`DUPLICATE_TRIES`] offsets is skipped. Children of a duplicated
    /// container are not cloned. The clones become the new selection.
    pub fn duplicate_selected(&mut self) -> Vec<Action> {
        let sources: Vec<EntityId> = self
            .selection
            .ids()
            .iter()
            .copied()
            .filter(|id| self.store.contains(id))
            .collect();

        let mut created: Vec<EntityId> = Vec::new();
        for sid in sources {
            let Some(source) = self.store.get(&sid).cloned() else {
                continue;
            };
            let scope = source.parent_scope();
            let (origin, bounds) = self.frame_of_scope(scope);
            let obstacles: Vec<(EntityId, Frame)> = self
                .store
                .siblings(scope)
                .iter()
                .map(|e| (e.id(), e.frame()))
                .collect();

            let base = source.frame();
            let placed = (1..=DUPLICATE_TRIES).find_map(|k| {
                let step = f64::from(k) * DUPLICATE_OFFSET;
                let candidate = base.translated(step, step);
                let fits = candidate.to_local(origin).within(bounds)
                    && !overlaps_any(&candidate, &obstacles);
                fits.then_some(candidate)
            });
            let Some(frame) = placed else {
                tracing::debug!(id = %sid, "duplicate skipped: no free position");
                continue;
            };

            let mut clone = self.factory.duplicate(&source);
            clone.set_frame(frame);
            let id = clone.id();
            zorder::insert_on_top(&mut self.store, clone);
            created.push(id);
        }

        if created.is_empty() {
            return Vec::new();
        }
        self.selection.set_all(created.clone());
        self.version += 1;
        let mut actions: Vec<Action> = created.into_iter().map(Action::Created).collect();
        actions.push(Action::SelectionChanged);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Insert a new entity of `kind` at its factory default size, origin at
    /// `at` in scope-local coordinates, shifted into bounds if needed.
    /// Subject to the strict insertion policy: any overlap discards it.
    pub fn insert_at(&mut self, kind: F::Kind, at: Point) -> Vec<Action> {
        let bounds = self.scope_size();
        let (width, height) = self.factory.default_size(kind);
        if width > bounds.width || height > bounds.height {
            return Vec::new();
        }
        let x = at.x.clamp(0.0, bounds.width - width);
        let y = at.y.clamp(0.0, bounds.height - height);
        let rect = Frame::new(x, y, width, height);
        self.commit_insert(kind, rect)
    }

    // --- Transaction protocol: command surface ---

    /// Begin a drag of the current selection. `anchor` is the scope-local
    /// reference point deltas are measured from. Locked and out-of-scope
    /// members do not participate; returns false when nothing would move or
    /// another gesture is active.
    pub fn begin_drag(&mut self, anchor: Point) -> bool {
        if !matches!(self.gesture, Gesture::Idle) {
            return false;
        }
        let Some(active) = self.selection.active() else {
            return false;
        };
        self.begin_drag_internal(anchor, active, true)
    }

    /// Begin resizing `id` by `handle` from the scope-local `anchor`.
    pub fn begin_resize(&mut self, id: EntityId, handle: ResizeAnchor, anchor: Point) -> bool {
        if !matches!(self.gesture, Gesture::Idle) {
            return false;
        }
        let Some(entity) = self.store.get(&id) else {
            return false;
        };
        if entity.locked() || entity.parent_scope() != self.scope {
            return false;
        }
        let origin = entity.frame().to_local(self.scope_origin());
        self.gesture = Gesture::Resize { id, handle, anchor, cursor: anchor, origin };
        self.refresh_preview();
        true
    }

    /// Arm insert mode with `kind`; the next pointer press starts drawing.
    pub fn set_insert_kind(&mut self, kind: Option<F::Kind>) {
        self.insert_kind = kind;
    }

    /// Begin a freehand insert at the scope-local `anchor`. Requires insert
    /// mode to be armed via [`set_insert_kind`](Self::set_insert_kind).
    pub fn begin_insert(&mut self, anchor: Point) -> bool {
        if !matches!(self.gesture, Gesture::Idle) || self.insert_kind.is_none() {
            return false;
        }
        let origin = clamp_point(anchor, self.scope_size());
        self.gesture = Gesture::Draw { origin, cursor: origin };
        self.refresh_preview();
        true
    }

    /// Advance the in-flight transaction to the scope-local `cursor`,
    /// recomputing the live preview. The store is not touched.
    pub fn update_transaction(&mut self, cursor: Point) {
        let bounds = self.scope_size();
        match &mut self.gesture {
            Gesture::Drag { cursor: c, .. } | Gesture::Resize { cursor: c, .. } => *c = cursor,
            Gesture::Draw { cursor: c, .. } => *c = clamp_point(cursor, bounds),
            Gesture::Idle | Gesture::Marquee { .. } => return,
        }
        self.refresh_preview();
    }

    /// Abandon the in-flight gesture. The store is exactly as it was before
    /// the transaction began.
    pub fn cancel_transaction(&mut self) {
        self.gesture = Gesture::Idle;
        self.preview = None;
    }

    /// Commit the in-flight transaction: run bounds and overlap policy
    /// against the final candidates and either write them to the store (and
    /// bump the version) or revert with the store untouched.
    pub fn commit_transaction(&mut self) -> Vec<Action> {
        let gesture = std::mem::take(&mut self.gesture);
        let preview = self.preview.take();
        match gesture {
            Gesture::Drag { anchor, cursor, origins, .. } => {
                let Some(preview) = preview else {
                    return Vec::new();
                };
                let drag = (cursor.x - anchor.x, cursor.y - anchor.y);
                self.commit_move(&origins, preview, drag, TransactionKind::Drag)
            }
            Gesture::Resize { id, anchor, cursor, origin, .. } => {
                let Some(preview) = preview else {
                    return Vec::new();
                };
                let drag = (cursor.x - anchor.x, cursor.y - anchor.y);
                self.commit_move(&[(id, origin)], preview, drag, TransactionKind::Resize)
            }
            Gesture::Draw { origin, cursor } => {
                let Some(kind) = self.insert_kind else {
                    return Vec::new();
                };
                let draft = preview.and_then(|p| p.draft);
                let Some(draft) = draft else {
                    return Vec::new();
                };
                let moved = (cursor.x - origin.x).abs() >= DRAG_THRESHOLD
                    || (cursor.y - origin.y).abs() >= DRAG_THRESHOLD;
                if !moved || draft.width < MIN_SECTION_SIZE || draft.height < MIN_SECTION_SIZE {
                    // Treated as a stray click; insert mode stays armed.
                    return vec![Action::RenderNeeded];
                }
                self.commit_insert(kind, draft)
            }
            Gesture::Idle | Gesture::Marquee { .. } => Vec::new(),
        }
    }

    // --- Pointer and key handlers ---

    /// Pointer press. Starts a draw in insert mode, a drag on an entity
    /// body, or a marquee on the background.
    pub fn on_pointer_down(&mut self, screen: Point, button: Button, mods: Modifiers) -> Vec<Action> {
        if button != Button::Primary || !matches!(self.gesture, Gesture::Idle) {
            return Vec::new();
        }
        let local = self.to_scope_local(self.viewport.screen_to_logical(screen));

        if self.insert_kind.is_some() {
            self.begin_insert(local);
            return vec![Action::RenderNeeded];
        }

        match self.hit_top(local) {
            Some(id) => {
                let mut actions = Vec::new();
                if mods.additive() {
                    self.selection.toggle(id);
                    actions.push(Action::SelectionChanged);
                } else {
                    let was_selected = self.selection.contains(id);
                    if !was_selected {
                        self.selection.replace(id);
                        actions.push(Action::SelectionChanged);
                    }
                    self.begin_drag_internal(local, id, was_selected);
                }
                actions.push(Action::RenderNeeded);
                actions
            }
            None => {
                let origin = clamp_point(local, self.scope_size());
                self.gesture = Gesture::Marquee { origin, cursor: origin };
                vec![Action::RenderNeeded]
            }
        }
    }

    /// Pointer move. Advances the active gesture; marquee drags
    /// live-recompute the selection.
    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        let local = self.to_scope_local(self.viewport.screen_to_logical(screen));
        let bounds = self.scope_size();

        if let Gesture::Marquee { origin, cursor } = &mut self.gesture {
            *cursor = clamp_point(local, bounds);
            let rect = Frame::from_corners(*origin, *cursor);
            if rect.width < DRAG_THRESHOLD && rect.height < DRAG_THRESHOLD {
                return vec![Action::RenderNeeded];
            }
            let hits = self.marquee_hits_local(rect);
            if hits != self.selection.ids() {
                self.selection.set_all(hits);
                return vec![Action::SelectionChanged, Action::RenderNeeded];
            }
            return vec![Action::RenderNeeded];
        }

        if matches!(self.gesture, Gesture::Idle) {
            return Vec::new();
        }
        self.update_transaction(local);
        vec![Action::RenderNeeded]
    }

    /// Pointer release. A short marquee is a background click (clears the
    /// selection); a short drag is an entity click (collapses a multi
    /// selection); anything else commits.
    pub fn on_pointer_up(&mut self, screen: Point) -> Vec<Action> {
        let mut actions = self.on_pointer_move(screen);

        match &self.gesture {
            Gesture::Idle => Vec::new(),
            Gesture::Marquee { origin, cursor } => {
                let rect = Frame::from_corners(*origin, *cursor);
                let clicked = rect.width < DRAG_THRESHOLD && rect.height < DRAG_THRESHOLD;
                self.gesture = Gesture::Idle;
                if clicked {
                    actions.extend(self.clear_selection());
                }
                actions.push(Action::RenderNeeded);
                actions
            }
            Gesture::Drag { anchor, cursor, pressed, was_selected, .. } => {
                let moved = (cursor.x - anchor.x).abs() >= DRAG_THRESHOLD
                    || (cursor.y - anchor.y).abs() >= DRAG_THRESHOLD;
                if moved {
                    actions.extend(self.commit_transaction());
                    return actions;
                }
                // Click on an already-selected entity collapses the
                // selection to it.
                let collapse = *was_selected && self.selection.len() > 1;
                let pressed = *pressed;
                self.cancel_transaction();
                if collapse {
                    self.selection.replace(pressed);
                    actions.push(Action::SelectionChanged);
                }
                actions.push(Action::RenderNeeded);
                actions
            }
            Gesture::Resize { .. } | Gesture::Draw { .. } => {
                actions.extend(self.commit_transaction());
                actions
            }
        }
    }

    /// Wheel input: ctrl-wheel zooms about the cursor, plain wheel pans.
    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta, mods: Modifiers) -> Vec<Action> {
        if mods.ctrl {
            let anchor = self.viewport.screen_to_logical(screen);
            let factor = if delta.dy < 0.0 { ZOOM_WHEEL_STEP } else { 1.0 / ZOOM_WHEEL_STEP };
            let target = self.viewport.zoom * factor;
            self.viewport.zoom_about(anchor, target);
        } else {
            self.viewport.pan_x -= delta.dx;
            self.viewport.pan_y -= delta.dy;
        }
        vec![Action::ViewportChanged, Action::RenderNeeded]
    }

    /// Key press: Escape cancels the gesture, then clears selection, then
    /// disarms insert mode; Delete removes the selection.
    pub fn on_key_down(&mut self, key: &Key, _mods: Modifiers) -> Vec<Action> {
        match key.0.as_str() {
            "Escape" => {
                if !matches!(self.gesture, Gesture::Idle) {
                    self.cancel_transaction();
                    return vec![Action::RenderNeeded];
                }
                if !self.selection.is_empty() {
                    return self.clear_selection();
                }
                if self.insert_kind.is_some() {
                    self.insert_kind = None;
                    return vec![Action::RenderNeeded];
                }
                Vec::new()
            }
            "Delete" | "Backspace" => self.delete_selected(),
            _ => Vec::new(),
        }
    }

    /// Double click: drill into a container, or climb one scope level when
    /// the background is double-clicked inside a scope.
    pub fn on_double_click(&mut self, screen: Point) -> Vec<Action> {
        let local = self.to_scope_local(self.viewport.screen_to_logical(screen));
        if let Some(id) = self.hit_top(local) {
            let scopeable = self.store.get(&id).is_some_and(LayoutEntity::scopeable);
            if scopeable {
                return self.set_scope(Some(id));
            }
            return Vec::new();
        }
        if let Some(current) = self.scope {
            let parent = self.store.get(&current).and_then(LayoutEntity::parent_scope);
            return self.set_scope(parent);
        }
        Vec::new()
    }

    // --- Internals ---

    fn begin_drag_internal(&mut self, anchor: Point, pressed: EntityId, was_selected: bool) -> bool {
        let origin_pt = self.scope_origin();
        let origins: Vec<(EntityId, Frame)> = self
            .selection
            .ids()
            .iter()
            .filter_map(|id| self.store.get(id))
            .filter(|e| !e.locked() && e.parent_scope() == self.scope)
            .map(|e| (e.id(), e.frame().to_local(origin_pt)))
            .collect();
        if origins.is_empty() {
            return false;
        }
        self.gesture = Gesture::Drag { anchor, cursor: anchor, pressed, was_selected, origins };
        self.refresh_preview();
        true
    }

    /// Recompute [`Preview`] from the current gesture. Pure read of the
    /// store; candidates live only in the preview until commit.
    fn refresh_preview(&mut self) {
        let bounds = self.scope_size();
        let guides = self.local_guides();
        self.preview = match &self.gesture {
            Gesture::Drag { anchor, cursor, pressed, origins, .. } => {
                let (dx, dy) = (cursor.x - anchor.x, cursor.y - anchor.y);
                let ids: Vec<EntityId> = origins.iter().map(|(id, _)| *id).collect();
                let others = self.sibling_frames_except(&ids);

                // An untouched pointer must produce the original frames
                // exactly, so snapping only runs once there is a delta.
                let (snapped_x, snapped_y, sdx, sdy) = if dx == 0.0 && dy == 0.0 {
                    (None, None, 0.0, 0.0)
                } else {
                    let reference = origins
                        .iter()
                        .find(|(id, _)| id == pressed)
                        .or_else(|| origins.first())
                        .map_or(Frame::new(0.0, 0.0, 1.0, 1.0), |(_, f)| {
                            f.translated(dx, dy)
                        });
                    let snapped = snap_move(reference, &others, &guides, &self.snap_cfg);
                    (
                        snapped.x,
                        snapped.y,
                        dx + snapped.frame.x - reference.x,
                        dy + snapped.frame.y - reference.y,
                    )
                };

                let frames: Vec<(EntityId, Frame)> = origins
                    .iter()
                    .map(|(id, f)| (*id, f.translated(sdx, sdy)))
                    .collect();
                Some(Self::build_preview(
                    TransactionKind::Drag,
                    frames,
                    None,
                    &others,
                    bounds,
                    snapped_x,
                    snapped_y,
                ))
            }
            Gesture::Resize { id, handle, anchor, cursor, origin } => {
                let (dx, dy) = (cursor.x - anchor.x, cursor.y - anchor.y);
                let others = self.sibling_frames_except(&[*id]);
                let snapped = if dx == 0.0 && dy == 0.0 {
                    Snapped { frame: *origin, x: None, y: None }
                } else {
                    let candidate = resize_candidate(*origin, *handle, dx, dy);
                    snap_edges(
                        candidate,
                        handle.moves_left(),
                        handle.moves_right(),
                        handle.moves_top(),
                        handle.moves_bottom(),
                        &others,
                        &guides,
                        &self.snap_cfg,
                    )
                };
                Some(Self::build_preview(
                    TransactionKind::Resize,
                    vec![(*id, snapped.frame)],
                    None,
                    &others,
                    bounds,
                    snapped.x,
                    snapped.y,
                ))
            }
            Gesture::Draw { origin, cursor } => {
                let rect = Frame::from_corners(*origin, *cursor);
                let others = self.sibling_frames_except(&[]);
                let snapped = snap_edges(
                    rect,
                    cursor.x < origin.x,
                    cursor.x >= origin.x,
                    cursor.y < origin.y,
                    cursor.y >= origin.y,
                    &others,
                    &guides,
                    &self.snap_cfg,
                );
                Some(Self::build_preview(
                    TransactionKind::Insert,
                    Vec::new(),
                    Some(snapped.frame),
                    &others,
                    bounds,
                    snapped.x,
                    snapped.y,
                ))
            }
            Gesture::Idle | Gesture::Marquee { .. } => None,
        };
    }

    fn build_preview(
        kind: TransactionKind,
        frames: Vec<(EntityId, Frame)>,
        draft: Option<Frame>,
        others: &[(EntityId, Frame)],
        bounds: Size,
        snap_x: Option<SnapHit>,
        snap_y: Option<SnapHit>,
    ) -> Preview {
        let mut oob = draft.as_ref().is_some_and(|f| out_of_bounds(f, bounds));
        let mut overlapping: Vec<EntityId> = Vec::new();
        let mut note_overlaps = |frame: &Frame| {
            for id in overlapping_ids(frame, others) {
                if !overlapping.contains(&id) {
                    overlapping.push(id);
                }
            }
        };
        for (_, frame) in &frames {
            oob = oob || out_of_bounds(frame, bounds);
            note_overlaps(frame);
        }
        if let Some(draft) = &draft {
            note_overlaps(draft);
        }
        Preview { kind, frames, draft, out_of_bounds: oob, overlapping, snap_x, snap_y }
    }

    /// Shared commit path for drag and resize: bounds gate, push-back
    /// resolution, then the single local → world write.
    fn commit_move(
        &mut self,
        origins: &[(EntityId, Frame)],
        preview: Preview,
        drag: (f64, f64),
        kind: TransactionKind,
    ) -> Vec<Action> {
        let unchanged = preview.frames.iter().zip(origins).all(|((_, f), (_, o))| f == o);
        if unchanged {
            return Vec::new();
        }

        let bounds = self.scope_size();
        let mut frames: Vec<Frame> = preview.frames.iter().map(|(_, f)| *f).collect();
        if frames.iter().any(|f| f.width <= 0.0 || f.height <= 0.0)
            || frames.iter().any(|f| out_of_bounds(f, bounds))
        {
            tracing::debug!(?kind, "transaction reverted: out of bounds");
            return vec![Action::RenderNeeded];
        }

        let ids: Vec<EntityId> = preview.frames.iter().map(|(id, _)| *id).collect();
        let others = self.sibling_frames_except(&ids);
        let collides = frames.iter().any(|f| overlaps_any(f, &others));
        if collides && push_back(&mut frames, drag, &others, bounds).is_none() {
            tracing::debug!(?kind, "transaction reverted: unresolved overlap");
            return vec![Action::RenderNeeded];
        }

        let origin_pt = self.scope_origin();
        for (id, frame) in ids.iter().zip(&frames) {
            if let Some(e) = self.store.get_mut(id) {
                e.set_frame(frame.to_world(origin_pt));
            }
        }
        self.version += 1;
        tracing::debug!(?kind, count = ids.len(), "transaction committed");
        vec![Action::Updated(ids), Action::RenderNeeded]
    }

    /// Strict insertion commit: any overlap discards the entity; insert
    /// mode stays armed so the user can redraw.
    fn commit_insert(&mut self, kind: F::Kind, local: Frame) -> Vec<Action> {
        let bounds = self.scope_size();
        let rect = local.clamped(bounds);
        if rect.width < MIN_SECTION_SIZE || rect.height < MIN_SECTION_SIZE {
            return vec![Action::RenderNeeded];
        }
        let others = self.sibling_frames_except(&[]);
        if overlaps_any(&rect, &others) {
            tracing::debug!("insertion discarded: overlaps sibling");
            return vec![Action::RenderNeeded];
        }

        let world = rect.to_world(self.scope_origin());
        let entity = self.factory.create(kind, world, self.scope);
        let id = entity.id();
        zorder::insert_on_top(&mut self.store, entity);
        self.selection.replace(id);
        self.insert_kind = None;
        self.version += 1;
        tracing::debug!(id = %id, "section inserted");
        vec![Action::Created(id), Action::SelectionChanged, Action::RenderNeeded]
    }

    /// World origin of the active scope's coordinate space.
    fn scope_origin(&self) -> Point {
        self.scope
            .and_then(|id| self.store.get(&id))
            .map_or(Point::new(0.0, 0.0), |e| Point::new(e.frame().x, e.frame().y))
    }

    /// Extent of the active scope: container size when scoped, else the
    /// canvas.
    fn scope_size(&self) -> Size {
        self.scope
            .and_then(|id| self.store.get(&id))
            .map_or(self.canvas, |e| Size::new(e.frame().width, e.frame().height))
    }

    fn frame_of_scope(&self, scope: Option<EntityId>) -> (Point, Size) {
        scope.and_then(|id| self.store.get(&id)).map_or(
            (Point::new(0.0, 0.0), self.canvas),
            |e| {
                let f = e.frame();
                (Point::new(f.x, f.y), Size::new(f.width, f.height))
            },
        )
    }

    fn to_scope_local(&self, logical: Point) -> Point {
        let origin = self.scope_origin();
        Point::new(logical.x - origin.x, logical.y - origin.y)
    }

    /// Scope-local frames of the active scope's siblings, minus `exclude`.
    fn sibling_frames_except(&self, exclude: &[EntityId]) -> Vec<(EntityId, Frame)> {
        let origin = self.scope_origin();
        self.store
            .siblings(self.scope)
            .iter()
            .filter(|e| !exclude.contains(&e.id()))
            .map(|e| (e.id(), e.frame().to_local(origin)))
            .collect()
    }

    /// Guides re-rooted into the active scope's space.
    fn local_guides(&self) -> Vec<Guide> {
        let origin = self.scope_origin();
        self.guides
            .iter()
            .map(|g| {
                let shift = match g.axis {
                    Axis::X => origin.x,
                    Axis::Y => origin.y,
                };
                Guide { offset: g.offset - shift, ..*g }
            })
            .collect()
    }

    /// Topmost unlocked sibling under the scope-local point, if any.
    fn hit_top(&self, local: Point) -> Option<EntityId> {
        let origin = self.scope_origin();
        self.store
            .siblings(self.scope)
            .iter()
            .rev()
            .find(|e| !e.locked() && e.frame().to_local(origin).contains(local))
            .map(|e| e.id())
    }

    fn marquee_hits_local(&self, rect: Frame) -> Vec<EntityId> {
        let origin = self.scope_origin();
        let siblings = self.store.siblings(self.scope);
        let pairs: Vec<(&F::Entity, Frame)> = siblings
            .iter()
            .map(|e| (*e, e.frame().to_local(origin)))
            .collect();
        marquee_hits(&pairs, rect)
    }
}

/// Apply a pointer delta to the dragged edges of `origin`, clamping the
/// moving edge so the frame keeps at least the minimum extent.
fn resize_candidate(origin: Frame, handle: ResizeAnchor, dx: f64, dy: f64) -> Frame {
    let mut frame = origin;
    if handle.moves_left() {
        let dx = dx.min(origin.width - MIN_SECTION_SIZE);
        frame.x = origin.x + dx;
        frame.width = origin.width - dx;
    } else if handle.moves_right() {
        frame.width = (origin.width + dx).max(MIN_SECTION_SIZE);
    }
    if handle.moves_top() {
        let dy = dy.min(origin.height - MIN_SECTION_SIZE);
        frame.y = origin.y + dy;
        frame.height = origin.height - dy;
    } else if handle.moves_bottom() {
        frame.height = (origin.height + dy).max(MIN_SECTION_SIZE);
    }
    frame
}

fn clamp_point(p: Point, bounds: Size) -> Point {
    Point::new(p.x.clamp(0.0, bounds.width), p.y.clamp(0.0, bounds.height))
}
