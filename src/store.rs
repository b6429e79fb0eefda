//! The geometry store: the canonical, world-space record of every entity.
//!
//! Only the engine writes here, and only from transaction commits,
//! structural commands, and snapshot adoption. Adoption refuses structurally
//! corrupt input outright; it never repairs individual fields.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::{HashMap, HashSet};

use crate::entity::{EntityId, LayoutEntity};

/// Structural validation failure for an adopted snapshot.
///
/// Every offending id is reported, per category; nothing is adopted when any
/// list is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error(
    "snapshot rejected: {} duplicate id(s), {} non-positive frame(s), {} non-dense z scope member(s), {} dangling scope ref(s)",
    .duplicate_ids.len(),
    .non_positive.len(),
    .non_dense_z.len(),
    .dangling_scope.len()
)]
pub struct SnapshotError {
    /// Ids appearing more than once.
    pub duplicate_ids: Vec<EntityId>,
    /// Ids whose frame has `width <= 0` or `height <= 0`.
    pub non_positive: Vec<EntityId>,
    /// Ids in scopes whose z values are not exactly `{0..N-1}`.
    pub non_dense_z: Vec<EntityId>,
    /// Ids whose `parent_scope` references no entity in the snapshot.
    pub dangling_scope: Vec<EntityId>,
}

impl SnapshotError {
    fn is_clean(&self) -> bool {
        self.duplicate_ids.is_empty()
            && self.non_positive.is_empty()
            && self.non_dense_z.is_empty()
            && self.dangling_scope.is_empty()
    }
}

/// In-memory store of layout entities keyed by id.
#[derive(Debug, Clone)]
pub struct Store<T> {
    entities: HashMap<EntityId, T>,
}

impl<T: LayoutEntity> Store<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { entities: HashMap::new() }
    }

    /// Insert or replace an entity.
    pub fn insert(&mut self, entity: T) {
        self.entities.insert(entity.id(), entity);
    }

    /// Remove an entity by id, returning it if present.
    pub fn remove(&mut self, id: &EntityId) -> Option<T> {
        self.entities.remove(id)
    }

    #[must_use]
    pub fn get(&self, id: &EntityId) -> Option<&T> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut T> {
        self.entities.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities owned by `scope`, ascending z, ties broken by id.
    #[must_use]
    pub fn siblings(&self, scope: Option<EntityId>) -> Vec<&T> {
        let mut out: Vec<&T> = self
            .entities
            .values()
            .filter(|e| e.parent_scope() == scope)
            .collect();
        out.sort_by(|a, b| a.z().cmp(&b.z()).then_with(|| a.id().cmp(&b.id())));
        out
    }

    /// Sibling ids of `scope` in z order.
    #[must_use]
    pub fn sibling_ids(&self, scope: Option<EntityId>) -> Vec<EntityId> {
        self.siblings(scope).iter().map(|e| e.id()).collect()
    }

    /// Highest z among siblings of `scope`; `None` when the scope is empty.
    #[must_use]
    pub fn max_z(&self, scope: Option<EntityId>) -> Option<i64> {
        self.entities
            .values()
            .filter(|e| e.parent_scope() == scope)
            .map(LayoutEntity::z)
            .max()
    }

    /// Ids of every entity transitively scoped under `root`, `root` excluded.
    #[must_use]
    pub fn descendants(&self, root: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut frontier = vec![root];
        while let Some(scope) = frontier.pop() {
            for id in self.sibling_ids(Some(scope)) {
                out.push(id);
                frontier.push(id);
            }
        }
        out
    }

    /// Every entity, z-ascending per scope with root scope first, for
    /// draw-order traversal and snapshot export.
    #[must_use]
    pub fn all(&self) -> Vec<&T> {
        let mut out: Vec<&T> = Vec::with_capacity(self.entities.len());
        let mut frontier: Vec<Option<EntityId>> = vec![None];
        while let Some(scope) = frontier.pop() {
            for e in self.siblings(scope) {
                out.push(e);
                frontier.push(Some(e.id()));
            }
        }
        out
    }

    /// Validate a snapshot against the structural invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] listing every offending id when the
    /// snapshot holds duplicate ids, non-positive frames, non-dense per-scope
    /// z values, or `parent_scope` references to ids not in the snapshot.
    pub fn validate(entities: &[T]) -> Result<(), SnapshotError> {
        let mut err = SnapshotError::default();

        let mut seen: HashSet<EntityId> = HashSet::new();
        for e in entities {
            if !seen.insert(e.id()) {
                err.duplicate_ids.push(e.id());
            }
            let f = e.frame();
            if f.width <= 0.0 || f.height <= 0.0 {
                err.non_positive.push(e.id());
            }
        }

        for e in entities {
            if let Some(scope) = e.parent_scope() {
                if !seen.contains(&scope) {
                    err.dangling_scope.push(e.id());
                }
            }
        }

        // Group (id, z) by scope and require each group's z set to be 0..N-1.
        let mut by_scope: HashMap<Option<EntityId>, Vec<(EntityId, i64)>> = HashMap::new();
        for e in entities {
            by_scope.entry(e.parent_scope()).or_default().push((e.id(), e.z()));
        }
        for members in by_scope.values() {
            let mut zs: Vec<i64> = members.iter().map(|(_, z)| *z).collect();
            zs.sort_unstable();
            let dense = zs.iter().enumerate().all(|(i, z)| {
                i64::try_from(i).is_ok_and(|i| *z == i)
            });
            if !dense {
                err.non_dense_z.extend(members.iter().map(|(id, _)| *id));
            }
        }

        err.duplicate_ids.sort_unstable();
        err.non_positive.sort_unstable();
        err.non_dense_z.sort_unstable();
        err.dangling_scope.sort_unstable();

        if err.is_clean() { Ok(()) } else { Err(err) }
    }

    /// Replace the store contents with a validated snapshot.
    ///
    /// # Errors
    ///
    /// Returns the validation failure without touching current contents when
    /// the snapshot is structurally corrupt.
    pub fn load_snapshot(&mut self, entities: Vec<T>) -> Result<(), SnapshotError> {
        if let Err(err) = Self::validate(&entities) {
            tracing::warn!(error = %err, "snapshot adoption refused");
            return Err(err);
        }
        self.entities.clear();
        for e in entities {
            self.entities.insert(e.id(), e);
        }
        Ok(())
    }

    /// Clone out every entity in draw order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.all().into_iter().cloned().collect()
    }
}

impl<T: LayoutEntity> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}
