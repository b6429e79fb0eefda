//! Dense z-order maintenance and restacking operations.
//!
//! Every operation ends in normalization: siblings of the touched scope are
//! re-flattened to `z ∈ {0..N-1}` with ties resolved by prior order, so the
//! store never carries gaps or duplicates past a structural change.

#[cfg(test)]
#[path = "zorder_test.rs"]
mod zorder_test;

use std::collections::HashSet;

use crate::entity::{EntityId, LayoutEntity};
use crate::store::Store;

/// Restacking operation applied to a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOp {
    /// Move to the top of the scope.
    Front,
    /// Move to the bottom of the scope.
    Back,
    /// Swap one step toward the top.
    Forward,
    /// Swap one step toward the bottom.
    Backward,
}

/// Re-flatten the z values of `scope` to `0..N-1`, preserving current order.
pub fn normalize<T: LayoutEntity>(store: &mut Store<T>, scope: Option<EntityId>) {
    let order = store.sibling_ids(scope);
    write_order(store, &order);
}

/// Apply `op` to `ids` within `scope` and normalize.
///
/// Ids outside the scope are ignored. Relative order within the moved group
/// is preserved; `Forward`/`Backward` use adjacent-swap semantics, so a
/// member already blocked by another moved member stays put.
pub fn restack<T: LayoutEntity>(
    store: &mut Store<T>,
    scope: Option<EntityId>,
    ids: &[EntityId],
    op: StackOp,
) {
    let mut order = store.sibling_ids(scope);
    let moved: HashSet<EntityId> = ids.iter().copied().collect();
    if order.iter().all(|id| !moved.contains(id)) {
        return;
    }

    match op {
        StackOp::Front => {
            let (kept, raised): (Vec<_>, Vec<_>) =
                order.into_iter().partition(|id| !moved.contains(id));
            order = kept;
            order.extend(raised);
        }
        StackOp::Back => {
            let (lowered, kept): (Vec<_>, Vec<_>) =
                order.into_iter().partition(|id| moved.contains(id));
            order = lowered;
            order.extend(kept);
        }
        StackOp::Forward => {
            for i in (0..order.len().saturating_sub(1)).rev() {
                if moved.contains(&order[i]) && !moved.contains(&order[i + 1]) {
                    order.swap(i, i + 1);
                }
            }
        }
        StackOp::Backward => {
            for i in 1..order.len() {
                if moved.contains(&order[i]) && !moved.contains(&order[i - 1]) {
                    order.swap(i, i - 1);
                }
            }
        }
    }

    write_order(store, &order);
}

/// Assign `entity` the top z of its scope and insert it.
pub fn insert_on_top<T: LayoutEntity>(store: &mut Store<T>, mut entity: T) {
    let scope = entity.parent_scope();
    entity.set_z(store.max_z(scope).map_or(0, |z| z + 1));
    store.insert(entity);
    normalize(store, scope);
}

fn write_order<T: LayoutEntity>(store: &mut Store<T>, order: &[EntityId]) {
    for (i, id) in order.iter().enumerate() {
        if let Some(e) = store.get_mut(id) {
            e.set_z(i64::try_from(i).unwrap_or(i64::MAX));
        }
    }
}
