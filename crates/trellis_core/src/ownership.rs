//! Trigger-to-overlay ownership linking
//!
//! A trigger (button, picker field) holds at most one overlay (menu,
//! picker), and an attached overlay back-references its owner. Both
//! directions live in this table, keyed by id, so teardown is a table
//! deletion rather than a graph walk, and the invariant
//! `owner_of(o) == Some(t)  <=>  overlay_of(t) == Some(o)`
//! holds by construction.

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::WidgetId;

/// Directed trigger↔overlay relationship table.
#[derive(Default)]
pub struct OwnershipTable {
    /// trigger -> owned overlay
    forward: FxHashMap<WidgetId, WidgetId>,
    /// overlay -> owning trigger
    back: FxHashMap<WidgetId, WidgetId>,
}

impl OwnershipTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `overlay` to `owner`, returning the owner's previous
    /// overlay (already detached) if there was one.
    ///
    /// If the overlay is currently attached to a different trigger it is
    /// detached from it first; a dangling back-reference after
    /// reassignment is a correctness bug, so the stale edge never
    /// survives this call.
    pub fn link(&mut self, owner: WidgetId, overlay: WidgetId) -> Option<WidgetId> {
        let previous = self.unlink(owner);

        if let Some(other) = self.back.get(&overlay).copied() {
            warn!(?overlay, ?other, "overlay already owned elsewhere, detaching");
            self.forward.remove(&other);
            self.back.remove(&overlay);
        }

        self.forward.insert(owner, overlay);
        self.back.insert(overlay, owner);
        previous
    }

    /// Clear the owner's overlay edge, returning the detached overlay.
    /// The overlay's back-reference is removed in the same step.
    pub fn unlink(&mut self, owner: WidgetId) -> Option<WidgetId> {
        let overlay = self.forward.remove(&owner)?;
        self.back.remove(&overlay);
        Some(overlay)
    }

    /// Remove every edge touching `id`, in either role. Used on destroy.
    pub fn release(&mut self, id: WidgetId) {
        if let Some(overlay) = self.forward.remove(&id) {
            self.back.remove(&overlay);
        }
        if let Some(owner) = self.back.remove(&id) {
            self.forward.remove(&owner);
        }
    }

    pub fn overlay_of(&self, owner: WidgetId) -> Option<WidgetId> {
        self.forward.get(&owner).copied()
    }

    pub fn owner_of(&self, overlay: WidgetId) -> Option<WidgetId> {
        self.back.get(&overlay).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WidgetArena;

    #[test]
    fn test_link_sets_both_directions() {
        let mut arena = WidgetArena::new();
        let trigger = arena.alloc("button");
        let menu = arena.alloc("menu");

        let mut table = OwnershipTable::new();
        assert_eq!(table.link(trigger, menu), None);

        assert_eq!(table.overlay_of(trigger), Some(menu));
        assert_eq!(table.owner_of(menu), Some(trigger));
    }

    #[test]
    fn test_relink_clears_old_back_reference() {
        let mut arena = WidgetArena::new();
        let trigger = arena.alloc("button");
        let old_menu = arena.alloc("menu");
        let new_menu = arena.alloc("menu");

        let mut table = OwnershipTable::new();
        table.link(trigger, old_menu);
        let detached = table.link(trigger, new_menu);

        assert_eq!(detached, Some(old_menu));
        assert_eq!(table.owner_of(old_menu), None);
        assert_eq!(table.owner_of(new_menu), Some(trigger));
        assert_eq!(table.overlay_of(trigger), Some(new_menu));
    }

    #[test]
    fn test_stealing_an_owned_overlay_detaches_it() {
        let mut arena = WidgetArena::new();
        let first = arena.alloc("button");
        let second = arena.alloc("button");
        let menu = arena.alloc("menu");

        let mut table = OwnershipTable::new();
        table.link(first, menu);
        table.link(second, menu);

        // No overlay is owned by two triggers simultaneously
        assert_eq!(table.overlay_of(first), None);
        assert_eq!(table.owner_of(menu), Some(second));
    }

    #[test]
    fn test_release_covers_both_roles() {
        let mut arena = WidgetArena::new();
        let trigger = arena.alloc("button");
        let menu = arena.alloc("menu");

        let mut table = OwnershipTable::new();
        table.link(trigger, menu);

        table.release(menu);
        assert_eq!(table.overlay_of(trigger), None);
        assert_eq!(table.owner_of(menu), None);

        table.link(trigger, menu);
        table.release(trigger);
        assert_eq!(table.owner_of(menu), None);
    }
}
