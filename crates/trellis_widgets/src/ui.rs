//! The shared widget context.
//!
//! [`Ui`] owns every piece of state that crosses widget boundaries: the node
//! tree, the event bindings, the per-kind registries, the ownership table
//! linking triggers to the overlays they spawn, and the overlay visibility
//! book-keeping. Widgets never hold references to each other; they talk
//! through ids resolved against this context.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use trellis_core::{OwnershipTable, Registry, WidgetArena, WidgetId, WidgetRef};
use trellis_dom::{event_types, Action, Bindings, Bounds, Dom, Event, NodeId, Viewport};

use crate::overlay::{resolve_position, Alignment, OverlayStates};

/// Which registry a widget kind reports into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    Buttons,
    Fields,
    Overlays,
}

/// Shared context threaded through every widget operation.
pub struct Ui {
    pub dom: Dom,
    pub bindings: Bindings,
    pub viewport: Viewport,
    pub arena: WidgetArena,
    pub ownership: OwnershipTable,
    pub buttons: Registry,
    pub fields: Registry,
    pub overlays: Registry,
    pub overlay_states: OverlayStates,
    roots: FxHashMap<WidgetId, NodeId>,
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui {
    pub fn new() -> Self {
        Self::with_viewport(Viewport::default())
    }

    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            dom: Dom::new(),
            bindings: Bindings::new(),
            viewport,
            arena: WidgetArena::new(),
            ownership: OwnershipTable::new(),
            buttons: Registry::new(),
            fields: Registry::new(),
            overlays: Registry::new(),
            overlay_states: OverlayStates::new(),
            roots: FxHashMap::default(),
        }
    }

    pub fn registry(&self, kind: RegistryKind) -> &Registry {
        match kind {
            RegistryKind::Buttons => &self.buttons,
            RegistryKind::Fields => &self.fields,
            RegistryKind::Overlays => &self.overlays,
        }
    }

    pub fn registry_mut(&mut self, kind: RegistryKind) -> &mut Registry {
        match kind {
            RegistryKind::Buttons => &mut self.buttons,
            RegistryKind::Fields => &mut self.fields,
            RegistryKind::Overlays => &mut self.overlays,
        }
    }

    /// Record the root node a widget rendered into.
    pub fn set_widget_root(&mut self, id: WidgetId, root: NodeId) {
        self.roots.insert(id, root);
    }

    pub fn widget_root(&self, id: WidgetId) -> Option<NodeId> {
        self.roots.get(&id).copied()
    }

    /// Resolve an overlay reference to a live widget id.
    ///
    /// Names go through the overlay registry; ids only need to be live in
    /// the arena, so an overlay that has not rendered yet still resolves.
    pub fn resolve_overlay(&self, overlay: WidgetRef<'_>) -> Option<WidgetId> {
        match overlay {
            WidgetRef::Id(id) => self.arena.is_live(id).then_some(id),
            WidgetRef::Name(name) => self.overlays.get(name),
        }
    }

    /// Route an event through its bound actions and then run the
    /// document-level dismissal pass.
    ///
    /// Actions fire in two phases: bindings on the target and its ancestors
    /// first (innermost outward), then document-level bindings in the order
    /// they were added. `sink` receives each `(owner, action)` pair and is
    /// expected to forward it to the owning widget. Stopping propagation on
    /// the event skips every remaining action.
    pub fn dispatch<F>(&mut self, event: &mut Event, mut sink: F)
    where
        F: FnMut(&mut Ui, WidgetId, Action, &mut Event),
    {
        let routed = self.bindings.route(&self.dom, event);
        for action in routed {
            if event.propagation_stopped {
                break;
            }
            sink(self, action.owner, action.action, event);
        }
        if event.event_type == event_types::CLICK || event.event_type == event_types::MOUSE_DOWN {
            self.close_overlays_outside(event.target);
        }
    }

    /// Show an overlay anchored to a node, hiding any unrelated open
    /// overlays.
    ///
    /// When `from_event` is set, an overlay with no items and `show_empty`
    /// off is suppressed and stays hidden. The programmatic path always
    /// shows. Returns whether the overlay ended up visible.
    pub fn show_overlay(
        &mut self,
        id: WidgetId,
        anchor: NodeId,
        align: Alignment,
        from_event: bool,
    ) -> bool {
        let Some(entry) = self.overlay_states.get(id) else {
            warn!(?id, "show requested for a widget with no overlay entry");
            return false;
        };
        if from_event && !entry.show_empty && entry.item_count == 0 {
            trace!(?id, "suppressing empty overlay");
            return false;
        }
        let root = entry.root;
        let size = self.dom.bounds(root);
        let anchor_bounds = self.dom.bounds(anchor);
        let placement = resolve_position(
            self.viewport,
            anchor_bounds,
            (size.width, size.height),
            &align,
        );
        if placement.flipped_h || placement.flipped_v {
            debug!(
                ?id,
                flipped_h = placement.flipped_h,
                flipped_v = placement.flipped_v,
                "overlay flipped to stay inside the viewport"
            );
        }
        self.dom.set_bounds(
            root,
            Bounds::new(placement.x, placement.y, size.width, size.height),
        );
        self.dom.remove_class(root, "hidden");
        if let Some(entry) = self.overlay_states.get_mut(id) {
            entry.visible = true;
            entry.anchor = Some(anchor);
        }
        self.hide_overlays_except(Some(id));
        debug!(?id, x = placement.x, y = placement.y, "overlay shown");
        true
    }

    /// Hide an overlay. Idempotent; returns whether it was visible.
    pub fn hide_overlay(&mut self, id: WidgetId) -> bool {
        let Some(entry) = self.overlay_states.get_mut(id) else {
            return false;
        };
        if !entry.visible {
            return false;
        }
        entry.visible = false;
        entry.anchor = None;
        let root = entry.root;
        self.dom.add_class(root, "hidden");
        trace!(?id, "overlay hidden");
        true
    }

    pub fn is_overlay_visible(&self, id: WidgetId) -> bool {
        self.overlay_states.is_visible(id)
    }

    pub fn hide_all_overlays(&mut self) {
        self.hide_overlays_except(None);
    }

    /// Hide every registered overlay except `keep` and its ancestor chain.
    pub fn hide_overlays_except(&mut self, keep: Option<WidgetId>) {
        let chain = match keep {
            Some(id) => self.overlay_chain(id),
            None => SmallVec::new(),
        };
        let ids: Vec<WidgetId> = self.overlays.iter().collect();
        for id in ids {
            if !chain.contains(&id) {
                self.hide_overlay(id);
            }
        }
    }

    /// Walk from a leaf overlay up through the overlays that contain its
    /// owners. A submenu keeps its parent menu open while it is shown.
    pub fn overlay_chain(&self, leaf: WidgetId) -> SmallVec<[WidgetId; 4]> {
        let mut chain: SmallVec<[WidgetId; 4]> = SmallVec::new();
        chain.push(leaf);
        let mut current = leaf;
        loop {
            let Some(owner) = self.ownership.owner_of(current) else {
                break;
            };
            let Some(owner_root) = self.widget_root(owner) else {
                break;
            };
            let mut parent = None;
            for candidate in self.overlays.iter() {
                if chain.contains(&candidate) {
                    continue;
                }
                if let Some(entry) = self.overlay_states.get(candidate) {
                    if self.dom.is_within(owner_root, entry.root) {
                        parent = Some(candidate);
                        break;
                    }
                }
            }
            match parent {
                Some(p) => {
                    chain.push(p);
                    current = p;
                }
                None => break,
            }
        }
        chain
    }

    /// Close every open overlay the event target falls outside of.
    ///
    /// A target inside the overlay itself, or inside the trigger that owns
    /// it, does not count as outside; the trigger decides what happens to
    /// its own overlay.
    fn close_overlays_outside(&mut self, target: NodeId) {
        let ids: Vec<WidgetId> = self.overlays.iter().collect();
        for id in ids {
            let Some(entry) = self.overlay_states.get(id) else {
                continue;
            };
            if !entry.visible {
                continue;
            }
            if self.dom.is_within(target, entry.root) {
                continue;
            }
            if let Some(owner) = self.ownership.owner_of(id) {
                if let Some(owner_root) = self.widget_root(owner) {
                    if self.dom.is_within(target, owner_root) {
                        continue;
                    }
                }
            }
            debug!(?id, "closing overlay on outside interaction");
            self.hide_overlay(id);
        }
    }

    /// Tear down every trace of a widget the context still holds.
    ///
    /// Used both by [`crate::View::destroy`] and when a widget must be
    /// removed without access to its struct, such as a replaced menu. Safe
    /// to call for widgets that never rendered.
    pub fn dismantle(&mut self, id: WidgetId) {
        self.bindings.unbind_owner(id);
        self.buttons.unregister(id);
        self.fields.unregister(id);
        self.overlays.unregister(id);
        self.ownership.release(id);
        self.overlay_states.remove(id);
        if let Some(root) = self.roots.remove(&id) {
            self.dom.remove(root);
        }
        self.arena.free(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dismantle_clears_all_state() {
        let mut ui = Ui::new();
        let id = ui.arena.alloc("menu");
        let body = ui.dom.body();
        let root = ui.dom.create_element("ul");
        ui.dom.append(body, root);
        ui.set_widget_root(id, root);
        ui.overlays.register(id, Some("ctx"));
        ui.bindings.bind(root, event_types::CLICK, id, "onItemClick");

        ui.dismantle(id);

        assert!(!ui.arena.is_live(id));
        assert!(ui.overlays.get("ctx").is_none());
        assert!(!ui.dom.contains(root));
        assert!(ui.bindings.is_empty());
        assert!(ui.widget_root(id).is_none());
    }

    #[test]
    fn test_resolve_overlay_by_id_requires_live_widget() {
        let mut ui = Ui::new();
        let id = ui.arena.alloc("menu");
        assert_eq!(ui.resolve_overlay(WidgetRef::Id(id)), Some(id));
        ui.arena.free(id);
        assert_eq!(ui.resolve_overlay(WidgetRef::Id(id)), None);
    }
}
