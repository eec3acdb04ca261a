//! Event delegation table
//!
//! Widgets bind named actions to nodes; routing resolves an event into
//! the ordered list of actions to invoke. Ordering is a documented
//! two-phase contract, not an accident of binding order:
//!
//! 1. **Local phase**: bindings on the target node, then on each
//!    ancestor up the tree (bubbling), in bind order per node.
//! 2. **Document phase**: document-level bindings, in bind order.
//!
//! "Click outside closes the menu" works because document-level
//! observers always run after every widget-local handler has seen the
//! event.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

use trellis_core::WidgetId;

use crate::events::{Event, EventType};
use crate::node::{Dom, NodeId};

/// A named handler on the owning widget ("onClick", "onMouseDown", ...).
pub type Action = &'static str;

/// Dispatch phase an action was routed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchPhase {
    Local,
    Document,
}

/// An action resolved for a routed event.
#[derive(Clone, Copy, Debug)]
pub struct RoutedAction {
    pub owner: WidgetId,
    pub action: Action,
    pub phase: DispatchPhase,
}

#[derive(Clone, Copy)]
struct Binding {
    owner: WidgetId,
    action: Action,
}

/// Delegated event bindings for all live widgets.
#[derive(Default)]
pub struct Bindings {
    local: FxHashMap<(NodeId, EventType), Vec<Binding>>,
    document: Vec<(EventType, Binding)>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an action on a node, scoped to its owning widget.
    pub fn bind(&mut self, node: NodeId, event_type: EventType, owner: WidgetId, action: Action) {
        self.local
            .entry((node, event_type))
            .or_default()
            .push(Binding { owner, action });
    }

    /// Bind a document-level action. Document bindings run after all
    /// local bindings for the same event.
    pub fn bind_document(&mut self, event_type: EventType, owner: WidgetId, action: Action) {
        self.document.push((event_type, Binding { owner, action }));
    }

    /// Remove every binding owned by a widget, local and document.
    /// Rebinding always goes through here first so handlers never fire
    /// twice.
    pub fn unbind_owner(&mut self, owner: WidgetId) {
        self.local.retain(|_, bindings| {
            bindings.retain(|b| b.owner != owner);
            !bindings.is_empty()
        });
        self.document.retain(|(_, b)| b.owner != owner);
    }

    /// Remove a widget's document-level bindings for one event type.
    pub fn unbind_document(&mut self, event_type: EventType, owner: WidgetId) {
        self.document
            .retain(|(ty, b)| *ty != event_type || b.owner != owner);
    }

    /// Resolve an event into its ordered action list: target node and
    /// ancestors (bubbling), then document-level bindings.
    pub fn route(&self, dom: &Dom, event: &Event) -> SmallVec<[RoutedAction; 4]> {
        let mut routed = SmallVec::new();

        let mut current = Some(event.target);
        while let Some(node) = current {
            if let Some(bindings) = self.local.get(&(node, event.event_type)) {
                for b in bindings {
                    routed.push(RoutedAction {
                        owner: b.owner,
                        action: b.action,
                        phase: DispatchPhase::Local,
                    });
                }
            }
            current = dom.parent(node);
        }

        for (ty, b) in &self.document {
            if *ty == event.event_type {
                routed.push(RoutedAction {
                    owner: b.owner,
                    action: b.action,
                    phase: DispatchPhase::Document,
                });
            }
        }

        if !routed.is_empty() {
            trace!(
                event_type = event.event_type,
                actions = routed.len(),
                "event routed"
            );
        }
        routed
    }

    /// Total binding count. Used by teardown leak checks.
    pub fn len(&self) -> usize {
        self.local.values().map(Vec::len).sum::<usize>() + self.document.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event_types;
    use trellis_core::WidgetArena;

    fn setup() -> (Dom, WidgetArena, Bindings) {
        (Dom::new(), WidgetArena::new(), Bindings::new())
    }

    #[test]
    fn test_route_bubbles_to_ancestors() {
        let (mut dom, mut arena, mut bindings) = setup();
        let outer = arena.alloc("panel");
        let inner = arena.alloc("button");

        let parent = dom.create_element("div");
        let child = dom.create_element("button");
        dom.append(dom.body(), parent);
        dom.append(parent, child);

        bindings.bind(parent, event_types::CLICK, outer, "onPanelClick");
        bindings.bind(child, event_types::CLICK, inner, "onClick");

        let event = Event::new(event_types::CLICK, child);
        let routed = bindings.route(&dom, &event);

        assert_eq!(routed.len(), 2);
        assert_eq!(routed[0].action, "onClick");
        assert_eq!(routed[1].action, "onPanelClick");
    }

    #[test]
    fn test_document_phase_runs_after_local() {
        let (mut dom, mut arena, mut bindings) = setup();
        let widget = arena.alloc("button");
        let observer = arena.alloc("menu");

        let node = dom.create_element("button");
        dom.append(dom.body(), node);

        // Document binding registered before the local one; it still
        // routes after it.
        bindings.bind_document(event_types::CLICK, observer, "onDocumentClick");
        bindings.bind(node, event_types::CLICK, widget, "onClick");

        let event = Event::new(event_types::CLICK, node);
        let routed = bindings.route(&dom, &event);

        assert_eq!(routed[0].phase, DispatchPhase::Local);
        assert_eq!(routed[1].phase, DispatchPhase::Document);
        assert_eq!(routed[1].action, "onDocumentClick");
    }

    #[test]
    fn test_unbind_owner_clears_everything() {
        let (mut dom, mut arena, mut bindings) = setup();
        let widget = arena.alloc("button");

        let node = dom.create_element("button");
        bindings.bind(node, event_types::CLICK, widget, "onClick");
        bindings.bind(node, event_types::MOUSE_DOWN, widget, "onMouseDown");
        bindings.bind_document(event_types::MOUSE_UP, widget, "onMouseUp");

        bindings.unbind_owner(widget);
        assert!(bindings.is_empty());

        let event = Event::new(event_types::CLICK, node);
        assert!(bindings.route(&dom, &event).is_empty());
    }

    #[test]
    fn test_unbind_document_is_selective() {
        let (_dom, mut arena, mut bindings) = setup();
        let widget = arena.alloc("button");

        bindings.bind_document(event_types::MOUSE_UP, widget, "onMouseUp");
        bindings.bind_document(event_types::CLICK, widget, "onDocumentClick");

        bindings.unbind_document(event_types::MOUSE_UP, widget);
        assert_eq!(bindings.len(), 1);
    }
}
