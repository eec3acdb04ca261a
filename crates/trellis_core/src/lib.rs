//! Trellis Core Runtime
//!
//! This crate provides the foundational primitives for the Trellis widget
//! toolkit:
//!
//! - **Widget identity**: slotmap-backed [`WidgetId`] keys
//! - **Manager registries**: per-class tables of live, rendered widgets
//! - **Toggle state**: the pressed/released machine shared by buttons,
//!   menu items and radio boxes
//! - **Ownership linking**: the trigger-to-overlay relationship table
//!
//! # Example
//!
//! ```rust
//! use trellis_core::{Registry, Toggle, WidgetArena};
//!
//! let mut arena = WidgetArena::new();
//! let button = arena.alloc("button");
//!
//! let mut registry = Registry::new();
//! registry.register(button, Some("save"));
//! assert_eq!(registry.get("save"), Some(button));
//!
//! let mut toggle = Toggle::new(false);
//! assert_eq!(toggle.toggle(None), Some(true));
//! ```

pub mod error;
pub mod ownership;
pub mod registry;
pub mod toggle;

use slotmap::{new_key_type, SlotMap};

pub use error::{Result, WidgetError};
pub use ownership::OwnershipTable;
pub use registry::{Registry, WidgetRef};
pub use toggle::Toggle;

new_key_type! {
    /// Unique identifier for a widget instance
    pub struct WidgetId;
}

/// Allocates widget identities and tracks which ids are live.
///
/// Widget objects are owned by the caller; the arena only records that an
/// id exists so registries and ownership edges can be validated against it.
#[derive(Default)]
pub struct WidgetArena {
    widgets: SlotMap<WidgetId, &'static str>,
}

impl WidgetArena {
    pub fn new() -> Self {
        Self {
            widgets: SlotMap::with_key(),
        }
    }

    /// Allocate an id for a widget of the given kind ("button", "menu", ...).
    pub fn alloc(&mut self, kind: &'static str) -> WidgetId {
        self.widgets.insert(kind)
    }

    /// Release an id. No-op if already released.
    pub fn free(&mut self, id: WidgetId) {
        self.widgets.remove(id);
    }

    /// The kind string the id was allocated with, if it is still live.
    pub fn kind(&self, id: WidgetId) -> Option<&'static str> {
        self.widgets.get(id).copied()
    }

    pub fn is_live(&self, id: WidgetId) -> bool {
        self.widgets.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_alloc_free() {
        let mut arena = WidgetArena::new();
        let id = arena.alloc("button");

        assert!(arena.is_live(id));
        assert_eq!(arena.kind(id), Some("button"));

        arena.free(id);
        assert!(!arena.is_live(id));
        assert_eq!(arena.kind(id), None);

        // Double free is a no-op
        arena.free(id);
        assert!(arena.is_empty());
    }
}
