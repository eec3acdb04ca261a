//! Manager registries
//!
//! Each widget class keeps a registry of its live, rendered instances so
//! cross-cutting operations ("hide every open menu") can reach widgets
//! that were created independently. Entries are added on render, never
//! before, and removed on destroy; a registry never holds a destroyed id.
//!
//! Registries are plain service objects owned by the `Ui` context and
//! injected into widgets through it, so tests can construct isolated
//! instances instead of sharing ambient global state.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::WidgetId;

/// A widget reference: either a live id or a registry name.
#[derive(Clone, Copy, Debug)]
pub enum WidgetRef<'a> {
    Id(WidgetId),
    Name(&'a str),
}

impl From<WidgetId> for WidgetRef<'_> {
    fn from(id: WidgetId) -> Self {
        WidgetRef::Id(id)
    }
}

impl<'a> From<&'a str> for WidgetRef<'a> {
    fn from(name: &'a str) -> Self {
        WidgetRef::Name(name)
    }
}

/// Per-class table of currently live, rendered widget instances.
///
/// Iteration follows registration order.
#[derive(Default)]
pub struct Registry {
    entries: IndexMap<WidgetId, Option<String>>,
    by_name: FxHashMap<String, WidgetId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instance. Idempotent: re-registering an already present id
    /// is a silent no-op.
    pub fn register(&mut self, id: WidgetId, name: Option<&str>) {
        if self.entries.contains_key(&id) {
            return;
        }
        if let Some(name) = name {
            self.by_name.insert(name.to_owned(), id);
        }
        self.entries.insert(id, name.map(str::to_owned));
    }

    /// Look up an instance by registry name. Never constructs one.
    pub fn get(&self, name: &str) -> Option<WidgetId> {
        self.by_name.get(name).copied().filter(|id| self.contains(*id))
    }

    /// Resolve a reference to a registered id.
    pub fn resolve(&self, widget: WidgetRef<'_>) -> Option<WidgetId> {
        match widget {
            WidgetRef::Id(id) => self.contains(id).then_some(id),
            WidgetRef::Name(name) => self.get(name),
        }
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Remove an instance. No-op if absent.
    pub fn unregister(&mut self, id: WidgetId) {
        if let Some(name) = self.entries.shift_remove(&id).flatten() {
            self.by_name.remove(&name);
        }
    }

    /// Apply `f` to every registered instance, in registration order.
    pub fn each(&self, mut f: impl FnMut(WidgetId)) {
        for id in self.entries.keys() {
            f(*id);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WidgetArena;

    fn ids(n: usize) -> (WidgetArena, Vec<WidgetId>) {
        let mut arena = WidgetArena::new();
        let ids = (0..n).map(|_| arena.alloc("test")).collect();
        (arena, ids)
    }

    #[test]
    fn test_register_and_get_by_name() {
        let (_arena, ids) = ids(2);
        let mut registry = Registry::new();

        registry.register(ids[0], Some("save"));
        registry.register(ids[1], None);

        assert_eq!(registry.get("save"), Some(ids[0]));
        assert_eq!(registry.get("missing"), None);
        assert!(registry.contains(ids[1]));
    }

    #[test]
    fn test_register_is_idempotent() {
        let (_arena, ids) = ids(1);
        let mut registry = Registry::new();

        registry.register(ids[0], Some("a"));
        registry.register(ids[0], Some("b"));

        assert_eq!(registry.len(), 1);
        // First registration wins
        assert_eq!(registry.get("a"), Some(ids[0]));
        assert_eq!(registry.get("b"), None);
    }

    #[test]
    fn test_unregister_removes_name_lookup() {
        let (_arena, ids) = ids(1);
        let mut registry = Registry::new();

        registry.register(ids[0], Some("save"));
        registry.unregister(ids[0]);

        assert!(!registry.contains(ids[0]));
        assert_eq!(registry.get("save"), None);

        // No-op on absent id
        registry.unregister(ids[0]);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_each_in_registration_order() {
        let (_arena, ids) = ids(3);
        let mut registry = Registry::new();

        registry.register(ids[2], None);
        registry.register(ids[0], None);
        registry.register(ids[1], None);

        let mut seen = Vec::new();
        registry.each(|id| seen.push(id));
        assert_eq!(seen, vec![ids[2], ids[0], ids[1]]);
    }

    #[test]
    fn test_resolve() {
        let (mut arena, ids) = ids(1);
        let mut registry = Registry::new();
        registry.register(ids[0], Some("menu-main"));

        assert_eq!(registry.resolve(WidgetRef::Name("menu-main")), Some(ids[0]));
        assert_eq!(registry.resolve(WidgetRef::Id(ids[0])), Some(ids[0]));

        let unregistered = arena.alloc("test");
        assert_eq!(registry.resolve(WidgetRef::Id(unregistered)), None);
    }
}
