//! The base view lifecycle.
//!
//! Every widget embeds a [`ViewCore`] and implements [`View`]. The trait
//! carries the whole render/destroy protocol as default methods; widgets
//! override the hooks (`before_render`, `after_render`, `declared_events`,
//! `tpl_data`, `before_destroy`) rather than the protocol itself.

use indexmap::IndexMap;
use tracing::debug;

use trellis_core::{Result, WidgetError, WidgetId};
use trellis_dom::{Action, EventType, NodeId, Template, TplData};

use crate::ui::{RegistryKind, Ui};

/// State every widget shares: identity, naming, render target and the
/// single root node it owns.
pub struct ViewCore {
    id: WidgetId,
    kind: &'static str,
    tag_name: &'static str,
    class_name: String,
    name: Option<String>,
    render_to: Option<NodeId>,
    template: Template,
    root: Option<NodeId>,
    rendered: bool,
    disabled: bool,
}

impl ViewCore {
    pub fn new(
        ui: &mut Ui,
        kind: &'static str,
        tag_name: &'static str,
        class_name: impl Into<String>,
        template: Template,
    ) -> Self {
        Self {
            id: ui.arena.alloc(kind),
            kind,
            tag_name,
            class_name: class_name.into(),
            name: None,
            render_to: None,
            template,
            root: None,
            rendered: false,
            disabled: false,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn tag_name(&self) -> &'static str {
        self.tag_name
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn render_to(&self) -> Option<NodeId> {
        self.render_to
    }

    pub fn set_render_to(&mut self, target: Option<NodeId>) {
        self.render_to = target;
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn take_root(&mut self) -> Option<NodeId> {
        self.root.take()
    }

    pub fn rendered(&self) -> bool {
        self.rendered
    }

    pub fn set_rendered(&mut self, rendered: bool) {
        self.rendered = rendered;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Template data every widget gets for free.
    pub fn base_tpl_data(&self) -> TplData {
        let mut data = TplData::new();
        data.set("cls", self.class_name.as_str())
            .set("disabled", self.disabled);
        data
    }
}

/// The widget lifecycle.
pub trait View {
    fn core(&self) -> &ViewCore;
    fn core_mut(&mut self) -> &mut ViewCore;

    /// Registry this widget reports into once rendered, if any.
    fn registry_kind(&self) -> Option<RegistryKind> {
        None
    }

    /// Data fed to the widget template at render time.
    fn tpl_data(&self, _ui: &Ui) -> TplData {
        self.core().base_tpl_data()
    }

    /// Runs after the root node exists but before markup is applied.
    /// Must be idempotent; re-renders call it again.
    fn before_render(&mut self, _ui: &mut Ui) {}

    /// Event bindings this widget wants on its root node.
    fn declared_events(&self) -> Vec<(EventType, Action)> {
        Vec::new()
    }

    /// Runs once the root is in the tree with markup and bindings applied.
    fn after_render(&mut self, _ui: &mut Ui) -> Result<()> {
        Ok(())
    }

    /// Runs at the start of [`View::destroy`], while the widget's state is
    /// still intact.
    fn before_destroy(&mut self, _ui: &mut Ui) {}

    fn id(&self) -> WidgetId {
        self.core().id()
    }

    fn root(&self) -> Option<NodeId> {
        self.core().root()
    }

    fn rendered(&self) -> bool {
        self.core().rendered()
    }

    /// Render the widget into `parent`, falling back to the configured
    /// `render_to` target. A widget owns exactly one root node: rendering
    /// again tears the previous root and its bindings down first.
    fn render(&mut self, ui: &mut Ui, parent: Option<NodeId>) -> Result<NodeId> {
        let target = parent
            .or(self.core().render_to())
            .ok_or(WidgetError::Configuration {
                widget: self.core().kind(),
                option: "render_to",
            })?;

        let id = self.id();
        if self.core().rendered() {
            ui.bindings.unbind_owner(id);
            if let Some(old) = self.core_mut().take_root() {
                ui.dom.remove(old);
            }
        }

        let root = ui.dom.create_element(self.core().tag_name());
        self.core_mut().set_root(root);
        let class_name = self.core().class_name().to_owned();
        for class in class_name.split_whitespace() {
            ui.dom.add_class(root, class);
        }
        if let Some(name) = self.core().name().map(str::to_owned) {
            ui.dom.set_attr(root, "id", &name);
        }

        self.before_render(ui);

        let markup = self.core().template().render(&self.tpl_data(ui));
        ui.dom.set_markup(root, &markup);
        ui.dom.append(target, root);

        self.delegate_events(ui, &[]);

        self.core_mut().set_rendered(true);
        ui.set_widget_root(id, root);
        if let Some(kind) = self.registry_kind() {
            let name = self.core().name().map(str::to_owned);
            ui.registry_mut(kind).register(id, name.as_deref());
        }

        self.after_render(ui)?;
        debug!(kind = self.core().kind(), ?id, "widget rendered");
        Ok(root)
    }

    /// Rebind this widget's events: the declared set plus `extra`, merged
    /// by event type with later entries winning. Existing bindings owned by
    /// the widget are dropped first, so calling this repeatedly never
    /// stacks duplicates.
    fn delegate_events(&mut self, ui: &mut Ui, extra: &[(EventType, Action)]) {
        let id = self.id();
        let Some(root) = self.core().root() else {
            return;
        };
        ui.bindings.unbind_owner(id);
        let mut merged: IndexMap<EventType, Action> = IndexMap::new();
        for (event_type, action) in self.declared_events() {
            merged.insert(event_type, action);
        }
        for (event_type, action) in extra {
            merged.insert(*event_type, *action);
        }
        for (event_type, action) in merged {
            ui.bindings.bind(root, event_type, id, action);
        }
    }

    /// Tear the widget down: hooks first, then every trace in the context.
    /// Safe to call on a widget that never rendered.
    fn destroy(&mut self, ui: &mut Ui) {
        self.before_destroy(ui);
        debug!(kind = self.core().kind(), id = ?self.id(), "widget destroyed");
        ui.dismantle(self.id());
        let core = self.core_mut();
        core.take_root();
        core.set_rendered(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Label {
        core: ViewCore,
    }

    impl Label {
        fn new(ui: &mut Ui, text: &str) -> Self {
            let mut core = ViewCore::new(ui, "label", "span", "label", Template::new("{text}"));
            core.set_name(Some(text.to_owned()));
            Self { core }
        }
    }

    impl View for Label {
        fn core(&self) -> &ViewCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut ViewCore {
            &mut self.core
        }
    }

    #[test]
    fn test_render_requires_a_target() {
        let mut ui = Ui::new();
        let mut label = Label::new(&mut ui, "hi");
        let err = label.render(&mut ui, None).unwrap_err();
        assert!(matches!(err, WidgetError::Configuration { option: "render_to", .. }));
    }

    #[test]
    fn test_rerender_replaces_the_old_root() {
        let mut ui = Ui::new();
        let body = ui.dom.body();
        let mut label = Label::new(&mut ui, "hi");
        let first = label.render(&mut ui, Some(body)).unwrap();
        let second = label.render(&mut ui, Some(body)).unwrap();
        assert_ne!(first, second);
        assert!(!ui.dom.contains(first));
        assert!(ui.dom.contains(second));
        assert_eq!(ui.widget_root(label.id()), Some(second));
    }

    #[test]
    fn test_destroy_without_render_is_safe() {
        let mut ui = Ui::new();
        let mut label = Label::new(&mut ui, "hi");
        let id = label.id();
        label.destroy(&mut ui);
        assert!(!ui.arena.is_live(id));
    }
}
