//! Dropdown menus.
//!
//! A menu renders under the document body and floats next to whatever
//! anchors it. Items are plain config entries; checkable items carry their
//! own [`Toggle`].

use tracing::trace;

use trellis_core::{Result, Toggle};
use trellis_dom::{event_types, Action, Event, NodeId, Template, TplData};

use crate::overlay::{register_overlay, Overlayable};
use crate::ui::{RegistryKind, Ui};
use crate::view::{View, ViewCore};

const ITEM_TPL: &str = "<a class=\"menu-link\">{text}</a>";
const ITEM_HEIGHT: f32 = 26.0;

#[derive(Debug, Clone)]
pub struct MenuItemConfig {
    pub text: String,
    /// `Some` makes the item checkable, with the given initial state.
    pub checked: Option<bool>,
    pub disabled: bool,
}

impl MenuItemConfig {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            checked: None,
            disabled: false,
        }
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

pub struct MenuItem {
    config: MenuItemConfig,
    node: Option<NodeId>,
    toggle: Option<Toggle>,
}

impl MenuItem {
    fn new(config: MenuItemConfig) -> Self {
        Self {
            toggle: config.checked.map(Toggle::new),
            config,
            node: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.config.text
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// `None` for plain items.
    pub fn is_checked(&self) -> Option<bool> {
        self.toggle.as_ref().map(Toggle::is_pressed)
    }

    pub fn is_disabled(&self) -> bool {
        self.config.disabled
    }
}

#[derive(Debug, Clone)]
pub struct MenuConfig {
    pub items: Vec<MenuItemConfig>,
    pub name: Option<String>,
    pub class_name: String,
    /// Allow event-driven opening with zero items.
    pub show_empty: bool,
    pub width: f32,
    /// Zero means derive from the item count.
    pub height: f32,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            name: None,
            class_name: "dropdown-menu".into(),
            show_empty: false,
            width: 160.0,
            height: 0.0,
        }
    }
}

impl MenuConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(mut self, item: MenuItemConfig) -> Self {
        self.items.push(item);
        self
    }

    pub fn items(mut self, items: impl IntoIterator<Item = MenuItemConfig>) -> Self {
        self.items.extend(items);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn show_empty(mut self, show_empty: bool) -> Self {
        self.show_empty = show_empty;
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }
}

pub struct Menu {
    core: ViewCore,
    config: MenuConfig,
    items: Vec<MenuItem>,
    item_handler: Option<Box<dyn FnMut(usize, Option<bool>) + Send>>,
}

impl Menu {
    pub fn new(ui: &mut Ui, config: MenuConfig) -> Self {
        let mut core = ViewCore::new(
            ui,
            "menu",
            "ul",
            config.class_name.clone(),
            Template::new(""),
        );
        core.set_name(config.name.clone());
        // Floating widgets mount under the document body.
        let body = ui.dom.body();
        core.set_render_to(Some(body));
        let items = config.items.iter().cloned().map(MenuItem::new).collect();
        Self {
            core,
            config,
            items,
            item_handler: None,
        }
    }

    /// Install the item handler, fired with the item index and its checked
    /// state after a click.
    pub fn on_item_click(
        mut self,
        handler: impl FnMut(usize, Option<bool>) + Send + 'static,
    ) -> Self {
        self.item_handler = Some(Box::new(handler));
        self
    }

    pub fn item(&self, index: usize) -> Option<&MenuItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an item at runtime. Re-renders the item nodes when the menu
    /// is already in the tree.
    pub fn add_item(&mut self, ui: &mut Ui, item: MenuItemConfig) -> Result<()> {
        self.items.push(MenuItem::new(item));
        if self.core.rendered() {
            let target = ui.dom.parent(self.core.root().unwrap_or(ui.dom.body()));
            self.render(ui, target)?;
        }
        Ok(())
    }

    fn item_index_at(&self, ui: &Ui, target: NodeId) -> Option<usize> {
        self.items.iter().position(|item| {
            item.node
                .is_some_and(|node| ui.dom.is_within(target, node))
        })
    }

    pub fn handle_action(&mut self, ui: &mut Ui, action: Action, event: &mut Event) {
        if action != "onItemClick" {
            return;
        }
        let Some(index) = self.item_index_at(ui, event.target) else {
            return;
        };
        let item = &mut self.items[index];
        if item.config.disabled {
            return;
        }
        let mut checked = None;
        if let Some(toggle) = item.toggle.as_mut() {
            if let Some(state) = toggle.toggle(None) {
                if let Some(node) = item.node {
                    ui.dom.toggle_class(node, "checked", state);
                }
            }
            checked = Some(toggle.is_pressed());
        }
        trace!(index, ?checked, "menu item clicked");
        if let Some(handler) = self.item_handler.as_mut() {
            handler(index, checked);
        }
    }

    fn placement_size(&self) -> (f32, f32) {
        let height = if self.config.height > 0.0 {
            self.config.height
        } else {
            self.items.len() as f32 * ITEM_HEIGHT
        };
        (self.config.width, height)
    }
}

impl View for Menu {
    fn core(&self) -> &ViewCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ViewCore {
        &mut self.core
    }

    fn registry_kind(&self) -> Option<RegistryKind> {
        Some(RegistryKind::Overlays)
    }

    fn after_render(&mut self, ui: &mut Ui) -> Result<()> {
        let id = self.id();
        let Some(root) = self.core.root() else {
            return Ok(());
        };
        let item_tpl = Template::new(ITEM_TPL);
        for item in &mut self.items {
            let node = ui.dom.create_element("li");
            ui.dom.add_class(node, "menu-item");
            if item.config.disabled {
                ui.dom.add_class(node, "disabled");
            }
            if item.is_checked() == Some(true) {
                ui.dom.add_class(node, "checked");
            }
            let mut data = TplData::new();
            data.set("text", item.config.text.as_str());
            ui.dom.set_markup(node, &item_tpl.render(&data));
            ui.dom.append(root, node);
            if !item.config.disabled {
                ui.bindings.bind(node, event_types::CLICK, id, "onItemClick");
            }
            item.node = Some(node);
        }
        let size = self.placement_size();
        register_overlay(ui, id, root, self.items.len(), self.config.show_empty, size);
        Ok(())
    }
}

impl Overlayable for Menu {
    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn show_empty(&self) -> bool {
        self.config.show_empty
    }
}
