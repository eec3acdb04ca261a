//! Push and toggle buttons, with optional attached menus.

use tracing::{debug, trace, warn};

use trellis_core::{Toggle, WidgetId, WidgetRef};
use trellis_dom::{event_types, Action, Event, EventType, NodeId, Template, TplData};

use crate::overlay::Alignment;
use crate::ui::{RegistryKind, Ui};
use crate::view::{View, ViewCore};

const BUTTON_TPL: &str = "{text}{?menu} <span class=\"caret\"></span>{/menu}";

/// Button configuration. All options have working defaults; build one with
/// [`ButtonConfig::new`] and chain the setters you need.
#[derive(Debug, Clone)]
pub struct ButtonConfig {
    pub text: String,
    pub name: Option<String>,
    pub render_to: Option<NodeId>,
    pub class_name: String,
    pub pressed_class: String,
    pub disabled: bool,
    pub pressed: bool,
    /// Let user clicks drive the pressed state. Programmatic
    /// [`Button::toggle`] works either way.
    pub enable_toggle: bool,
    /// Whether a click on a pressed toggle button may unpress it.
    pub allow_depress: bool,
    /// Event type that activates the button.
    pub click_event: EventType,
    pub href: Option<String>,
    pub prevent_default: bool,
    /// Destroy a replaced or orphaned menu instead of just detaching it.
    pub destroy_menu: bool,
    pub menu_align: Alignment,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            name: None,
            render_to: None,
            class_name: "btn btn-default".into(),
            pressed_class: "active".into(),
            disabled: false,
            pressed: false,
            enable_toggle: false,
            allow_depress: true,
            click_event: event_types::CLICK,
            href: None,
            prevent_default: false,
            destroy_menu: true,
            menu_align: Alignment::default(),
        }
    }
}

impl ButtonConfig {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn render_to(mut self, target: NodeId) -> Self {
        self.render_to = Some(target);
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn pressed(mut self, pressed: bool) -> Self {
        self.pressed = pressed;
        self
    }

    pub fn enable_toggle(mut self, enable: bool) -> Self {
        self.enable_toggle = enable;
        self
    }

    pub fn allow_depress(mut self, allow: bool) -> Self {
        self.allow_depress = allow;
        self
    }

    pub fn click_event(mut self, event_type: EventType) -> Self {
        self.click_event = event_type;
        self
    }

    pub fn href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn prevent_default(mut self, prevent: bool) -> Self {
        self.prevent_default = prevent;
        self
    }

    pub fn destroy_menu(mut self, destroy: bool) -> Self {
        self.destroy_menu = destroy;
        self
    }

    pub fn menu_align(mut self, align: Alignment) -> Self {
        self.menu_align = align;
        self
    }
}

pub struct Button {
    core: ViewCore,
    config: ButtonConfig,
    toggle: Toggle,
    handler: Option<Box<dyn FnMut(&Event) + Send>>,
    toggle_handler: Option<Box<dyn FnMut(bool) + Send>>,
}

impl Button {
    pub fn new(ui: &mut Ui, config: ButtonConfig) -> Self {
        let mut core = ViewCore::new(
            ui,
            "button",
            "button",
            config.class_name.clone(),
            Template::new(BUTTON_TPL),
        );
        core.set_name(config.name.clone());
        core.set_render_to(config.render_to);
        core.set_disabled(config.disabled);
        Self {
            core,
            toggle: Toggle::new(config.pressed),
            config,
            handler: None,
            toggle_handler: None,
        }
    }

    /// Install the click handler, fired after toggle and menu handling.
    pub fn on_click(mut self, handler: impl FnMut(&Event) + Send + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Install the toggle handler, fired on every unsuppressed state change.
    pub fn on_toggle(mut self, handler: impl FnMut(bool) + Send + 'static) -> Self {
        self.toggle_handler = Some(Box::new(handler));
        self
    }

    pub fn text(&self) -> &str {
        &self.config.text
    }

    pub fn set_text(&mut self, ui: &mut Ui, text: impl Into<String>) {
        self.config.text = text.into();
        if let Some(root) = self.core.root() {
            let markup = self.core.template().render(&self.tpl_data(ui));
            ui.dom.set_markup(root, &markup);
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.toggle.is_pressed()
    }

    pub fn is_disabled(&self) -> bool {
        self.config.disabled
    }

    pub fn set_disabled(&mut self, ui: &mut Ui, disabled: bool) {
        self.config.disabled = disabled;
        self.core.set_disabled(disabled);
        if let Some(root) = self.core.root() {
            if disabled {
                ui.dom.set_attr(root, "disabled", "disabled");
            } else {
                ui.dom.remove_attr(root, "disabled");
            }
        }
    }

    /// Flip or force the pressed state. This path is unconditional: it
    /// works on non-toggle and disabled buttons alike. A no-op transition
    /// notifies nobody, and `suppress_event` silences the handler for real
    /// transitions too.
    pub fn toggle(&mut self, ui: &mut Ui, state: Option<bool>, suppress_event: bool) -> bool {
        if let Some(pressed) = self.toggle.toggle(state) {
            if let Some(root) = self.core.root() {
                ui.dom.toggle_class(root, &self.config.pressed_class, pressed);
            }
            if !suppress_event {
                trace!(id = ?self.id(), pressed, "button toggled");
                if let Some(handler) = self.toggle_handler.as_mut() {
                    handler(pressed);
                }
            }
        }
        self.toggle.is_pressed()
    }

    /// Attach, replace or clear this button's menu.
    ///
    /// The previous menu, if any, is detached and destroyed according to
    /// `destroy_old` (falling back to the `destroy_menu` config). Returns
    /// the previous menu's id when one was attached.
    pub fn set_menu(
        &mut self,
        ui: &mut Ui,
        menu: Option<WidgetRef<'_>>,
        destroy_old: Option<bool>,
    ) -> Option<WidgetId> {
        let id = self.id();
        let previous = ui.ownership.unlink(id);
        if let Some(prev) = previous {
            if destroy_old.unwrap_or(self.config.destroy_menu) {
                debug!(menu = ?prev, "destroying replaced menu");
                ui.dismantle(prev);
            }
        }
        if let Some(menu_ref) = menu {
            match ui.resolve_overlay(menu_ref) {
                Some(menu_id) => {
                    ui.ownership.link(id, menu_id);
                }
                None => warn!("menu reference did not resolve, button left without a menu"),
            }
        }
        previous
    }

    pub fn menu(&self, ui: &Ui) -> Option<WidgetId> {
        ui.ownership.overlay_of(self.id())
    }

    pub fn has_visible_menu(&self, ui: &Ui) -> bool {
        self.menu(ui).is_some_and(|menu| ui.is_overlay_visible(menu))
    }

    /// Open the attached menu below the button. `from_event` applies the
    /// empty-menu suppression rule.
    pub fn show_menu(&mut self, ui: &mut Ui, from_event: bool) -> bool {
        let Some(menu) = self.menu(ui) else {
            return false;
        };
        let Some(anchor) = self.core.root() else {
            return false;
        };
        ui.show_overlay(menu, anchor, self.config.menu_align, from_event)
    }

    pub fn hide_menu(&mut self, ui: &mut Ui) -> bool {
        match self.menu(ui) {
            Some(menu) => ui.hide_overlay(menu),
            None => false,
        }
    }

    /// Entry point for routed actions owned by this button.
    pub fn handle_action(&mut self, ui: &mut Ui, action: Action, event: &mut Event) {
        match action {
            "onClick" => self.on_click_event(ui, event),
            "onMouseDown" => self.on_mouse_down(ui, event),
            "onMouseUp" => self.on_mouse_up(ui, event),
            _ => {}
        }
    }

    fn on_click_event(&mut self, ui: &mut Ui, event: &mut Event) {
        self.do_prevent_default(event);
        // Alternative pointer buttons never activate.
        if event.button().is_some_and(|b| b != 0) {
            return;
        }
        if self.config.disabled {
            return;
        }
        self.do_toggle(ui);
        if self.has_visible_menu(ui) {
            // Second click on an open trigger closes the menu.
            self.hide_menu(ui);
        } else if self.menu(ui).is_some() {
            self.show_menu(ui, true);
        }
        if let Some(handler) = self.handler.as_mut() {
            handler(event);
        }
    }

    fn do_prevent_default(&self, event: &mut Event) {
        if self.config.prevent_default || (self.config.disabled && self.config.href.is_some()) {
            event.prevent_default();
        }
    }

    fn do_toggle(&mut self, ui: &mut Ui) {
        if self.config.enable_toggle && (self.config.allow_depress || !self.toggle.is_pressed()) {
            self.toggle(ui, None, false);
        }
    }

    fn on_mouse_down(&mut self, ui: &mut Ui, _event: &mut Event) {
        if self.config.disabled {
            return;
        }
        if let Some(root) = self.core.root() {
            ui.dom.add_class(root, &self.config.pressed_class);
        }
        // The pointer can be released anywhere, so the matching mouseup is
        // a document-level binding.
        let id = self.id();
        ui.bindings.unbind_document(event_types::MOUSE_UP, id);
        ui.bindings.bind_document(event_types::MOUSE_UP, id, "onMouseUp");
    }

    fn on_mouse_up(&mut self, ui: &mut Ui, _event: &mut Event) {
        if !self.toggle.is_pressed() {
            if let Some(root) = self.core.root() {
                ui.dom.remove_class(root, &self.config.pressed_class);
            }
        }
        ui.bindings.unbind_document(event_types::MOUSE_UP, self.id());
    }
}

impl View for Button {
    fn core(&self) -> &ViewCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ViewCore {
        &mut self.core
    }

    fn registry_kind(&self) -> Option<RegistryKind> {
        Some(RegistryKind::Buttons)
    }

    fn tpl_data(&self, ui: &Ui) -> TplData {
        let mut data = TplData::new();
        data.set("text", self.config.text.as_str())
            .set("menu", self.menu(ui).is_some())
            .merge_missing(self.core.base_tpl_data());
        data
    }

    fn before_render(&mut self, ui: &mut Ui) {
        let Some(root) = self.core.root() else {
            return;
        };
        if self.config.disabled {
            ui.dom.set_attr(root, "disabled", "disabled");
        }
        if let Some(href) = self.config.href.as_deref() {
            ui.dom.set_attr(root, "href", href);
        }
        if self.toggle.is_pressed() {
            ui.dom.add_class(root, &self.config.pressed_class);
        }
    }

    fn declared_events(&self) -> Vec<(EventType, Action)> {
        vec![
            (event_types::MOUSE_DOWN, "onMouseDown"),
            (self.config.click_event, "onClick"),
        ]
    }

    fn before_destroy(&mut self, ui: &mut Ui) {
        if let Some(menu) = self.menu(ui) {
            if self.config.destroy_menu {
                debug!(?menu, "destroying owned menu with its button");
                ui.dismantle(menu);
            } else {
                ui.ownership.unlink(self.id());
            }
        }
    }
}
