//! Panels: titled containers that hold fields and footer buttons, with an
//! optional collapsible body. The field side of a panel doubles as a form
//! through [`Panel::form`].

use tracing::debug;

use trellis_core::{Result, WidgetId};
use trellis_dom::{event_types, Action, Bounds, Event, NodeId, Template, TplData};

use crate::button::{Button, ButtonConfig};
use crate::field::{
    DateField, DateFieldConfig, DateTimeField, DateTimeFieldConfig, NumberField,
    NumberFieldConfig, RadioGroup, RadioGroupConfig, TextField, TextFieldConfig, ValuePipeline,
};
use crate::ui::Ui;
use crate::view::{View, ViewCore};

/// Declarative description of a panel child.
#[derive(Debug, Clone)]
pub enum ItemConfig {
    Text(TextFieldConfig),
    Number(NumberFieldConfig),
    Date(DateFieldConfig),
    DateTime(DateTimeFieldConfig),
    Radio(RadioGroupConfig),
    FieldSet(FieldSetConfig),
}

#[derive(Debug, Clone)]
pub struct FieldSetConfig {
    pub title: String,
    pub items: Vec<ItemConfig>,
    pub class_name: String,
}

impl FieldSetConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
            class_name: "fieldset".into(),
        }
    }

    pub fn item(mut self, item: ItemConfig) -> Self {
        self.items.push(item);
        self
    }
}

/// A built panel child.
pub enum Item {
    Text(TextField),
    Number(NumberField),
    Date(DateField),
    DateTime(DateTimeField),
    Radio(RadioGroup),
    FieldSet(FieldSet),
}

impl Item {
    fn build(ui: &mut Ui, config: ItemConfig) -> Item {
        match config {
            ItemConfig::Text(c) => Item::Text(TextField::new(ui, c)),
            ItemConfig::Number(c) => Item::Number(NumberField::new(ui, c)),
            ItemConfig::Date(c) => Item::Date(DateField::new(ui, c)),
            ItemConfig::DateTime(c) => Item::DateTime(DateTimeField::new(ui, c)),
            ItemConfig::Radio(c) => Item::Radio(RadioGroup::new(ui, c)),
            ItemConfig::FieldSet(c) => Item::FieldSet(FieldSet::new(ui, c)),
        }
    }

    pub fn as_view(&self) -> &dyn View {
        match self {
            Item::Text(f) => f,
            Item::Number(f) => f,
            Item::Date(f) => f,
            Item::DateTime(f) => f,
            Item::Radio(f) => f,
            Item::FieldSet(f) => f,
        }
    }

    pub fn as_view_mut(&mut self) -> &mut dyn View {
        match self {
            Item::Text(f) => f,
            Item::Number(f) => f,
            Item::Date(f) => f,
            Item::DateTime(f) => f,
            Item::Radio(f) => f,
            Item::FieldSet(f) => f,
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Item::Text(f) => f.is_valid(),
            Item::Number(f) => f.is_valid(),
            Item::Date(f) => f.is_valid(),
            Item::DateTime(f) => f.is_valid(),
            Item::Radio(f) => f.is_valid(),
            Item::FieldSet(f) => f.items.iter().all(Item::is_valid),
        }
    }

    pub fn reset(&mut self, ui: &mut Ui) {
        match self {
            Item::Text(f) => f.reset(ui),
            Item::Number(f) => f.reset(ui),
            Item::Date(f) => f.reset(ui),
            Item::DateTime(f) => f.reset(ui),
            Item::Radio(f) => f.reset(ui),
            Item::FieldSet(f) => {
                for item in &mut f.items {
                    item.reset(ui);
                }
            }
        }
    }

    fn collect_submit(&self, out: &mut Vec<(String, String)>) {
        match self {
            Item::Text(f) => out.push((f.name().to_owned(), f.get_submit_value())),
            Item::Number(f) => out.push((f.name().to_owned(), f.get_submit_value())),
            Item::Date(f) => out.push((f.name().to_owned(), f.get_submit_value())),
            Item::DateTime(f) => out.push((f.name().to_owned(), f.get_submit_value())),
            Item::Radio(f) => out.push((f.name().to_owned(), f.get_submit_value())),
            Item::FieldSet(f) => {
                for item in &f.items {
                    item.collect_submit(out);
                }
            }
        }
    }

    /// Forward a routed action to whichever widget in this subtree owns
    /// it. Returns whether anything claimed the action.
    pub fn route_action(
        &mut self,
        ui: &mut Ui,
        owner: WidgetId,
        action: Action,
        event: &mut Event,
    ) -> bool {
        match self {
            Item::Text(f) if f.id() == owner => f.handle_action(ui, action, event),
            Item::Number(f) if f.id() == owner => f.handle_action(ui, action, event),
            Item::Radio(f) if f.id() == owner => f.handle_action(ui, action, event),
            Item::Date(f) => {
                if f.id() == owner {
                    f.handle_action(ui, action, event);
                } else if f.picker_id() == Some(owner) {
                    f.handle_picker_action(ui, action, event);
                } else {
                    return false;
                }
            }
            Item::DateTime(f) => {
                if f.id() == owner {
                    f.handle_action(ui, action, event);
                } else if f.picker_id() == Some(owner) {
                    f.handle_picker_action(ui, action, event);
                } else {
                    return false;
                }
            }
            Item::FieldSet(f) => {
                return f
                    .items
                    .iter_mut()
                    .any(|item| item.route_action(ui, owner, action, event));
            }
            _ => return false,
        }
        true
    }
}

/// A titled group of fields inside a panel.
pub struct FieldSet {
    core: ViewCore,
    title: String,
    items: Vec<Item>,
}

impl FieldSet {
    pub fn new(ui: &mut Ui, config: FieldSetConfig) -> Self {
        let core = ViewCore::new(
            ui,
            "fieldset",
            "fieldset",
            config.class_name.clone(),
            Template::new("<legend>{title}</legend>"),
        );
        let items = config
            .items
            .into_iter()
            .map(|item| Item::build(ui, item))
            .collect();
        Self {
            core,
            title: config.title,
            items,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item_mut(&mut self, index: usize) -> Option<&mut Item> {
        self.items.get_mut(index)
    }
}

impl View for FieldSet {
    fn core(&self) -> &ViewCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ViewCore {
        &mut self.core
    }

    fn tpl_data(&self, _ui: &Ui) -> TplData {
        let mut data = TplData::new();
        data.set("title", self.title.as_str())
            .merge_missing(self.core.base_tpl_data());
        data
    }

    fn after_render(&mut self, ui: &mut Ui) -> Result<()> {
        let Some(root) = self.core.root() else {
            return Ok(());
        };
        for item in &mut self.items {
            item.as_view_mut().render(ui, Some(root))?;
        }
        Ok(())
    }

    fn before_destroy(&mut self, ui: &mut Ui) {
        for item in &mut self.items {
            item.as_view_mut().destroy(ui);
        }
    }
}

#[derive(Debug, Clone)]
pub struct PanelConfig {
    pub title: Option<String>,
    pub width: Option<f32>,
    pub collapsible: bool,
    pub items: Vec<ItemConfig>,
    pub buttons: Vec<ButtonConfig>,
    pub name: Option<String>,
    pub render_to: Option<NodeId>,
    pub class_name: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            title: None,
            width: None,
            collapsible: false,
            items: Vec::new(),
            buttons: Vec::new(),
            name: None,
            render_to: None,
            class_name: "panel panel-default".into(),
        }
    }
}

impl PanelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn collapsible(mut self, collapsible: bool) -> Self {
        self.collapsible = collapsible;
        self
    }

    pub fn item(mut self, item: ItemConfig) -> Self {
        self.items.push(item);
        self
    }

    pub fn button(mut self, button: ButtonConfig) -> Self {
        self.buttons.push(button);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn render_to(mut self, target: NodeId) -> Self {
        self.render_to = Some(target);
        self
    }
}

pub struct Panel {
    core: ViewCore,
    title: Option<String>,
    width: Option<f32>,
    collapsible: bool,
    collapsed: bool,
    items: Vec<Item>,
    buttons: Vec<Button>,
    header: Option<NodeId>,
    body: Option<NodeId>,
    footer: Option<NodeId>,
}

impl Panel {
    pub fn new(ui: &mut Ui, config: PanelConfig) -> Self {
        let mut core = ViewCore::new(
            ui,
            "panel",
            "div",
            config.class_name.clone(),
            Template::new(""),
        );
        core.set_name(config.name.clone());
        core.set_render_to(config.render_to);
        let items = config
            .items
            .into_iter()
            .map(|item| Item::build(ui, item))
            .collect();
        let buttons = config
            .buttons
            .into_iter()
            .map(|button| Button::new(ui, button))
            .collect();
        Self {
            core,
            title: config.title,
            width: config.width,
            collapsible: config.collapsible,
            collapsed: false,
            items,
            buttons,
            header: None,
            body: None,
            footer: None,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item_mut(&mut self, index: usize) -> Option<&mut Item> {
        self.items.get_mut(index)
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    pub fn button_mut(&mut self, index: usize) -> Option<&mut Button> {
        self.buttons.get_mut(index)
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Fold or unfold the body. Children stay rendered; only the body node
    /// is marked collapsed.
    pub fn toggle_collapse(&mut self, ui: &mut Ui) {
        self.collapsed = !self.collapsed;
        if let Some(body) = self.body {
            ui.dom.toggle_class(body, "collapse", self.collapsed);
        }
        debug!(collapsed = self.collapsed, "panel collapse toggled");
    }

    /// The form surface over this panel's fields.
    pub fn form(&mut self) -> Form<'_> {
        Form { items: &mut self.items }
    }

    /// Forward a routed action to the panel, one of its fields, a field's
    /// picker or a footer button. Returns whether anything claimed it.
    pub fn route_action(
        &mut self,
        ui: &mut Ui,
        owner: WidgetId,
        action: Action,
        event: &mut Event,
    ) -> bool {
        if owner == self.id() {
            self.handle_action(ui, action, event);
            return true;
        }
        if let Some(button) = self.buttons.iter_mut().find(|b| b.id() == owner) {
            button.handle_action(ui, action, event);
            return true;
        }
        self.items
            .iter_mut()
            .any(|item| item.route_action(ui, owner, action, event))
    }

    pub fn handle_action(&mut self, ui: &mut Ui, action: Action, _event: &mut Event) {
        if action == "onHeaderClick" && self.collapsible {
            self.toggle_collapse(ui);
        }
    }
}

impl View for Panel {
    fn core(&self) -> &ViewCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ViewCore {
        &mut self.core
    }

    fn after_render(&mut self, ui: &mut Ui) -> Result<()> {
        let id = self.id();
        let Some(root) = self.core.root() else {
            return Ok(());
        };
        if let Some(width) = self.width {
            let bounds = ui.dom.bounds(root);
            ui.dom
                .set_bounds(root, Bounds::new(bounds.x, bounds.y, width, bounds.height));
        }
        if let Some(title) = self.title.clone() {
            let header = ui.dom.create_element("div");
            ui.dom.add_class(header, "panel-heading");
            ui.dom.set_markup(header, &title);
            ui.dom.append(root, header);
            if self.collapsible {
                ui.bindings
                    .bind(header, event_types::CLICK, id, "onHeaderClick");
            }
            self.header = Some(header);
        }

        let body = ui.dom.create_element("div");
        ui.dom.add_class(body, "panel-body");
        ui.dom.append(root, body);
        self.body = Some(body);
        for item in &mut self.items {
            item.as_view_mut().render(ui, Some(body))?;
        }

        if !self.buttons.is_empty() {
            let footer = ui.dom.create_element("div");
            ui.dom.add_class(footer, "panel-footer");
            ui.dom.append(root, footer);
            self.footer = Some(footer);
            for button in &mut self.buttons {
                button.render(ui, Some(footer))?;
            }
        }
        Ok(())
    }

    fn before_destroy(&mut self, ui: &mut Ui) {
        for item in &mut self.items {
            item.as_view_mut().destroy(ui);
        }
        for button in &mut self.buttons {
            button.destroy(ui);
        }
    }
}

/// Form operations over a panel's fields.
pub struct Form<'a> {
    items: &'a mut Vec<Item>,
}

impl Form<'_> {
    pub fn is_valid(&self) -> bool {
        self.items.iter().all(Item::is_valid)
    }

    /// Put every field back to its configured value.
    pub fn reset(&mut self, ui: &mut Ui) {
        for item in self.items.iter_mut() {
            item.reset(ui);
        }
    }

    /// Name/value pairs for submission, in declaration order, field sets
    /// flattened.
    pub fn submit_values(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for item in self.items.iter() {
            item.collect_submit(&mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{DateFieldConfig, NumberFieldConfig, TextFieldConfig};

    fn sample_panel(ui: &mut Ui) -> Panel {
        Panel::new(
            ui,
            PanelConfig::new()
                .title("Booking")
                .collapsible(true)
                .item(ItemConfig::Text(
                    TextFieldConfig::new("guest").allow_blank(false),
                ))
                .item(ItemConfig::FieldSet(
                    FieldSetConfig::new("Details")
                        .item(ItemConfig::Number(NumberFieldConfig::new("nights")))
                        .item(ItemConfig::Date(
                            DateFieldConfig::new("arrival").value(1402689600000i64),
                        )),
                ))
                .button(ButtonConfig::new("Submit")),
        )
    }

    #[test]
    fn test_panel_renders_fields_and_footer_buttons() {
        let mut ui = Ui::new();
        let body = ui.dom.body();
        let mut panel = sample_panel(&mut ui);
        panel.render(&mut ui, Some(body)).unwrap();

        assert_eq!(ui.fields.len(), 3);
        assert_eq!(ui.buttons.len(), 1);
    }

    #[test]
    fn test_header_click_collapses_the_body() {
        let mut ui = Ui::new();
        let body = ui.dom.body();
        let mut panel = sample_panel(&mut ui);
        panel.render(&mut ui, Some(body)).unwrap();
        let header = panel.header.unwrap();

        let mut event = Event::pointer(event_types::CLICK, header, 0.0, 0.0, 0);
        assert!(panel.route_action(&mut ui, panel.id(), "onHeaderClick", &mut event));
        assert!(panel.is_collapsed());
        assert!(ui.dom.has_class(panel.body.unwrap(), "collapse"));
    }

    #[test]
    fn test_form_validity_and_submit_values() {
        let mut ui = Ui::new();
        let body = ui.dom.body();
        let mut panel = sample_panel(&mut ui);
        panel.render(&mut ui, Some(body)).unwrap();

        // The guest field rejects blanks.
        assert!(!panel.form().is_valid());
        if let Some(Item::Text(field)) = panel.item_mut(0) {
            field.set_value(&mut ui, Some("lin".into()));
        }
        assert!(panel.form().is_valid());

        let values = panel.form().submit_values();
        assert_eq!(
            values,
            vec![
                ("guest".to_owned(), "lin".to_owned()),
                ("nights".to_owned(), String::new()),
                ("arrival".to_owned(), "06/13/2014".to_owned()),
            ]
        );
    }

    #[test]
    fn test_form_reset_restores_configured_values() {
        let mut ui = Ui::new();
        let body = ui.dom.body();
        let mut panel = sample_panel(&mut ui);
        panel.render(&mut ui, Some(body)).unwrap();

        if let Some(Item::Text(field)) = panel.item_mut(0) {
            field.set_value(&mut ui, Some("lin".into()));
        }
        panel.form().reset(&mut ui);
        if let Some(Item::Text(field)) = panel.item_mut(0) {
            assert_eq!(field.value(), None);
        }
    }

    #[test]
    fn test_destroy_takes_every_child_down() {
        let mut ui = Ui::new();
        let body = ui.dom.body();
        let mut panel = sample_panel(&mut ui);
        panel.render(&mut ui, Some(body)).unwrap();
        panel.destroy(&mut ui);

        assert!(ui.fields.is_empty());
        assert!(ui.buttons.is_empty());
        assert!(ui.bindings.is_empty());
        assert_eq!(ui.arena.len(), 0);
    }
}
