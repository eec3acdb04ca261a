//! Plain text input.

use trellis_dom::{event_types, Action, Event, EventType, NodeId, Template, TplData};

use crate::field::{read_raw, write_raw, ValuePipeline, FIELD_TPL};
use crate::ui::{RegistryKind, Ui};
use crate::view::{View, ViewCore};

#[derive(Debug, Clone)]
pub struct TextFieldConfig {
    /// Submit name of the field.
    pub name: String,
    pub field_label: Option<String>,
    pub value: Option<String>,
    pub allow_blank: bool,
    pub empty_text: Option<String>,
    pub id: Option<String>,
    pub render_to: Option<NodeId>,
    pub class_name: String,
    pub disabled: bool,
}

impl TextFieldConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_label: None,
            value: None,
            allow_blank: true,
            empty_text: None,
            id: None,
            render_to: None,
            class_name: "form-group".into(),
            disabled: false,
        }
    }

    pub fn field_label(mut self, label: impl Into<String>) -> Self {
        self.field_label = Some(label.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn allow_blank(mut self, allow_blank: bool) -> Self {
        self.allow_blank = allow_blank;
        self
    }

    pub fn empty_text(mut self, empty_text: impl Into<String>) -> Self {
        self.empty_text = Some(empty_text.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn render_to(mut self, target: NodeId) -> Self {
        self.render_to = Some(target);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

pub struct TextField {
    core: ViewCore,
    config: TextFieldConfig,
    value: Option<String>,
    initial: Option<String>,
}

impl TextField {
    pub fn new(ui: &mut Ui, config: TextFieldConfig) -> Self {
        let mut core = ViewCore::new(
            ui,
            "textfield",
            "div",
            config.class_name.clone(),
            Template::new(FIELD_TPL),
        );
        core.set_name(config.id.clone());
        core.set_render_to(config.render_to);
        core.set_disabled(config.disabled);
        let value = config.value.clone().filter(|v| !v.is_empty());
        Self {
            core,
            config,
            initial: value.clone(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_value(&mut self, ui: &mut Ui, value: Option<String>) {
        self.value = value.filter(|v| !v.is_empty());
        self.sync_raw(ui);
    }

    /// Restore the value the field was configured with.
    pub fn reset(&mut self, ui: &mut Ui) {
        self.value = self.initial.clone();
        self.sync_raw(ui);
    }

    pub fn is_valid(&self) -> bool {
        self.config.allow_blank || self.value.is_some()
    }

    pub fn handle_action(&mut self, ui: &mut Ui, action: Action, _event: &mut Event) {
        if action == "onChange" {
            let raw = read_raw(ui, self.core.root());
            self.value = self.raw_to_value(&raw);
        }
    }

    fn sync_raw(&self, ui: &mut Ui) {
        let raw = self
            .value
            .as_ref()
            .map(|v| self.value_to_raw(v))
            .unwrap_or_default();
        write_raw(ui, self.core.root(), &raw);
    }
}

impl ValuePipeline for TextField {
    type Value = String;

    fn raw_to_value(&self, raw: &str) -> Option<String> {
        (!raw.is_empty()).then(|| raw.to_owned())
    }

    fn value_to_raw(&self, value: &String) -> String {
        value.clone()
    }

    fn get_submit_value(&self) -> String {
        self.value.clone().unwrap_or_default()
    }
}

impl View for TextField {
    fn core(&self) -> &ViewCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ViewCore {
        &mut self.core
    }

    fn registry_kind(&self) -> Option<RegistryKind> {
        Some(RegistryKind::Fields)
    }

    fn tpl_data(&self, _ui: &Ui) -> TplData {
        let mut data = TplData::new();
        data.set("name", self.config.name.as_str())
            .set("input_type", "text")
            .set("label", self.config.field_label.clone().unwrap_or_default())
            .set(
                "empty_text",
                self.config.empty_text.clone().unwrap_or_default(),
            )
            .merge_missing(self.core.base_tpl_data());
        data
    }

    fn declared_events(&self) -> Vec<(EventType, Action)> {
        vec![(event_types::CHANGE, "onChange")]
    }

    fn after_render(&mut self, ui: &mut Ui) -> trellis_core::Result<()> {
        self.sync_raw(ui);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_value_means_none() {
        let mut ui = Ui::new();
        let mut field = TextField::new(&mut ui, TextFieldConfig::new("user").value(""));
        assert_eq!(field.value(), None);
        field.set_value(&mut ui, Some("ada".into()));
        assert_eq!(field.value(), Some("ada"));
        field.set_value(&mut ui, Some(String::new()));
        assert_eq!(field.value(), None);
    }

    #[test]
    fn test_allow_blank_controls_validity() {
        let mut ui = Ui::new();
        let field = TextField::new(&mut ui, TextFieldConfig::new("user").allow_blank(false));
        assert!(!field.is_valid());
        let field = TextField::new(&mut ui, TextFieldConfig::new("user"));
        assert!(field.is_valid());
    }

    #[test]
    fn test_change_event_reads_the_raw_attribute() {
        let mut ui = Ui::new();
        let body = ui.dom.body();
        let mut field = TextField::new(&mut ui, TextFieldConfig::new("user"));
        let root = field.render(&mut ui, Some(body)).unwrap();

        ui.dom.set_attr(root, "value", "grace");
        let mut event = Event::new(event_types::CHANGE, root);
        field.handle_action(&mut ui, "onChange", &mut event);
        assert_eq!(field.value(), Some("grace"));
    }

    #[test]
    fn test_reset_restores_the_configured_value() {
        let mut ui = Ui::new();
        let mut field = TextField::new(&mut ui, TextFieldConfig::new("user").value("alan"));
        field.set_value(&mut ui, Some("kurt".into()));
        field.reset(&mut ui);
        assert_eq!(field.value(), Some("alan"));
    }
}
