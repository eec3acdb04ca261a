//! Mutually exclusive radio boxes.

use tracing::trace;

use trellis_core::{Result, Toggle};
use trellis_dom::{event_types, Action, Event, NodeId, Template, TplData};

use crate::field::ValuePipeline;
use crate::ui::{RegistryKind, Ui};
use crate::view::{View, ViewCore};

const BOX_TPL: &str = "<input type=\"radio\" name=\"{name}\"><span>{box_label}</span>";

#[derive(Debug, Clone)]
pub struct RadioBoxConfig {
    pub box_label: String,
    pub checked: bool,
}

impl RadioBoxConfig {
    pub fn new(box_label: impl Into<String>) -> Self {
        Self {
            box_label: box_label.into(),
            checked: false,
        }
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }
}

struct RadioBox {
    config: RadioBoxConfig,
    node: Option<NodeId>,
    toggle: Toggle,
}

#[derive(Debug, Clone)]
pub struct RadioGroupConfig {
    pub name: String,
    pub field_label: Option<String>,
    pub boxes: Vec<RadioBoxConfig>,
    pub allow_blank: bool,
    pub id: Option<String>,
    pub render_to: Option<NodeId>,
    pub class_name: String,
    pub disabled: bool,
}

impl RadioGroupConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_label: None,
            boxes: Vec::new(),
            allow_blank: true,
            id: None,
            render_to: None,
            class_name: "form-group radio-group".into(),
            disabled: false,
        }
    }

    pub fn field_label(mut self, label: impl Into<String>) -> Self {
        self.field_label = Some(label.into());
        self
    }

    pub fn boxes(mut self, boxes: impl IntoIterator<Item = RadioBoxConfig>) -> Self {
        self.boxes.extend(boxes);
        self
    }

    pub fn allow_blank(mut self, allow_blank: bool) -> Self {
        self.allow_blank = allow_blank;
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
}

pub struct RadioGroup {
    core: ViewCore,
    config: RadioGroupConfig,
    boxes: Vec<RadioBox>,
    initial: Option<usize>,
}

impl RadioGroup {
    pub fn new(ui: &mut Ui, config: RadioGroupConfig) -> Self {
        let mut core = ViewCore::new(
            ui,
            "radiogroup",
            "div",
            config.class_name.clone(),
            Template::new("{?label}<label class=\"control-label\">{label}</label>{/label}"),
        );
        core.set_name(config.id.clone());
        core.set_render_to(config.render_to);
        core.set_disabled(config.disabled);
        // Only the first configured checked box wins.
        let mut boxes: Vec<RadioBox> = Vec::with_capacity(config.boxes.len());
        let mut initial = None;
        for (index, box_config) in config.boxes.iter().enumerate() {
            let checked = box_config.checked && initial.is_none();
            if checked {
                initial = Some(index);
            }
            boxes.push(RadioBox {
                config: box_config.clone(),
                node: None,
                toggle: Toggle::new(checked),
            });
        }
        Self {
            core,
            config,
            boxes,
            initial,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Index of the checked box, if any.
    pub fn checked(&self) -> Option<usize> {
        self.boxes.iter().position(|b| b.toggle.is_pressed())
    }

    pub fn value(&self) -> Option<&str> {
        self.checked().map(|i| self.boxes[i].config.box_label.as_str())
    }

    /// Check one box and silently uncheck the rest.
    pub fn select(&mut self, ui: &mut Ui, index: usize) {
        if index >= self.boxes.len() {
            return;
        }
        for (i, radio) in self.boxes.iter_mut().enumerate() {
            if radio.toggle.toggle(Some(i == index)).is_some() {
                if let Some(node) = radio.node {
                    ui.dom.toggle_class(node, "checked", i == index);
                }
            }
        }
        trace!(index, "radio box selected");
    }

    pub fn clear(&mut self, ui: &mut Ui) {
        for radio in &mut self.boxes {
            if radio.toggle.toggle(Some(false)).is_some() {
                if let Some(node) = radio.node {
                    ui.dom.remove_class(node, "checked");
                }
            }
        }
    }

    pub fn reset(&mut self, ui: &mut Ui) {
        match self.initial {
            Some(index) => self.select(ui, index),
            None => self.clear(ui),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.config.allow_blank || self.checked().is_some()
    }

    pub fn handle_action(&mut self, ui: &mut Ui, action: Action, event: &mut Event) {
        if action != "onBoxClick" || self.config.disabled {
            return;
        }
        let index = self.boxes.iter().position(|radio| {
            radio
                .node
                .is_some_and(|node| ui.dom.is_within(event.target, node))
        });
        if let Some(index) = index {
            self.select(ui, index);
        }
    }
}

impl ValuePipeline for RadioGroup {
    type Value = String;

    fn raw_to_value(&self, raw: &str) -> Option<String> {
        self.boxes
            .iter()
            .find(|b| b.config.box_label == raw)
            .map(|b| b.config.box_label.clone())
    }

    fn value_to_raw(&self, value: &String) -> String {
        value.clone()
    }

    fn get_submit_value(&self) -> String {
        self.value().unwrap_or_default().to_owned()
    }
}

impl View for RadioGroup {
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
        data.set("label", self.config.field_label.clone().unwrap_or_default())
            .merge_missing(self.core.base_tpl_data());
        data
    }

    fn after_render(&mut self, ui: &mut Ui) -> Result<()> {
        let id = self.id();
        let Some(root) = self.core.root() else {
            return Ok(());
        };
        let box_tpl = Template::new(BOX_TPL);
        for radio in &mut self.boxes {
            let node = ui.dom.create_element("label");
            ui.dom.add_class(node, "radio");
            if radio.toggle.is_pressed() {
                ui.dom.add_class(node, "checked");
            }
            let mut data = TplData::new();
            data.set("name", self.config.name.as_str())
                .set("box_label", radio.config.box_label.as_str());
            ui.dom.set_markup(node, &box_tpl.render(&data));
            ui.dom.append(root, node);
            ui.bindings.bind(node, event_types::CLICK, id, "onBoxClick");
            radio.node = Some(node);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(ui: &mut Ui) -> RadioGroup {
        RadioGroup::new(
            ui,
            RadioGroupConfig::new("color").boxes([
                RadioBoxConfig::new("red"),
                RadioBoxConfig::new("green").checked(true),
                RadioBoxConfig::new("blue"),
            ]),
        )
    }

    #[test]
    fn test_selection_is_exclusive() {
        let mut ui = Ui::new();
        let body = ui.dom.body();
        let mut radios = group(&mut ui);
        radios.render(&mut ui, Some(body)).unwrap();
        assert_eq!(radios.checked(), Some(1));

        radios.select(&mut ui, 2);
        assert_eq!(radios.checked(), Some(2));
        assert_eq!(radios.value(), Some("blue"));
    }

    #[test]
    fn test_box_click_selects_it() {
        let mut ui = Ui::new();
        let body = ui.dom.body();
        let mut radios = group(&mut ui);
        let root = radios.render(&mut ui, Some(body)).unwrap();
        let first_box = ui.dom.children(root)[0];

        let mut event = Event::pointer(event_types::CLICK, first_box, 0.0, 0.0, 0);
        radios.handle_action(&mut ui, "onBoxClick", &mut event);
        assert_eq!(radios.value(), Some("red"));
        assert!(ui.dom.has_class(first_box, "checked"));
    }

    #[test]
    fn test_reset_restores_the_initial_selection() {
        let mut ui = Ui::new();
        let mut radios = group(&mut ui);
        radios.select(&mut ui, 0);
        radios.reset(&mut ui);
        assert_eq!(radios.checked(), Some(1));
    }
}
