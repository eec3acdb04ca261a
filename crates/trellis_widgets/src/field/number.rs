//! Numeric input with range validation.

use tracing::trace;

use trellis_core::{Result, WidgetError};
use trellis_dom::{event_types, Action, Event, EventType, NodeId, Template, TplData};

use crate::field::{read_raw, write_raw, ValuePipeline, FIELD_TPL};
use crate::ui::{RegistryKind, Ui};
use crate::view::{View, ViewCore};

#[derive(Debug, Clone)]
pub struct NumberFieldConfig {
    pub name: String,
    pub field_label: Option<String>,
    pub value: Option<f64>,
    pub allow_blank: bool,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    /// Fraction digits in the submit value.
    pub decimal_precision: usize,
    pub empty_text: Option<String>,
    pub id: Option<String>,
    pub render_to: Option<NodeId>,
    pub class_name: String,
    pub disabled: bool,
}

impl NumberFieldConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_label: None,
            value: None,
            allow_blank: true,
            min_value: None,
            max_value: None,
            decimal_precision: 2,
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

    pub fn value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn allow_blank(mut self, allow_blank: bool) -> Self {
        self.allow_blank = allow_blank;
        self
    }

    pub fn min_value(mut self, min: f64) -> Self {
        self.min_value = Some(min);
        self
    }

    pub fn max_value(mut self, max: f64) -> Self {
        self.max_value = Some(max);
        self
    }

    pub fn decimal_precision(mut self, digits: usize) -> Self {
        self.decimal_precision = digits;
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
}

pub struct NumberField {
    core: ViewCore,
    config: NumberFieldConfig,
    value: Option<f64>,
    initial: Option<f64>,
}

impl NumberField {
    pub fn new(ui: &mut Ui, config: NumberFieldConfig) -> Self {
        let mut core = ViewCore::new(
            ui,
            "numberfield",
            "div",
            config.class_name.clone(),
            Template::new(FIELD_TPL),
        );
        core.set_name(config.id.clone());
        core.set_render_to(config.render_to);
        core.set_disabled(config.disabled);
        Self {
            core,
            initial: config.value,
            value: config.value,
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn set_value(&mut self, ui: &mut Ui, value: Option<f64>) {
        self.value = value;
        self.sync_raw(ui);
    }

    pub fn reset(&mut self, ui: &mut Ui) {
        self.value = self.initial;
        self.sync_raw(ui);
    }

    pub fn is_valid(&self) -> bool {
        match self.value {
            None => self.config.allow_blank,
            Some(v) => {
                self.config.min_value.map_or(true, |min| v >= min)
                    && self.config.max_value.map_or(true, |max| v <= max)
            }
        }
    }

    fn parse(&self, raw: &str) -> Result<f64> {
        raw.trim().parse::<f64>().map_err(|_| WidgetError::Parse {
            raw: raw.to_owned(),
            expected: "number",
        })
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

impl ValuePipeline for NumberField {
    type Value = f64;

    fn raw_to_value(&self, raw: &str) -> Option<f64> {
        if raw.trim().is_empty() {
            return None;
        }
        match self.parse(raw) {
            Ok(v) => Some(v),
            Err(err) => {
                trace!(%err, "number parse failed, treating as blank");
                None
            }
        }
    }

    fn value_to_raw(&self, value: &f64) -> String {
        value.to_string()
    }

    fn get_submit_value(&self) -> String {
        match self.value {
            Some(v) => format!("{v:.prec$}", prec = self.config.decimal_precision),
            None => String::new(),
        }
    }
}

impl View for NumberField {
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
            .set("input_type", "number")
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

    fn after_render(&mut self, ui: &mut Ui) -> Result<()> {
        self.sync_raw(ui);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_raw_text_parses_to_none() {
        let mut ui = Ui::new();
        let field = NumberField::new(&mut ui, NumberFieldConfig::new("qty"));
        assert_eq!(field.raw_to_value("12.5"), Some(12.5));
        assert_eq!(field.raw_to_value("twelve"), None);
        assert_eq!(field.raw_to_value("   "), None);
    }

    #[test]
    fn test_range_validation() {
        let mut ui = Ui::new();
        let mut field = NumberField::new(
            &mut ui,
            NumberFieldConfig::new("qty").min_value(0.0).max_value(10.0),
        );
        field.set_value(&mut ui, Some(5.0));
        assert!(field.is_valid());
        field.set_value(&mut ui, Some(-1.0));
        assert!(!field.is_valid());
        field.set_value(&mut ui, Some(11.0));
        assert!(!field.is_valid());
    }

    #[test]
    fn test_submit_value_uses_decimal_precision() {
        let mut ui = Ui::new();
        let mut field = NumberField::new(
            &mut ui,
            NumberFieldConfig::new("price").decimal_precision(2),
        );
        field.set_value(&mut ui, Some(3.14159));
        assert_eq!(field.get_submit_value(), "3.14");
        field.set_value(&mut ui, None);
        assert_eq!(field.get_submit_value(), "");
    }
}
