//! Combined date and time input.
//!
//! The value is a UTC instant. The picker drives the calendar-date half;
//! picking a day keeps whatever time of day the field already held.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing::trace;

use trellis_core::Result;
use trellis_dom::{event_types, Action, Event, EventType, NodeId, Template, TplData};

use crate::field::{read_raw, write_raw, ValuePipeline, FIELD_TPL};
use crate::overlay::{Alignment, Overlayable};
use crate::picker::{DatePicker, DatePickerConfig};
use crate::ui::{RegistryKind, Ui};
use crate::view::{View, ViewCore};

pub const DEFAULT_DATETIME_FORMAT: &str = "%m/%d/%Y %H:%M";

#[derive(Debug, Clone, PartialEq)]
pub enum DateTimeInput {
    /// Milliseconds since the Unix epoch.
    Millis(i64),
    /// Text in the field's display format.
    Text(String),
    DateTime(DateTime<Utc>),
}

impl From<i64> for DateTimeInput {
    fn from(ms: i64) -> Self {
        DateTimeInput::Millis(ms)
    }
}

impl From<&str> for DateTimeInput {
    fn from(text: &str) -> Self {
        DateTimeInput::Text(text.to_owned())
    }
}

impl From<DateTime<Utc>> for DateTimeInput {
    fn from(dt: DateTime<Utc>) -> Self {
        DateTimeInput::DateTime(dt)
    }
}

fn parse_input(input: &DateTimeInput, format: &str) -> Option<DateTime<Utc>> {
    match input {
        DateTimeInput::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
        DateTimeInput::Text(text) => NaiveDateTime::parse_from_str(text.trim(), format)
            .ok()
            .map(|naive| naive.and_utc()),
        DateTimeInput::DateTime(dt) => Some(*dt),
    }
}

#[derive(Debug, Clone)]
pub struct DateTimeFieldConfig {
    pub name: String,
    pub field_label: Option<String>,
    pub value: Option<DateTimeInput>,
    pub format: String,
    pub allow_blank: bool,
    pub empty_text: Option<String>,
    pub id: Option<String>,
    pub render_to: Option<NodeId>,
    pub class_name: String,
    pub disabled: bool,
}

impl DateTimeFieldConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_label: None,
            value: None,
            format: DEFAULT_DATETIME_FORMAT.into(),
            allow_blank: true,
            empty_text: None,
            id: None,
            render_to: None,
            class_name: "form-group datetime-field".into(),
            disabled: false,
        }
    }

    pub fn field_label(mut self, label: impl Into<String>) -> Self {
        self.field_label = Some(label.into());
        self
    }

    pub fn value(mut self, value: impl Into<DateTimeInput>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
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
}

pub struct DateTimeField {
    core: ViewCore,
    config: DateTimeFieldConfig,
    value: Option<DateTime<Utc>>,
    initial: Option<DateTime<Utc>>,
    picker: Option<DatePicker>,
    trigger: Option<NodeId>,
}

impl DateTimeField {
    pub fn new(ui: &mut Ui, config: DateTimeFieldConfig) -> Self {
        let mut core = ViewCore::new(
            ui,
            "datetimefield",
            "div",
            config.class_name.clone(),
            Template::new(FIELD_TPL),
        );
        core.set_name(config.id.clone());
        core.set_render_to(config.render_to);
        core.set_disabled(config.disabled);
        let value = config
            .value
            .as_ref()
            .and_then(|v| parse_input(v, &config.format));
        Self {
            core,
            config,
            initial: value,
            value,
            picker: None,
            trigger: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn value(&self) -> Option<DateTime<Utc>> {
        self.value
    }

    pub fn set_value(&mut self, ui: &mut Ui, value: impl Into<DateTimeInput>) {
        let input = value.into();
        self.value = parse_input(&input, &self.config.format);
        if self.value.is_none() {
            trace!(?input, "datetime input did not parse, value cleared");
        }
        self.sync_raw(ui);
    }

    pub fn clear_value(&mut self, ui: &mut Ui) {
        self.value = None;
        self.sync_raw(ui);
    }

    pub fn reset(&mut self, ui: &mut Ui) {
        self.value = self.initial;
        self.sync_raw(ui);
    }

    pub fn is_valid(&self) -> bool {
        self.config.allow_blank || self.value.is_some()
    }

    pub fn picker_id(&self) -> Option<trellis_core::WidgetId> {
        self.picker.as_ref().map(View::id)
    }

    pub fn is_expanded(&self, ui: &Ui) -> bool {
        self.picker
            .as_ref()
            .is_some_and(|picker| picker.is_visible(ui))
    }

    pub fn expand(&mut self, ui: &mut Ui) -> Result<()> {
        let Some(anchor) = self.core.root() else {
            return Ok(());
        };
        if self.picker.is_none() {
            let picker = self.create_picker(ui);
            ui.ownership.link(self.id(), picker.id());
            self.picker = Some(picker);
        }
        if let Some(picker) = self.picker.as_mut() {
            if let Some(dt) = self.value {
                picker.show_month(ui, dt.date_naive());
            }
            picker.show_by(ui, anchor, Alignment::default())?;
        }
        Ok(())
    }

    pub fn collapse(&mut self, ui: &mut Ui) {
        if let Some(picker) = self.picker.as_mut() {
            picker.hide(ui);
        }
    }

    fn create_picker(&self, ui: &mut Ui) -> DatePicker {
        let mut config = DatePickerConfig::new();
        if let Some(dt) = self.value {
            config = config.month(dt.date_naive());
        }
        DatePicker::new(ui, config)
    }

    pub fn handle_action(&mut self, ui: &mut Ui, action: Action, event: &mut Event) {
        match action {
            "onChange" => {
                let raw = read_raw(ui, self.core.root());
                self.value = self.raw_to_value(&raw);
            }
            "onTriggerClick" => {
                if self.config.disabled {
                    return;
                }
                if self.is_expanded(ui) {
                    self.collapse(ui);
                } else if let Err(err) = self.expand(ui) {
                    trace!(%err, "picker failed to open");
                }
                event.stop_propagation();
            }
            _ => {}
        }
    }

    /// Picking a day swaps the calendar date and keeps the time of day.
    pub fn handle_picker_action(&mut self, ui: &mut Ui, action: Action, event: &mut Event) {
        if action == "onItemClick" {
            let selected = self
                .picker
                .as_ref()
                .and_then(|picker| picker.date_at(event.target));
            if let Some(date) = selected {
                let time = self.value.map(|dt| dt.time()).unwrap_or_default();
                self.value = Some(date.and_time(time).and_utc());
                self.sync_raw(ui);
                self.collapse(ui);
            }
        } else if let Some(picker) = self.picker.as_mut() {
            picker.handle_action(ui, action, event);
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

impl ValuePipeline for DateTimeField {
    type Value = DateTime<Utc>;

    fn raw_to_value(&self, raw: &str) -> Option<DateTime<Utc>> {
        if raw.trim().is_empty() {
            return None;
        }
        NaiveDateTime::parse_from_str(raw.trim(), &self.config.format)
            .ok()
            .map(|naive| naive.and_utc())
    }

    fn value_to_raw(&self, value: &DateTime<Utc>) -> String {
        value.format(&self.config.format).to_string()
    }

    fn get_submit_value(&self) -> String {
        match self.value {
            Some(dt) => dt.format(&self.config.format).to_string(),
            None => String::new(),
        }
    }
}

impl View for DateTimeField {
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

    fn after_render(&mut self, ui: &mut Ui) -> Result<()> {
        let id = self.id();
        if let Some(root) = self.core.root() {
            let trigger = ui.dom.create_element("button");
            ui.dom.add_class(trigger, "form-trigger");
            ui.dom.append(root, trigger);
            ui.bindings
                .bind(trigger, event_types::CLICK, id, "onTriggerClick");
            self.trigger = Some(trigger);
        }
        self.sync_raw(ui);
        Ok(())
    }

    fn before_destroy(&mut self, ui: &mut Ui) {
        if let Some(mut picker) = self.picker.take() {
            picker.destroy(ui);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_epoch_millis_keep_their_utc_time_of_day() {
        let mut ui = Ui::new();
        // 2014-06-13 12:00:00 UTC.
        let field = DateTimeField::new(
            &mut ui,
            DateTimeFieldConfig::new("at").value(1402660800000i64),
        );
        assert_eq!(field.get_submit_value(), "06/13/2014 12:00");
    }

    #[test]
    fn test_text_parses_in_the_display_format() {
        let mut ui = Ui::new();
        let mut field = DateTimeField::new(&mut ui, DateTimeFieldConfig::new("at"));
        field.set_value(&mut ui, "06/13/2014 08:30");
        let expected = NaiveDate::from_ymd_opt(2014, 6, 13)
            .and_then(|d| d.and_hms_opt(8, 30, 0))
            .map(|naive| naive.and_utc());
        assert_eq!(field.value(), expected);
    }

    #[test]
    fn test_day_pick_preserves_the_time_of_day() {
        let mut ui = Ui::new();
        let body = ui.dom.body();
        let mut field = DateTimeField::new(
            &mut ui,
            DateTimeFieldConfig::new("at").value("06/01/2014 17:45"),
        );
        field.render(&mut ui, Some(body)).unwrap();
        field.expand(&mut ui).unwrap();

        let date = NaiveDate::from_ymd_opt(2014, 6, 20).unwrap();
        let target = field
            .picker
            .as_ref()
            .and_then(|picker| picker.node_for(date))
            .unwrap();
        let mut event = Event::pointer(event_types::CLICK, target, 0.0, 0.0, 0);
        field.handle_picker_action(&mut ui, "onItemClick", &mut event);

        assert_eq!(field.get_submit_value(), "06/20/2014 17:45");
    }
}
