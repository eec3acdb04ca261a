//! Date input with an attached picker overlay.
//!
//! Values are calendar dates with no time-of-day or zone attached; epoch
//! millisecond inputs are interpreted in UTC, and the submit value is the
//! formatted UTC calendar date.

use chrono::{NaiveDate, TimeZone, Utc};
use tracing::trace;

use trellis_core::Result;
use trellis_dom::{event_types, Action, Event, EventType, NodeId, Template, TplData};

use crate::field::{read_raw, write_raw, ValuePipeline, FIELD_TPL};
use crate::overlay::{Alignment, Overlayable};
use crate::picker::{DatePicker, DatePickerConfig};
use crate::ui::{RegistryKind, Ui};
use crate::view::{View, ViewCore};

pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

/// The shapes a date value may arrive in.
#[derive(Debug, Clone, PartialEq)]
pub enum DateInput {
    /// Milliseconds since the Unix epoch, read in UTC.
    Millis(i64),
    /// Text in the field's display format.
    Text(String),
    Date(NaiveDate),
}

impl From<i64> for DateInput {
    fn from(ms: i64) -> Self {
        DateInput::Millis(ms)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_owned())
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

fn parse_input(input: &DateInput, format: &str) -> Option<NaiveDate> {
    match input {
        DateInput::Millis(ms) => Utc
            .timestamp_millis_opt(*ms)
            .single()
            .map(|dt| dt.date_naive()),
        DateInput::Text(text) => NaiveDate::parse_from_str(text.trim(), format).ok(),
        DateInput::Date(date) => Some(*date),
    }
}

#[derive(Debug, Clone)]
pub struct DateFieldConfig {
    pub name: String,
    pub field_label: Option<String>,
    pub value: Option<DateInput>,
    /// chrono format string used for display, parsing and submission.
    pub format: String,
    /// Latest selectable date, enforced by the picker.
    pub end_date: Option<NaiveDate>,
    pub allow_blank: bool,
    pub empty_text: Option<String>,
    pub id: Option<String>,
    pub render_to: Option<NodeId>,
    pub class_name: String,
    pub disabled: bool,
}

impl DateFieldConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_label: None,
            value: None,
            format: DEFAULT_DATE_FORMAT.into(),
            end_date: None,
            allow_blank: true,
            empty_text: None,
            id: None,
            render_to: None,
            class_name: "form-group date-field".into(),
            disabled: false,
        }
    }

    pub fn field_label(mut self, label: impl Into<String>) -> Self {
        self.field_label = Some(label.into());
        self
    }

    pub fn value(mut self, value: impl Into<DateInput>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
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

pub struct DateField {
    core: ViewCore,
    config: DateFieldConfig,
    value: Option<NaiveDate>,
    initial: Option<NaiveDate>,
    picker: Option<DatePicker>,
    trigger: Option<NodeId>,
}

impl DateField {
    pub fn new(ui: &mut Ui, config: DateFieldConfig) -> Self {
        let mut core = ViewCore::new(
            ui,
            "datefield",
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

    pub fn value(&self) -> Option<NaiveDate> {
        self.value
    }

    /// Interpret any accepted input shape. Unparseable input clears the
    /// value rather than erroring.
    pub fn set_value(&mut self, ui: &mut Ui, value: impl Into<DateInput>) {
        let input = value.into();
        self.value = parse_input(&input, &self.config.format);
        if self.value.is_none() {
            trace!(?input, "date input did not parse, value cleared");
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
        match self.value {
            None => self.config.allow_blank,
            Some(date) => self.config.end_date.map_or(true, |end| date <= end),
        }
    }

    pub fn picker_id(&self) -> Option<trellis_core::WidgetId> {
        self.picker.as_ref().map(View::id)
    }

    pub fn is_expanded(&self, ui: &Ui) -> bool {
        self.picker
            .as_ref()
            .is_some_and(|picker| picker.is_visible(ui))
    }

    /// Open the picker under the field, creating it on first use.
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
            if let Some(date) = self.value {
                picker.show_month(ui, date);
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
        if let Some(date) = self.value {
            config = config.month(date);
        }
        if let Some(end) = self.config.end_date {
            config = config.end_date(end);
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

    /// Forward an action routed to the picker widget. Selecting a day
    /// commits the date and closes the picker.
    pub fn handle_picker_action(&mut self, ui: &mut Ui, action: Action, event: &mut Event) {
        if action == "onItemClick" {
            let selected = self
                .picker
                .as_ref()
                .and_then(|picker| picker.date_at(event.target));
            if let Some(date) = selected {
                self.set_value(ui, date);
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

impl ValuePipeline for DateField {
    type Value = NaiveDate;

    fn raw_to_value(&self, raw: &str) -> Option<NaiveDate> {
        if raw.trim().is_empty() {
            return None;
        }
        NaiveDate::parse_from_str(raw.trim(), &self.config.format).ok()
    }

    fn value_to_raw(&self, value: &NaiveDate) -> String {
        value.format(&self.config.format).to_string()
    }

    fn get_submit_value(&self) -> String {
        match self.value {
            Some(date) => date.format(&self.config.format).to_string(),
            None => String::new(),
        }
    }
}

impl View for DateField {
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
