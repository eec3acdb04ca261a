//! Floating date picker.
//!
//! Shows one month as a grid of day nodes. Selection itself lives in the
//! owning field: the picker only maps a clicked node back to its date via
//! [`DatePicker::date_at`]. Month navigation is handled internally.

use chrono::{Datelike, Months, NaiveDate, Utc};
use tracing::trace;

use trellis_core::Result;
use trellis_dom::{event_types, Action, Event, NodeId, Template};

use crate::overlay::{register_overlay, Overlayable};
use crate::ui::{RegistryKind, Ui};
use crate::view::{View, ViewCore};

#[derive(Debug, Clone)]
pub struct DatePickerConfig {
    pub name: Option<String>,
    pub class_name: String,
    /// Month to open on; the first of the month is used. Defaults to the
    /// current month.
    pub month: Option<NaiveDate>,
    /// Latest selectable date. Later days render disabled.
    pub end_date: Option<NaiveDate>,
    pub width: f32,
    pub height: f32,
}

impl Default for DatePickerConfig {
    fn default() -> Self {
        Self {
            name: None,
            class_name: "date-picker".into(),
            month: None,
            end_date: None,
            width: 220.0,
            height: 240.0,
        }
    }
}

impl DatePickerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn month(mut self, month: NaiveDate) -> Self {
        self.month = Some(month);
        self
    }

    pub fn end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }
}

pub struct DatePicker {
    core: ViewCore,
    config: DatePickerConfig,
    /// First day of the displayed month.
    month: NaiveDate,
    days: Vec<(NodeId, NaiveDate)>,
    prev_node: Option<NodeId>,
    next_node: Option<NodeId>,
}

impl DatePicker {
    pub fn new(ui: &mut Ui, config: DatePickerConfig) -> Self {
        let mut core = ViewCore::new(
            ui,
            "datepicker",
            "div",
            config.class_name.clone(),
            Template::new(""),
        );
        core.set_name(config.name.clone());
        let body = ui.dom.body();
        core.set_render_to(Some(body));
        let month = config
            .month
            .unwrap_or_else(|| Utc::now().date_naive());
        let month = month.with_day(1).unwrap_or(month);
        Self {
            core,
            config,
            month,
            days: Vec::new(),
            prev_node: None,
            next_node: None,
        }
    }

    /// First day of the month on display.
    pub fn month(&self) -> NaiveDate {
        self.month
    }

    /// The date a clicked node stands for, if the node is a selectable day.
    pub fn date_at(&self, node: NodeId) -> Option<NaiveDate> {
        self.days
            .iter()
            .find(|(day_node, _)| *day_node == node)
            .filter(|(_, date)| self.selectable(*date))
            .map(|(_, date)| *date)
    }

    /// The node standing for a date in the current grid.
    pub fn node_for(&self, date: NaiveDate) -> Option<NodeId> {
        self.days
            .iter()
            .find(|(_, d)| *d == date)
            .map(|(node, _)| *node)
    }

    fn selectable(&self, date: NaiveDate) -> bool {
        self.config.end_date.map_or(true, |end| date <= end)
    }

    /// Switch the displayed month and rebuild the day grid in place.
    pub fn show_month(&mut self, ui: &mut Ui, month: NaiveDate) {
        self.month = month.with_day(1).unwrap_or(month);
        if self.core.rendered() {
            self.rebuild_grid(ui);
        }
    }

    pub fn handle_action(&mut self, ui: &mut Ui, action: Action, _event: &mut Event) {
        match action {
            "onPrevClick" => {
                let month = self.month - Months::new(1);
                self.show_month(ui, month);
            }
            "onNextClick" => {
                let month = self.month + Months::new(1);
                self.show_month(ui, month);
            }
            _ => {}
        }
    }

    fn rebuild_grid(&mut self, ui: &mut Ui) {
        let id = self.id();
        let Some(root) = self.core.root() else {
            return;
        };
        for (node, _) in self.days.drain(..) {
            ui.dom.remove(node);
        }
        if self.prev_node.is_none() {
            let prev = ui.dom.create_element("a");
            ui.dom.add_class(prev, "prev");
            ui.dom.append(root, prev);
            ui.bindings.bind(prev, event_types::CLICK, id, "onPrevClick");
            self.prev_node = Some(prev);

            let next = ui.dom.create_element("a");
            ui.dom.add_class(next, "next");
            ui.dom.append(root, next);
            ui.bindings.bind(next, event_types::CLICK, id, "onNextClick");
            self.next_node = Some(next);
        }

        let next_month = self.month + Months::new(1);
        let day_count = next_month
            .pred_opt()
            .map(|last| last.day())
            .unwrap_or(28);
        for day in 1..=day_count {
            let Some(date) = self.month.with_day(day) else {
                continue;
            };
            let node = ui.dom.create_element("td");
            ui.dom.add_class(node, "day");
            ui.dom.set_markup(node, &day.to_string());
            ui.dom.append(root, node);
            if self.selectable(date) {
                ui.bindings.bind(node, event_types::CLICK, id, "onItemClick");
            } else {
                ui.dom.add_class(node, "disabled");
            }
            self.days.push((node, date));
        }
        trace!(month = %self.month, days = self.days.len(), "picker grid built");
    }
}

impl View for DatePicker {
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
        self.prev_node = None;
        self.next_node = None;
        self.rebuild_grid(ui);
        let id = self.id();
        if let Some(root) = self.core.root() {
            let size = (self.config.width, self.config.height);
            register_overlay(ui, id, root, self.days.len(), true, size);
        }
        Ok(())
    }
}

impl Overlayable for DatePicker {
    fn item_count(&self) -> usize {
        self.days.len()
    }

    /// A picker is never suppressed for emptiness.
    fn show_empty(&self) -> bool {
        true
    }
}
