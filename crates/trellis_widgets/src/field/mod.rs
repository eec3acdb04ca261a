//! Form fields.
//!
//! Every field keeps a typed value alongside the raw text shown in its
//! input node, and converts between the two through [`ValuePipeline`]. An
//! absent value is always `Option::None`; empty raw text parses to `None`
//! and `None` renders as empty raw text, so blank and missing are the same
//! thing everywhere.

mod date;
mod datetime;
mod number;
mod radio;
mod text;

pub use date::{DateField, DateFieldConfig, DateInput};
pub use datetime::{DateTimeField, DateTimeFieldConfig, DateTimeInput};
pub use number::{NumberField, NumberFieldConfig};
pub use radio::{RadioBoxConfig, RadioGroup, RadioGroupConfig};
pub use text::{TextField, TextFieldConfig};

use trellis_dom::NodeId;

use crate::ui::Ui;

/// Conversion between a field's typed value and the raw text in its input.
///
/// Unparseable raw text maps to `None`; raw-to-value never fails loudly.
pub trait ValuePipeline {
    type Value: Clone + PartialEq;

    fn raw_to_value(&self, raw: &str) -> Option<Self::Value>;

    fn value_to_raw(&self, value: &Self::Value) -> String;

    /// The string this field contributes on form submission. Empty when
    /// the value is absent.
    fn get_submit_value(&self) -> String;
}

/// Markup shared by the single-input fields.
pub(crate) const FIELD_TPL: &str = "{?label}<label class=\"control-label\">{label}</label>{/label}<input type=\"{input_type}\" name=\"{name}\"{?empty_text} placeholder=\"{empty_text}\"{/empty_text}>";

/// The raw text lives as a `value` attribute on the field root, which is
/// what change events read back.
pub(crate) fn write_raw(ui: &mut Ui, root: Option<NodeId>, raw: &str) {
    if let Some(root) = root {
        ui.dom.set_attr(root, "value", raw);
    }
}

pub(crate) fn read_raw(ui: &Ui, root: Option<NodeId>) -> String {
    root.and_then(|r| ui.dom.attr(r, "value"))
        .unwrap_or_default()
        .to_owned()
}
