//! Trellis widget library.
//!
//! Widgets are plain structs that implement [`View`]. They own their
//! configuration and value state, while everything shared between widgets
//! (the node tree, event bindings, registries, overlay visibility and the
//! button-to-menu ownership table) lives in the [`Ui`] context that is
//! threaded through every operation.
//!
//! ```
//! use trellis_widgets::{Button, ButtonConfig, Ui, View};
//!
//! let mut ui = Ui::new();
//! let body = ui.dom.body();
//! let mut button = Button::new(&mut ui, ButtonConfig::new("Save"));
//! let root = button.render(&mut ui, Some(body)).unwrap();
//! assert!(ui.dom.contains(root));
//! ```

pub mod button;
pub mod field;
pub mod menu;
pub mod overlay;
pub mod panel;
pub mod picker;
pub mod ui;
pub mod view;

pub use button::{Button, ButtonConfig};
pub use field::{
    DateField, DateFieldConfig, DateInput, DateTimeField, DateTimeFieldConfig, DateTimeInput,
    NumberField, NumberFieldConfig, RadioBoxConfig, RadioGroup, RadioGroupConfig, TextField,
    TextFieldConfig, ValuePipeline,
};
pub use menu::{Menu, MenuConfig, MenuItem, MenuItemConfig};
pub use overlay::{
    resolve_position, Alignment, Anchor, HAlign, Overlayable, OverlayEntry, OverlayStates,
    Placement, VAlign,
};
pub use panel::{FieldSet, FieldSetConfig, Form, Item, ItemConfig, Panel, PanelConfig};
pub use picker::{DatePicker, DatePickerConfig};
pub use ui::{RegistryKind, Ui};
pub use view::{View, ViewCore};

pub use trellis_core::{OwnershipTable, Registry, Result, Toggle, WidgetError, WidgetId, WidgetRef};
pub use trellis_dom::{event_types, Bounds, Event, EventData, EventType, NodeId, Viewport};
