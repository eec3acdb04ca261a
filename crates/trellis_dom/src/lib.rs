//! Trellis Node-Tree Layer
//!
//! The primitive capability layer the widget crate builds on: an element
//! arena with class/attribute/bounds operations, an event binding table
//! with two-phase routing (local bubbling, then document level), and a
//! small placeholder template engine.
//!
//! Layout is external to this layer; element bounds are caller-supplied
//! and only read back for overlay placement.

pub mod bindings;
pub mod events;
pub mod node;
pub mod template;
pub mod viewport;

pub use bindings::{Action, Bindings, DispatchPhase, RoutedAction};
pub use events::{event_types, Event, EventData, EventType};
pub use node::{Bounds, Dom, NodeId};
pub use template::{Template, TplData, TplValue};
pub use viewport::Viewport;
