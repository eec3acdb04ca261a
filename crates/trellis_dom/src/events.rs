//! Event types
//!
//! Activation-level events routed through the binding table. Adapted to
//! the subset a widget toolkit reacts to; lower-level input plumbing is
//! the platform's concern.

use crate::node::NodeId;

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    pub const CLICK: EventType = 1;
    pub const DOUBLE_CLICK: EventType = 2;
    pub const CONTEXT_MENU: EventType = 3;
    pub const MOUSE_DOWN: EventType = 4;
    pub const MOUSE_UP: EventType = 5;
    pub const KEY_DOWN: EventType = 10;
    pub const FOCUS: EventType = 20;
    pub const BLUR: EventType = 21;
    /// A form control's raw value changed
    pub const CHANGE: EventType = 30;
}

/// An event targeting a node, with propagation control.
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    pub target: NodeId,
    pub data: EventData,
    pub propagation_stopped: bool,
    pub default_prevented: bool,
}

/// Event-specific data
#[derive(Clone, Debug)]
pub enum EventData {
    Pointer { x: f32, y: f32, button: u8 },
    Key { key: u32 },
    None,
}

impl Event {
    pub fn new(event_type: EventType, target: NodeId) -> Self {
        Self {
            event_type,
            target,
            data: EventData::None,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    pub fn pointer(event_type: EventType, target: NodeId, x: f32, y: f32, button: u8) -> Self {
        Self {
            data: EventData::Pointer { x, y, button },
            ..Self::new(event_type, target)
        }
    }

    /// The pointer button, when this is a pointer event.
    pub fn button(&self) -> Option<u8> {
        match self.data {
            EventData::Pointer { button, .. } => Some(button),
            _ => None,
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}
