//! Element arena
//!
//! Retained node tree with tags, classes, attributes, opaque rendered
//! markup and caller-supplied bounds. Widgets own exactly one root node
//! each; removal is recursive over the subtree.

use indexmap::IndexMap;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Unique identifier for an element node
    pub struct NodeId;
}

/// Axis-aligned element bounds, in viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// A single element node
struct Node {
    tag: String,
    classes: Vec<String>,
    attrs: IndexMap<String, String>,
    markup: String,
    bounds: Bounds,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            classes: Vec::new(),
            attrs: IndexMap::new(),
            markup: String::new(),
            bounds: Bounds::default(),
            parent: None,
            children: Vec::new(),
        }
    }
}

/// The element arena. Always holds a `body` root node that widgets with
/// no explicit render target mount under.
pub struct Dom {
    nodes: SlotMap<NodeId, Node>,
    body: NodeId,
}

impl Dom {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(Node::new("body"));
        Self { nodes, body }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.insert(Node::new(tag))
    }

    /// Append `child` under `parent`, detaching it from any previous
    /// parent first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return;
        }
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        self.nodes[id].parent = None;
    }

    /// Remove a node and its entire subtree.
    pub fn remove(&mut self, id: NodeId) {
        if !self.nodes.contains_key(id) {
            return;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// True if `ancestor` is `node` or an ancestor of it.
    pub fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id).map(|n| n.tag.as_str())
    }

    // ---------------------------------------------------------------
    // Classes
    // ---------------------------------------------------------------

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(node) = self.nodes.get_mut(id) {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_owned());
            }
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.classes.retain(|c| c != class);
        }
    }

    pub fn toggle_class(&mut self, id: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.nodes
            .get(id)
            .map(|n| n.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    // ---------------------------------------------------------------
    // Attributes
    // ---------------------------------------------------------------

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.attrs.insert(name.to_owned(), value.to_owned());
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.attrs.shift_remove(name);
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(id)
            .and_then(|n| n.attrs.get(name))
            .map(String::as_str)
    }

    // ---------------------------------------------------------------
    // Content and geometry
    // ---------------------------------------------------------------

    /// Replace the node's rendered markup. The markup is opaque to this
    /// layer; structured children are separate nodes.
    pub fn set_markup(&mut self, id: NodeId, markup: &str) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.markup = markup.to_owned();
        }
    }

    pub fn markup(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id).map(|n| n.markup.as_str())
    }

    pub fn set_bounds(&mut self, id: NodeId, bounds: Bounds) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.bounds = bounds;
        }
    }

    pub fn bounds(&self, id: NodeId) -> Bounds {
        self.nodes.get(id).map(|n| n.bounds).unwrap_or_default()
    }

    /// Node count, body included. Used by teardown leak checks.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}
