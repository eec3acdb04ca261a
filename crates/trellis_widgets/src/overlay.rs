//! Floating overlay positioning and visibility state.
//!
//! Placement is a pure function over the viewport, the anchor bounds and the
//! overlay extent, so it can be tested without building a widget tree. When
//! the natural position would overflow the viewport on an axis, the overlay
//! flips to the mirrored side of the anchor on that axis. It is never
//! clamped part-way.

use rustc_hash::FxHashMap;

use trellis_core::WidgetId;
use trellis_dom::{Bounds, NodeId, Viewport};

use crate::ui::Ui;
use crate::view::View;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Bottom,
}

/// One corner of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub h: HAlign,
    pub v: VAlign,
}

impl Anchor {
    pub const fn new(h: HAlign, v: VAlign) -> Self {
        Self { h, v }
    }
}

/// How an overlay corner lines up with an anchor corner.
///
/// The default puts the overlay's top-left corner on the anchor's
/// bottom-left corner, the usual dropdown placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    /// Corner of the overlay being placed.
    pub my: Anchor,
    /// Corner of the anchor it attaches to.
    pub at: Anchor,
}

impl Default for Alignment {
    fn default() -> Self {
        Self {
            my: Anchor::new(HAlign::Left, VAlign::Top),
            at: Anchor::new(HAlign::Left, VAlign::Bottom),
        }
    }
}

impl Alignment {
    pub const fn new(my: Anchor, at: Anchor) -> Self {
        Self { my, at }
    }

    fn mirrored_h(&self) -> Self {
        Self {
            my: Anchor::new(flip_h(self.my.h), self.my.v),
            at: Anchor::new(flip_h(self.at.h), self.at.v),
        }
    }

    fn mirrored_v(&self) -> Self {
        Self {
            my: Anchor::new(self.my.h, flip_v(self.my.v)),
            at: Anchor::new(self.at.h, flip_v(self.at.v)),
        }
    }
}

fn flip_h(h: HAlign) -> HAlign {
    match h {
        HAlign::Left => HAlign::Right,
        HAlign::Right => HAlign::Left,
    }
}

fn flip_v(v: VAlign) -> VAlign {
    match v {
        VAlign::Top => VAlign::Bottom,
        VAlign::Bottom => VAlign::Top,
    }
}

/// A resolved overlay position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub flipped_h: bool,
    pub flipped_v: bool,
}

fn corner_position(anchor: Bounds, size: (f32, f32), align: &Alignment) -> (f32, f32) {
    let at_x = match align.at.h {
        HAlign::Left => anchor.x,
        HAlign::Right => anchor.right(),
    };
    let at_y = match align.at.v {
        VAlign::Top => anchor.y,
        VAlign::Bottom => anchor.bottom(),
    };
    let x = match align.my.h {
        HAlign::Left => at_x,
        HAlign::Right => at_x - size.0,
    };
    let y = match align.my.v {
        VAlign::Top => at_y,
        VAlign::Bottom => at_y - size.1,
    };
    (x, y)
}

/// Compute where an overlay of `size` lands against `anchor`.
///
/// Each axis is resolved independently: the natural position per `align`
/// first, then the mirrored alignment if the natural one overflows the
/// viewport on that axis.
pub fn resolve_position(
    viewport: Viewport,
    anchor: Bounds,
    size: (f32, f32),
    align: &Alignment,
) -> Placement {
    let (w, h) = size;
    let (mut x, mut y) = corner_position(anchor, size, align);
    let mut flipped_h = false;
    let mut flipped_v = false;

    if x < 0.0 || x + w > viewport.width {
        let (fx, _) = corner_position(anchor, size, &align.mirrored_h());
        x = fx;
        flipped_h = true;
    }
    if y < 0.0 || y + h > viewport.height {
        let (_, fy) = corner_position(anchor, size, &align.mirrored_v());
        y = fy;
        flipped_v = true;
    }

    Placement {
        x,
        y,
        flipped_h,
        flipped_v,
    }
}

/// Per-overlay visibility book-keeping held by the [`Ui`] context.
#[derive(Debug, Clone)]
pub struct OverlayEntry {
    pub root: NodeId,
    pub visible: bool,
    pub anchor: Option<NodeId>,
    pub item_count: usize,
    pub show_empty: bool,
}

#[derive(Debug, Default)]
pub struct OverlayStates {
    entries: FxHashMap<WidgetId, OverlayEntry>,
}

impl OverlayStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: WidgetId, entry: OverlayEntry) {
        self.entries.insert(id, entry);
    }

    pub fn remove(&mut self, id: WidgetId) {
        self.entries.remove(&id);
    }

    pub fn get(&self, id: WidgetId) -> Option<&OverlayEntry> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut OverlayEntry> {
        self.entries.get_mut(&id)
    }

    pub fn is_visible(&self, id: WidgetId) -> bool {
        self.entries.get(&id).is_some_and(|e| e.visible)
    }

    pub fn set_item_count(&mut self, id: WidgetId, count: usize) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.item_count = count;
        }
    }
}

/// Register an overlay's entry after its root has been built.
///
/// Overlays start hidden; `size` seeds the extent used for placement.
pub(crate) fn register_overlay(
    ui: &mut Ui,
    id: WidgetId,
    root: NodeId,
    item_count: usize,
    show_empty: bool,
    size: (f32, f32),
) {
    ui.dom.add_class(root, "hidden");
    ui.dom.set_bounds(root, Bounds::new(0.0, 0.0, size.0, size.1));
    ui.overlay_states.insert(
        id,
        OverlayEntry {
            root,
            visible: false,
            anchor: None,
            item_count,
            show_empty,
        },
    );
}

/// Behavior shared by widgets that float above the normal flow.
pub trait Overlayable: View {
    /// Number of selectable items the overlay currently holds.
    fn item_count(&self) -> usize {
        0
    }

    /// Whether the overlay may be opened by an event while empty.
    fn show_empty(&self) -> bool {
        false
    }

    /// Show the overlay programmatically, rendering it under the document
    /// body first if it has never rendered.
    fn show_by(
        &mut self,
        ui: &mut Ui,
        anchor: NodeId,
        align: Alignment,
    ) -> trellis_core::Result<bool> {
        self.show_overlay(ui, anchor, align, false)
    }

    /// Show the overlay in response to a user event. Subject to the
    /// empty-overlay suppression rule.
    fn show_by_event(
        &mut self,
        ui: &mut Ui,
        anchor: NodeId,
        align: Alignment,
    ) -> trellis_core::Result<bool> {
        self.show_overlay(ui, anchor, align, true)
    }

    fn show_overlay(
        &mut self,
        ui: &mut Ui,
        anchor: NodeId,
        align: Alignment,
        from_event: bool,
    ) -> trellis_core::Result<bool> {
        if !self.rendered() {
            let body = ui.dom.body();
            self.render(ui, Some(body))?;
        }
        Ok(ui.show_overlay(self.id(), anchor, align, from_event))
    }

    fn hide(&mut self, ui: &mut Ui) {
        ui.hide_overlay(self.id());
    }

    fn is_visible(&self, ui: &Ui) -> bool {
        ui.is_overlay_visible(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(1024.0, 768.0)
    }

    #[test]
    fn test_default_alignment_drops_below_anchor() {
        let anchor = Bounds::new(100.0, 50.0, 80.0, 30.0);
        let placement = resolve_position(viewport(), anchor, (160.0, 200.0), &Alignment::default());
        assert_eq!(placement.x, 100.0);
        assert_eq!(placement.y, 80.0);
        assert!(!placement.flipped_h);
        assert!(!placement.flipped_v);
    }

    #[test]
    fn test_right_edge_overflow_flips_horizontally() {
        // Anchor near the right edge; a 200-wide overlay cannot extend right.
        let anchor = Bounds::new(950.0, 50.0, 60.0, 30.0);
        let placement = resolve_position(viewport(), anchor, (200.0, 150.0), &Alignment::default());
        // Right edges line up instead of left edges.
        assert!(placement.flipped_h);
        assert_eq!(placement.x, anchor.right() - 200.0);
        assert_eq!(placement.y, 80.0);
    }

    #[test]
    fn test_bottom_edge_overflow_flips_above() {
        let anchor = Bounds::new(100.0, 700.0, 80.0, 30.0);
        let placement = resolve_position(viewport(), anchor, (160.0, 200.0), &Alignment::default());
        assert!(placement.flipped_v);
        // Overlay bottom sits on the anchor top.
        assert_eq!(placement.y, 700.0 - 200.0);
    }

    #[test]
    fn test_flip_never_clamps() {
        // Even flipped the overlay may poke past the opposite edge; the
        // position is still the exact mirrored alignment.
        let anchor = Bounds::new(10.0, 50.0, 40.0, 20.0);
        let placement =
            resolve_position(viewport(), anchor, (2000.0, 100.0), &Alignment::default());
        assert!(placement.flipped_h);
        assert_eq!(placement.x, anchor.right() - 2000.0);
    }
}
