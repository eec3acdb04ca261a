//! Pressed/released toggle state
//!
//! A two-state machine shared by buttons, checkable menu items and radio
//! boxes. The machine itself is pure: it reports whether a transition
//! occurred and leaves notification (and its suppression) to the owning
//! widget, which is where the change handlers live.

/// Binary pressed/released state with idempotent transitions.
#[derive(Clone, Copy, Debug, Default)]
pub struct Toggle {
    pressed: bool,
}

impl Toggle {
    pub fn new(pressed: bool) -> Self {
        Self { pressed }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Transition toward a target state.
    ///
    /// With `force` the target is that state; otherwise it is the
    /// complement of the current state. Returns `Some(new_state)` if a
    /// transition occurred, `None` if the target equaled the current
    /// state (a silent no-op: no transition, nothing to notify).
    pub fn toggle(&mut self, force: Option<bool>) -> Option<bool> {
        let target = force.unwrap_or(!self.pressed);
        if target == self.pressed {
            return None;
        }
        self.pressed = target;
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_toggle_restores_state() {
        let mut toggle = Toggle::new(false);

        assert_eq!(toggle.toggle(None), Some(true));
        assert_eq!(toggle.toggle(None), Some(false));
        assert!(!toggle.is_pressed());
    }

    #[test]
    fn test_forced_same_state_is_silent() {
        let mut toggle = Toggle::new(true);

        assert_eq!(toggle.toggle(Some(true)), None);
        assert!(toggle.is_pressed());
    }

    #[test]
    fn test_forced_transition() {
        let mut toggle = Toggle::new(true);

        assert_eq!(toggle.toggle(Some(false)), Some(false));
        assert!(!toggle.is_pressed());
    }
}
