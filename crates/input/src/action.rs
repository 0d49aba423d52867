use glam::Vec2;

/// A high-level input action that any embodiment (window, CLI replay) can produce.
///
/// Scenes consume actions, never raw input events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Pointer moved; position in normalized device coordinates, `[-1, 1]` on both axes.
    PointerMoved(Vec2),
    /// Primary button clicked.
    Click,
    /// No-op (used for input that isn't bound to anything).
    Noop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_moved_carries_position() {
        let a = Action::PointerMoved(Vec2::new(0.5, -0.5));
        assert!(matches!(a, Action::PointerMoved(p) if p.x == 0.5 && p.y == -0.5));
    }

    #[test]
    fn click_and_noop_are_distinct() {
        assert_ne!(Action::Click, Action::Noop);
    }
}
