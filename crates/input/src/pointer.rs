use crate::Action;
use glam::Vec2;

/// Clamp `v` into `[vmin, vmax]` and map it linearly onto `[tmin, tmax]`.
///
/// A degenerate source range (`vmin == vmax`) maps everything to `tmin`.
pub fn normalize(v: f32, vmin: f32, vmax: f32, tmin: f32, tmax: f32) -> f32 {
    let nv = v.min(vmax).max(vmin);
    let dv = vmax - vmin;
    if dv == 0.0 {
        return tmin;
    }
    let pc = (nv - vmin) / dv;
    let dt = tmax - tmin;
    tmin + pc * dt
}

/// Convert a pointer position in surface pixels to normalized device coordinates.
///
/// X grows to the right and Y grows upward, both in `[-1, 1]` for positions
/// inside the surface. Returns `None` for a zero-sized surface.
pub fn pointer_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Option<Vec2> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    Some(Vec2::new(-1.0 + (x / width) * 2.0, 1.0 - (y / height) * 2.0))
}

/// Last known pointer position plus whether the user has engaged steering.
///
/// Pointer moves only steer once a click has been seen.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub engaged: bool,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an action into the state. Returns `true` when the result should steer.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::PointerMoved(p) => {
                self.position = p;
                self.engaged
            }
            Action::Click => {
                if !self.engaged {
                    tracing::debug!("pointer steering engaged");
                }
                self.engaged = true;
                false
            }
            Action::Noop => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_maps_center_to_center() {
        assert_eq!(normalize(0.0, -1.0, 1.0, -25.0, 25.0), 0.0);
    }

    #[test]
    fn normalize_clamps_below_range() {
        assert_eq!(normalize(-2.0, -1.0, 1.0, -25.0, 25.0), -25.0);
    }

    #[test]
    fn normalize_maps_upper_bound() {
        assert_eq!(normalize(1.0, -1.0, 1.0, 70.0, 120.0), 120.0);
        assert_eq!(normalize(7.0, -1.0, 1.0, 70.0, 120.0), 120.0);
    }

    #[test]
    fn normalize_degenerate_range() {
        assert_eq!(normalize(3.0, 1.0, 1.0, 10.0, 20.0), 10.0);
    }

    #[test]
    fn pointer_corners() {
        let tl = pointer_to_ndc(0.0, 0.0, 800.0, 600.0).unwrap();
        assert_eq!(tl, Vec2::new(-1.0, 1.0));
        let br = pointer_to_ndc(800.0, 600.0, 800.0, 600.0).unwrap();
        assert_eq!(br, Vec2::new(1.0, -1.0));
        let mid = pointer_to_ndc(400.0, 300.0, 800.0, 600.0).unwrap();
        assert_eq!(mid, Vec2::ZERO);
    }

    #[test]
    fn pointer_zero_surface() {
        assert!(pointer_to_ndc(10.0, 10.0, 0.0, 600.0).is_none());
        assert!(pointer_to_ndc(10.0, 10.0, 800.0, 0.0).is_none());
    }

    #[test]
    fn moves_steer_only_after_click() {
        let mut s = PointerState::new();
        assert!(!s.apply(Action::PointerMoved(Vec2::new(0.5, 0.5))));
        assert_eq!(s.position, Vec2::new(0.5, 0.5));
        assert!(!s.apply(Action::Click));
        assert!(s.engaged);
        assert!(s.apply(Action::PointerMoved(Vec2::new(-0.5, 0.0))));
        assert!(!s.apply(Action::Noop));
    }
}
