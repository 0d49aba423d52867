use driftscape_common::Transform;
use glam::{Mat4, Vec3};

/// A colored box in world space, drawn with the shared unit-cube mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxInstance {
    /// Unit cube to world, with the box size folded into the scale.
    pub model: Mat4,
    pub color: [f32; 4],
}

impl BoxInstance {
    /// Box of `size` placed by `world` (a transform already in world space).
    pub fn new(world: &Transform, size: Vec3, color: [f32; 4]) -> Self {
        Self {
            model: world.matrix() * Mat4::from_scale(size),
            color,
        }
    }
}

/// Flat colors for the flight scene.
pub mod palette {
    pub const RED: [f32; 4] = [0.831, 0.306, 0.306, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BROWN: [f32; 4] = [0.349, 0.2, 0.18, 1.0];
    pub const BROWN_DARK: [f32; 4] = [0.137, 0.098, 0.059, 1.0];
    pub const PINK: [f32; 4] = [0.961, 0.596, 0.431, 1.0];
    pub const SEA: [f32; 4] = [0.133, 0.545, 0.133, 1.0];
}
