use crate::{SeaGeometry, WaveField};
use driftscape_common::WaveConfig;
use glam::{Mat4, Quat, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

/// The animated sea: a wave field over a cylinder plus whole-mesh drift.
#[derive(Debug, Clone)]
pub struct Sea {
    pub field: WaveField,
    /// Triangle indices into `field.positions()`.
    pub indices: Vec<u32>,
    /// Rotation about the cylinder (Z) axis, wrapped into `[0, 2π)`.
    pub rotation_z: f32,
    pub position: Vec3,
    drift_per_tick: f32,
}

impl Sea {
    pub fn new<R: Rng + ?Sized>(config: &WaveConfig, rng: &mut R) -> Self {
        let geometry = SeaGeometry::cylinder(
            config.radius,
            config.length,
            config.radial_segments,
            config.length_segments,
        );
        let field = WaveField::new(&geometry.positions, config, rng);
        tracing::debug!(
            vertices = field.len(),
            triangles = geometry.triangle_count(),
            "sea mesh built"
        );
        Self {
            field,
            indices: geometry.indices,
            rotation_z: 0.0,
            position: Vec3::new(0.0, -config.radius, 0.0),
            drift_per_tick: config.drift_per_tick,
        }
    }

    /// One wave tick: displace all vertices, then drift the whole mesh.
    pub fn move_waves(&mut self) {
        self.field.tick();
        self.spin(self.drift_per_tick);
    }

    /// Rotate the whole mesh about its axis.
    pub fn spin(&mut self, angle: f32) {
        self.rotation_z = (self.rotation_z + angle).rem_euclid(TAU);
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(Quat::from_rotation_z(self.rotation_z), self.position)
    }
}
