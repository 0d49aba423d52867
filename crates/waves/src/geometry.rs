use glam::{Quat, Vec3};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Indexed triangle mesh for the sea.
///
/// Every position is unique: the cylinder seam and the cap rim share vertices
/// with the side wall, so displacing a vertex keeps the surface closed.
#[derive(Debug, Clone, PartialEq)]
pub struct SeaGeometry {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl SeaGeometry {
    /// Capped cylinder lying on its side with its axis along Z.
    ///
    /// The cylinder is built around the Y axis (rings from `+length/2` down to
    /// `-length/2`) and then rotated `-π/2` about X.
    pub fn cylinder(radius: f32, length: f32, radial_segments: u32, length_segments: u32) -> Self {
        let radial = radial_segments.max(3);
        let rings = length_segments.max(1).saturating_add(1);
        let half = length * 0.5;
        let lay_down = Quat::from_rotation_x(-FRAC_PI_2);

        let mut positions = Vec::with_capacity(rings as usize * radial as usize + 2);
        for iy in 0..rings {
            let v = iy as f32 / (rings - 1) as f32;
            let y = -v * length + half;
            for ix in 0..radial {
                let theta = ix as f32 / radial as f32 * TAU;
                positions.push(lay_down * Vec3::new(radius * theta.sin(), y, radius * theta.cos()));
            }
        }
        let top = positions.len() as u32;
        positions.push(lay_down * Vec3::new(0.0, half, 0.0));
        let bottom = positions.len() as u32;
        positions.push(lay_down * Vec3::new(0.0, -half, 0.0));

        let ring = |iy: u32, ix: u32| iy * radial + ix % radial;
        let mut indices = Vec::with_capacity(rings as usize * radial as usize * 6);
        for iy in 0..rings - 1 {
            for ix in 0..radial {
                let a = ring(iy, ix);
                let b = ring(iy + 1, ix);
                let c = ring(iy + 1, ix + 1);
                let d = ring(iy, ix + 1);
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
        for ix in 0..radial {
            indices.extend_from_slice(&[ring(0, ix), top, ring(0, ix + 1)]);
            indices.extend_from_slice(&[ring(rings - 1, ix + 1), bottom, ring(rings - 1, ix)]);
        }

        Self { positions, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sea_has_merged_vertices() {
        let g = SeaGeometry::cylinder(600.0, 800.0, 40, 10);
        // 11 rings of 40 plus two cap centres
        assert_eq!(g.vertex_count(), 442);
        assert_eq!(g.triangle_count(), 10 * 40 * 2 + 40 * 2);
    }

    #[test]
    fn positions_are_unique() {
        let g = SeaGeometry::cylinder(10.0, 20.0, 8, 3);
        for (i, a) in g.positions.iter().enumerate() {
            for b in &g.positions[i + 1..] {
                assert!((*a - *b).length() > 1e-3, "duplicate vertex {a:?}");
            }
        }
    }

    #[test]
    fn axis_lies_along_z() {
        let g = SeaGeometry::cylinder(600.0, 800.0, 40, 10);
        for p in &g.positions {
            let r = (p.x * p.x + p.y * p.y).sqrt();
            assert!(r < 600.0 + 1e-2);
            assert!(p.z.abs() <= 400.0 + 1e-2);
        }
        // first ring sits at one end of the axis
        assert!((g.positions[0].z - -400.0).abs() < 1e-2);
    }

    #[test]
    fn indices_in_range() {
        let g = SeaGeometry::cylinder(5.0, 5.0, 6, 2);
        let n = g.vertex_count() as u32;
        assert!(g.indices.iter().all(|&i| i < n));
    }
}
