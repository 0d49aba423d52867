use glam::{Mat4, Vec3};

/// Orthographic camera looking down the diagonal for the voxel look.
/// Camera state exists outside the animated scene.
#[derive(Debug, Clone)]
pub struct IsometricCamera {
    pub eye: Vec3,
    pub target: Vec3,
    /// Half the visible height in world units.
    pub half_height: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for IsometricCamera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(80.0, 80.0, 80.0),
            target: Vec3::ZERO,
            half_height: 20.0,
            aspect: 16.0 / 9.0,
            near: 1.0,
            far: 1000.0,
        }
    }
}

impl IsometricCamera {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let d = self.half_height;
        Mat4::orthographic_rh(-d * self.aspect, d * self.aspect, -d, d, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Perspective camera behind and above the plane, looking down -Z.
#[derive(Debug, Clone)]
pub struct ChaseCamera {
    pub position: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ChaseCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(3.0, 110.0, 100.0),
            fov: 80.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 1.0,
            far: 10_000.0,
        }
    }
}

impl ChaseCamera {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position - Vec3::Z, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isometric_sees_origin() {
        let cam = IsometricCamera::default();
        let clip = cam.view_projection() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn isometric_width_follows_aspect() {
        let mut cam = IsometricCamera::default();
        cam.aspect = 2.0;
        let p = cam.projection_matrix();
        // x scale is 1 / (d * aspect)
        assert!((p.x_axis.x - 1.0 / 40.0).abs() < 1e-6);
    }

    #[test]
    fn chase_sees_plane() {
        let cam = ChaseCamera::default();
        let clip = cam.view_projection() * glam::Vec4::new(0.0, 100.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1.0 && ndc.y.abs() < 1.0);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
