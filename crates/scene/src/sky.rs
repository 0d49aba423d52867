use crate::parts::{BoxInstance, palette};
use driftscape_common::Transform;
use glam::{Mat4, Quat, Vec3};
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, TAU};

const BLOCK_SIZE: f32 = 20.0;

/// A clump of 3 to 5 jittered cubes.
#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    /// Placement on the sky ring, relative to the sky's centre.
    pub transform: Transform,
    /// Block placements relative to the cloud.
    pub blocks: Vec<Transform>,
}

impl Cloud {
    pub fn random<R: Rng + ?Sized>(rng: &mut R, transform: Transform) -> Self {
        let count = rng.gen_range(3..=5);
        let blocks = (0..count)
            .map(|i| Transform {
                position: Vec3::new(i as f32 * 15.0, rng.gen_range(0.0..10.0), rng.gen_range(0.0..10.0)),
                rotation: Quat::from_rotation_z(rng.gen_range(0.0..TAU))
                    * Quat::from_rotation_y(rng.gen_range(0.0..TAU)),
                scale: Vec3::splat(rng.gen_range(0.1..1.0)),
            })
            .collect();
        Self { transform, blocks }
    }
}

/// Ring of clouds circling the sea, rotating as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct Sky {
    pub clouds: Vec<Cloud>,
    pub rotation_z: f32,
    pub position: Vec3,
}

impl Sky {
    /// Clouds at equal angles around the ring, at random distance, depth and size.
    pub fn new<R: Rng + ?Sized>(cloud_count: u32, rng: &mut R) -> Self {
        let step = TAU / cloud_count.max(1) as f32;
        let clouds = (0..cloud_count)
            .map(|i| {
                let angle = step * i as f32;
                let distance = rng.gen_range(750.0..950.0);
                let placement = Transform {
                    position: Vec3::new(
                        angle.cos() * distance,
                        angle.sin() * distance,
                        rng.gen_range(-800.0..-400.0),
                    ),
                    rotation: Quat::from_rotation_z(angle + FRAC_PI_2),
                    scale: Vec3::splat(rng.gen_range(1.0..3.0)),
                };
                Cloud::random(rng, placement)
            })
            .collect();
        Self {
            clouds,
            rotation_z: 0.0,
            position: Vec3::new(0.0, -600.0, 0.0),
        }
    }

    pub fn spin(&mut self, angle: f32) {
        self.rotation_z = (self.rotation_z + angle).rem_euclid(TAU);
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(Quat::from_rotation_z(self.rotation_z), self.position)
    }

    /// World-space boxes for every cloud block.
    pub fn parts(&self) -> Vec<BoxInstance> {
        let sky = self.model_matrix();
        let block = Mat4::from_scale(Vec3::splat(BLOCK_SIZE));
        self.clouds
            .iter()
            .flat_map(|cloud| {
                let placed = sky * cloud.transform.matrix();
                cloud.blocks.iter().map(move |b| BoxInstance {
                    model: placed * b.matrix() * block,
                    color: palette::WHITE,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn clouds_on_ring() {
        let mut rng = StdRng::seed_from_u64(4);
        let sky = Sky::new(30, &mut rng);
        assert_eq!(sky.clouds.len(), 30);
        for cloud in &sky.clouds {
            let p = cloud.transform.position;
            let r = (p.x * p.x + p.y * p.y).sqrt();
            assert!((750.0..950.0 + 1e-2).contains(&r));
            assert!((-800.0..-400.0).contains(&p.z));
            assert!((3..=5).contains(&cloud.blocks.len()));
        }
    }

    #[test]
    fn parts_count_matches_blocks() {
        let mut rng = StdRng::seed_from_u64(4);
        let sky = Sky::new(5, &mut rng);
        let blocks: usize = sky.clouds.iter().map(|c| c.blocks.len()).sum();
        assert_eq!(sky.parts().len(), blocks);
    }

    #[test]
    fn spin_moves_clouds() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut sky = Sky::new(1, &mut rng);
        let before = sky.parts()[0].model.w_axis;
        sky.spin(0.5);
        let after = sky.parts()[0].model.w_axis;
        assert!((before - after).length() > 1.0);
    }
}
