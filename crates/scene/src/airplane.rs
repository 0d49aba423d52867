use crate::parts::{BoxInstance, palette};
use driftscape_common::Transform;
use glam::{Quat, Vec3};
use std::f32::consts::TAU;

const HAIR_COUNT: usize = 12;

/// The pilot's animated hair: twelve tufts breathing between 75% and 100% height.
#[derive(Debug, Clone, PartialEq)]
pub struct Pilot {
    pub hair_angle: f32,
    pub hair_scales: [f32; HAIR_COUNT],
}

impl Default for Pilot {
    fn default() -> Self {
        Self {
            hair_angle: 0.0,
            hair_scales: [1.0; HAIR_COUNT],
        }
    }
}

impl Pilot {
    /// Rescale each tuft on a phase-shifted cosine, then advance the angle.
    pub fn update_hairs(&mut self, speed: f32) {
        for (i, scale) in self.hair_scales.iter_mut().enumerate() {
            *scale = 0.75 + (self.hair_angle + i as f32 / 3.0).cos() * 0.25;
        }
        self.hair_angle = (self.hair_angle + speed).rem_euclid(TAU);
    }
}

/// The plane: body transform, spinning propeller, pilot.
#[derive(Debug, Clone, PartialEq)]
pub struct Airplane {
    pub transform: Transform,
    /// Propeller rotation about the plane's X axis, wrapped into `[0, 2π)`.
    pub propeller_angle: f32,
    pub pilot: Pilot,
}

impl Default for Airplane {
    fn default() -> Self {
        Self {
            transform: Transform {
                position: Vec3::new(0.0, 100.0, 0.0),
                scale: Vec3::splat(0.25),
                ..Transform::default()
            },
            propeller_angle: 0.0,
            pilot: Pilot::default(),
        }
    }
}

impl Airplane {
    pub fn spin_propeller(&mut self, angle: f32) {
        self.propeller_angle = (self.propeller_angle + angle).rem_euclid(TAU);
    }

    /// World-space boxes making up the plane and pilot.
    pub fn parts(&self) -> Vec<BoxInstance> {
        let body = self.transform;
        let at = |x: f32, y: f32, z: f32| Transform::from_position(Vec3::new(x, y, z));
        let mut parts = vec![
            BoxInstance::new(&body, Vec3::new(80.0, 50.0, 50.0), palette::RED),
            BoxInstance::new(&body.then(&at(40.0, 0.0, 0.0)), Vec3::new(20.0, 50.0, 50.0), palette::WHITE),
            BoxInstance::new(&body.then(&at(-35.0, 25.0, 0.0)), Vec3::new(15.0, 20.0, 5.0), palette::RED),
            BoxInstance::new(&body, Vec3::new(40.0, 8.0, 150.0), palette::RED),
        ];

        let propeller = body.then(&Transform {
            position: Vec3::new(50.0, 0.0, 0.0),
            rotation: Quat::from_rotation_x(self.propeller_angle),
            ..Transform::default()
        });
        parts.push(BoxInstance::new(&propeller, Vec3::new(20.0, 10.0, 10.0), palette::BROWN));
        parts.push(BoxInstance::new(
            &propeller.then(&at(8.0, 0.0, 0.0)),
            Vec3::new(1.0, 100.0, 20.0),
            palette::BROWN_DARK,
        ));

        let pilot = body.then(&at(-10.0, 27.0, 0.0));
        parts.push(BoxInstance::new(&pilot.then(&at(2.0, -12.0, 0.0)), Vec3::splat(15.0), palette::BROWN));
        parts.push(BoxInstance::new(&pilot, Vec3::splat(10.0), palette::PINK));

        // Tufts sit on a 3x4 grid and grow upward from their base.
        let hairs = pilot.then(&at(-5.0, 5.0, 0.0));
        for (i, &scale) in self.pilot.hair_scales.iter().enumerate() {
            let col = (i % 3) as f32;
            let row = (i / 3) as f32;
            let height = 4.0 * scale;
            let tuft = hairs.then(&at(-4.0 + row * 4.0, height / 2.0, -4.0 + col * 4.0));
            parts.push(BoxInstance::new(&tuft, Vec3::new(4.0, height, 4.0), palette::BROWN));
        }
        parts
    }
}
