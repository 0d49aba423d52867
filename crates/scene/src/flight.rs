use crate::{Airplane, BoxInstance, SceneError, Sky};
use driftscape_common::{FlightConfig, SceneConfig};
use driftscape_input::{Action, PointerState, normalize};
use driftscape_waves::Sea;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// The flight scene: plane over a rolling sea under a ring of clouds.
pub struct FlightScene {
    config: FlightConfig,
    pub sea: Sea,
    pub sky: Sky,
    pub airplane: Airplane,
    pointer: PointerState,
    frame: u64,
}

impl FlightScene {
    pub fn new(config: &SceneConfig, seed: u64) -> Result<Self, SceneError> {
        config.wave.validate()?;
        config.flight.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let sea = Sea::new(&config.wave, &mut rng);
        let sky = Sky::new(config.flight.cloud_count, &mut rng);
        tracing::info!(
            sea_vertices = sea.field.len(),
            clouds = sky.clouds.len(),
            "flight scene built"
        );
        Ok(Self {
            config: config.flight.clone(),
            sea,
            sky,
            airplane: Airplane::default(),
            pointer: PointerState::new(),
            frame: 0,
        })
    }

    /// One render tick.
    pub fn frame(&mut self) {
        self.airplane.spin_propeller(self.config.propeller_spin_per_frame);
        self.sea.spin(self.config.sea_spin_per_frame);
        self.sky.spin(self.config.sky_spin_per_frame);
        self.airplane.pilot.update_hairs(self.config.hair_speed);
        self.sea.move_waves();
        self.frame += 1;
    }

    /// Route an input action; steering moves the plane once engaged.
    pub fn handle(&mut self, action: Action) {
        if self.pointer.apply(action) {
            self.steer();
        }
    }

    fn steer(&mut self) {
        let p = self.pointer.position;
        let (tx, ty) = (self.config.target_x, self.config.target_y);
        let x = normalize(p.x, -1.0, 1.0, tx.min, tx.max);
        let y = normalize(p.y, -1.0, 1.0, ty.min, ty.max);
        let position = &mut self.airplane.transform.position;
        position.x = x;
        position.y = y;
        self.airplane.spin_propeller(self.config.propeller_spin_per_move);
        tracing::trace!(x, y, "plane steered");
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Plane and cloud boxes in world space.
    pub fn boxes(&self) -> Vec<BoxInstance> {
        let mut boxes = self.airplane.parts();
        boxes.extend(self.sky.parts());
        boxes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn scene() -> FlightScene {
        FlightScene::new(&SceneConfig::default(), 8).unwrap()
    }

    #[test]
    fn frame_advances_everything() {
        let mut s = scene();
        s.frame();
        s.frame();
        assert_eq!(s.frame_count(), 2);
        assert_eq!(s.sea.field.ticks(), 2);
        assert!((s.sky.rotation_z - 0.008).abs() < 1e-6);
        assert!((s.airplane.propeller_angle - 0.2).abs() < 1e-6);
        // scene spin plus per-tick wave drift
        assert!((s.sea.rotation_z - 0.012).abs() < 1e-6);
    }

    #[test]
    fn pointer_ignored_until_click() {
        let mut s = scene();
        let start = s.airplane.transform.position;
        s.handle(Action::PointerMoved(Vec2::new(1.0, 1.0)));
        assert_eq!(s.airplane.transform.position, start);

        s.handle(Action::Click);
        s.handle(Action::PointerMoved(Vec2::new(1.0, 1.0)));
        assert_eq!(s.airplane.transform.position.x, 25.0);
        assert_eq!(s.airplane.transform.position.y, 120.0);
        assert!((s.airplane.propeller_angle - 0.3).abs() < 1e-6);
    }

    #[test]
    fn steering_clamps_to_target_ranges() {
        let mut s = scene();
        s.handle(Action::Click);
        s.handle(Action::PointerMoved(Vec2::new(-3.0, 0.0)));
        assert_eq!(s.airplane.transform.position.x, -25.0);
        assert_eq!(s.airplane.transform.position.y, 95.0);
    }

    #[test]
    fn boxes_include_plane_and_clouds() {
        let s = scene();
        assert!(s.boxes().len() > s.airplane.parts().len());
    }
}
