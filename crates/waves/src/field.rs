use driftscape_common::WaveConfig;
use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// Per-vertex wave state. Created once at mesh-build time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveVertex {
    /// Rest position captured at creation.
    pub base: Vec3,
    /// Current angle on the displacement circle, kept in `[0, 2π)`.
    pub phase: f32,
    pub amplitude: f32,
    /// Radians per tick.
    pub speed: f32,
}

impl WaveVertex {
    /// Position for the current phase. Z is never displaced.
    pub fn displaced(&self) -> Vec3 {
        let (sin, cos) = self.phase.sin_cos();
        Vec3::new(
            self.base.x + cos * self.amplitude,
            self.base.y + sin * self.amplitude,
            self.base.z,
        )
    }
}

/// A mesh's worth of wave vertices plus the displaced positions the renderer reads.
#[derive(Debug, Clone)]
pub struct WaveField {
    vertices: Vec<WaveVertex>,
    positions: Vec<Vec3>,
    ticks: u64,
    dirty: bool,
}

impl WaveField {
    /// Attach wave state to every base position, drawing amplitude and speed
    /// from the configured ranges and a uniform starting phase.
    pub fn new<R: Rng + ?Sized>(base: &[Vec3], config: &WaveConfig, rng: &mut R) -> Self {
        let vertices = base
            .iter()
            .map(|&p| WaveVertex {
                base: p,
                phase: rng.gen_range(0.0..TAU),
                amplitude: rng.gen_range(config.amplitude.min..=config.amplitude.max),
                speed: rng.gen_range(config.speed.min..=config.speed.max),
            })
            .collect();
        Self::from_vertices(vertices)
    }

    /// Build from explicit vertex state. Phases are wrapped into `[0, 2π)`.
    pub fn from_vertices(mut vertices: Vec<WaveVertex>) -> Self {
        for v in &mut vertices {
            v.phase = v.phase.rem_euclid(TAU);
        }
        let positions = vertices.iter().map(WaveVertex::displaced).collect();
        Self {
            vertices,
            positions,
            ticks: 0,
            dirty: true,
        }
    }

    /// Displace every vertex for its current phase, then advance the phase.
    pub fn tick(&mut self) {
        let _span = tracing::trace_span!("move_waves", vertices = self.vertices.len()).entered();
        for (v, out) in self.vertices.iter_mut().zip(self.positions.iter_mut()) {
            *out = v.displaced();
            v.phase = (v.phase + v.speed).rem_euclid(TAU);
        }
        self.ticks += 1;
        self.dirty = true;
    }

    pub fn vertices(&self) -> &[WaveVertex] {
        &self.vertices
    }

    /// Displaced positions as of the last tick.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Consume the dirty flag. `true` means positions changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
