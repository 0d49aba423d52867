//! Scene configuration: every constant the animations read, loadable from YAML.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a scene configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Largest accepted instance slot count (`grid_size² * max_column_height`).
pub const MAX_INSTANCES: usize = 4_000_000;
/// Largest accepted sea mesh vertex count.
pub const MAX_SEA_VERTICES: usize = 1_000_000;
/// Largest accepted cloud count.
pub const MAX_CLOUDS: u32 = 1_000;

/// Closed numeric interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min > self.max {
            return Err(ConfigError::Invalid {
                field,
                reason: format!("expected finite min <= max, got [{}, {}]", self.min, self.max),
            });
        }
        Ok(())
    }
}

/// Wave field constants for the sea mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Displacement radius per vertex, drawn once at creation.
    pub amplitude: Span,
    /// Phase advance per tick in radians, drawn once at creation.
    pub speed: Span,
    /// Whole-mesh rotation about the cylinder axis per tick.
    pub drift_per_tick: f32,
    pub radius: f32,
    pub length: f32,
    pub radial_segments: u32,
    pub length_segments: u32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            amplitude: Span::new(5.0, 20.0),
            speed: Span::new(0.016, 0.048),
            drift_per_tick: 0.005,
            radius: 600.0,
            length: 800.0,
            radial_segments: 40,
            length_segments: 10,
        }
    }
}

impl WaveConfig {
    /// Sea mesh vertices: one ring per length segment boundary plus two cap
    /// centres. `None` if the count does not fit in `usize`.
    pub fn vertex_count(&self) -> Option<usize> {
        let rings = (self.length_segments as usize).checked_add(1)?;
        rings
            .checked_mul(self.radial_segments as usize)?
            .checked_add(2)
    }
}

/// Voxel cityscape constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoxelConfig {
    /// Columns per side; the grid holds `grid_size * grid_size` columns.
    pub grid_size: u32,
    /// Instance slots stacked per column, and the ceiling for target heights.
    pub max_column_height: u32,
    /// Initial heights are uniform in `[1, initial_height_max]`.
    pub initial_height_max: u32,
    /// Wall-clock period of the region mutation timer.
    pub mutation_interval_ms: u64,
    /// Upper bound on a mutated region's width and depth.
    pub max_region_extent: u32,
    /// Fraction of the remaining distance covered per settle step.
    pub settle_rate: f32,
    /// Columns closer than this to their target snap and leave the active set.
    pub settle_epsilon: f32,
    /// Wireframe edge color, linear RGBA (default #33b5e5).
    pub edge_color: [f32; 4],
}

impl Default for VoxelConfig {
    fn default() -> Self {
        Self {
            grid_size: 100,
            max_column_height: 20,
            initial_height_max: 5,
            mutation_interval_ms: 500,
            max_region_extent: 10,
            settle_rate: 0.1,
            settle_epsilon: 0.01,
            edge_color: [0.2, 0.71, 0.898, 1.0],
        }
    }
}

impl VoxelConfig {
    /// Only meaningful for a validated config; see [`Self::checked_instance_count`].
    pub fn column_count(&self) -> usize {
        (self.grid_size as usize) * (self.grid_size as usize)
    }

    pub fn instance_count(&self) -> usize {
        self.column_count() * self.max_column_height as usize
    }

    /// `grid_size² * max_column_height`, or `None` on overflow.
    pub fn checked_instance_count(&self) -> Option<usize> {
        (self.grid_size as usize)
            .checked_mul(self.grid_size as usize)?
            .checked_mul(self.max_column_height as usize)
    }
}

/// Flight scene constants (plane, sky, pointer mapping).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    pub sea_spin_per_frame: f32,
    pub sky_spin_per_frame: f32,
    pub propeller_spin_per_frame: f32,
    /// Extra propeller spin applied whenever the pointer steers the plane.
    pub propeller_spin_per_move: f32,
    pub hair_speed: f32,
    pub cloud_count: u32,
    /// Horizontal range the normalized pointer maps onto.
    pub target_x: Span,
    /// Vertical range the normalized pointer maps onto.
    pub target_y: Span,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            sea_spin_per_frame: 0.001,
            sky_spin_per_frame: 0.004,
            propeller_spin_per_frame: 0.1,
            propeller_spin_per_move: 0.3,
            hair_speed: 0.16,
            cloud_count: 30,
            target_x: Span::new(-25.0, 25.0),
            target_y: Span::new(70.0, 120.0),
        }
    }
}

/// Complete configuration for both scenes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub wave: WaveConfig,
    pub voxel: VoxelConfig,
    pub flight: FlightConfig,
}

impl SceneConfig {
    /// Parse and validate a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn load_yaml(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&yaml)?;
        tracing::debug!(path = %path.display(), "loaded scene config");
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn save_yaml(&self, path: &Path) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.wave.validate()?;
        self.voxel.validate()?;
        self.flight.validate()
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

impl WaveConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.amplitude.check("wave.amplitude")?;
        self.speed.check("wave.speed")?;
        if self.amplitude.min < 0.0 {
            return Err(invalid("wave.amplitude", "must not be negative"));
        }
        if self.radius <= 0.0 || self.length <= 0.0 {
            return Err(invalid("wave.radius", "sea dimensions must be positive"));
        }
        if self.radial_segments < 3 {
            return Err(invalid("wave.radial_segments", "need at least 3 segments"));
        }
        if self.length_segments == 0 {
            return Err(invalid("wave.length_segments", "need at least 1 segment"));
        }
        match self.vertex_count() {
            Some(n) if n <= MAX_SEA_VERTICES => Ok(()),
            _ => Err(invalid(
                "wave.radial_segments",
                format!(
                    "{} x {} segments exceeds {MAX_SEA_VERTICES} sea vertices",
                    self.radial_segments, self.length_segments
                ),
            )),
        }
    }
}

impl VoxelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(invalid("voxel.grid_size", "must be positive"));
        }
        if self.max_column_height == 0 {
            return Err(invalid("voxel.max_column_height", "must be at least 1"));
        }
        if self.initial_height_max == 0 || self.initial_height_max > self.max_column_height {
            return Err(invalid(
                "voxel.initial_height_max",
                format!("must be in [1, {}]", self.max_column_height),
            ));
        }
        if self.mutation_interval_ms == 0 {
            return Err(invalid("voxel.mutation_interval_ms", "must be positive"));
        }
        if self.max_region_extent == 0 {
            return Err(invalid("voxel.max_region_extent", "must be at least 1"));
        }
        if !(self.settle_rate > 0.0 && self.settle_rate <= 1.0) {
            return Err(invalid("voxel.settle_rate", "must be in (0, 1]"));
        }
        if !(self.settle_epsilon > 0.0 && self.settle_epsilon < 1.0) {
            return Err(invalid("voxel.settle_epsilon", "must be in (0, 1)"));
        }
        if !self.edge_color.iter().all(|c| (0.0..=1.0).contains(c)) {
            return Err(invalid("voxel.edge_color", "components must be in [0, 1]"));
        }
        match self.checked_instance_count() {
            Some(n) if n <= MAX_INSTANCES => Ok(()),
            _ => Err(invalid(
                "voxel.grid_size",
                format!(
                    "{0}x{0} grid of {1} slots exceeds {MAX_INSTANCES} instances",
                    self.grid_size, self.max_column_height
                ),
            )),
        }
    }
}

impl FlightConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.target_x.check("flight.target_x")?;
        self.target_y.check("flight.target_y")?;
        if self.cloud_count > MAX_CLOUDS {
            return Err(invalid(
                "flight.cloud_count",
                format!("must be at most {MAX_CLOUDS}"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_constants() {
        let c = SceneConfig::default();
        assert_eq!(c.voxel.grid_size, 100);
        assert_eq!(c.voxel.max_column_height, 20);
        assert_eq!(c.voxel.mutation_interval_ms, 500);
        assert_eq!(c.voxel.settle_rate, 0.1);
        assert_eq!(c.voxel.settle_epsilon, 0.01);
        assert_eq!(c.wave.amplitude, Span::new(5.0, 20.0));
        assert_eq!(c.wave.speed, Span::new(0.016, 0.048));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let c = SceneConfig::from_yaml_str("voxel:\n  grid_size: 8\n").unwrap();
        assert_eq!(c.voxel.grid_size, 8);
        assert_eq!(c.voxel.max_column_height, 20);
        assert_eq!(c.wave, WaveConfig::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = SceneConfig::from_yaml_str("voxel:\n  grid_size: 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "voxel.grid_size",
                ..
            }
        ));

        let err = SceneConfig::from_yaml_str("voxel:\n  settle_rate: 1.5\n").unwrap_err();
        assert!(err.to_string().contains("settle_rate"));

        let err =
            SceneConfig::from_yaml_str("wave:\n  speed: { min: 0.5, max: 0.1 }\n").unwrap_err();
        assert!(err.to_string().contains("wave.speed"));
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let err = SceneConfig::from_yaml_str("voxel: [not, a, map").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.yaml");
        let mut config = SceneConfig::default();
        config.voxel.grid_size = 32;
        config.flight.cloud_count = 12;
        config.save_yaml(&path).unwrap();

        let loaded = SceneConfig::load_yaml(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SceneConfig::load_yaml(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    fn invalid_field(yaml: &str) -> &'static str {
        match SceneConfig::from_yaml_str(yaml) {
            Err(ConfigError::Invalid { field, .. }) => field,
            other => panic!("expected Invalid for {yaml:?}, got {other:?}"),
        }
    }

    #[test]
    fn oversized_values_are_rejected() {
        assert_eq!(invalid_field("voxel:\n  grid_size: 200000\n"), "voxel.grid_size");
        assert_eq!(invalid_field("voxel:\n  grid_size: 4294967295\n"), "voxel.grid_size");
        assert_eq!(
            invalid_field("voxel:\n  max_column_height: 4000000000\n"),
            "voxel.grid_size"
        );
        assert_eq!(
            invalid_field("wave:\n  radial_segments: 4294967295\n"),
            "wave.radial_segments"
        );
        assert_eq!(
            invalid_field("wave:\n  length_segments: 4294967295\n"),
            "wave.radial_segments"
        );
        assert_eq!(invalid_field("flight:\n  cloud_count: 5000000\n"), "flight.cloud_count");
    }

    #[test]
    fn limits_are_inclusive() {
        let v = VoxelConfig {
            grid_size: 1000,
            max_column_height: 4,
            initial_height_max: 4,
            ..VoxelConfig::default()
        };
        assert_eq!(v.checked_instance_count(), Some(MAX_INSTANCES));
        assert!(v.validate().is_ok());

        let w = WaveConfig {
            radial_segments: 99_999,
            length_segments: 9,
            ..WaveConfig::default()
        };
        assert_eq!(w.vertex_count(), Some(999_992));
        assert!(w.validate().is_ok());
    }

    #[test]
    fn edge_color_is_configurable() {
        assert_eq!(VoxelConfig::default().edge_color, [0.2, 0.71, 0.898, 1.0]);
        let c = SceneConfig::from_yaml_str("voxel:\n  edge_color: [1.0, 0.0, 0.0, 1.0]\n")
            .unwrap();
        assert_eq!(c.voxel.edge_color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(
            invalid_field("voxel:\n  edge_color: [2.0, 0.0, 0.0, 1.0]\n"),
            "voxel.edge_color"
        );
    }

    #[test]
    fn instance_count_covers_every_slot() {
        let v = VoxelConfig::default();
        assert_eq!(v.column_count(), 10_000);
        assert_eq!(v.instance_count(), 200_000);
    }
}
