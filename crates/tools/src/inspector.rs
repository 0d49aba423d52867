use driftscape_scene::{Cityscape, FlightScene};
use serde::Serialize;

/// Scene inspector for developer tooling.
///
/// Provides read-only queries against scene state for the CLI dump and the
/// desktop side panel.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the voxel cityscape.
    pub fn cityscape(scene: &Cityscape) -> CityscapeSummary {
        let grid = scene.grid();
        let columns = grid.columns();
        let (sum, max) = columns
            .iter()
            .fold((0.0_f64, 0.0_f32), |(sum, max), c| {
                (sum + c.current as f64, max.max(c.current))
            });
        let mean_height = if columns.is_empty() {
            0.0
        } else {
            (sum / columns.len() as f64) as f32
        };
        CityscapeSummary {
            frame: scene.frame(),
            grid_size: grid.grid_size(),
            columns: columns.len(),
            active: grid.active_count(),
            mean_height,
            max_height: max,
            torn_down: scene.is_torn_down(),
        }
    }

    /// Inspect one column. `None` when `(x, z)` lies outside the grid.
    pub fn column(scene: &Cityscape, x: u32, z: u32) -> Option<ColumnInfo> {
        let grid = scene.grid();
        if x >= grid.grid_size() || z >= grid.grid_size() {
            return None;
        }
        let index = grid.index(x, z);
        let column = grid.column(index);
        Some(ColumnInfo {
            x,
            z,
            target: column.target,
            current: column.current,
            active: grid.is_active(index),
        })
    }

    /// Produce a summary of the flight scene.
    pub fn flight(scene: &FlightScene) -> FlightSummary {
        let p = scene.airplane.transform.position;
        FlightSummary {
            frame: scene.frame_count(),
            plane_position: [p.x, p.y, p.z],
            propeller_angle: scene.airplane.propeller_angle,
            sea_vertices: scene.sea.field.len(),
            wave_ticks: scene.sea.field.ticks(),
            sea_rotation: scene.sea.rotation_z,
            clouds: scene.sky.clouds.len(),
            steering: scene.pointer().engaged,
        }
    }
}

/// Summary of cityscape state for the inspector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityscapeSummary {
    pub frame: u64,
    pub grid_size: u32,
    pub columns: usize,
    /// Columns still moving toward their target.
    pub active: usize,
    pub mean_height: f32,
    pub max_height: f32,
    pub torn_down: bool,
}

impl std::fmt::Display for CityscapeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cityscape: frame={} grid={}x{} columns={} active={} mean_height={:.2} max_height={:.2}",
            self.frame,
            self.grid_size,
            self.grid_size,
            self.columns,
            self.active,
            self.mean_height,
            self.max_height,
        )?;
        if self.torn_down {
            write!(f, " (torn down)")?;
        }
        Ok(())
    }
}

/// Detailed info about a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub x: u32,
    pub z: u32,
    pub target: u32,
    pub current: f32,
    pub active: bool,
}

impl std::fmt::Display for ColumnInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Column ({}, {}) current={:.3} target={} active={}",
            self.x, self.z, self.current, self.target, self.active
        )
    }
}

/// Summary of flight scene state for the inspector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSummary {
    pub frame: u64,
    pub plane_position: [f32; 3],
    pub propeller_angle: f32,
    pub sea_vertices: usize,
    pub wave_ticks: u64,
    pub sea_rotation: f32,
    pub clouds: usize,
    /// Whether a click has engaged pointer steering.
    pub steering: bool,
}

impl std::fmt::Display for FlightSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [x, y, z] = self.plane_position;
        write!(
            f,
            "Flight: frame={} plane=({x:.2}, {y:.2}, {z:.2}) sea_vertices={} wave_ticks={} clouds={} steering={}",
            self.frame, self.sea_vertices, self.wave_ticks, self.clouds, self.steering
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftscape_common::{SceneConfig, VoxelConfig};
    use driftscape_scene::SceneCommand;
    use driftscape_voxel::RegionMutation;
    use std::time::Duration;

    fn city() -> Cityscape {
        let config = VoxelConfig {
            grid_size: 6,
            max_column_height: 10,
            ..VoxelConfig::default()
        };
        Cityscape::new(&config, 5).unwrap().with_external_mutations()
    }

    #[test]
    fn summary_fresh_city() {
        let scene = city();
        let summary = SceneInspector::cityscape(&scene);
        assert_eq!(summary.frame, 0);
        assert_eq!(summary.columns, 36);
        assert_eq!(summary.active, 0);
        assert!(summary.max_height <= 5.0);
        assert!(summary.mean_height <= summary.max_height);
    }

    #[test]
    fn summary_tracks_activity() {
        let mut scene = city();
        scene
            .command_sender()
            .send(SceneCommand::Mutate(RegionMutation {
                x: 0,
                z: 0,
                width: 2,
                depth: 2,
                grow: true,
            }))
            .unwrap();
        scene.advance(Duration::from_millis(16));
        let summary = SceneInspector::cityscape(&scene);
        assert_eq!(summary.frame, 1);
        assert_eq!(summary.active, 4);
    }

    #[test]
    fn column_in_and_out_of_range() {
        let scene = city();
        let info = SceneInspector::column(&scene, 2, 3).unwrap();
        assert_eq!((info.x, info.z), (2, 3));
        assert_eq!(info.current, info.target as f32);
        assert!(!info.active);
        assert!(SceneInspector::column(&scene, 6, 0).is_none());
    }

    #[test]
    fn torn_down_is_reported() {
        let mut scene = city();
        scene.teardown();
        let s = format!("{}", SceneInspector::cityscape(&scene));
        assert!(s.contains("torn down"));
    }

    #[test]
    fn flight_summary_and_json() {
        let mut scene = FlightScene::new(&SceneConfig::default(), 1).unwrap();
        scene.frame();
        let summary = SceneInspector::flight(&scene);
        assert_eq!(summary.frame, 1);
        assert_eq!(summary.wave_ticks, 1);
        assert_eq!(summary.plane_position, [0.0, 100.0, 0.0]);
        assert!(!summary.steering);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["clouds"], 30);
        assert!(format!("{summary}").contains("frame=1"));
    }
}
