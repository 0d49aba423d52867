use crate::Viewport;
use driftscape_scene::{Cityscape, FlightScene};

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads scene state and a viewport, then produces output. It
/// never mutates the scene; animation state is owned by the scene driver.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    fn render_cityscape(&self, scene: &Cityscape, viewport: &Viewport) -> Self::Output;

    fn render_flight(&self, scene: &FlightScene, viewport: &Viewport) -> Self::Output;
}

/// Debug text renderer.
///
/// Produces a human-readable dump of a scene. Used by the CLI and for testing
/// the render interface without a GPU.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Rows of the height map to print for the cityscape (0 disables the map).
    pub map_rows: u32,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_map(rows: u32) -> Self {
        Self { map_rows: rows }
    }
}

/// One character per column height: `1`-`9`, then `a`-`z`, `#` beyond that.
fn height_glyph(height: f32) -> char {
    let h = height.round() as u32;
    char::from_digit(h, 36).unwrap_or('#')
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render_cityscape(&self, scene: &Cityscape, viewport: &Viewport) -> String {
        let grid = scene.grid();
        let mut out = String::new();
        out.push_str(&format!(
            "=== Cityscape (frame={}) {}x{} ===\n",
            scene.frame(),
            viewport.width,
            viewport.height
        ));
        out.push_str(&format!(
            "Grid: {0}x{0}, max height {1}, instances {2}\n",
            grid.grid_size(),
            grid.max_column_height(),
            scene.instances().len()
        ));
        out.push_str(&format!("Active columns: {}\n", grid.active_count()));

        let rows = self.map_rows.min(grid.grid_size());
        for x in 0..rows {
            let cols = self.map_rows.min(grid.grid_size());
            let line: String = (0..cols)
                .map(|z| {
                    let i = grid.index(x, z);
                    let glyph = height_glyph(grid.column(i).current);
                    if grid.is_active(i) {
                        glyph.to_ascii_uppercase()
                    } else {
                        glyph
                    }
                })
                .collect();
            out.push_str("  ");
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    fn render_flight(&self, scene: &FlightScene, viewport: &Viewport) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Flight (frame={}) {}x{} ===\n",
            scene.frame_count(),
            viewport.width,
            viewport.height
        ));
        let p = scene.airplane.transform.position;
        out.push_str(&format!(
            "Plane: pos=({:.2}, {:.2}, {:.2}) propeller={:.2}\n",
            p.x, p.y, p.z, scene.airplane.propeller_angle
        ));
        out.push_str(&format!(
            "Sea: vertices={} ticks={} rotation={:.3}\n",
            scene.sea.field.len(),
            scene.sea.field.ticks(),
            scene.sea.rotation_z
        ));
        out.push_str(&format!(
            "Sky: clouds={} rotation={:.3}\n",
            scene.sky.clouds.len(),
            scene.sky.rotation_z
        ));
        out.push_str(&format!(
            "Pointer: ({:.2}, {:.2}) engaged={}\n",
            scene.pointer().position.x,
            scene.pointer().position.y,
            scene.pointer().engaged
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftscape_common::{SceneConfig, VoxelConfig};
    use std::time::Duration;

    fn small_city() -> Cityscape {
        let config = VoxelConfig {
            grid_size: 4,
            max_column_height: 6,
            ..VoxelConfig::default()
        };
        Cityscape::new(&config, 1).unwrap()
    }

    #[test]
    fn cityscape_header() {
        let scene = small_city();
        let out = DebugTextRenderer::new().render_cityscape(&scene, &Viewport::new(800, 600));
        assert!(out.contains("frame=0"));
        assert!(out.contains("Grid: 4x4"));
        assert!(out.contains("Active columns: 0"));
        assert!(out.contains("800x600"));
    }

    #[test]
    fn cityscape_map_rows() {
        let mut scene = small_city();
        scene.advance(Duration::from_millis(16));
        let out = DebugTextRenderer::with_map(4).render_cityscape(&scene, &Viewport::default());
        let map_lines = out.lines().filter(|l| l.starts_with("  ")).count();
        assert_eq!(map_lines, 4);
    }

    #[test]
    fn flight_dump() {
        let mut scene = FlightScene::new(&SceneConfig::default(), 2).unwrap();
        scene.frame();
        let out = DebugTextRenderer::new().render_flight(&scene, &Viewport::default());
        assert!(out.contains("frame=1"));
        assert!(out.contains("vertices=442"));
        assert!(out.contains("clouds=30"));
        assert!(out.contains("engaged=false"));
    }

    #[test]
    fn glyphs() {
        assert_eq!(height_glyph(3.0), '3');
        assert_eq!(height_glyph(10.2), 'a');
        assert_eq!(height_glyph(40.0), '#');
    }
}
