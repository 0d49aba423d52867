use rand::Rng;
use serde::{Deserialize, Serialize};

/// One firing of the mutation timer: grow or shrink every column in a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionMutation {
    /// Top-left column on the X axis.
    pub x: u32,
    /// Top-left column on the Z axis.
    pub z: u32,
    pub width: u32,
    pub depth: u32,
    pub grow: bool,
}

impl RegionMutation {
    /// Random region fully inside a `grid_size` square grid.
    ///
    /// Width and depth are uniform in `[1, min(max_extent, grid_size)]`; the
    /// corner is uniform over every position that keeps the region in bounds.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, grid_size: u32, max_extent: u32) -> Self {
        let cap = max_extent.min(grid_size).max(1);
        let width = rng.gen_range(1..=cap);
        let depth = rng.gen_range(1..=cap);
        let x = rng.gen_range(0..=grid_size.saturating_sub(width));
        let z = rng.gen_range(0..=grid_size.saturating_sub(depth));
        Self {
            x,
            z,
            width,
            depth,
            grow: rng.gen_bool(0.5),
        }
    }

    /// Column coordinates covered by this region, clipped to the grid.
    pub fn cells(&self, grid_size: u32) -> impl Iterator<Item = (u32, u32)> + use<> {
        let x_end = self.x.saturating_add(self.width).min(grid_size);
        let z_end = self.z.saturating_add(self.depth).min(grid_size);
        let z_start = self.z;
        (self.x..x_end).flat_map(move |x| (z_start..z_end).map(move |z| (x, z)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn random_regions_stay_inside_grid() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let m = RegionMutation::random(&mut rng, 100, 10);
            assert!((1..=10).contains(&m.width));
            assert!((1..=10).contains(&m.depth));
            assert!(m.x + m.width <= 100);
            assert!(m.z + m.depth <= 100);
        }
    }

    #[test]
    fn extent_capped_by_small_grid() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let m = RegionMutation::random(&mut rng, 3, 10);
            assert!(m.width <= 3 && m.depth <= 3);
            assert!(m.x + m.width <= 3 && m.z + m.depth <= 3);
        }
    }

    #[test]
    fn both_directions_occur() {
        let mut rng = StdRng::seed_from_u64(1);
        let grows = (0..1000)
            .filter(|_| RegionMutation::random(&mut rng, 10, 10).grow)
            .count();
        assert!(grows > 350 && grows < 650);
    }

    #[test]
    fn cells_are_clipped() {
        let m = RegionMutation {
            x: 8,
            z: 9,
            width: 5,
            depth: 5,
            grow: true,
        };
        let cells: Vec<(u32, u32)> = m.cells(10).collect();
        assert_eq!(cells, vec![(8, 9), (9, 9)]);
    }

    #[test]
    fn cells_cover_region() {
        let m = RegionMutation {
            x: 2,
            z: 3,
            width: 3,
            depth: 2,
            grow: false,
        };
        assert_eq!(m.cells(100).count(), 6);
    }
}
