use crate::{ColumnInstances, RegionMutation};
use driftscape_common::{ConfigError, VoxelConfig};
use rand::Rng;
use std::collections::HashSet;

/// Target and displayed height of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelColumn {
    /// Integer height the column is heading toward.
    pub target: u32,
    /// Height currently on screen.
    pub current: f32,
}

impl VoxelColumn {
    pub fn is_settled(&self) -> bool {
        self.current == self.target as f32
    }
}

/// Column heights for a square grid plus the set of columns still moving.
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    grid_size: u32,
    max_column_height: u32,
    settle_rate: f32,
    settle_epsilon: f32,
    columns: Vec<VoxelColumn>,
    active: HashSet<usize>,
}

impl VoxelGrid {
    /// Random initial heights in `[1, initial_height_max]`, already settled.
    pub fn new<R: Rng + ?Sized>(config: &VoxelConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;
        let heights: Vec<u32> = (0..config.column_count())
            .map(|_| rng.gen_range(1..=config.initial_height_max))
            .collect();
        Self::from_heights(config, &heights)
    }

    /// Grid with explicit initial heights, clamped into `[1, max_column_height]`.
    pub fn from_heights(config: &VoxelConfig, heights: &[u32]) -> Result<Self, ConfigError> {
        config.validate()?;
        if heights.len() != config.column_count() {
            return Err(ConfigError::Invalid {
                field: "voxel.grid_size",
                reason: format!(
                    "expected {} initial heights, got {}",
                    config.column_count(),
                    heights.len()
                ),
            });
        }
        let columns = heights
            .iter()
            .map(|&h| {
                let h = h.clamp(1, config.max_column_height);
                VoxelColumn {
                    target: h,
                    current: h as f32,
                }
            })
            .collect();
        Ok(Self {
            grid_size: config.grid_size,
            max_column_height: config.max_column_height,
            settle_rate: config.settle_rate,
            settle_epsilon: config.settle_epsilon,
            columns,
            active: HashSet::new(),
        })
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    pub fn max_column_height(&self) -> u32 {
        self.max_column_height
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column index for grid coordinates.
    pub fn index(&self, x: u32, z: u32) -> usize {
        x as usize * self.grid_size as usize + z as usize
    }

    pub fn column(&self, index: usize) -> &VoxelColumn {
        &self.columns[index]
    }

    pub fn columns(&self) -> &[VoxelColumn] {
        &self.columns
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active.contains(&index)
    }

    /// Grow or shrink every column in the region by one step.
    ///
    /// Columns already at the ceiling (growing) or at 1 (shrinking) are left
    /// alone and not activated. Returns how many targets changed.
    pub fn apply(&mut self, mutation: &RegionMutation) -> usize {
        let mut changed = 0;
        for (x, z) in mutation.cells(self.grid_size) {
            let i = self.index(x, z);
            let column = &mut self.columns[i];
            if mutation.grow {
                if column.target < self.max_column_height {
                    column.target += 1;
                } else {
                    continue;
                }
            } else if column.target > 1 {
                column.target -= 1;
            } else {
                continue;
            }
            self.active.insert(i);
            changed += 1;
        }
        tracing::debug!(
            x = mutation.x,
            z = mutation.z,
            width = mutation.width,
            depth = mutation.depth,
            grow = mutation.grow,
            changed,
            active = self.active.len(),
            "region mutated"
        );
        changed
    }

    /// Move every active column one step toward its target.
    ///
    /// A column within `settle_epsilon` snaps to its target and leaves the
    /// active set; otherwise it covers `settle_rate` of the remaining gap.
    /// Visited columns are re-laid-out in `instances`. Returns the number of
    /// columns visited.
    pub fn settle(&mut self, instances: &mut ColumnInstances) -> usize {
        if self.active.is_empty() {
            return 0;
        }
        let _span = tracing::trace_span!("settle", active = self.active.len()).entered();
        let (rate, epsilon) = (self.settle_rate, self.settle_epsilon);
        let columns = &mut self.columns;
        let mut visited = 0;
        self.active.retain(|&i| {
            let column = &mut columns[i];
            let target = column.target as f32;
            let diff = target - column.current;
            let keep = if diff.abs() < epsilon {
                column.current = target;
                false
            } else {
                column.current += diff * rate;
                true
            };
            instances.update_column(i, column.current);
            visited += 1;
            keep
        });
        visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn config(grid_size: u32, max: u32) -> VoxelConfig {
        VoxelConfig {
            grid_size,
            max_column_height: max,
            initial_height_max: max.min(5),
            ..VoxelConfig::default()
        }
    }

    fn single(x: u32, z: u32, grow: bool) -> RegionMutation {
        RegionMutation {
            x,
            z,
            width: 1,
            depth: 1,
            grow,
        }
    }

    #[test]
    fn initial_heights_are_settled_and_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let grid = VoxelGrid::new(&VoxelConfig::default(), &mut rng).unwrap();
        assert_eq!(grid.column_count(), 10_000);
        assert_eq!(grid.active_count(), 0);
        for c in grid.columns() {
            assert!((1..=5).contains(&c.target));
            assert!(c.is_settled());
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let bad = VoxelConfig {
            grid_size: 0,
            ..VoxelConfig::default()
        };
        assert!(VoxelGrid::new(&bad, &mut rng).is_err());
        let huge = VoxelConfig {
            grid_size: u32::MAX,
            ..VoxelConfig::default()
        };
        assert!(VoxelGrid::new(&huge, &mut rng).is_err());
        assert!(VoxelGrid::from_heights(&config(2, 4), &[1, 2, 3]).is_err());
    }

    #[test]
    fn grow_increments_and_activates() {
        let mut grid = VoxelGrid::from_heights(&config(2, 4), &[1, 2, 3, 4]).unwrap();
        let changed = grid.apply(&RegionMutation {
            x: 0,
            z: 0,
            width: 2,
            depth: 2,
            grow: true,
        });
        assert_eq!(changed, 3);
        let targets: Vec<u32> = grid.columns().iter().map(|c| c.target).collect();
        assert_eq!(targets, vec![2, 3, 4, 4]);
        assert!(grid.is_active(0) && grid.is_active(1) && grid.is_active(2));
        // already at the ceiling: unchanged and not activated
        assert!(!grid.is_active(3));
    }

    #[test]
    fn shrink_stops_at_one() {
        let mut grid = VoxelGrid::from_heights(&config(2, 4), &[1, 2, 1, 1]).unwrap();
        let changed = grid.apply(&RegionMutation {
            x: 0,
            z: 0,
            width: 2,
            depth: 2,
            grow: false,
        });
        assert_eq!(changed, 1);
        assert_eq!(grid.column(1).target, 1);
        assert_eq!(grid.active_count(), 1);
        assert!(grid.is_active(1));
    }

    #[test]
    fn settle_converges_within_bound() {
        let cfg = config(100, 20);
        let mut heights = vec![1; cfg.column_count()];
        let idx = 10 * 100 + 20;
        heights[idx] = 5;
        let mut grid = VoxelGrid::from_heights(&cfg, &heights).unwrap();
        let mut instances = ColumnInstances::new(&grid);
        instances.take_dirty();

        assert_eq!(grid.apply(&single(10, 20, true)), 1);
        assert_eq!(grid.column(idx).target, 6);

        let rate = cfg.settle_rate;
        let eps = cfg.settle_epsilon;
        let bound = (eps.ln() / (1.0 - rate).ln()).ceil() as usize;
        assert_eq!(bound, 44);

        for _ in 0..bound {
            assert_eq!(grid.settle(&mut instances), 1);
        }
        let c = grid.column(idx);
        assert!((c.target as f32 - c.current).abs() < eps);
        assert!(c.current <= 6.0);

        // next step observes the gap below epsilon, snaps and deactivates
        grid.settle(&mut instances);
        assert_eq!(grid.column(idx).current, 6.0);
        assert!(!grid.is_active(idx));
        assert_eq!(grid.active_count(), 0);
    }

    #[test]
    fn settled_column_stays_settled() {
        let mut grid = VoxelGrid::from_heights(&config(1, 3), &[1]).unwrap();
        let mut instances = ColumnInstances::new(&grid);
        grid.apply(&single(0, 0, true));
        while grid.active_count() > 0 {
            grid.settle(&mut instances);
        }
        instances.take_dirty();
        for _ in 0..50 {
            assert_eq!(grid.settle(&mut instances), 0);
            assert_eq!(grid.column(0).current, 2.0);
            assert!(!grid.is_active(0));
        }
        assert!(!instances.is_dirty());
    }

    #[test]
    fn heights_stay_in_bounds_under_random_mutation() {
        let cfg = config(12, 6);
        let mut rng = StdRng::seed_from_u64(1234);
        let mut grid = VoxelGrid::new(&cfg, &mut rng).unwrap();
        let mut instances = ColumnInstances::new(&grid);
        for frame in 0..3000 {
            if frame % 7 == 0 {
                let m = RegionMutation::random(&mut rng, cfg.grid_size, cfg.max_region_extent);
                grid.apply(&m);
            }
            grid.settle(&mut instances);
            for c in grid.columns() {
                assert!((1..=6).contains(&c.target));
                assert!(c.current >= 1.0 && c.current <= 6.0, "out of range: {c:?}");
            }
        }
    }

    #[test]
    fn mutation_mid_settle_retargets() {
        let mut grid = VoxelGrid::from_heights(&config(1, 10), &[3]).unwrap();
        let mut instances = ColumnInstances::new(&grid);
        grid.apply(&single(0, 0, true));
        for _ in 0..5 {
            grid.settle(&mut instances);
        }
        let mid = grid.column(0).current;
        assert!(mid > 3.0 && mid < 4.0);
        grid.apply(&single(0, 0, false));
        grid.apply(&single(0, 0, false));
        assert_eq!(grid.column(0).target, 2);
        while grid.active_count() > 0 {
            grid.settle(&mut instances);
        }
        assert_eq!(grid.column(0).current, 2.0);
    }

    #[test]
    fn settle_marks_only_visited_columns_dirty() {
        let mut grid = VoxelGrid::from_heights(&config(4, 5), &[1; 16]).unwrap();
        let mut instances = ColumnInstances::new(&grid);
        assert_eq!(instances.take_dirty(), Some(0..16 * 5));
        assert!(instances.take_dirty().is_none());

        grid.apply(&single(1, 2, true));
        grid.settle(&mut instances);
        let i = grid.index(1, 2);
        assert_eq!(instances.take_dirty(), Some(i * 5..i * 5 + 5));
        let col = instances.column(i);
        assert_eq!(col[0].y_axis.y, 1.0);
        assert!((col[1].y_axis.y - 0.1).abs() < 1e-6);
        assert_eq!(col[2].y_axis.y, 0.0);
    }
}
