use crate::VoxelGrid;
use glam::{Mat4, Vec3};
use std::ops::Range;

/// Write the `slots.len()` stacked instance transforms for one column.
///
/// Slots below `floor(height)` are full unit cubes. The slot at `floor(height)`
/// is squashed to the fractional remainder and sits flush on the one below.
/// Everything above collapses to zero scale at the column's base.
pub fn column_slots(slots: &mut [Mat4], x: u32, z: u32, height: f32, offset: f32) {
    let px = x as f32 - offset;
    let pz = z as f32 - offset;
    let whole = height.floor();
    for (y, slot) in slots.iter_mut().enumerate() {
        let yf = y as f32;
        *slot = if yf < whole {
            Mat4::from_translation(Vec3::new(px, yf + 0.5, pz))
        } else if yf < height {
            let fraction = height - yf;
            Mat4::from_scale_rotation_translation(
                Vec3::new(1.0, fraction, 1.0),
                glam::Quat::IDENTITY,
                Vec3::new(px, yf + fraction / 2.0, pz),
            )
        } else {
            Mat4::from_scale_rotation_translation(
                Vec3::ZERO,
                glam::Quat::IDENTITY,
                Vec3::new(px, 0.0, pz),
            )
        };
    }
}

/// Instance transforms for every slot of every column.
///
/// Solid cubes and wireframe edges draw from the same transforms. Instance
/// `i * max_column_height + y` is slot `y` of column `i`.
#[derive(Debug, Clone)]
pub struct ColumnInstances {
    transforms: Vec<Mat4>,
    grid_size: u32,
    slots_per_column: usize,
    offset: f32,
    dirty: Option<Range<usize>>,
}

impl ColumnInstances {
    /// Lay out every column of the grid. The whole buffer starts dirty.
    pub fn new(grid: &VoxelGrid) -> Self {
        let grid_size = grid.grid_size();
        let slots_per_column = grid.max_column_height() as usize;
        let len = grid.column_count() * slots_per_column;
        let mut instances = Self {
            transforms: vec![Mat4::ZERO; len],
            grid_size,
            slots_per_column,
            offset: (grid_size as f32 - 1.0) / 2.0,
            dirty: None,
        };
        for i in 0..grid.column_count() {
            instances.update_column(i, grid.column(i).current);
        }
        instances
    }

    /// Re-lay-out one column and widen the dirty range to cover it.
    pub fn update_column(&mut self, index: usize, height: f32) {
        let gs = self.grid_size as usize;
        let (x, z) = ((index / gs) as u32, (index % gs) as u32);
        let start = index * self.slots_per_column;
        let end = start + self.slots_per_column;
        column_slots(&mut self.transforms[start..end], x, z, height, self.offset);
        self.dirty = Some(match self.dirty.take() {
            Some(r) => r.start.min(start)..r.end.max(end),
            None => start..end,
        });
    }

    pub fn transforms(&self) -> &[Mat4] {
        &self.transforms
    }

    /// Transforms for one column's slots.
    pub fn column(&self, index: usize) -> &[Mat4] {
        let start = index * self.slots_per_column;
        &self.transforms[start..start + self.slots_per_column]
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    /// Consume the dirty instance range, if any, for upload.
    pub fn take_dirty(&mut self) -> Option<Range<usize>> {
        self.dirty.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale_y(m: &Mat4) -> f32 {
        m.y_axis.y
    }

    fn center_y(m: &Mat4) -> f32 {
        m.w_axis.y
    }

    #[test]
    fn whole_height_fills_slots() {
        let mut slots = [Mat4::ZERO; 5];
        column_slots(&mut slots, 0, 0, 3.0, 0.0);
        for (y, slot) in slots.iter().enumerate().take(3) {
            assert_eq!(scale_y(slot), 1.0);
            assert_eq!(center_y(slot), y as f32 + 0.5);
        }
        for slot in &slots[3..] {
            assert_eq!(slot.x_axis.x, 0.0);
            assert_eq!(scale_y(slot), 0.0);
            assert_eq!(slot.z_axis.z, 0.0);
        }
    }

    #[test]
    fn fractional_top_sits_flush() {
        let mut slots = [Mat4::ZERO; 4];
        column_slots(&mut slots, 0, 0, 2.25, 0.0);
        let top = &slots[2];
        assert!((scale_y(top) - 0.25).abs() < 1e-6);
        // bottom of the partial cube touches the top of slot 1
        assert!((center_y(top) - scale_y(top) / 2.0 - 2.0).abs() < 1e-6);
        assert_eq!(scale_y(&slots[3]), 0.0);
    }

    #[test]
    fn full_column_has_no_partial_slot() {
        let mut slots = [Mat4::ZERO; 4];
        column_slots(&mut slots, 0, 0, 4.0, 0.0);
        assert!(slots.iter().all(|s| scale_y(s) == 1.0));
    }

    #[test]
    fn columns_are_centered_on_origin() {
        let mut slots = [Mat4::ZERO; 1];
        let offset = (100.0 - 1.0) / 2.0;
        column_slots(&mut slots, 0, 99, 1.0, offset);
        assert_eq!(slots[0].w_axis.x, -49.5);
        assert_eq!(slots[0].w_axis.z, 49.5);
    }
}
