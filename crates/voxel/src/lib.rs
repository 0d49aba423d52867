//! Voxel Height Animator: a grid of cube columns easing toward random targets.
//!
//! Targets change in rectangular regions on a timer; displayed heights follow
//! by exponential approach. Only columns in the active set are visited per
//! frame, so a settled city costs nothing to animate.
//!
//! # Invariants
//! - `1 <= target <= max_column_height` and `1 <= current <= max_column_height`.
//! - A column is active iff it was mutated and has not yet snapped to its target.
//! - Each column owns `max_column_height` instance slots; slots are never removed,
//!   only collapsed to zero scale.

mod grid;
mod layout;
mod region;

pub use grid::{VoxelColumn, VoxelGrid};
pub use layout::{ColumnInstances, column_slots};
pub use region::RegionMutation;
