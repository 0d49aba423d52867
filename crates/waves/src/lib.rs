//! Wave Field Animator: rolling-sea displacement of a low-poly cylinder mesh.
//!
//! Every vertex orbits its rest position on a small circle in the XY plane.
//! Each vertex gets its own radius (amplitude), angular speed and starting
//! phase, so the surface never moves in lockstep.
//!
//! # Invariants
//! - Amplitude and speed never change after creation.
//! - Rest positions are captured once; displacement never accumulates.
//! - Geometry is marked dirty once per tick, not once per vertex.

mod field;
mod geometry;
mod sea;

pub use field::{WaveField, WaveVertex};
pub use geometry::SeaGeometry;
pub use sea::Sea;
