//! wgpu render backend for both scenes.
//!
//! The cityscape draws one instanced cube per column slot plus a wireframe
//! pass over the same instance buffer. The flight scene draws the sea as a
//! dynamic indexed mesh and the plane and clouds as instanced boxes.
//!
//! # Invariants
//! - Renderer only consumes dirty flags; it never changes heights, wave phases or transforms.
//! - Instance data is uploaded only for the dirty range.
//! - Render frame rate is separate from the mutation clock.

mod camera;
mod gpu;
mod shaders;

pub use camera::{ChaseCamera, IsometricCamera};
pub use gpu::WgpuRenderer;
