//! Render interface: renderer-agnostic trait, viewport handling, debug text renderer.
//!
//! # Invariants
//! - Renderers only consume dirty flags; they never change heights, wave phases or transforms.
//! - A zero-sized viewport is never applied.

mod renderer;
mod viewport;

pub use renderer::{DebugTextRenderer, Renderer};
pub use viewport::Viewport;
