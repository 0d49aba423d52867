//! Shared types and configuration for the driftscape workspace.
//!
//! # Invariants
//! - Every tunable constant of both animations lives in [`SceneConfig`].
//! - Defaults reproduce the stock scene constants exactly.

pub mod config;
pub mod types;

pub use config::{
    ConfigError, FlightConfig, MAX_CLOUDS, MAX_INSTANCES, MAX_SEA_VERTICES, SceneConfig, Span,
    VoxelConfig, WaveConfig,
};
pub use types::Transform;
