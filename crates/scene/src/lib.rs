//! Scene drivers: the per-frame tick, the mutation clock, and the flight scene.
//!
//! # Invariants
//! - Each scene exclusively owns its animation state; other threads reach it
//!   only through [`SceneCommand`]s on the scene's queue.
//! - The render tick and the mutation clock are independent.
//! - A torn-down scene never mutates again: its timer is cancelled and its
//!   queue closed, which also stops any [`MutationTask`] feeding it.

mod airplane;
mod cityscape;
mod command;
mod flight;
mod parts;
mod sky;
mod task;
mod timer;

pub use airplane::{Airplane, Pilot};
pub use cityscape::{Cityscape, CityscapeFrame};
pub use command::{CommandSender, SceneCommand};
pub use flight::FlightScene;
pub use parts::{BoxInstance, palette};
pub use sky::{Cloud, Sky};
pub use task::MutationTask;
pub use timer::IntervalTimer;

use driftscape_common::ConfigError;

/// Errors from building or driving a scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("scene has been torn down")]
    Closed,
    #[error("failed to spawn background task: {0}")]
    Spawn(#[from] std::io::Error),
}
