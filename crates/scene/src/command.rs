use crate::SceneError;
use driftscape_common::VoxelConfig;
use driftscape_voxel::RegionMutation;
use std::sync::mpsc;

/// A request from outside the animation task.
///
/// Other threads never touch the grid directly; they send one of these and the
/// owning scene applies it at the start of its next frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    /// Apply one region mutation (the mutation timer's output).
    Mutate(RegionMutation),
    /// Throw away the grid and build a new one with this configuration.
    Rebuild(VoxelConfig),
}

/// Cloneable handle for sending commands to a scene from any thread.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::Sender<SceneCommand>,
}

impl CommandSender {
    pub(crate) fn new(tx: mpsc::Sender<SceneCommand>) -> Self {
        Self { tx }
    }

    /// Queue a command. Fails once the scene has been torn down.
    pub fn send(&self, command: SceneCommand) -> Result<(), SceneError> {
        self.tx.send(command).map_err(|_| SceneError::Closed)
    }
}
