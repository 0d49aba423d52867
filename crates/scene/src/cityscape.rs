use crate::{CommandSender, IntervalTimer, SceneCommand, SceneError};
use driftscape_common::VoxelConfig;
use driftscape_voxel::{ColumnInstances, RegionMutation, VoxelGrid};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::mpsc;
use std::time::Duration;

/// What happened during one [`Cityscape::advance`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CityscapeFrame {
    pub frame: u64,
    /// Region mutations applied (timer firings plus queued commands).
    pub mutations: usize,
    /// Columns visited by the settle step.
    pub settled_columns: usize,
}

/// The voxel cityscape: grid, instance transforms, and both clocks.
///
/// By default the scene runs its own mutation timer off the frame deltas.
/// [`Cityscape::with_external_mutations`] turns that off so a
/// [`MutationTask`](crate::MutationTask) can drive it through the queue.
pub struct Cityscape {
    config: VoxelConfig,
    grid: VoxelGrid,
    instances: ColumnInstances,
    rng: StdRng,
    timer: IntervalTimer,
    sender: CommandSender,
    commands: Option<mpsc::Receiver<SceneCommand>>,
    frame: u64,
}

impl Cityscape {
    pub fn new(config: &VoxelConfig, seed: u64) -> Result<Self, SceneError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = VoxelGrid::new(config, &mut rng)?;
        let instances = ColumnInstances::new(&grid);
        let (tx, rx) = mpsc::channel();
        tracing::info!(
            grid_size = config.grid_size,
            max_column_height = config.max_column_height,
            instances = instances.len(),
            "cityscape built"
        );
        Ok(Self {
            config: config.clone(),
            grid,
            instances,
            rng,
            timer: IntervalTimer::from_millis(config.mutation_interval_ms),
            sender: CommandSender::new(tx),
            commands: Some(rx),
            frame: 0,
        })
    }

    /// Disable the built-in mutation timer; mutations then only arrive as commands.
    pub fn with_external_mutations(mut self) -> Self {
        self.timer.cancel();
        self
    }

    /// Handle for queueing commands from other threads.
    pub fn command_sender(&self) -> CommandSender {
        self.sender.clone()
    }

    /// One render tick: fire the mutation timer, drain queued commands, settle.
    pub fn advance(&mut self, dt: Duration) -> CityscapeFrame {
        let mut mutations = 0;
        for _ in 0..self.timer.advance(dt) {
            let m = RegionMutation::random(
                &mut self.rng,
                self.grid.grid_size(),
                self.config.max_region_extent,
            );
            self.grid.apply(&m);
            mutations += 1;
        }

        let pending: Vec<SceneCommand> = match &self.commands {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        };
        for command in pending {
            match command {
                SceneCommand::Mutate(m) => {
                    self.grid.apply(&m);
                    mutations += 1;
                }
                SceneCommand::Rebuild(config) => {
                    if let Err(e) = self.rebuild(&config) {
                        tracing::warn!("rebuild rejected: {e}");
                    }
                }
            }
        }

        let settled_columns = self.grid.settle(&mut self.instances);
        self.frame += 1;
        tracing::trace!(
            frame = self.frame,
            mutations,
            settled_columns,
            active = self.grid.active_count(),
            "cityscape frame"
        );
        CityscapeFrame {
            frame: self.frame,
            mutations,
            settled_columns,
        }
    }

    /// Replace grid and instances with freshly generated ones.
    pub fn rebuild(&mut self, config: &VoxelConfig) -> Result<(), SceneError> {
        let grid = VoxelGrid::new(config, &mut self.rng)?;
        self.instances = ColumnInstances::new(&grid);
        self.grid = grid;
        if !self.timer.is_cancelled() {
            self.timer = IntervalTimer::from_millis(config.mutation_interval_ms);
        }
        self.config = config.clone();
        tracing::info!(grid_size = config.grid_size, "cityscape rebuilt");
        Ok(())
    }

    /// Stop both mutation sources. The settle step keeps running so columns
    /// already in motion come to rest.
    pub fn teardown(&mut self) {
        self.timer.cancel();
        if self.commands.take().is_some() {
            tracing::info!(frame = self.frame, "cityscape torn down");
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.commands.is_none()
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    pub fn instances(&self) -> &ColumnInstances {
        &self.instances
    }

    /// Mutable access for the renderer to consume the dirty range.
    pub fn instances_mut(&mut self) -> &mut ColumnInstances {
        &mut self.instances
    }

    pub fn config(&self) -> &VoxelConfig {
        &self.config
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl Drop for Cityscape {
    fn drop(&mut self) {
        self.teardown();
    }
}
