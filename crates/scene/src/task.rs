use crate::{CommandSender, SceneCommand, SceneError};
use driftscape_common::VoxelConfig;
use driftscape_voxel::RegionMutation;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::Duration;

/// Free-running background mutation clock.
///
/// Sends one random [`RegionMutation`] per interval to a scene's queue.
/// Dropping the task stops and joins the thread; the thread also exits on its
/// own once the scene's queue is closed.
#[derive(Debug)]
pub struct MutationTask {
    stop: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl MutationTask {
    pub fn spawn(
        commands: CommandSender,
        config: &VoxelConfig,
        seed: u64,
    ) -> Result<Self, SceneError> {
        config.validate()?;
        let interval = Duration::from_millis(config.mutation_interval_ms);
        let grid_size = config.grid_size;
        let max_extent = config.max_region_extent;
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = std::thread::Builder::new()
            .name("mutation-timer".into())
            .spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                tracing::debug!(?interval, "mutation task started");
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            let m = RegionMutation::random(&mut rng, grid_size, max_extent);
                            if commands.send(SceneCommand::Mutate(m)).is_err() {
                                tracing::debug!("scene closed, mutation task exiting");
                                break;
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })?;

        Ok(Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Stop the clock and wait for the thread to finish.
    pub fn stop(&mut self) {
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("mutation task panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for MutationTask {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cityscape;
    use std::time::Instant;

    fn fast_config() -> VoxelConfig {
        VoxelConfig {
            grid_size: 8,
            mutation_interval_ms: 5,
            ..VoxelConfig::default()
        }
    }

    #[test]
    fn task_feeds_scene_queue() {
        let config = fast_config();
        let mut scene = Cityscape::new(&config, 1).unwrap().with_external_mutations();
        let task = MutationTask::spawn(scene.command_sender(), &config, 2).unwrap();
        assert!(task.is_running());

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut applied = 0;
        while applied == 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
            applied += scene.advance(Duration::from_millis(10)).mutations;
        }
        assert!(applied > 0);
        drop(task);
    }

    #[test]
    fn stop_joins_thread() {
        let config = fast_config();
        let (tx, rx) = mpsc::channel();
        let mut task = MutationTask::spawn(CommandSender::new(tx), &config, 2).unwrap();
        task.stop();
        assert!(!task.is_running());
        // The joined thread owned the only sender.
        let _queued = rx.try_iter().count();
        assert!(matches!(rx.try_recv(), Err(mpsc::TryRecvError::Disconnected)));
    }

    #[test]
    fn drop_joins_thread() {
        let config = fast_config();
        let (tx, rx) = mpsc::channel();
        let task = MutationTask::spawn(CommandSender::new(tx), &config, 2).unwrap();
        drop(task);
        let _queued = rx.try_iter().count();
        assert!(matches!(rx.try_recv(), Err(mpsc::TryRecvError::Disconnected)));
    }

    #[test]
    fn task_exits_after_teardown() {
        let config = fast_config();
        let mut scene = Cityscape::new(&config, 1).unwrap().with_external_mutations();
        let task = MutationTask::spawn(scene.command_sender(), &config, 2).unwrap();
        scene.teardown();

        let deadline = Instant::now() + Duration::from_secs(5);
        while task.is_running() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(!task.is_running());
    }
}
