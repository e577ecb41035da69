//! Live farm: one tokio task owns the farm and its engine, ticks them on a
//! wall-clock interval and serves clicks from a command channel.
//!
//! The task is the only place farm state is touched, so timer ticks and
//! clicks are applied strictly one at a time.

use std::time::Duration;

use tokio::{
    sync::{broadcast, mpsc, oneshot},
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{error, info, warn};

use crate::{
    config::FarmConfig,
    engine::{Engine, EngineBuilder, EngineSettings},
    error::FarmError,
    farm::{ClickOutcome, Farm, Plot},
    snapshot::FarmSnapshot,
};

const COMMAND_BUFFER: usize = 64;
const SNAPSHOT_BUFFER: usize = 256;

enum Command {
    Click {
        plot: Plot,
        reply: oneshot::Sender<(ClickOutcome, FarmSnapshot)>,
    },
    Snapshot {
        reply: oneshot::Sender<FarmSnapshot>,
    },
}

/// Cheap, cloneable access to a mounted farm.
#[derive(Clone)]
pub struct FarmClient {
    commands: mpsc::Sender<Command>,
    snapshots: broadcast::Sender<FarmSnapshot>,
}

impl FarmClient {
    pub async fn click(&self, x: u32, y: u32) -> Result<ClickOutcome, FarmError> {
        let (outcome, _) = self.click_with_snapshot(x, y).await?;
        Ok(outcome)
    }

    /// Clicks and returns the farm as it stood right after the click, before
    /// any later tick.
    pub async fn click_with_snapshot(
        &self,
        x: u32,
        y: u32,
    ) -> Result<(ClickOutcome, FarmSnapshot), FarmError> {
        let plot = Plot::new(x, y)?;
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Click { plot, reply })
            .await
            .map_err(|_| FarmError::Unmounted)?;
        response.await.map_err(|_| FarmError::Unmounted)
    }

    pub async fn snapshot(&self) -> Result<FarmSnapshot, FarmError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Snapshot { reply })
            .await
            .map_err(|_| FarmError::Unmounted)?;
        response.await.map_err(|_| FarmError::Unmounted)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FarmSnapshot> {
        self.snapshots.subscribe()
    }
}

/// Owns the farm task. Dropping the handle aborts the task, so no timer
/// outlives it; [`FarmHandle::unmount`] shuts it down cleanly instead.
pub struct FarmHandle {
    farm_name: String,
    client: FarmClient,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl FarmHandle {
    pub fn client(&self) -> FarmClient {
        self.client.clone()
    }

    pub async fn click(&self, x: u32, y: u32) -> Result<ClickOutcome, FarmError> {
        self.client.click(x, y).await
    }

    pub async fn click_with_snapshot(
        &self,
        x: u32,
        y: u32,
    ) -> Result<(ClickOutcome, FarmSnapshot), FarmError> {
        self.client.click_with_snapshot(x, y).await
    }

    pub async fn snapshot(&self) -> Result<FarmSnapshot, FarmError> {
        self.client.snapshot().await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FarmSnapshot> {
        self.client.subscribe()
    }

    pub async fn unmount(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!("farm task ended abnormally: {err}");
            }
        }
    }
}

impl Drop for FarmHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!(farm = %self.farm_name, "farm unmounted (aborted)");
        }
    }
}

pub struct FarmRuntime;

impl FarmRuntime {
    /// Starts a fresh farm with the standard systems. Must be called from
    /// within a tokio runtime.
    pub fn mount(config: &FarmConfig) -> FarmHandle {
        let seed = config.resolve_seed();
        let engine = EngineBuilder::standard(EngineSettings {
            farm_name: config.name.clone(),
            seed,
        })
        .build();
        Self::mount_with(engine, config.time_unit(), config.snapshot_interval_units)
    }

    pub fn mount_with(engine: Engine, time_unit: Duration, publish_every: u64) -> FarmHandle {
        let (commands, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshots, _) = broadcast::channel(SNAPSHOT_BUFFER);
        let (shutdown, shutdown_rx) = oneshot::channel();

        info!(
            farm = engine.farm_name(),
            seed = engine.seed(),
            time_unit_ms = time_unit.as_millis() as u64,
            "farm mounted"
        );

        let farm_name = engine.farm_name().to_string();
        let driver = Driver {
            farm: Farm::new(),
            engine,
            time_unit,
            publish_every,
            snapshots: snapshots.clone(),
        };
        let task = tokio::spawn(driver.run(command_rx, shutdown_rx));

        FarmHandle {
            farm_name,
            client: FarmClient {
                commands,
                snapshots,
            },
            shutdown: Some(shutdown),
            task: Some(task),
        }
    }
}

struct Driver {
    farm: Farm,
    engine: Engine,
    time_unit: Duration,
    publish_every: u64,
    snapshots: broadcast::Sender<FarmSnapshot>,
}

impl Driver {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        let mut ticker = time::interval_at(Instant::now() + self.time_unit, self.time_unit);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    match self.engine.step(&mut self.farm) {
                        Ok(summary) => {
                            if self.publish_every > 0 && summary.unit % self.publish_every == 0 {
                                self.publish();
                            }
                        }
                        Err(err) => {
                            error!("farm tick failed: {err:#}");
                            break;
                        }
                    }
                }
                command = commands.recv() => match command {
                    Some(Command::Click { plot, reply }) => {
                        let outcome = self.engine.click(&mut self.farm, plot);
                        let snapshot = self.current();
                        let _ = self.snapshots.send(snapshot.clone());
                        let _ = reply.send((outcome, snapshot));
                    }
                    Some(Command::Snapshot { reply }) => {
                        let _ = reply.send(self.current());
                    }
                    None => break,
                },
            }
        }

        info!(
            farm = self.engine.farm_name(),
            elapsed_units = self.farm.elapsed_units(),
            "farm unmounted"
        );
    }

    fn current(&self) -> FarmSnapshot {
        self.farm.snapshot(self.engine.farm_name())
    }

    fn publish(&self) {
        // Send fails only while nobody is subscribed.
        let _ = self.snapshots.send(self.current());
    }
}
