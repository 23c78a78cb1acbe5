//! Runtime: builds the shared cells, spawns the four workers and supervises
//! their shutdown.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};

use super::input::{Controller, InputWorker};
use super::messages::{WorkerExit, WorkerKind};
use super::physics::PhysicsWorker;
use super::renderer::{RenderWorker, Renderer};
use super::world::WorldWorker;
use super::Worker;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::game::{Actor, Sprite, Terrain, World};
use crate::state::SharedState;
use crate::terminal::{KeySource, Surface};

/// The running game.
#[derive(Debug)]
pub struct Runtime {
    state: Arc<SharedState>,
    actor: Arc<Actor>,
    terrain: Arc<Terrain>,
    workers: Vec<Worker>,
    done: Receiver<WorkerExit>,
}

impl Runtime {
    /// Validate `config` and start every worker.
    ///
    /// If a thread cannot be spawned the game is moved to `Exit` so the
    /// workers already running wind down, and the error is returned.
    pub fn spawn<S, K>(config: &Config, surface: S, keys: K) -> Result<Self>
    where
        S: Surface + Send + 'static,
        K: KeySource + Send + 'static,
    {
        Self::spawn_with(config, Arc::new(SharedState::new()), surface, keys)
    }

    /// Like [`Runtime::spawn`], over a state register created beforehand.
    ///
    /// Lets a signal watcher hold the register before any worker exists.
    pub fn spawn_with<S, K>(
        config: &Config,
        state: Arc<SharedState>,
        surface: S,
        keys: K,
    ) -> Result<Self>
    where
        S: Surface + Send + 'static,
        K: KeySource + Send + 'static,
    {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        log::info!(
            "starting {}x{} field, gap {}, seed {seed}",
            config.width,
            config.height,
            config.obstacle_gap
        );

        let sprite = Sprite::default();
        let actor = Arc::new(Actor::new(config.physics()));
        let world = World::new(config.world(), sprite.hitbox(), seed);
        let terrain = Arc::clone(world.terrain());

        let physics = PhysicsWorker::new(
            Arc::clone(&state),
            Arc::clone(&actor),
            config.physics_interval(),
        );
        let world = WorldWorker::new(
            Arc::clone(&state),
            Arc::clone(&actor),
            world,
            config.world_interval(),
        );
        let renderer = RenderWorker::new(
            Renderer::new(
                Arc::clone(&state),
                Arc::clone(&terrain),
                Arc::clone(&actor),
                sprite,
                (config.width, config.height),
                config.entity_column(),
            ),
            surface,
            config.frame_interval(),
        );
        let input = InputWorker::new(
            Controller::new(Arc::clone(&state), Arc::clone(&actor)),
            keys,
            config.bindings(),
        );

        let (done_tx, done) = crossbeam_channel::unbounded();
        let workers = match spawn_all(done_tx, physics, world, renderer, input) {
            Ok(workers) => workers,
            Err(e) => {
                log::error!("failed to spawn worker: {e}");
                state.quit();
                return Err(e.into());
            }
        };

        Ok(Self {
            state,
            actor,
            terrain,
            workers,
            done,
        })
    }

    /// Shared game state.
    #[inline]
    pub const fn state(&self) -> &Arc<SharedState> {
        &self.state
    }

    /// Shared actor cells.
    #[inline]
    pub const fn actor(&self) -> &Arc<Actor> {
        &self.actor
    }

    /// Shared terrain.
    #[inline]
    pub const fn terrain(&self) -> &Arc<Terrain> {
        &self.terrain
    }

    /// Block until any worker stops, then force `Exit` and give the rest
    /// `grace` to follow.
    ///
    /// Workers that report in time are joined. The others are left running
    /// and listed as stragglers; the process is expected to exit without them.
    pub fn wait(self, grace: Duration) -> Shutdown {
        let mut exits = Vec::with_capacity(self.workers.len());
        if let Ok(first) = self.done.recv() {
            log::info!("{} worker stopped first", first.kind);
            exits.push(first);
        }
        self.state.quit();

        let deadline = Instant::now() + grace;
        while exits.len() < self.workers.len() {
            match self.done.recv_deadline(deadline) {
                Ok(exit) => exits.push(exit),
                Err(_) => break,
            }
        }

        let mut stragglers = Vec::new();
        for worker in self.workers {
            let kind = worker.kind();
            if exits.iter().any(|e| e.kind == kind) || worker.is_finished() {
                if !worker.join() {
                    log::error!("{kind} worker panicked");
                }
            } else {
                log::warn!("{kind} worker did not stop within {grace:?}");
                stragglers.push(kind);
            }
        }

        Shutdown { exits, stragglers }
    }
}

/// Start the workers in [`WorkerKind::ALL`] order.
fn spawn_all<S, K>(
    done: Sender<WorkerExit>,
    physics: PhysicsWorker,
    world: WorldWorker,
    renderer: RenderWorker<S>,
    input: InputWorker<K>,
) -> io::Result<Vec<Worker>>
where
    S: Surface + Send + 'static,
    K: KeySource + Send + 'static,
{
    Ok(vec![
        Worker::spawn(WorkerKind::Physics, done.clone(), move || physics.run())?,
        Worker::spawn(WorkerKind::World, done.clone(), move || world.run())?,
        Worker::spawn(WorkerKind::Renderer, done.clone(), move || renderer.run())?,
        Worker::spawn(WorkerKind::Input, done, move || input.run())?,
    ])
}

/// How the workers ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shutdown {
    /// Reports received, in arrival order.
    pub exits: Vec<WorkerExit>,
    /// Workers that did not report before the grace deadline.
    pub stragglers: Vec<WorkerKind>,
}

impl Shutdown {
    /// Every worker stopped in time without an error.
    pub fn is_clean(&self) -> bool {
        self.stragglers.is_empty() && self.exits.iter().all(|e| e.error.is_none())
    }

    /// The first failure, if any.
    pub fn into_result(self) -> Result<()> {
        if let Some(exit) = self.exits.into_iter().find(|e| e.error.is_some()) {
            return Err(Error::WorkerFailed {
                worker: exit.kind.name(),
                reason: exit.error.unwrap_or_default(),
            });
        }
        if let Some(kind) = self.stragglers.first() {
            return Err(Error::WorkerFailed {
                worker: kind.name(),
                reason: "did not stop within the grace period".to_string(),
            });
        }
        Ok(())
    }
}
