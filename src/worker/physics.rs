//! Physics worker: hovers the actor while `Ready`, applies gravity while
//! `Running`, leaves it alone otherwise.

use std::sync::Arc;
use std::time::Duration;

use super::ticker::Cadence;
use crate::game::Actor;
use crate::state::{GameState, SharedState};

/// Drives the actor on the physics interval.
#[derive(Debug)]
pub struct PhysicsWorker {
    state: Arc<SharedState>,
    actor: Arc<Actor>,
    interval: Duration,
}

impl PhysicsWorker {
    /// Create a worker ticking every `interval`.
    pub const fn new(state: Arc<SharedState>, actor: Arc<Actor>, interval: Duration) -> Self {
        Self {
            state,
            actor,
            interval,
        }
    }

    /// One physics tick for the current state.
    pub fn tick(&self) {
        match self.state.get() {
            GameState::Ready => self.actor.hover(),
            GameState::Running => {
                self.actor.fall();
            }
            GameState::Dead | GameState::Exit => {}
        }
    }

    /// Tick until the game exits.
    pub fn run(self) -> crate::Result<()> {
        let mut cadence = Cadence::new(self.interval);
        while !self.state.is_exit() {
            self.tick();
            cadence.wait();
        }
        log::debug!("physics stopped after {} ticks", cadence.ticks());
        Ok(())
    }
}
