//! World worker: scrolls the terrain and checks for collisions.

use std::sync::Arc;
use std::time::Duration;

use super::ticker::Cadence;
use crate::game::{Actor, StepOutcome, World};
use crate::state::SharedState;

/// Owns the [`World`] and steps it on the world interval.
#[derive(Debug)]
pub struct WorldWorker {
    state: Arc<SharedState>,
    actor: Arc<Actor>,
    world: World,
    interval: Duration,
}

impl WorldWorker {
    /// Create a worker stepping `world` every `interval`.
    pub const fn new(
        state: Arc<SharedState>,
        actor: Arc<Actor>,
        world: World,
        interval: Duration,
    ) -> Self {
        Self {
            state,
            actor,
            world,
            interval,
        }
    }

    /// Step until the game exits.
    pub fn run(mut self) -> crate::Result<()> {
        let mut cadence = Cadence::new(self.interval);
        let mut collisions = 0u64;
        while !self.state.is_exit() {
            if self.world.step(&self.state, &self.actor) == StepOutcome::Collided {
                collisions += 1;
            }
            cadence.wait();
        }
        log::debug!(
            "world stopped after {} ticks, {collisions} collisions",
            cadence.ticks()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{PhysicsConfig, Sprite, WorldConfig};
    use crate::state::GameState;
    use std::thread;

    #[test]
    fn test_run_scrolls_until_death() {
        let state = Arc::new(SharedState::new());
        let actor = Arc::new(Actor::new(PhysicsConfig::default()));
        let world = World::new(WorldConfig::default(), Sprite::default().hitbox(), 7);
        let terrain = Arc::clone(world.terrain());
        let worker = WorldWorker::new(
            Arc::clone(&state),
            Arc::clone(&actor),
            world,
            Duration::from_millis(1),
        );

        state.start();
        // Parked on the floor, the first step is a collision.
        actor.place(49);
        let handle = thread::spawn(move || worker.run());

        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while state.get() != GameState::Dead && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(state.get(), GameState::Dead);
        assert!(!terrain.is_clear());

        state.quit();
        handle.join().unwrap().unwrap();
    }
}
