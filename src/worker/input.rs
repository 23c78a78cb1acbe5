//! Input worker: blocks on key presses and turns them into state changes.

use std::io;
use std::sync::Arc;

use super::messages::{Action, KeyBindings};
use crate::game::Actor;
use crate::state::{GameState, SharedState};
use crate::terminal::KeySource;

/// Applies actions to the shared state and actor.
#[derive(Debug, Clone)]
pub struct Controller {
    state: Arc<SharedState>,
    actor: Arc<Actor>,
}

impl Controller {
    /// Create a controller over the shared cells.
    pub const fn new(state: Arc<SharedState>, actor: Arc<Actor>) -> Self {
        Self { state, actor }
    }

    /// Apply one action for the current state.
    ///
    /// Flap starts from `Ready`, flaps while `Running` and restarts from
    /// `Dead`. Quit always moves to `Exit`.
    pub fn handle(&self, action: Action) {
        match action {
            Action::Quit => {
                self.state.quit();
            }
            Action::Flap => match self.state.get() {
                GameState::Ready => {
                    self.state.start();
                }
                GameState::Running => self.actor.flap(),
                GameState::Dead => {
                    // The actor must be back at the start row before `Ready`
                    // is visible, or a quick second flap starts from the crash site.
                    self.actor.reset();
                    self.state.restart();
                }
                GameState::Exit => {}
            },
        }
    }
}

/// Reads keys until `Exit` and feeds them to a [`Controller`].
pub struct InputWorker<K> {
    controller: Controller,
    keys: K,
    bindings: KeyBindings,
}

impl<K: KeySource> InputWorker<K> {
    /// Create a worker reading from `keys`.
    pub const fn new(controller: Controller, keys: K, bindings: KeyBindings) -> Self {
        Self {
            controller,
            keys,
            bindings,
        }
    }

    /// Dispatch key presses until the game exits.
    ///
    /// Exit set by another thread is noticed within one key poll. A read
    /// error is treated as a quit: with no input the game can only be left
    /// by force.
    pub fn run(mut self) -> crate::Result<()> {
        while !self.controller.state.is_exit() {
            let key = match self.keys.read_key() {
                Ok(key) => key,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => continue,
                Err(e) => {
                    log::warn!("key source failed, quitting: {e}");
                    self.controller.handle(Action::Quit);
                    break;
                }
            };
            if let Some(action) = self.bindings.action(&key) {
                log::debug!("key {:?} -> {action:?}", key.code);
                self.controller.handle(action);
            }
        }
        Ok(())
    }
}
