//! Workers: four threads sharing the game state without locks.
//!
//! - **Physics**: moves the actor on its own cadence
//! - **World**: scrolls terrain, generates obstacles, detects collisions
//! - **Renderer**: draws terrain and actor at the frame rate
//! - **Input**: blocks on the key source and dispatches actions
//!
//! # Architecture
//!
//! ```text
//!                    ┌──────────────┐
//!   keys ──────────▶ │ Input Thread │ ── start/restart/quit ──┐
//!                    └──────────────┘                          ▼
//!                           │ flap                     ┌──────────────┐
//!                           ▼                          │ SharedState  │
//!  ┌────────────────┐   ┌───────┐   position   ┌─────────────┐  │
//!  │ Physics Thread │──▶│ Actor │─────────────▶│ World Thread│──┘ die
//!  └────────────────┘   └───────┘              └─────────────┘
//!                           │                        │ terrain
//!                           ▼                        ▼
//!                    ┌──────────────────────────────────┐
//!                    │          Render Thread           │ ──▶ surface
//!                    └──────────────────────────────────┘
//! ```
//!
//! Every loop checks for `Exit` at the top of each tick and reports a
//! [`WorkerExit`] to the [`Runtime`] when it stops.

pub mod messages;
mod input;
mod physics;
mod renderer;
mod runtime;
mod ticker;
mod world;

use std::io;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::Sender;

pub use input::{Controller, InputWorker};
pub use messages::{Action, KeyBindings, KeyCode, KeyEvent, KeyModifiers, WorkerExit, WorkerKind};
pub use physics::PhysicsWorker;
pub use renderer::{RenderWorker, Renderer};
pub use runtime::{Runtime, Shutdown};
pub use ticker::Cadence;
pub use world::WorldWorker;

/// Handle to a running worker thread.
#[derive(Debug)]
pub struct Worker {
    kind: WorkerKind,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Run `body` on a named thread and report its end on `done`.
    pub(crate) fn spawn<F>(kind: WorkerKind, done: Sender<WorkerExit>, body: F) -> io::Result<Self>
    where
        F: FnOnce() -> crate::Result<()> + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name(format!("clappy-{kind}"))
            .spawn(move || {
                let mut report = ExitReport {
                    kind,
                    done,
                    error: None,
                };
                log::debug!("{kind} worker started");
                match body() {
                    Ok(()) => log::debug!("{kind} worker stopped"),
                    Err(e) => {
                        log::error!("{kind} worker failed: {e}");
                        report.error = Some(e.to_string());
                    }
                }
            })?;

        Ok(Self {
            kind,
            handle: Some(handle),
        })
    }

    /// Which worker this is.
    #[inline]
    pub const fn kind(&self) -> WorkerKind {
        self.kind
    }

    /// Whether the thread has finished running.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the thread to finish.
    ///
    /// Returns `false` if the thread panicked.
    pub fn join(mut self) -> bool {
        self.handle.take().map_or(true, |h| h.join().is_ok())
    }
}

/// Sends the worker's [`WorkerExit`] when the thread body ends, including
/// by panic.
struct ExitReport {
    kind: WorkerKind,
    done: Sender<WorkerExit>,
    error: Option<String>,
}

impl Drop for ExitReport {
    fn drop(&mut self) {
        let error = if thread::panicking() {
            log::error!("{} worker panicked", self.kind);
            Some("panicked".to_string())
        } else {
            self.error.take()
        };
        // Receiver gone means nobody is waiting any more.
        let _ = self.done.send(WorkerExit {
            kind: self.kind,
            error,
            stopped_at: Instant::now(),
        });
    }
}
