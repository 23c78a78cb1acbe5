//! # Clappy
//!
//! A terminal side-scroller driven by four concurrent workers.
//!
//! The actor falls under gravity and flaps upward on a key press while
//! obstacles with a single opening scroll in from the right. Touching an
//! obstacle, the floor or the ceiling ends the round; flapping again restarts.
//!
//! ## Core Concepts
//!
//! - **Shared atomic state**: one lock-free register (`Ready`, `Running`,
//!   `Dead`, `Exit`) read by every worker at the top of each tick
//! - **Independent cadences**: physics, world scroll and rendering each sleep
//!   on their own interval
//! - **Lock-free terrain**: a grid of atomic bytes written by the world worker
//!   and read by the renderer, torn frames allowed
//! - **Double-buffered rendering**: frames are diffed and flushed as minimal
//!   ANSI in a single write
//!
//! ## Example
//!
//! ```rust,no_run
//! use clappy::{Config, Runtime, TerminalGuard, TerminalKeys};
//!
//! fn main() -> clappy::Result<()> {
//!     let config = Config::default();
//!     let guard = TerminalGuard::init(config.width, config.height)?;
//!     let surface = guard.surface(config.width, config.height);
//!     let runtime = Runtime::spawn(&config, surface, TerminalKeys)?;
//!     let shutdown = runtime.wait(config.grace());
//!     guard.teardown();
//!     shutdown.into_result()
//! }
//! ```
//!
//! Any [`Surface`] and [`KeySource`] work, so the game also runs headless:
//!
//! ```rust
//! use clappy::{Config, FrameSurface, KeyEvent, Runtime};
//!
//! let config = Config { seed: Some(1), ..Config::default() };
//! let (keys, rx) = crossbeam_channel::unbounded();
//! let surface = FrameSurface::new(Vec::new(), config.width, config.height, (0, 0));
//! let runtime = Runtime::spawn(&config, surface, rx).unwrap();
//!
//! keys.send(KeyEvent::char('q')).unwrap();
//! assert!(runtime.wait(config.grace()).is_clean());
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod config;
pub mod error;
pub mod game;
pub mod logging;
#[cfg(unix)]
pub mod signals;
pub mod state;
pub mod terminal;
pub mod worker;

// Re-exports for convenience
pub use buffer::{Cell, Frame, Style};
pub use config::{Config, ConfigError};
pub use error::{Error, Result};
pub use game::{Actor, PhysicsConfig, Sprite, Terrain, Tile, World, WorldConfig};
pub use state::{GameState, SharedState};
pub use terminal::{FrameSurface, KeySource, Surface, TerminalGuard, TerminalKeys};
pub use worker::{Action, Controller, KeyBindings, KeyEvent, Runtime, Shutdown, WorkerKind};
