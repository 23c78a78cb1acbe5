//! Configuration: field dimensions, obstacle gap, tick rates and key bindings.
//!
//! Values come from the command line. Defaults match the classic 80x50 field
//! with a six-row gap. [`Config::validate`] runs before any worker starts.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::game::actor::PhysicsConfig;
use crate::game::sprite::Sprite;
use crate::game::world::WorldConfig;
use crate::worker::messages::KeyBindings;

/// Game configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "clappy", version, about = "Flap through the gaps. Space to flap, q to quit.")]
pub struct Config {
    /// Viewport height in rows.
    #[arg(long, default_value_t = 50)]
    pub height: u16,

    /// Viewport width in columns.
    #[arg(long, default_value_t = 80)]
    pub width: u16,

    /// Vertical size of the opening in each obstacle.
    #[arg(long = "gap", default_value_t = 6)]
    pub obstacle_gap: u16,

    /// Renderer frames per second.
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Physics tick interval in milliseconds.
    #[arg(long, default_value_t = 150)]
    pub physics_interval_ms: u64,

    /// World scroll tick interval in milliseconds.
    #[arg(long, default_value_t = 80)]
    pub world_interval_ms: u64,

    /// Off-screen columns generated ahead of the viewport.
    #[arg(long, default_value_t = 20)]
    pub lookahead: u16,

    /// Seed for obstacle placement. Random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Key that flaps, starts and restarts.
    #[arg(long, default_value_t = ' ')]
    pub flap_key: char,

    /// Key that quits.
    #[arg(long, default_value_t = 'q')]
    pub quit_key: char,

    /// How long workers get to observe `Exit` before the process is forced down.
    #[arg(long, default_value_t = 500)]
    pub grace_ms: u64,

    /// Log file. The terminal belongs to the game, so logs never go there.
    #[arg(long, default_value = "/tmp/clappy.log")]
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            height: 50,
            width: 80,
            obstacle_gap: 6,
            fps: 30,
            physics_interval_ms: 150,
            world_interval_ms: 80,
            lookahead: 20,
            seed: None,
            flap_key: ' ',
            quit_key: 'q',
            grace_ms: 500,
            log_file: PathBuf::from("/tmp/clappy.log"),
        }
    }
}

/// Reasons a configuration is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A dimension or rate is zero.
    #[error("{name} must be greater than zero")]
    Zero {
        /// Offending option.
        name: &'static str,
    },

    /// The gap leaves no valid offset inside the field.
    #[error("gap {gap} needs a height of at least {}, got {height}", gap + 2)]
    GapTooLarge {
        /// Configured gap.
        gap: u16,
        /// Configured height.
        height: u16,
    },

    /// The sprite does not fit at the centre column.
    #[error("width {width} is too narrow, need at least {min}")]
    TooNarrow {
        /// Configured width.
        width: u16,
        /// Minimum width.
        min: u16,
    },

    /// Flap and quit are bound to the same key.
    #[error("flap and quit keys are both {0:?}")]
    KeyConflict(char),
}

impl Config {
    /// Check every value the workers rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("height", u64::from(self.height)),
            ("width", u64::from(self.width)),
            ("gap", u64::from(self.obstacle_gap)),
            ("fps", u64::from(self.fps)),
            ("physics-interval-ms", self.physics_interval_ms),
            ("world-interval-ms", self.world_interval_ms),
            ("lookahead", u64::from(self.lookahead)),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero { name });
            }
        }

        if u32::from(self.height) < u32::from(self.obstacle_gap) + 2 {
            return Err(ConfigError::GapTooLarge {
                gap: self.obstacle_gap,
                height: self.height,
            });
        }

        // Sprite starts at the centre column and must end inside the viewport.
        let min = Sprite::default().width().saturating_mul(2);
        if self.width < min {
            return Err(ConfigError::TooNarrow { width: self.width, min });
        }

        if self.flap_key == self.quit_key {
            return Err(ConfigError::KeyConflict(self.flap_key));
        }

        Ok(())
    }

    /// Column the actor is drawn at.
    #[inline]
    pub const fn entity_column(&self) -> u16 {
        self.width / 2
    }

    /// Physics parameters for the actor.
    pub fn physics(&self) -> PhysicsConfig {
        PhysicsConfig {
            height: self.height,
            ..PhysicsConfig::default()
        }
    }

    /// Terrain and obstacle parameters.
    pub fn world(&self) -> WorldConfig {
        WorldConfig {
            height: self.height,
            viewport_width: self.width,
            lookahead: self.lookahead,
            gap: self.obstacle_gap,
            entity_column: self.entity_column(),
            ..WorldConfig::default()
        }
    }

    /// Key bindings for the input worker.
    pub const fn bindings(&self) -> KeyBindings {
        KeyBindings {
            flap: self.flap_key,
            quit: self.quit_key,
        }
    }

    /// Time between physics ticks.
    pub const fn physics_interval(&self) -> Duration {
        Duration::from_millis(self.physics_interval_ms)
    }

    /// Time between world ticks.
    pub const fn world_interval(&self) -> Duration {
        Duration::from_millis(self.world_interval_ms)
    }

    /// Time between rendered frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    /// Shutdown grace period.
    pub const fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }
}
