//! Game state register shared by every worker.
//!
//! The register is a single atomic byte plus a restart counter. Workers read
//! it at the top of each tick and never block on it; a value up to one tick
//! old is acceptable.
//!
//! ```text
//!            flap                collision
//!   Ready ─────────▶ Running ─────────────▶ Dead
//!     ▲                                      │
//!     └──────────────── flap ────────────────┘
//!
//!   any ──── quit ───▶ Exit (terminal)
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

/// Discrete phase of the game.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Actor hovers, world is static.
    Ready = 1,
    /// Physics and scrolling are active.
    Running = 2,
    /// Actor hit something, world is frozen.
    Dead = 3,
    /// Terminal state, every worker stops.
    Exit = 4,
}

impl GameState {
    /// Decode a raw register value.
    ///
    /// Unknown values decode as `Exit` so a corrupted register stops the game.
    #[inline]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Ready,
            2 => Self::Running,
            3 => Self::Dead,
            _ => Self::Exit,
        }
    }

    /// Whether `from -> to` is an edge of the transition table.
    pub const fn can_transition(from: Self, to: Self) -> bool {
        matches!(
            (from, to),
            (Self::Ready, Self::Running)
                | (Self::Running, Self::Dead)
                | (Self::Dead, Self::Ready)
                | (Self::Ready | Self::Running | Self::Dead, Self::Exit)
        )
    }

    /// Lowercase name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Dead => "dead",
            Self::Exit => "exit",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide game state register.
///
/// Every mutation goes through [`SharedState::transition`], which only
/// accepts edges of the transition table, so two workers racing on the same
/// edge (e.g. a double restart) resolve to exactly one winner.
#[derive(Debug)]
pub struct SharedState {
    state: AtomicU8,
    round: AtomicU64,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedState {
    /// Create a register in the `Ready` state, round 0.
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(GameState::Ready as u8),
            round: AtomicU64::new(0),
        }
    }

    /// Current state.
    #[inline]
    pub fn get(&self) -> GameState {
        GameState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Whether the game has reached `Exit`.
    #[inline]
    pub fn is_exit(&self) -> bool {
        self.get() == GameState::Exit
    }

    /// Number of completed restarts.
    ///
    /// Owners of resettable data compare this against the last round they
    /// saw and reset themselves when it moves.
    #[inline]
    pub fn round(&self) -> u64 {
        self.round.load(Ordering::Acquire)
    }

    /// Move from `from` to `to` if the register still holds `from`.
    ///
    /// Returns `false` when the edge is illegal or another worker changed
    /// the state first.
    pub fn transition(&self, from: GameState, to: GameState) -> bool {
        if !GameState::can_transition(from, to) {
            return false;
        }
        let swapped = self
            .state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if swapped {
            log::info!("state {from} -> {to}");
        }
        swapped
    }

    /// `Ready -> Running`.
    pub fn start(&self) -> bool {
        self.transition(GameState::Ready, GameState::Running)
    }

    /// `Running -> Dead`.
    pub fn die(&self) -> bool {
        self.transition(GameState::Running, GameState::Dead)
    }

    /// `Dead -> Ready`, bumping the restart round.
    ///
    /// The round is published before the state so any worker that observes
    /// `Ready` also observes the new round.
    pub fn restart(&self) -> bool {
        if self.get() != GameState::Dead {
            return false;
        }
        self.round.fetch_add(1, Ordering::AcqRel);
        self.transition(GameState::Dead, GameState::Ready)
    }

    /// Any state -> `Exit`. Returns `false` if already exited.
    pub fn quit(&self) -> bool {
        let previous = self.state.swap(GameState::Exit as u8, Ordering::AcqRel);
        let previous = GameState::from_u8(previous);
        if previous == GameState::Exit {
            return false;
        }
        log::info!("state {previous} -> exit");
        true
    }
}
