//! Message types passed between workers and the supervisor.

use std::fmt;
use std::time::Instant;

/// Key codes the game distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Escape key.
    Esc,
    /// Any other key.
    Other,
}

/// Key modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    /// Shift key held.
    pub shift: bool,
    /// Control key held.
    pub control: bool,
    /// Alt/Option key held.
    pub alt: bool,
}

impl KeyModifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
    };

    /// Only Control.
    pub const CONTROL: Self = Self {
        shift: false,
        control: true,
        alt: false,
    };
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key code.
    pub code: KeyCode,
    /// Modifiers held during the press.
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    /// A plain character press.
    pub const fn char(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Control + character.
    pub const fn ctrl(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
        }
    }
}

/// Semantic action produced by one key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Start, flap or restart depending on the game state.
    Flap,
    /// Leave the game.
    Quit,
}

/// Keys bound to actions.
///
/// `Esc` and `Ctrl+C` always quit: raw mode delivers the interrupt as a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    /// Flap key.
    pub flap: char,
    /// Quit key.
    pub quit: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self { flap: ' ', quit: 'q' }
    }
}

impl KeyBindings {
    /// Map a key press to an action; unbound keys map to `None`.
    pub fn action(&self, key: &KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char('c') if key.modifiers.control => Some(Action::Quit),
            KeyCode::Char(_) if key.modifiers.control || key.modifiers.alt => None,
            KeyCode::Char(c) if c == self.quit => Some(Action::Quit),
            KeyCode::Char(c) if c == self.flap => Some(Action::Flap),
            _ => None,
        }
    }
}

/// The four workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerKind {
    /// Actor physics.
    Physics,
    /// Terrain scroll and collision.
    World,
    /// Frame drawing.
    Renderer,
    /// Key reading and dispatch.
    Input,
}

impl WorkerKind {
    /// All workers, in spawn order.
    pub const ALL: [Self; 4] = [Self::Physics, Self::World, Self::Renderer, Self::Input];

    /// Short name, also used as the thread name suffix.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Physics => "physics",
            Self::World => "world",
            Self::Renderer => "renderer",
            Self::Input => "input",
        }
    }
}

impl fmt::Display for WorkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sent by a worker when its loop ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerExit {
    /// Which worker stopped.
    pub kind: WorkerKind,
    /// Failure description, if it stopped on an error.
    pub error: Option<String>,
    /// When the worker's loop ended.
    pub stopped_at: Instant,
}
