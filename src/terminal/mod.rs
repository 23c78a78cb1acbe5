//! Terminal backend: rendering surface, key source and terminal mode guard.

mod output;
mod surface;

pub use output::OutputBuffer;
pub use surface::{
    FrameSurface, KeySource, Surface, TerminalGuard, TerminalKeys, KEY_POLL_INTERVAL,
};
