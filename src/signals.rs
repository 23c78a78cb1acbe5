//! Termination signals.
//!
//! Raw mode turns a typed Ctrl+C into a key, but a signal sent from outside
//! (`kill`, a closed terminal window) never reaches the input worker. The
//! watcher turns `SIGINT`, `SIGTERM` and `SIGHUP` into a quit, so the
//! runtime winds the workers down and the terminal is restored.

use std::io;
use std::os::raw::c_int;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};

use crate::state::SharedState;

/// Signals that end the game.
pub const TERM_SIGNALS: [c_int; 3] = [SIGINT, SIGTERM, SIGHUP];

/// Background thread that quits the game on a termination signal.
///
/// Dropping the watcher stops the thread. The process keeps handling the
/// signals afterwards, so a late one is ignored rather than killing the
/// process mid-teardown.
pub struct SignalWatcher {
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

impl SignalWatcher {
    /// Watch [`TERM_SIGNALS`] on behalf of `state`.
    pub fn spawn(state: Arc<SharedState>) -> io::Result<Self> {
        Self::watch(state, &TERM_SIGNALS)
    }

    /// Watch a specific set of signals.
    pub fn watch(state: Arc<SharedState>, signals: &[c_int]) -> io::Result<Self> {
        let mut signals = Signals::new(signals)?;
        let handle = signals.handle();

        let thread = thread::Builder::new()
            .name("clappy-signals".to_string())
            .spawn(move || {
                for signal in signals.forever() {
                    log::warn!("received signal {signal}, quitting");
                    state.quit();
                }
            })?;

        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }

    /// Stop watching and wait for the thread.
    pub fn close(mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for SignalWatcher {
    fn drop(&mut self) {
        self.handle.close();
    }
}
