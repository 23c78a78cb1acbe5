//! Clappy: flap through the gaps.
//!
//! Space flaps (and starts or restarts the round); `q`, `Esc` or `Ctrl+C`
//! quits, as do `SIGINT`, `SIGTERM` and `SIGHUP`. Logs go to
//! `/tmp/clappy.log` unless `--log-file` says otherwise.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use clappy::{logging, Config, Runtime, SharedState, TerminalGuard, TerminalKeys};

fn main() -> ExitCode {
    let config = Config::parse();
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("clappy: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> clappy::Result<()> {
    config.validate()?;
    logging::init_or_warn(&config.log_file);

    // Installed before the terminal changes mode, so no signal can leave it raw.
    let state = Arc::new(SharedState::new());
    #[cfg(unix)]
    let signals = clappy::signals::SignalWatcher::spawn(Arc::clone(&state))?;

    let guard = TerminalGuard::init(config.width, config.height)?;
    let surface = guard.surface(config.width, config.height);
    let runtime = Runtime::spawn_with(config, state, surface, TerminalKeys)?;

    let shutdown = runtime.wait(config.grace());
    guard.teardown();
    #[cfg(unix)]
    signals.close();

    log::info!(
        "shut down: {} workers stopped, {} stragglers",
        shutdown.exits.len(),
        shutdown.stragglers.len()
    );
    // Returning drops any stragglers with the process.
    shutdown.into_result()
}
