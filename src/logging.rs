//! Logging to a file.
//!
//! The game owns the terminal, so log lines go to a file. Each line carries
//! the name of the thread that wrote it:
//!
//! ```text
//! 12.084 (clappy-world) INFO state running -> dead
//! ```
//!
//! The filter defaults to `info` and can be overridden with `RUST_LOG`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use env_logger::{Builder, Env, Target};

use crate::error::{Error, Result};

/// Install the global logger, appending to `path`.
pub fn init(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| logging_error(path, e))?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            let thread = std::thread::current();
            writeln!(
                buf,
                "{} ({}) {} {}",
                buf.timestamp_millis(),
                thread.name().unwrap_or("main"),
                record.level(),
                record.args()
            )
        })
        .try_init()
        .map_err(|e| logging_error(path, e))
}

/// Like [`init`], but a failure only prints a warning to stderr.
///
/// The game runs the same without a log. Returns whether logging is active.
pub fn init_or_warn(path: &Path) -> bool {
    match init(path) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("clappy: {e}; continuing without a log");
            false
        }
    }
}

fn logging_error(path: &Path, reason: impl ToString) -> Error {
    Error::Logging {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritable_path_is_an_error() {
        let path = Path::new("/nonexistent-dir/clappy.log");
        match init(path) {
            Err(Error::Logging { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unwritable_path_does_not_stop_the_game() {
        assert!(!init_or_warn(Path::new("/nonexistent-dir/clappy.log")));
    }
}
