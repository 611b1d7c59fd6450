//! Logging configuration for cmdroute.
//!
//! The interactive console writes to stdout, so logs go either to stderr or
//! to a file when the operator asks for a quiet terminal.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` when set, `info` otherwise.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Creates the log file and any missing parent directories.
///
/// An existing file is truncated so each run starts with a fresh log.
fn open_log_file(log_path: &Path) -> io::Result<File> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(log_path)
}

/// Initializes logging to the given file.
///
/// Falls back to stderr when the file cannot be created.
pub fn init_file_logging(log_path: &Path) {
    let log_file = match open_log_file(log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {}: {e}", log_path.display());
            // Stderr still keeps stdout clean for command replies
            init_stderr_logging();
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(log_file)
        .with_ansi(false) // plain text in files
        .init();
}

/// Initializes logging to stderr.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

/// Returns the default path for the log file, used by a bare `--log-file`.
///
/// Uses the XDG state directory on Linux (`~/.local/state/cmdroute/cmdroute.log`),
/// or falls back to the config directory on other platforms.
pub fn get_log_path() -> PathBuf {
    // XDG_STATE_HOME on Linux
    if let Some(state_dir) = dirs::state_dir() {
        return state_dir.join("cmdroute").join("cmdroute.log");
    }

    // macOS and Windows have no state directory
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("cmdroute").join("cmdroute.log");
    }

    std::env::temp_dir().join("cmdroute.log")
}
