//! tracing subscriber setup. The terminal belongs to the dashboard, so logs go to a file.

use std::{
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing_subscriber::EnvFilter;

use crate::config::config_dir;

pub const LOG_ENV: &str = "SYSPULSE_LOG";

pub fn default_log_path() -> PathBuf {
    config_dir().join("syspulse.log")
}

/// Install the global subscriber. Filter comes from `SYSPULSE_LOG` (default `info`).
/// If the log file can't be opened, events are discarded.
pub fn init_logging(path: &Path) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false);

    // A second init (tests, embedding) is not an error worth surfacing.
    let _ = match open_log_file(path) {
        Ok(file) => builder.with_writer(Mutex::new(file)).try_init(),
        Err(_) => builder.with_writer(io::sink).try_init(),
    };
}

fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
