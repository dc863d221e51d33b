//! Tracing setup.
//!
//! The game owns the terminal, so it logs to a file in the platform data
//! directory. The headless simulator logs to stderr. `MKULTRA_LOG` takes an
//! `EnvFilter` directive and defaults to `info`.

use directories::ProjectDirs;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "MKULTRA_LOG";
const LOG_FILE: &str = "mkultra.log";

fn env_filter() -> EnvFilter {
    let directive = std::env::var(LOG_ENV).unwrap_or_else(|_| "info".to_string());
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Where the game writes its log file.
pub fn log_file_path() -> io::Result<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "mkultra").ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine project directories",
        )
    })?;
    let dir = project_dirs.data_dir();
    fs::create_dir_all(dir)?;
    Ok(dir.join(LOG_FILE))
}

/// Log to the game's log file. Returns the file path.
pub fn init_file_logging() -> io::Result<PathBuf> {
    let path = log_file_path()?;
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
    tracing::info!(path = %path.display(), "logging started");
    Ok(path)
}

pub fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
