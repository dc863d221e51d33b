//! JSON persistence helpers for files under `~/.mkultra/`.

use crate::error::{GameError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the per-user data directory inside `$HOME`.
pub const DATA_DIR_NAME: &str = ".mkultra";

/// Get the `~/.mkultra/` directory path, creating it if needed.
pub fn data_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = home_dir.join(DATA_DIR_NAME);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the full path for a file in `~/.mkultra/`.
pub fn data_path(filename: &str) -> io::Result<PathBuf> {
    Ok(data_dir()?.join(filename))
}

/// Load a JSON file, returning `T::default()` if it is missing or invalid.
pub fn load_json_or_default<T: Default + serde::de::DeserializeOwned>(path: &Path) -> T {
    match fs::read_to_string(path) {
        Ok(json) => match serde_json::from_str(&json) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable JSON file");
                T::default()
            }
        },
        Err(_) => T::default(),
    }
}

/// Load a JSON file strictly: missing files and parse failures are errors.
pub fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| GameError::json(path, e))
}

/// Save a value as pretty-printed JSON, creating parent directories.
pub fn save_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(data).map_err(|e| GameError::json(path, e))?;
    fs::write(path, json)?;
    Ok(())
}
