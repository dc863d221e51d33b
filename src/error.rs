//! Crate-wide error type.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unknown character '{0}'")]
    UnknownCharacter(String),

    #[error("unknown stage '{0}'")]
    UnknownStage(String),
}

impl GameError {
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        GameError::Json {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
