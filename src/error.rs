use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced while setting up or driving a game session.
///
/// Running into your own tail is not an error; see [`crate::game::TickOutcome`].
#[derive(Debug, Error)]
pub enum GameError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidGrid { width: u16, height: u16 },

    #[error("grid {width}x{height} cannot hold a snake of length {length}")]
    GridTooSmall {
        width: u16,
        height: u16,
        length: usize,
    },

    #[error("a snake needs at least one segment")]
    EmptySnake,

    #[error("no free cell left on a {width}x{height} grid")]
    NoFreeCell { width: u16, height: u16 },
}

pub type Result<T> = std::result::Result<T, GameError>;
